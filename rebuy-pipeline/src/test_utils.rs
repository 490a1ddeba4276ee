use rebuy_types::shop::{Order, OrderLine, User};
use time::OffsetDateTime;

use crate::{error::BoxError, source::Clock};

pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> Result<OffsetDateTime, BoxError> {
        Ok(self.0)
    }
}

pub struct BrokenClock;

impl Clock for BrokenClock {
    fn now(&self) -> Result<OffsetDateTime, BoxError> {
        Err("ntp unreachable".into())
    }
}

/// An order of single-quantity lines, one per product id.
pub fn order(date_placed: OffsetDateTime, product_ids: &[&str]) -> Order {
    Order::new(
        date_placed,
        product_ids.iter().map(|id| OrderLine::new(*id)).collect(),
    )
}

pub fn user(user_id: &str, orders: Vec<Order>) -> User {
    User::new(user_id, orders)
}
