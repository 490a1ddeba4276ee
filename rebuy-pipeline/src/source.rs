//! External collaborators: where documents come from and what "now" is.

use rebuy_types::{
    shop::{Product, User},
    value::Log,
};
use time::OffsetDateTime;

use crate::error::BoxError;

/// Read-only access to the two collections the report consumes. The
/// documents behind it are snapshots; the pipeline never writes back.
pub trait DataSource {
    fn fetch_users(&self) -> Result<Vec<Log>, BoxError>;
    fn fetch_products(&self) -> Result<Vec<Log>, BoxError>;
}

/// Supplies the reference instant for the lookback window. Mock it to make
/// runs deterministic.
pub trait Clock {
    fn now(&self) -> Result<OffsetDateTime, BoxError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<OffsetDateTime, BoxError> {
        Ok(OffsetDateTime::now_utc())
    }
}

/// In-memory source, for embedders that already hold the data and for
/// tests.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    users: Vec<Log>,
    products: Vec<Log>,
}

impl MemorySource {
    pub fn new(users: Vec<User>, products: Vec<Product>) -> Self {
        Self {
            users: users.into_iter().map(Log::from).collect(),
            products: products.into_iter().map(Log::from).collect(),
        }
    }

    pub fn from_logs(users: Vec<Log>, products: Vec<Log>) -> Self {
        Self { users, products }
    }
}

impl DataSource for MemorySource {
    fn fetch_users(&self) -> Result<Vec<Log>, BoxError> {
        Ok(self.users.clone())
    }

    fn fetch_products(&self) -> Result<Vec<Log>, BoxError> {
        Ok(self.products.clone())
    }
}
