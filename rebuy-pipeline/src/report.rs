//! The repeat-buyers report: for each product, how many distinct users
//! bought it two or more times within the trailing twelve months, ordered
//! by that count.

use rebuy_types::{
    expand::Expand,
    expr::Expr,
    field,
    field::Field,
    lookup::Lookup,
    project::ProjectField,
    shop::RepeatBuyerRow,
    sort::Sort,
    summarize::{Aggregation, GroupBy, Summarize},
    value::{Log, Value},
};
use time::{Duration, OffsetDateTime};

use crate::{
    Pipeline, PipelineStep,
    error::{PipelineError, Result},
    source::{Clock, DataSource},
};

/// An order placed two or more times marks the user as a repeat buyer of
/// the product.
const REPEAT_THRESHOLD: i64 = 2;

/// Start of the trailing-twelve-months window: the same instant one
/// calendar year before `now`, inclusive.
pub fn lookback_cutoff(now: OffsetDateTime) -> OffsetDateTime {
    match now.replace_year(now.year() - 1) {
        Ok(cutoff) => cutoff,
        // Feb 29 has no previous-year counterpart; roll to Mar 1 first.
        Err(_) => (now + Duration::days(1))
            .replace_year(now.year() - 1)
            .unwrap_or(now - Duration::days(365)),
    }
}

/// The ten steps answering the report's question, over the users
/// collection. `products` is captured by the lookup step.
pub fn repeat_buyers_pipeline(products: Vec<Log>, cutoff: OffsetDateTime) -> Pipeline {
    Pipeline::new(vec![
        PipelineStep::Expand(Expand::new(field!("orders"))),
        PipelineStep::Filter(Expr::gte(
            Expr::field(field!("orders.date_placed")),
            Expr::literal(cutoff),
        )),
        PipelineStep::Expand(Expand::new(field!("orders.order_lines"))),
        PipelineStep::Summarize(Summarize {
            by: vec![
                GroupBy::aliased(field!("orders.order_lines.product_id"), field!("product_id")),
                GroupBy::field(field!("user_id")),
            ],
            aggs: vec![(field!("order_count"), Aggregation::Count)],
        }),
        PipelineStep::Filter(Expr::gte(
            Expr::field(field!("order_count")),
            Expr::literal(REPEAT_THRESHOLD),
        )),
        PipelineStep::Summarize(Summarize {
            by: vec![GroupBy::field(field!("product_id"))],
            aggs: vec![(field!("multiple_buyer_count"), Aggregation::Count)],
        }),
        PipelineStep::Sort(vec![
            Sort::desc(field!("multiple_buyer_count")),
            Sort::asc(field!("product_id")),
        ]),
        PipelineStep::Lookup(
            Lookup::new(field!("product_id"), field!("product_id"), field!("product")),
            products,
        ),
        // Drops rows whose product id has no catalog entry instead of
        // fabricating a null-named result.
        PipelineStep::Expand(Expand::new(field!("product"))),
        PipelineStep::Project(vec![
            ProjectField::new(Expr::field(field!("product.product_id")), field!("product_id")),
            ProjectField::new(
                Expr::field(field!("product.product_name")),
                field!("product_name"),
            ),
            ProjectField::keep(field!("multiple_buyer_count")),
        ]),
    ])
}

fn require<'a>(log: &'a Log, field: Field) -> Result<&'a Value> {
    log.get(&field[0]).ok_or_else(|| PipelineError::MalformedResult {
        field,
        doc: Value::Object(log.clone()),
    })
}

fn row_from_log(log: &Log) -> Result<RepeatBuyerRow> {
    let product_id = require(log, field!("product_id"))?.clone();

    let product_name = require(log, field!("product_name"))?
        .as_str()
        .ok_or_else(|| PipelineError::MalformedResult {
            field: field!("product_name"),
            doc: Value::Object(log.clone()),
        })?
        .to_string();

    let multiple_buyer_count = require(log, field!("multiple_buyer_count"))?
        .as_u64()
        .ok_or_else(|| PipelineError::MalformedResult {
            field: field!("multiple_buyer_count"),
            doc: Value::Object(log.clone()),
        })?;

    Ok(RepeatBuyerRow {
        product_id,
        product_name,
        multiple_buyer_count,
    })
}

/// Fetches both collections, runs the pipeline against a cutoff computed
/// once from the clock, and types the output rows.
pub fn run(source: &dyn DataSource, clock: &dyn Clock) -> Result<Vec<RepeatBuyerRow>> {
    let now = clock.now().map_err(PipelineError::ClockUnavailable)?;
    let cutoff = lookback_cutoff(now);

    let users = source
        .fetch_users()
        .map_err(|source| PipelineError::Fetch {
            collection: "users",
            source,
        })?;
    let products = source
        .fetch_products()
        .map_err(|source| PipelineError::Fetch {
            collection: "products",
            source,
        })?;

    let docs = repeat_buyers_pipeline(products, cutoff).execute(users)?;
    docs.iter().map(row_from_log).collect()
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn cutoff_is_one_calendar_year_back() {
        assert_eq!(
            lookback_cutoff(datetime!(2026-08-29 10:30 UTC)),
            datetime!(2025-08-29 10:30 UTC)
        );
    }

    #[test]
    fn cutoff_from_leap_day_rolls_forward() {
        assert_eq!(
            lookback_cutoff(datetime!(2024-02-29 00:00 UTC)),
            datetime!(2023-03-01 00:00 UTC)
        );
    }
}
