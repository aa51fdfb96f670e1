//! Fetch descriptors: filter, sort keys and limit for one collection.

use super::record::Record;
use crate::errors::{Error, Result};
use sea_orm::{Condition, EntityTrait, Order, sea_query::IntoCondition};
use std::fmt;
use tracing::warn;

/// Describes which rows of a collection to fetch and in what order.
///
/// With no sort key the order is whatever the database returns; callers that
/// need "latest N" must sort explicitly.
pub struct FetchDescriptor<R: Record> {
    pub(crate) condition: Condition,
    pub(crate) sort: Vec<(<R::Entity as EntityTrait>::Column, Order)>,
    pub(crate) limit: Option<u64>,
}

impl<R: Record> FetchDescriptor<R> {
    /// Every row, unordered.
    #[must_use]
    pub fn new() -> Self {
        Self {
            condition: Condition::all(),
            sort: Vec::new(),
            limit: None,
        }
    }

    /// Newest first by `column`.
    #[must_use]
    pub fn newest_first(column: <R::Entity as EntityTrait>::Column) -> Self {
        Self::new().sort_by(column, Order::Desc)
    }

    /// Adds a filter; multiple filters are AND-ed.
    #[must_use]
    pub fn filter<F: IntoCondition>(mut self, condition: F) -> Self {
        self.condition = self.condition.add(condition.into_condition());
        self
    }

    /// Appends a sort key; earlier keys take precedence.
    #[must_use]
    pub fn sort_by(mut self, column: <R::Entity as EntityTrait>::Column, order: Order) -> Self {
        self.sort.push((column, order));
        self
    }

    /// Caps the number of rows returned.
    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl<R: Record> Default for FetchDescriptor<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> fmt::Debug for FetchDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchDescriptor")
            .field("kind", &R::KIND)
            .field("sort_keys", &self.sort.len())
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

/// Decodes rows, dropping the ones whose vocabulary tokens are unknown.
pub(crate) fn decode_rows<R: Record>(
    rows: Vec<<R::Entity as EntityTrait>::Model>,
) -> Result<Vec<R>> {
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        match R::decode(row) {
            Ok(record) => records.push(record),
            Err(e @ Error::UnknownVariant { .. }) => {
                warn!("Skipping {} row: {e}", R::KIND);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(records)
}
