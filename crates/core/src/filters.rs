//! List-query filtering, sorting and pagination.
//!
//! The sort column is interpolated into SQL text rather than bound as a
//! parameter, so it must come from a caller-defined safelist. [`validate_filters`]
//! reports a bad sort value to the client; [`Filters::sort_order`] refuses to
//! resolve one regardless.

use serde::Serialize;

use crate::validator::{permitted_value, Validator};

/// Largest accepted page number.
pub const MAX_PAGE: i64 = 10_000_000;

/// Largest accepted page size.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Page size used when the client does not supply one.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Client-supplied paging and sorting for a list query.
#[derive(Debug, Clone)]
pub struct Filters {
    pub page: i64,
    pub page_size: i64,
    pub sort: String,
    /// Permitted sort keys for the call site, including `-` prefixed forms.
    pub sort_safelist: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// A sort key that passed the safelist and is safe to splice into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder<'a> {
    pub column: &'a str,
    pub direction: SortDirection,
}

/// A sort key reached resolution without being in the safelist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsafe sort parameter: {0}")]
pub struct UnsafeSort(pub String);

impl Filters {
    /// Resolve the sort key into a column and direction.
    ///
    /// Only call after [`validate_filters`] has accepted these filters. A key
    /// outside the safelist yields [`UnsafeSort`] rather than a query.
    pub fn sort_order(&self) -> Result<SortOrder<'_>, UnsafeSort> {
        if !permitted_value(&self.sort.as_str(), self.sort_safelist) {
            return Err(UnsafeSort(self.sort.clone()));
        }
        let (column, direction) = match self.sort.strip_prefix('-') {
            Some(column) => (column, SortDirection::Descending),
            None => (self.sort.as_str(), SortDirection::Ascending),
        };
        Ok(SortOrder { column, direction })
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

/// Record page, page size and sort violations into `v`.
pub fn validate_filters(v: &mut Validator, f: &Filters) {
    v.check(f.page > 0, "page", "must be greater than zero");
    v.check(f.page <= MAX_PAGE, "page", "must be a maximum of 10 million");
    v.check(f.page_size > 0, "page_size", "must be greater than zero");
    v.check(f.page_size <= MAX_PAGE_SIZE, "page_size", "must be a maximum of 100");
    v.check(
        permitted_value(&f.sort.as_str(), f.sort_safelist),
        "sort",
        "invalid sort value",
    );
}

/// Pagination metadata returned alongside a page of results.
///
/// All fields are zero when the query matched nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "is_zero")]
    pub current_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub page_size: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub first_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub last_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub total_records: i64,
}

fn is_zero(n: &i64) -> bool {
    *n == 0
}

pub fn calculate_metadata(total_records: i64, page: i64, page_size: i64) -> Metadata {
    if total_records == 0 {
        return Metadata::default();
    }

    Metadata {
        current_page: page,
        page_size,
        first_page: 1,
        last_page: (total_records + page_size - 1) / page_size,
        total_records,
    }
}
