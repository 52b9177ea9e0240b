//! Page/offset arithmetic and the pagination metadata returned with lists.

use serde::Serialize;

/// Converts a validated page and page size into LIMIT/OFFSET values.
///
/// Bounds are enforced upstream by the query validator; `page` is assumed
/// to be at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page: i64,
    page_size: i64,
}

impl Paginator {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self { page, page_size }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

/// Pagination metadata. Zero fields are omitted when serialized, so an
/// empty result renders as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
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

/// Derive pagination metadata from the total number of matching rows.
pub fn calculate_pagination(total_records: i64, page: i64, page_size: i64) -> Pagination {
    if total_records == 0 || page_size <= 0 {
        return Pagination::default();
    }

    Pagination {
        current_page: page,
        page_size,
        first_page: 1,
        last_page: (total_records + page_size - 1) / page_size,
        total_records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_and_offset() {
        let p = Paginator::new(2, 10);
        assert_eq!(p.limit(), 10);
        assert_eq!(p.offset(), 10);
    }

    #[test]
    fn first_page_has_zero_offset() {
        assert_eq!(Paginator::new(1, 25).offset(), 0);
    }

    #[test]
    fn no_records_yields_zero_value() {
        assert_eq!(calculate_pagination(0, 1, 10), Pagination::default());
    }

    #[test]
    fn last_page_rounds_up() {
        let p = calculate_pagination(23, 1, 10);
        assert_eq!(p.last_page, 3);
        assert_eq!(p.first_page, 1);
        assert_eq!(p.current_page, 1);
        assert_eq!(p.page_size, 10);
        assert_eq!(p.total_records, 23);
    }

    #[test]
    fn exact_multiple_does_not_add_a_page() {
        assert_eq!(calculate_pagination(20, 2, 10).last_page, 2);
    }

    #[test]
    fn empty_pagination_serializes_as_empty_object() {
        let json = serde_json::to_value(Pagination::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn pagination_uses_camel_case_keys() {
        let json = serde_json::to_value(calculate_pagination(23, 3, 10)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "currentPage": 3,
                "pageSize": 10,
                "firstPage": 1,
                "lastPage": 3,
                "totalRecords": 23,
            })
        );
    }
}
