//! Ticket business rules and list-query parameters.

use crate::validation::{permitted_value, QueryValues, Validator};

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 150;

/// Smallest accepted price, in minor currency units.
pub const PRICE_MIN: i64 = 1;

/// Largest accepted price, in minor currency units.
pub const PRICE_MAX: i64 = 50_000;

/// Upper bound for the `page` query parameter.
pub const MAX_PAGE: i64 = 1000;

/// Upper bound for the `pageSize` query parameter.
pub const MAX_PAGE_SIZE: i64 = 25;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const DEFAULT_SORT: &str = "id";

/// Sort tokens accepted by the ticket list endpoint.
pub const SORT_SAFELIST: &[&str] = &["id", "title", "price", "-id", "-title", "-price"];

/// Check the mutable ticket fields, recording every violation.
pub fn validate_ticket(v: &mut Validator, title: &str, price: i64) {
    v.check(!title.is_empty(), "title", "must be provided");
    v.check(
        title.chars().count() <= TITLE_MAX_CHARS,
        "title",
        "must not be more than 150 characters long",
    );

    v.check(price >= PRICE_MIN, "price", "must be greater than zero");
    v.check(price <= PRICE_MAX, "price", "must not be more than 50000");
}

/// Parsed, not yet trusted, list parameters. Only use after checking the
/// validator that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketListQuery {
    pub title: String,
    pub page: i64,
    pub page_size: i64,
    pub sort: String,
}

/// Parse the list endpoint's query string, recording every violation.
pub fn validate_list_query(
    v: &mut Validator,
    qs: &QueryValues,
    sort_safelist: &[&str],
) -> TicketListQuery {
    let title = v.read_string(qs, "title", "");
    let page = v.read_int(qs, "page", DEFAULT_PAGE);
    let page_size = v.read_int(qs, "pageSize", DEFAULT_PAGE_SIZE);
    let sort = v.read_string(qs, "sort", DEFAULT_SORT);

    v.check(page > 0, "page", "must be greater than zero");
    v.check(page <= MAX_PAGE, "page", "must be a maximum of 1000");
    v.check(page_size > 0, "pageSize", "must be greater than zero");
    v.check(page_size <= MAX_PAGE_SIZE, "pageSize", "must be a maximum of 25");

    v.check(
        permitted_value(&sort.as_str(), sort_safelist),
        "sort",
        "invalid sort value",
    );

    TicketListQuery {
        title,
        page,
        page_size,
        sort,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qs(pairs: &[(&str, &str)]) -> QueryValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn valid_ticket_passes() {
        let mut v = Validator::new();
        validate_ticket(&mut v, "Concert A", 2500);
        assert!(v.valid());
    }

    #[test]
    fn price_bounds_are_inclusive() {
        for price in [PRICE_MIN, PRICE_MAX] {
            let mut v = Validator::new();
            validate_ticket(&mut v, "t", price);
            assert!(v.valid(), "price {price} should be accepted");
        }
    }

    #[test]
    fn out_of_range_prices_are_rejected() {
        for (price, message) in [
            (0, "must be greater than zero"),
            (-5, "must be greater than zero"),
            (50_001, "must not be more than 50000"),
        ] {
            let mut v = Validator::new();
            validate_ticket(&mut v, "t", price);
            assert_eq!(v.errors()["price"], message);
        }
    }

    #[test]
    fn title_length_counts_characters() {
        let mut v = Validator::new();
        validate_ticket(&mut v, &"é".repeat(TITLE_MAX_CHARS), 1);
        assert!(v.valid());

        let mut v = Validator::new();
        validate_ticket(&mut v, &"a".repeat(TITLE_MAX_CHARS + 1), 1);
        assert_eq!(
            v.errors()["title"],
            "must not be more than 150 characters long"
        );
    }

    #[test]
    fn every_violated_field_is_reported() {
        let mut v = Validator::new();
        validate_ticket(&mut v, "", 0);
        assert_eq!(v.errors().len(), 2);
        assert_eq!(v.errors()["title"], "must be provided");
        assert_eq!(v.errors()["price"], "must be greater than zero");
    }

    #[test]
    fn list_query_defaults() {
        let mut v = Validator::new();
        let q = validate_list_query(&mut v, &qs(&[]), SORT_SAFELIST);
        assert!(v.valid());
        assert_eq!(
            q,
            TicketListQuery {
                title: String::new(),
                page: 1,
                page_size: 10,
                sort: "id".into(),
            }
        );
    }

    #[test]
    fn list_query_reads_values() {
        let mut v = Validator::new();
        let q = validate_list_query(
            &mut v,
            &qs(&[("title", "rock"), ("page", "3"), ("pageSize", "25"), ("sort", "-price")]),
            SORT_SAFELIST,
        );
        assert!(v.valid());
        assert_eq!(q.title, "rock");
        assert_eq!(q.page, 3);
        assert_eq!(q.page_size, 25);
        assert_eq!(q.sort, "-price");
    }

    #[test]
    fn list_query_collects_all_violations() {
        let mut v = Validator::new();
        validate_list_query(
            &mut v,
            &qs(&[("page", "1001"), ("pageSize", "26"), ("sort", "venue")]),
            SORT_SAFELIST,
        );
        let errors = v.errors();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors["page"], "must be a maximum of 1000");
        assert_eq!(errors["pageSize"], "must be a maximum of 25");
        assert_eq!(errors["sort"], "invalid sort value");
    }

    #[test]
    fn non_numeric_page_is_reported_and_defaulted() {
        let mut v = Validator::new();
        let q = validate_list_query(&mut v, &qs(&[("page", "x"), ("sort", "nope")]), SORT_SAFELIST);
        assert_eq!(q.page, DEFAULT_PAGE);
        assert_eq!(v.errors()["page"], "must be an integer value");
        assert_eq!(v.errors()["sort"], "invalid sort value");
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let mut v = Validator::new();
        validate_list_query(&mut v, &qs(&[("page", "0"), ("pageSize", "0")]), SORT_SAFELIST);
        assert_eq!(v.errors()["page"], "must be greater than zero");
        assert_eq!(v.errors()["pageSize"], "must be greater than zero");
    }

    #[test]
    fn sort_is_case_sensitive() {
        let mut v = Validator::new();
        validate_list_query(&mut v, &qs(&[("sort", "Title")]), SORT_SAFELIST);
        assert!(!v.valid());
    }
}
