//! Field-level validation that accumulates every violation.
//!
//! A [`Validator`] is request-scoped: handlers create one, run all of their
//! checks against it, then inspect [`Validator::valid`]. Checks never stop
//! early, so a single 422 response can enumerate every bad field.

use std::collections::HashMap;

use crate::error::CoreError;
use crate::types::FieldErrors;

/// Raw query-string values keyed by parameter name.
pub type QueryValues = HashMap<String, String>;

#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no check has failed so far.
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Record `message` under `key`. The first message for a key wins.
    pub fn add_error(&mut self, key: &str, message: &str) {
        self.errors
            .entry(key.to_owned())
            .or_insert_with(|| message.to_owned());
    }

    /// Record `message` under `key` unless `ok` holds.
    pub fn check(&mut self, ok: bool, key: &str, message: &str) {
        if !ok {
            self.add_error(key, message);
        }
    }

    /// Read a string parameter, falling back to `default` when absent or empty.
    pub fn read_string(&self, qs: &QueryValues, key: &str, default: &str) -> String {
        match qs.get(key) {
            Some(value) if !value.is_empty() => value.clone(),
            _ => default.to_owned(),
        }
    }

    /// Read an integer parameter, falling back to `default` when absent.
    ///
    /// A non-numeric value is recorded as an error for `key` and `default`
    /// is returned so the remaining checks still run.
    pub fn read_int(&mut self, qs: &QueryValues, key: &str, default: i64) -> i64 {
        let Some(value) = qs.get(key).filter(|v| !v.is_empty()) else {
            return default;
        };
        match value.parse::<i64>() {
            Ok(n) => n,
            Err(_) => {
                self.add_error(key, "must be an integer value");
                default
            }
        }
    }

    /// Convert the outcome into a result carrying the full field map.
    pub fn finish(self) -> Result<(), CoreError> {
        if self.valid() {
            Ok(())
        } else {
            Err(CoreError::Validation(self.errors))
        }
    }
}

/// Whether `value` is one of `permitted`.
pub fn permitted_value<T: PartialEq>(value: &T, permitted: &[T]) -> bool {
    permitted.iter().any(|p| p == value)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn qs(pairs: &[(&str, &str)]) -> QueryValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn new_validator_is_valid() {
        assert!(Validator::new().valid());
    }

    #[test]
    fn first_message_for_a_key_wins() {
        let mut v = Validator::new();
        v.add_error("title", "first");
        v.add_error("title", "second");
        assert_eq!(v.errors()["title"], "first");
    }

    #[test]
    fn check_only_records_failures() {
        let mut v = Validator::new();
        v.check(true, "a", "nope");
        v.check(false, "b", "bad");
        assert!(!v.valid());
        assert!(!v.errors().contains_key("a"));
        assert_eq!(v.errors()["b"], "bad");
    }

    #[test]
    fn read_string_applies_default() {
        let v = Validator::new();
        let values = qs(&[("title", ""), ("sort", "-price")]);
        assert_eq!(v.read_string(&values, "title", "x"), "x");
        assert_eq!(v.read_string(&values, "missing", "id"), "id");
        assert_eq!(v.read_string(&values, "sort", "id"), "-price");
        assert!(v.valid());
    }

    #[test]
    fn read_int_substitutes_default_and_keeps_going() {
        let mut v = Validator::new();
        let values = qs(&[("page", "two"), ("pageSize", "abc")]);
        assert_eq!(v.read_int(&values, "page", 1), 1);
        assert_eq!(v.read_int(&values, "pageSize", 10), 10);
        assert_eq!(v.errors().len(), 2);
        assert_eq!(v.errors()["page"], "must be an integer value");
        assert_eq!(v.errors()["pageSize"], "must be an integer value");
    }

    #[test]
    fn read_int_parses_negative_numbers() {
        let mut v = Validator::new();
        assert_eq!(v.read_int(&qs(&[("page", "-3")]), "page", 1), -3);
        assert!(v.valid());
    }

    #[test]
    fn finish_carries_every_field() {
        let mut v = Validator::new();
        v.add_error("a", "x");
        v.add_error("b", "y");
        assert_matches!(v.finish(), Err(CoreError::Validation(fields)) if fields.len() == 2);
    }

    #[test]
    fn permitted_value_is_exact_match() {
        let safelist = ["id", "-id"];
        assert!(permitted_value(&"id", &safelist));
        assert!(permitted_value(&"-id", &safelist));
        assert!(!permitted_value(&"ID", &safelist));
    }
}
