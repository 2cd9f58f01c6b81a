//! Record model
//!
//! The product record served by the HTTP API, and its exact-decimal price.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Product record cached under its `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Record identifier, used verbatim as the cache key
    pub id: String,
    pub name: String,
    pub price: Price,
}

impl Record {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }

    /// Validates the record
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.id.is_empty() {
            return Some("Record id cannot be empty".to_string());
        }
        None
    }
}

/// Exact decimal amount, kept as its decimal text (never a binary float).
///
/// Deserializes from a JSON string (`"9.99"`) or number (`9.99`) and always
/// serializes as a string. A JSON number keeps the digits it was written
/// with, so `9.990` stays `"9.990"`. Exponent forms such as `1e2` are
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Price(String);

impl Price {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Price {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('-').unwrap_or(s);
        let (whole, fraction) = match digits.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (digits, None),
        };

        let is_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !is_digits(whole) || fraction.is_some_and(|f| !is_digits(f)) {
            return Err(format!("'{}' is not a decimal amount", s));
        }
        Ok(Price(s.to_string()))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        // serde_json's arbitrary_precision keeps the number's source text
        let text = match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(text) => text,
            serde_json::Value::Number(number) => number.to_string(),
            other => {
                return Err(D::Error::custom(format!(
                    "expected a decimal amount, found {}",
                    other
                )))
            }
        };
        text.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_price_parse() {
        assert_eq!("9.99".parse::<Price>().unwrap().as_str(), "9.99");
        assert!("10".parse::<Price>().is_ok());
        assert!("-0.50".parse::<Price>().is_ok());

        for bad in ["", ".5", "5.", "1.2.3", "abc", "1e3", "--1", "NaN"] {
            assert!(bad.parse::<Price>().is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_record_accepts_number_price() {
        let record: Record =
            serde_json::from_value(json!({"id": "p1", "name": "Widget", "price": 9.99})).unwrap();
        assert_eq!(record.price.as_str(), "9.99");
    }

    #[test]
    fn test_number_price_keeps_source_digits() {
        for (literal, expected) in [
            ("19.999999999999999999", "19.999999999999999999"),
            ("9.990", "9.990"),
            ("12345678901234567.89", "12345678901234567.89"),
            ("-0.10", "-0.10"),
            ("42", "42"),
        ] {
            let body = format!(r#"{{"id":"p1","name":"Widget","price":{}}}"#, literal);
            let record: Record = serde_json::from_str(&body).unwrap();
            assert_eq!(record.price.as_str(), expected);

            // Cached payloads carry the same text back
            let cached: Record =
                serde_json::from_str(&serde_json::to_string(&record).unwrap()).unwrap();
            assert_eq!(cached.price.as_str(), expected);
        }
    }

    #[test]
    fn test_number_price_rejects_exponent_and_non_numbers() {
        for literal in ["1e2", "2.5E-3", "true", "null", "[1]"] {
            let body = format!(r#"{{"id":"p1","name":"Widget","price":{}}}"#, literal);
            assert!(
                serde_json::from_str::<Record>(&body).is_err(),
                "{} should be rejected",
                literal
            );
        }
    }

    #[test]
    fn test_record_accepts_string_price_verbatim() {
        let record: Record =
            serde_json::from_value(json!({"id": "p1", "name": "Widget", "price": "19.900"}))
                .unwrap();
        assert_eq!(record.price.to_string(), "19.900");
    }

    #[test]
    fn test_record_serializes_price_as_string() {
        let record = Record::new("p1", "Widget", "9.99".parse().unwrap());
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({"id": "p1", "name": "Widget", "price": "9.99"}));
    }

    #[test]
    fn test_record_rejects_bad_price() {
        let result = serde_json::from_value::<Record>(
            json!({"id": "p1", "name": "Widget", "price": "cheap"}),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_record_missing_id_rejected() {
        let result = serde_json::from_value::<Record>(json!({"name": "Widget", "price": 1}));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_empty_id() {
        let record = Record::new("", "Widget", "1".parse().unwrap());
        assert!(record.validate().is_some());
        assert!(Record::new("p1", "Widget", "1".parse().unwrap())
            .validate()
            .is_none());
    }
}
