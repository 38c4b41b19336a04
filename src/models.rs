use std::num::IntErrorKind;

use serde::{Deserialize, Serialize};

pub const MAX_PAGE_LIMIT: i64 = 100;

const LIMIT_NOT_INTEGER: &str = "El parámetro 'limit' debe ser un entero";
const OFFSET_NOT_INTEGER: &str = "El parámetro 'offset' debe ser un entero";
const LIMIT_OUT_OF_RANGE: &str = "El parámetro 'limit' debe estar entre 1 y 100";
const OFFSET_NEGATIVE: &str = "El parámetro 'offset' debe ser mayor o igual a 0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    #[serde(default = "default_available")]
    pub available: bool,
}

/// Payload accepted by create and full-replacement update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl ItemDraft {
    pub fn into_item(self, id: i64) -> Item {
        Item {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            available: self.available,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub message: String,
}

/// Raw `limit`/`offset` query string values of the paged listing.
#[derive(Debug, Clone)]
pub struct PageQuery {
    pub limit: String,
    pub offset: String,
}

fn default_limit() -> String {
    "10".to_string()
}

fn default_offset() -> String {
    "0".to_string()
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: default_offset(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: usize,
    pub offset: usize,
}

impl PageQuery {
    /// Builds the query from raw key/value pairs. A repeated key keeps its
    /// last value; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "limit" => query.limit = value,
                "offset" => query.offset = value,
                _ => {}
            }
        }
        query
    }

    /// Parses both parameters before any range check, so a malformed
    /// `offset` is reported even when `limit` is out of range.
    pub fn validate(&self) -> Result<PageRequest, String> {
        let limit = parse_integer(&self.limit).ok_or(LIMIT_NOT_INTEGER)?;
        let offset = parse_integer(&self.offset).ok_or(OFFSET_NOT_INTEGER)?;

        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(LIMIT_OUT_OF_RANGE.to_string());
        }
        if offset < 0 {
            return Err(OFFSET_NEGATIVE.to_string());
        }

        Ok(PageRequest {
            limit: usize::try_from(limit).unwrap_or(usize::MAX),
            offset: usize::try_from(offset).unwrap_or(usize::MAX),
        })
    }
}

// Overflowing values are still integers; they saturate so the range checks
// decide what to do with them.
fn parse_integer(raw: &str) -> Option<i64> {
    match raw.trim().parse::<i64>() {
        Ok(value) => Some(value),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(limit: &str, offset: &str) -> PageQuery {
        PageQuery {
            limit: limit.to_string(),
            offset: offset.to_string(),
        }
    }

    #[test]
    fn defaults_are_ten_and_zero() {
        let page = PageQuery::default().validate().unwrap();
        assert_eq!(page, PageRequest { limit: 10, offset: 0 });
    }

    #[test]
    fn accepts_whitespace_and_sign() {
        let page = query(" +20 ", "40").validate().unwrap();
        assert_eq!(page, PageRequest { limit: 20, offset: 40 });
    }

    #[test]
    fn rejects_non_integer_limit_first() {
        assert_eq!(query("abc", "xyz").validate().unwrap_err(), LIMIT_NOT_INTEGER);
        assert_eq!(query("1.5", "0").validate().unwrap_err(), LIMIT_NOT_INTEGER);
        assert_eq!(query("", "0").validate().unwrap_err(), LIMIT_NOT_INTEGER);
    }

    #[test]
    fn rejects_non_integer_offset_before_range_checks() {
        assert_eq!(query("0", "abc").validate().unwrap_err(), OFFSET_NOT_INTEGER);
    }

    #[test]
    fn limit_bounds_are_inclusive() {
        assert!(query("1", "0").validate().is_ok());
        assert!(query("100", "0").validate().is_ok());
        assert_eq!(query("0", "0").validate().unwrap_err(), LIMIT_OUT_OF_RANGE);
        assert_eq!(query("101", "0").validate().unwrap_err(), LIMIT_OUT_OF_RANGE);
        assert_eq!(query("-5", "0").validate().unwrap_err(), LIMIT_OUT_OF_RANGE);
    }

    #[test]
    fn negative_offset_is_rejected() {
        assert_eq!(query("10", "-1").validate().unwrap_err(), OFFSET_NEGATIVE);
    }

    #[test]
    fn overflowing_values_fall_through_to_range_checks() {
        let huge = "99999999999999999999999";
        assert_eq!(query(huge, "0").validate().unwrap_err(), LIMIT_OUT_OF_RANGE);
        assert_eq!(
            query("10", &format!("-{huge}")).validate().unwrap_err(),
            OFFSET_NEGATIVE
        );
        let page = query("10", huge).validate().unwrap();
        assert_eq!(page.offset, usize::MAX);
    }

    #[test]
    fn repeated_keys_keep_the_last_value() {
        let pairs = [
            ("limit", "5"),
            ("sort", "name"),
            ("limit", "6"),
            ("offset", "2"),
        ]
        .map(|(key, value)| (key.to_string(), value.to_string()));

        let page = PageQuery::from_pairs(pairs).validate().unwrap();
        assert_eq!(page, PageRequest { limit: 6, offset: 2 });
    }

    #[test]
    fn missing_pairs_fall_back_to_defaults() {
        let page = PageQuery::from_pairs(Vec::new()).validate().unwrap();
        assert_eq!(page, PageRequest { limit: 10, offset: 0 });
    }

    #[test]
    fn stored_item_defaults_available() {
        let item: Item =
            serde_json::from_str(r#"{"id":3,"name":"old","description":null,"price":1.0}"#)
                .unwrap();
        assert!(item.available);
    }

    #[test]
    fn draft_defaults_optional_fields() {
        let draft: ItemDraft =
            serde_json::from_str(r#"{"name":"Widget","price":9.99}"#).unwrap();
        assert_eq!(draft.description, None);
        assert!(draft.available);

        let item = draft.into_item(7);
        assert_eq!(item.id, 7);
        assert_eq!(item.name, "Widget");
    }

    #[test]
    fn draft_requires_name_and_price() {
        assert!(serde_json::from_str::<ItemDraft>(r#"{"price":1.0}"#).is_err());
        assert!(serde_json::from_str::<ItemDraft>(r#"{"name":"x"}"#).is_err());
        assert!(serde_json::from_str::<ItemDraft>(r#"{"name":"x","price":"free"}"#).is_err());
    }
}
