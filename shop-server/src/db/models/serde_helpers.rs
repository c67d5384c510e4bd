//! Common serde helpers for handling null values from SurrealDB

use serde::{Deserialize, Deserializer};

/// Deserialize bool that treats null as false
pub fn bool_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(|opt| opt.unwrap_or(false))
}

/// Deserialize string that treats null as empty
///
/// Link projections such as `product.name` come back null once the linked
/// record is gone.
pub fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "bool_false")]
        flag: bool,
        #[serde(default, deserialize_with = "string_or_empty")]
        name: String,
    }

    #[test]
    fn test_nulls_fall_back() {
        let row: Row = serde_json::from_str(r#"{"flag": null, "name": null}"#).unwrap();
        assert!(!row.flag);
        assert!(row.name.is_empty());

        let row: Row = serde_json::from_str("{}").unwrap();
        assert!(!row.flag);

        let row: Row = serde_json::from_str(r#"{"flag": true, "name": "Desk Lamp"}"#).unwrap();
        assert!(row.flag);
        assert_eq!(row.name, "Desk Lamp");
    }
}
