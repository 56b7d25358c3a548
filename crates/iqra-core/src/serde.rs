use serde::{Deserialize, Deserializer};

/// Accepts `true`/`false`/`1`/`0` from a query string; empty means unset.
pub fn deserialize_optional_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some("true") | Some("True") | Some("1") => Ok(Some(true)),
        Some("false") | Some("False") | Some("0") => Ok(Some(false)),
        Some(other) => Err(serde::de::Error::custom(format!(
            "'{}' is not a valid boolean",
            other
        ))),
    }
}

/// Parses a numeric query value; empty means unset.
pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Treats an empty query value as absent.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Filters {
        #[serde(default, deserialize_with = "deserialize_optional_bool")]
        is_active: Option<bool>,
        #[serde(default, deserialize_with = "deserialize_optional_string")]
        search: Option<String>,
    }

    #[test]
    fn test_optional_bool_values() {
        let f: Filters = serde_json::from_str(r#"{"is_active":"1"}"#).unwrap();
        assert_eq!(f.is_active, Some(true));
        let f: Filters = serde_json::from_str(r#"{"is_active":"false"}"#).unwrap();
        assert_eq!(f.is_active, Some(false));
        let f: Filters = serde_json::from_str(r#"{"is_active":""}"#).unwrap();
        assert_eq!(f.is_active, None);
        assert!(serde_json::from_str::<Filters>(r#"{"is_active":"maybe"}"#).is_err());
    }

    #[test]
    fn test_optional_string_blank_is_none() {
        let f: Filters = serde_json::from_str(r#"{"search":"   "}"#).unwrap();
        assert!(f.search.is_none());
        let f: Filters = serde_json::from_str(r#"{}"#).unwrap();
        assert!(f.search.is_none());
    }
}
