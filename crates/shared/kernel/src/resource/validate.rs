//! Conversion of raw host settings into a component's native configuration.

use super::RawSettings;
use crate::error::ResourceError;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::borrow::Cow;

/// Field reported when a decoding error does not name one.
const WHOLE_ATTRIBUTES: &str = "attributes";

/// Semantic checks that run after a configuration has been decoded.
pub trait Validate {
    /// Checks ranges and cross-field constraints.
    ///
    /// Returns the names of resources this configuration implicitly depends on.
    ///
    /// # Errors
    /// [`ResourceError::Validation`] naming the offending field and `path`.
    fn validate(&self, path: &str) -> Result<Vec<String>, ResourceError>;
}

/// A configuration that passed both decoding and semantic checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated<C> {
    pub config: C,
    pub implicit_dependencies: Vec<String>,
}

/// Decodes `raw` into `C` and runs its semantic checks.
///
/// Pure: the same input always yields the same result, and no live state is touched.
///
/// # Errors
/// [`ResourceError::Validation`] when a field is missing, unknown, has the wrong type
/// or fails [`Validate::validate`].
pub fn validate<C>(raw: &RawSettings, path: &str) -> Result<Validated<C>, ResourceError>
where
    C: DeserializeOwned + Validate,
{
    let config = C::deserialize(Value::Object(raw.clone())).map_err(|err| {
        ResourceError::Validation {
            field: offending_field(&err),
            path: path.to_owned(),
            message: Cow::Owned(err.to_string()),
            context: None,
        }
    })?;
    let implicit_dependencies = config.validate(path)?;

    Ok(Validated { config, implicit_dependencies })
}

/// Extracts the field name serde quotes in missing, unknown and duplicate field errors.
fn offending_field(err: &serde_json::Error) -> Cow<'static, str> {
    let message = err.to_string();
    ["missing field `", "unknown field `", "duplicate field `"]
        .iter()
        .find_map(|marker| {
            let (_, rest) = message.split_once(marker)?;
            rest.split_once('`').map(|(field, _)| Cow::Owned(field.to_owned()))
        })
        .unwrap_or(Cow::Borrowed(WHOLE_ATTRIBUTES))
}

/// Accepts an integer, or a float without a fractional part.
///
/// Hosts that carry settings as protobuf `Struct`s deliver every number as a double.
/// Use with `#[serde(deserialize_with = "integer")]`.
///
/// # Errors
/// Fails on fractional or out-of-range numbers and on non-numbers.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
pub fn integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    /// Largest magnitude a double represents without gaps.
    const EXACT_LIMIT: f64 = 9_007_199_254_740_992.0;

    let number = serde_json::Number::deserialize(deserializer)?;
    number
        .as_i64()
        .or_else(|| {
            number
                .as_f64()
                .filter(|value| value.trunc() == *value && value.abs() <= EXACT_LIMIT)
                .map(|value| value as i64)
        })
        .ok_or_else(|| de::Error::custom(format!("expected an integer, found {number}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Probe {
        #[serde(deserialize_with = "integer")]
        rate: i64,
        #[serde(default)]
        target: Option<String>,
    }

    impl Validate for Probe {
        fn validate(&self, path: &str) -> Result<Vec<String>, ResourceError> {
            if self.rate <= 0 {
                return Err(ResourceError::invalid("rate", path, "must be positive"));
            }
            Ok(self.target.iter().cloned().collect())
        }
    }

    fn raw(value: Value) -> RawSettings {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn field_of(err: &ResourceError) -> &str {
        match err {
            ResourceError::Validation { field, .. } => &**field,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_accepts_valid_settings() {
        let validated = validate::<Probe>(&raw(json!({ "rate": 4 })), "components.p").unwrap();
        assert_eq!(validated.config.rate, 4);
        assert!(validated.implicit_dependencies.is_empty());
    }

    #[test]
    fn test_reports_implicit_dependencies() {
        let validated =
            validate::<Probe>(&raw(json!({ "rate": 1, "target": "arm" })), "components.p").unwrap();
        assert_eq!(validated.implicit_dependencies, vec!["arm".to_owned()]);
    }

    #[test]
    fn test_names_missing_field() {
        let err = validate::<Probe>(&RawSettings::new(), "components.p").unwrap_err();
        assert_eq!(field_of(&err), "rate");
        assert!(err.to_string().contains("components.p"));
    }

    #[test]
    fn test_names_unknown_field() {
        let err = validate::<Probe>(&raw(json!({ "rate": 1, "bogus": true })), "x").unwrap_err();
        assert_eq!(field_of(&err), "bogus");
    }

    #[test]
    fn test_type_mismatch_falls_back_to_attributes() {
        let err = validate::<Probe>(&raw(json!({ "rate": "fast" })), "x").unwrap_err();
        assert_eq!(field_of(&err), WHOLE_ATTRIBUTES);
    }

    #[test]
    fn test_semantic_check_runs_after_decoding() {
        let err = validate::<Probe>(&raw(json!({ "rate": 0 })), "components.p").unwrap_err();
        assert_eq!(field_of(&err), "rate");
    }

    #[test]
    fn test_integer_accepts_whole_doubles() {
        let validated = validate::<Probe>(&raw(json!({ "rate": 7.0 })), "x").unwrap();
        assert_eq!(validated.config.rate, 7);
        assert!(validate::<Probe>(&raw(json!({ "rate": 7.5 })), "x").is_err());
    }
}
