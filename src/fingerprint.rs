//! Canonical serialization and deterministic ids for proposals.
//!
//! A proposal id is the SHA-256 digest of the canonical JSON document
//! `{"config": {...}, "name": "..."}` with object keys sorted. The
//! canonical form is produced by [`canonicalize`], which maps every
//! [`ParamValue`] onto a plain JSON value:
//!
//! | Input | Canonical JSON |
//! |-------|----------------|
//! | `Null`, `Str("None")` | `null` |
//! | `Bool(b)` | `b` |
//! | `Int(i)` | integer |
//! | `Float(f)` (finite) | float |
//! | `Float(NaN)`, `Float(±inf)` | rejected with [`Error::NonFiniteValue`] |
//! | `Str(s)` | string |
//! | `List(xs)` | array of canonical values |
//!
//! # Examples
//!
//! ```
//! use tunebandit::fingerprint::fingerprint;
//! use tunebandit::{Config, ParamValue};
//!
//! let mut a = Config::new();
//! a.insert("depth".into(), ParamValue::from(3_u8));
//! a.insert("kernel".into(), ParamValue::from("None"));
//!
//! let mut b = Config::new();
//! b.insert("kernel".into(), ParamValue::Null);
//! b.insert("depth".into(), ParamValue::from(3_i64));
//!
//! assert_eq!(fingerprint("svm", &a).unwrap(), fingerprint("svm", &b).unwrap());
//! ```

use serde_json::{Map, Number, Value};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::param::{Config, ParamValue};

/// Text that stands for an absent value in configurations.
const NONE_SENTINEL: &str = "None";

/// Convert a configuration into its canonical JSON object.
///
/// # Errors
///
/// Returns [`Error::NonFiniteValue`] if any float (at any nesting depth)
/// is NaN or infinite.
pub fn canonicalize(config: &Config) -> Result<Map<String, Value>> {
    config
        .iter()
        .map(|(key, value)| Ok((key.clone(), canonical_value(key, value)?)))
        .collect()
}

fn canonical_value(key: &str, value: &ParamValue) -> Result<Value> {
    Ok(match value {
        ParamValue::Null => Value::Null,
        ParamValue::Bool(b) => Value::Bool(*b),
        ParamValue::Int(i) => Value::Number(Number::from(*i)),
        ParamValue::Float(f) => Number::from_f64(*f)
            .map(Value::Number)
            .ok_or_else(|| Error::NonFiniteValue {
                key: key.to_owned(),
            })?,
        ParamValue::Str(s) if s == NONE_SENTINEL => Value::Null,
        ParamValue::Str(s) => Value::String(s.clone()),
        ParamValue::List(items) => Value::Array(
            items
                .iter()
                .map(|item| canonical_value(key, item))
                .collect::<Result<_>>()?,
        ),
    })
}

/// Compute the deterministic id of a `(tunable name, configuration)` pair.
///
/// Returns the lowercase hex SHA-256 digest of the canonical document.
///
/// # Errors
///
/// Returns [`Error::NonFiniteValue`] if the configuration cannot be
/// canonicalized.
pub fn fingerprint(name: &str, config: &Config) -> Result<String> {
    let mut document = Map::new();
    document.insert("config".to_owned(), Value::Object(canonicalize(config)?));
    document.insert("name".to_owned(), Value::String(name.to_owned()));

    let bytes = serde_json::to_vec(&Value::Object(document))?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}
