//! Typed shapes of the admin backend's resources.
//!
//! Response structs default every field so that partial payloads from the
//! backend still deserialize; the `adapter` module fills in the defaults
//! that screens rely on.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

pub mod analytics;
pub mod auth;
pub mod conversation;
pub mod document;
pub mod rag;
pub mod settings;
pub mod system;
pub mod user;
pub mod vector;

/// Identifier the backend sends either as a number or as a string.
///
/// Whole floats such as `1.0` read as integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum FlexibleId {
    Int(i64),
    Text(String),
}

impl fmt::Display for FlexibleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlexibleId::Int(n) => write!(f, "{}", n),
            FlexibleId::Text(s) => f.write_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for FlexibleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl<'de> Visitor<'de> for IdVisitor {
            type Value = FlexibleId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number or a string id")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<FlexibleId, E> {
                Ok(FlexibleId::Int(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<FlexibleId, E> {
                Ok(i64::try_from(v)
                    .map(FlexibleId::Int)
                    .unwrap_or_else(|_| FlexibleId::Text(v.to_string())))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<FlexibleId, E> {
                if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
                    Ok(FlexibleId::Int(v as i64))
                } else {
                    Ok(FlexibleId::Text(v.to_string()))
                }
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<FlexibleId, E> {
                Ok(FlexibleId::Text(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<FlexibleId, E> {
                Ok(FlexibleId::Text(v))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// Field deserializer that reads an explicit `null` as the type's default.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Default for FlexibleId {
    fn default() -> Self {
        FlexibleId::Text(String::new())
    }
}

impl From<i64> for FlexibleId {
    fn from(n: i64) -> Self {
        FlexibleId::Int(n)
    }
}

impl From<&str> for FlexibleId {
    fn from(s: &str) -> Self {
        FlexibleId::Text(s.to_string())
    }
}

/// `{ success, message }` acknowledgement returned by mutating endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

/// Export format for tabular data (conversations, users).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    Csv,
    Json,
}

/// Export format for analytics reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Csv,
    Pdf,
}

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 20;
