// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Generic response payload.
//!
//! Every handler builds its response as a [`Value`] tree rather than a typed
//! struct so that a single encoder serves every response shape. An error
//! sentinel is a map carrying the reserved [`ERROR_MARKER`] key.

use indexmap::IndexMap;

use crate::constants::ERROR_MARKER;
use crate::errors::{Ec2Error, status_for_code};

/// Insertion-ordered field map.
pub type Map = IndexMap<String, Value>;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Str(String),
    Int(i64),
    Bool(bool),
    List(Vec<Value>),
    Map(Map),
}

/// Borrowed view of an error sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorInfo<'a> {
    pub code: &'a str,
    pub message: &'a str,
}

impl ErrorInfo<'_> {
    pub fn status_code(&self) -> u16 {
        status_for_code(self.code)
    }
}

impl Value {
    /// Builds a map from `(key, value)` pairs, keeping their order.
    pub fn object<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// The `<return>true</return>` payload of actions with no other output.
    pub fn ok() -> Self {
        Value::object([("return", Value::Bool(true))])
    }

    /// Wraps an error into a sentinel payload.
    pub fn error(err: &Ec2Error) -> Self {
        let detail = Value::object([
            ("Code", Value::Str(err.code().into_owned())),
            ("Message", Value::Str(err.to_string())),
        ]);
        Value::object([(ERROR_MARKER, detail)])
    }

    pub fn is_error(&self) -> bool {
        self.as_error().is_some()
    }

    /// Returns the code and message when this payload is an error sentinel.
    pub fn as_error(&self) -> Option<ErrorInfo<'_>> {
        let detail = self.as_map()?.get(ERROR_MARKER)?;
        Some(ErrorInfo {
            code: detail.get("Code")?.as_str()?,
            message: detail.get("Message")?.as_str()?,
        })
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?.get(key)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<Ec2Error> for Value {
    fn from(err: Ec2Error) -> Self {
        Value::error(&err)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(s.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_sentinel_round_trip() {
        let err = Ec2Error::DependencyViolation("blocked".to_string());
        let payload = Value::from(err);

        let info = payload.as_error().unwrap();
        assert_eq!(info.code, "DependencyViolation");
        assert_eq!(info.message, "blocked");
        assert_eq!(info.status_code(), 400);
    }

    #[test]
    fn test_success_payload_is_not_error() {
        let payload = Value::object([("vpcId", Value::from("vpc-1"))]);
        assert!(!payload.is_error());
        assert!(!Value::Null.is_error());
        assert!(!Value::ok().is_error());
    }

    #[test]
    fn test_marker_with_wrong_shape_is_not_error() {
        let payload = Value::object([(ERROR_MARKER, Value::from("oops"))]);
        assert!(!payload.is_error());
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<String>), Value::Null);
        assert_eq!(Value::from(Some("a")), Value::Str("a".to_string()));
    }
}
