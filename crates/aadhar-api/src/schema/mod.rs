// Schema gate
//
// Every value crossing the client boundary goes through here: form input
// before a request is built, response bodies before anything trusts them.
// Response contracts are plain serde types whose field deserializers carry
// the semantic checks; `classify` disambiguates a rejected body into the
// generic `{message}` error shape or a protocol violation.

mod aadhar;
mod input;
mod response;

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

pub use aadhar::{AadharNumber, is_aadhar_digits, normalize_aadhar};
pub use input::{FieldError, LoginInput, RegisterInput, ValidationErrors};
pub use response::{
    ApiMessage, DataPage, LoginSuccess, Profile, RefreshSuccess, RegisterSuccess, UserRecord,
};

/// A response body failed its contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    /// Name of the contract that rejected the body.
    pub contract: &'static str,
    pub reason: String,
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} contract violated: {}", self.contract, self.reason)
    }
}

impl std::error::Error for SchemaError {}

/// A typed response shape.
///
/// `parse` either yields a fully validated value or a [`SchemaError`];
/// values that pass are never re-checked downstream.
pub trait Contract: DeserializeOwned {
    const NAME: &'static str;

    fn parse(raw: &Value) -> Result<Self, SchemaError> {
        Self::deserialize(raw).map_err(|e| SchemaError {
            contract: Self::NAME,
            reason: e.to_string(),
        })
    }
}

/// Tagged result of validating a response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// Body matched the success contract.
    Success(T),
    /// Body matched the generic `{ "message": ... }` error shape.
    ServerError(String),
    /// Body matched neither.
    Malformed(SchemaError),
}

/// Validate `raw` against `T`, falling back to the generic error shape.
///
/// A body tagged `"message": "ok"` claims success, so if it fails `T` it is
/// malformed rather than a server error.
pub fn classify<T: Contract>(raw: &Value) -> Outcome<T> {
    match T::parse(raw) {
        Ok(value) => Outcome::Success(value),
        Err(err) => match ApiMessage::parse(raw) {
            Ok(msg) if !msg.is_success_tag() => Outcome::ServerError(msg.message),
            _ => Outcome::Malformed(err),
        },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn success_shape_wins() {
        let raw = json!({ "message": "ok", "access": "a", "refresh": "r" });
        match classify::<LoginSuccess>(&raw) {
            Outcome::Success(tokens) => assert_eq!(tokens.access_token(), "a"),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn generic_error_shape_is_recognized() {
        let raw = json!({ "message": "Incorrect Username or Password found" });
        assert_eq!(
            classify::<RegisterSuccess>(&raw),
            Outcome::ServerError("Incorrect Username or Password found".into())
        );
        assert!(matches!(
            classify::<LoginSuccess>(&raw),
            Outcome::ServerError(ref m) if m == "Incorrect Username or Password found"
        ));
    }

    #[test]
    fn ok_tagged_body_failing_contract_is_malformed() {
        let raw = json!({ "message": "ok", "data": [] });
        match classify::<DataPage>(&raw) {
            Outcome::Malformed(err) => assert_eq!(err.contract, "get-data"),
            other => panic!("expected malformed, got {other:?}"),
        }
        assert!(matches!(
            classify::<RefreshSuccess>(&json!({ "message": "ok" })),
            Outcome::Malformed(_)
        ));
    }

    #[test]
    fn anything_else_is_malformed() {
        for raw in [json!({ "message": "" }), json!([1, 2]), json!(null), json!({ "foo": 1 })] {
            match classify::<RefreshSuccess>(&raw) {
                Outcome::Malformed(err) => assert_eq!(err.contract, "refresh"),
                other => panic!("expected malformed for {raw}, got {other:?}"),
            }
        }
    }
}
