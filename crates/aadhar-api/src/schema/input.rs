// Form input contracts
//
// Checked before a request is built. Failures are field-addressed so a form
// layer can put each message next to its input; every failing field is
// reported, not only the first.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};

use super::aadhar::is_aadhar_digits;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

pub(crate) fn is_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Wire name of the field (`user_name`, `confirm_password`, ...).
    pub field: &'static str,
    pub message: &'static str,
}

/// All field errors for one submission. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// First error reported for `field`.
    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Default)]
struct Collector(Vec<FieldError>);

impl Collector {
    fn require(&mut self, ok: bool, field: &'static str, message: &'static str) {
        if !ok {
            self.0.push(FieldError { field, message });
        }
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.0))
        }
    }
}

// ── Login ───────────────────────────────────────────────────────────

/// Login form values.
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub user_name: String,
    pub password: SecretString,
}

impl LoginInput {
    pub fn new(user_name: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            user_name: user_name.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut c = Collector::default();
        c.require(
            !self.user_name.is_empty(),
            "user_name",
            "Username cannot be empty",
        );
        c.require(
            !self.password.expose_secret().is_empty(),
            "password",
            "Password cannot be empty",
        );
        c.finish()
    }

    pub(crate) fn to_body(&self) -> Value {
        json!({
            "user_name": self.user_name,
            "password": self.password.expose_secret(),
        })
    }
}

// ── Register ────────────────────────────────────────────────────────

/// Registration form values.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub user_name: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    /// Twelve digits, ungrouped.
    pub aadhar: String,
}

impl RegisterInput {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let password = self.password.expose_secret();
        let confirm = self.confirm_password.expose_secret();

        let mut c = Collector::default();
        c.require(
            !self.user_name.is_empty(),
            "user_name",
            "Username cannot be empty",
        );
        if self.email.is_empty() {
            c.require(false, "email", "Email cannot be empty");
        } else {
            c.require(is_email(&self.email), "email", "Invalid email address");
        }
        c.require(!password.is_empty(), "password", "Password cannot be empty");
        c.require(
            !confirm.is_empty(),
            "confirm_password",
            "Confirm password cannot be empty",
        );
        c.require(is_aadhar_digits(&self.aadhar), "aadhar", "Invalid Aadhar ID");
        c.require(password == confirm, "confirm_password", "Password must match");
        c.finish()
    }

    pub(crate) fn to_body(&self) -> Value {
        json!({
            "user_name": self.user_name,
            "email": self.email,
            "password": self.password.expose_secret(),
            "confirm_password": self.confirm_password.expose_secret(),
            "aadhar": self.aadhar,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn register(password: &str, confirm: &str) -> RegisterInput {
        RegisterInput {
            user_name: "asha".into(),
            email: "asha@example.com".into(),
            password: password.into(),
            confirm_password: confirm.into(),
            aadhar: "123412341234".into(),
        }
    }

    #[test]
    fn login_requires_both_fields() {
        let errs = LoginInput::new("", "").validate().unwrap_err();
        assert_eq!(errs.len(), 2);
        assert_eq!(
            errs.get("user_name").unwrap().message,
            "Username cannot be empty"
        );
        assert_eq!(
            errs.get("password").unwrap().message,
            "Password cannot be empty"
        );
        assert!(LoginInput::new("asha", "pw").validate().is_ok());
    }

    #[test]
    fn register_accepts_valid_form() {
        assert!(register("s3cret", "s3cret").validate().is_ok());
    }

    #[test]
    fn mismatched_passwords_flag_confirm_field() {
        for (p, c) in [
            ("a", "b"),
            ("secret", "Secret"),
            ("secret", "secret "),
            ("", "x"),
            ("x", ""),
            ("pässwörd", "passwort"),
        ] {
            let errs = register(p, c).validate().unwrap_err();
            assert!(
                errs.iter()
                    .any(|e| e.field == "confirm_password" && e.message == "Password must match"),
                "({p:?}, {c:?}) -> {errs}"
            );
        }
    }

    #[test]
    fn aadhar_must_be_twelve_digits() {
        for bad in [
            "",
            "12341234123",
            "1234-1234-1234",
            "12341234123x",
            "١٢٣٤٥٦٧٨٩٠١٢",
        ] {
            let mut input = register("pw", "pw");
            input.aadhar = bad.into();
            let errs = input.validate().unwrap_err();
            assert_eq!(errs.get("aadhar").unwrap().message, "Invalid Aadhar ID");
        }
    }

    #[test]
    fn email_checks_distinguish_empty_and_invalid() {
        let mut input = register("pw", "pw");
        input.email = String::new();
        assert_eq!(
            input.validate().unwrap_err().get("email").unwrap().message,
            "Email cannot be empty"
        );

        input.email = "not-an-email".into();
        assert_eq!(
            input.validate().unwrap_err().get("email").unwrap().message,
            "Invalid email address"
        );
    }

    #[test]
    fn body_carries_wire_names() {
        let body = register("pw", "pw").to_body();
        assert_eq!(body["confirm_password"], "pw");
        assert_eq!(body["aadhar"], "123412341234");
    }
}
