// Aadhar number handling
//
// The backend returns the identifier either as 12 raw digits (decrypted) or
// as an opaque encrypted string. Raw digits are grouped `XXXX-XXXX-XXXX` for
// display; everything else passes through untouched.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

static AADHAR_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{12}$").expect("valid regex"));

/// Exactly twelve ASCII digits.
pub fn is_aadhar_digits(value: &str) -> bool {
    AADHAR_DIGITS.is_match(value)
}

/// Group a 12-digit number as `XXXX-XXXX-XXXX`; return anything else as-is.
///
/// Idempotent: a grouped value is no longer 12 bare digits.
///
/// ```
/// use aadhar_api::schema::normalize_aadhar;
/// assert_eq!(normalize_aadhar("123456789012"), "1234-5678-9012");
/// assert_eq!(normalize_aadhar("1234-5678-9012"), "1234-5678-9012");
/// ```
pub fn normalize_aadhar(value: &str) -> String {
    if !is_aadhar_digits(value) {
        return value.to_owned();
    }
    match (value.get(..4), value.get(4..8), value.get(8..)) {
        (Some(a), Some(b), Some(c)) => format!("{a}-{b}-{c}"),
        _ => value.to_owned(),
    }
}

/// An Aadhar field in its display form.
///
/// Normalization happens once, when the value is deserialized from a
/// response; the wrapped string is never re-grouped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AadharNumber(String);

impl AadharNumber {
    pub fn new(raw: &str) -> Self {
        Self(normalize_aadhar(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the value is a grouped plain number rather than ciphertext.
    pub fn is_plain(&self) -> bool {
        self.0.len() == 14 && is_aadhar_digits(&self.0.replace('-', ""))
    }
}

impl fmt::Display for AadharNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AadharNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(&raw))
    }
}

impl Serialize for AadharNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
