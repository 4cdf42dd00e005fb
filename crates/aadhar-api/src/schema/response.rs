// Response contracts, one per endpoint.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::Contract;
use super::aadhar::AadharNumber;
use crate::pagination::page_count;
use crate::store::CredentialPair;

/// Value of `message` on every success body.
const OK_MESSAGE: &str = "ok";

/// Field-level deserializers that carry the semantic checks.
mod de {
    use secrecy::SecretString;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};

    use crate::schema::aadhar::is_aadhar_digits;
    use crate::schema::input::is_email;

    /// `"message": "ok"` and nothing else.
    pub(super) fn ok_message<'de, D: Deserializer<'de>>(d: D) -> Result<(), D::Error> {
        let s = String::deserialize(d)?;
        if s == super::OK_MESSAGE {
            Ok(())
        } else {
            Err(D::Error::custom(format!("expected message \"ok\", got {s:?}")))
        }
    }

    pub(super) fn non_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        let s = String::deserialize(d)?;
        if s.is_empty() {
            return Err(D::Error::custom("expected a non-empty string"));
        }
        Ok(s)
    }

    pub(super) fn non_empty_secret<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<SecretString, D::Error> {
        non_empty(d).map(SecretString::from)
    }

    pub(super) fn email<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        let s = non_empty(d)?;
        if !is_email(&s) {
            return Err(D::Error::custom(format!("invalid email address {s:?}")));
        }
        Ok(s)
    }

    /// Twelve bare digits; no grouping applied.
    pub(super) fn aadhar_digits<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        let s = String::deserialize(d)?;
        if !is_aadhar_digits(&s) {
            return Err(D::Error::custom("expected a 12-digit Aadhar number"));
        }
        Ok(s)
    }

    /// Numeric id, accepting either a JSON number or a numeric string.
    pub(super) fn coerced_id<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(d)? {
            Raw::Number(n) => Ok(n),
            Raw::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("id is not numeric: {s:?}"))),
        }
    }
}

// ── Generic error ───────────────────────────────────────────────────

/// The uniform error body: `{ "message": "<non-empty>" }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiMessage {
    #[serde(deserialize_with = "de::non_empty")]
    pub message: String,
}

impl ApiMessage {
    /// True for the `"ok"` tag that success bodies carry.
    pub fn is_success_tag(&self) -> bool {
        self.message == OK_MESSAGE
    }
}

impl Contract for ApiMessage {
    const NAME: &'static str = "error";
}

// ── Auth ────────────────────────────────────────────────────────────

/// `POST /login` success: a fresh token pair.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginSuccess {
    #[serde(rename = "message", deserialize_with = "de::ok_message")]
    _ok: (),
    #[serde(deserialize_with = "de::non_empty_secret")]
    access: SecretString,
    #[serde(deserialize_with = "de::non_empty_secret")]
    refresh: SecretString,
}

impl LoginSuccess {
    pub fn access_token(&self) -> &str {
        self.access.expose_secret()
    }

    pub fn into_pair(self) -> CredentialPair {
        CredentialPair {
            access: self.access,
            refresh: self.refresh,
        }
    }
}

impl Contract for LoginSuccess {
    const NAME: &'static str = "login";
}

/// `POST /register` success.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterSuccess {
    #[serde(rename = "message", deserialize_with = "de::ok_message")]
    _ok: (),
}

impl Contract for RegisterSuccess {
    const NAME: &'static str = "register";
}

/// `POST /refresh` success: a new access token.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshSuccess {
    #[serde(rename = "message", deserialize_with = "de::ok_message")]
    _ok: (),
    #[serde(deserialize_with = "de::non_empty_secret")]
    access: SecretString,
}

impl RefreshSuccess {
    pub fn into_access(self) -> SecretString {
        self.access
    }
}

impl Contract for RefreshSuccess {
    const NAME: &'static str = "refresh";
}

// ── Records ─────────────────────────────────────────────────────────

/// The signed-in user, as returned by `GET /profile`.
///
/// The profile endpoint always returns the decrypted number, so `aadhar`
/// is held as 12 bare digits; [`Profile::display_aadhar`] groups it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(deserialize_with = "de::coerced_id")]
    pub id: u64,
    #[serde(deserialize_with = "de::non_empty")]
    pub user_name: String,
    #[serde(deserialize_with = "de::email")]
    pub email: String,
    #[serde(deserialize_with = "de::aadhar_digits")]
    pub aadhar: String,
}

impl Profile {
    pub fn display_aadhar(&self) -> AadharNumber {
        AadharNumber::new(&self.aadhar)
    }
}

impl Contract for Profile {
    const NAME: &'static str = "profile";
}

/// One row of `GET /get-data`.
///
/// `aadhar` is either the grouped plain number or the backend's encrypted
/// representation, depending on the `raw` query flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(deserialize_with = "de::coerced_id")]
    pub id: u64,
    #[serde(deserialize_with = "de::non_empty")]
    pub user_name: String,
    #[serde(deserialize_with = "de::email")]
    pub email: String,
    pub aadhar: AadharNumber,
}

/// A page of user records plus the total row count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPage {
    #[serde(
        rename = "message",
        deserialize_with = "de::ok_message",
        skip_serializing
    )]
    _ok: (),
    pub data: Vec<UserRecord>,
    pub total: u64,
}

impl DataPage {
    pub fn new(data: Vec<UserRecord>, total: u64) -> Self {
        Self { _ok: (), data, total }
    }

    /// Number of pages of `page_size` rows needed to show `total`; at least one.
    pub fn page_count(&self, page_size: u32) -> u64 {
        page_count(self.total, page_size)
    }
}

impl Contract for DataPage {
    const NAME: &'static str = "get-data";
}
