// aadhar-api: Async client for the Aadhar record service.
//
// Session client (token attachment, refresh, replay) plus the schema gate
// that validates every form input and response body.

pub mod client;
pub mod endpoint;
pub mod error;
pub mod middleware;
pub mod pagination;
pub mod schema;
pub mod session;
pub mod store;
pub mod transport;

pub use client::{AadharClient, DEFAULT_QUERY_RETRIES};
pub use endpoint::Endpoint;
pub use error::{Error, ErrorKind};
pub use pagination::{DEFAULT_PAGE_SIZE, PageQuery, page_count};
pub use schema::{
    AadharNumber, DataPage, FieldError, LoginInput, Profile, RegisterInput, UserRecord,
    ValidationErrors,
};
pub use session::{RawResponse, RequestEnvelope, SessionClient};
pub use store::{CredentialPair, MemoryStore, SessionStore, TokenKey};
pub use transport::{TlsMode, TransportConfig};
