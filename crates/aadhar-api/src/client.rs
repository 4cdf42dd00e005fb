// Domain operations
//
// Each operation validates its input, goes through the session client, and
// validates the response before returning a typed value. Callers only ever
// see validated values or an `Error`.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::endpoint::Endpoint;
use crate::error::Error;
use crate::pagination::PageQuery;
use crate::schema::{
    Contract, DataPage, LoginInput, LoginSuccess, Profile, RegisterInput, RegisterSuccess,
};
use crate::session::{RequestEnvelope, SessionClient};
use crate::store::SessionStore;
use crate::transport::TransportConfig;

/// Extra attempts for read operations after a transient failure.
pub const DEFAULT_QUERY_RETRIES: u32 = 2;

/// High-level client for the Aadhar record service.
pub struct AadharClient {
    session: SessionClient,
    query_retries: u32,
}

impl AadharClient {
    pub fn new(
        base_url: Url,
        store: Arc<dyn SessionStore>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        Ok(Self::from_session(SessionClient::new(base_url, store, transport)?))
    }

    pub fn from_session(session: SessionClient) -> Self {
        Self {
            session,
            query_retries: DEFAULT_QUERY_RETRIES,
        }
    }

    /// How many times `get_data` / `profile` re-attempt after a transient
    /// failure.
    pub fn with_query_retries(mut self, retries: u32) -> Self {
        self.query_retries = retries;
        self
    }

    pub fn session(&self) -> &SessionClient {
        &self.session
    }

    // ── Session lifecycle ────────────────────────────────────────────

    /// Authenticate and store the issued token pair.
    ///
    /// `POST /login`
    pub async fn login(&self, input: &LoginInput) -> Result<(), Error> {
        input.validate()?;
        debug!(user = %input.user_name, "logging in");

        let request = RequestEnvelope::new(Endpoint::Login).with_body(input.to_body());
        let tokens: LoginSuccess = self.session.send(request).await?.parse()?;

        self.session.store().set_pair(tokens.into_pair())?;
        info!(user = %input.user_name, "login successful");
        Ok(())
    }

    /// Create a new account. Does not log in.
    ///
    /// `POST /register`
    pub async fn register(&self, input: &RegisterInput) -> Result<(), Error> {
        input.validate()?;
        debug!(user = %input.user_name, "registering");

        let request = RequestEnvelope::new(Endpoint::Register).with_body(input.to_body());
        let _: RegisterSuccess = self.session.send(request).await?.parse()?;

        info!(user = %input.user_name, "registration successful");
        Ok(())
    }

    /// Forget both stored credentials.
    pub fn logout(&self) -> Result<(), Error> {
        self.session.store().clear()?;
        info!("logged out");
        Ok(())
    }

    /// Both credentials present.
    pub fn is_logged_in(&self) -> Result<bool, Error> {
        self.session.store().is_authenticated()
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// One page of user records.
    ///
    /// `GET /get-data?offset=&limit=&raw=`
    pub async fn get_data(&self, query: &PageQuery) -> Result<DataPage, Error> {
        debug!(?query, "fetching records");
        self.fetch(|| RequestEnvelope::new(Endpoint::GetData).with_query(query.to_query()))
            .await
    }

    /// The signed-in user's profile.
    ///
    /// `GET /profile`
    pub async fn profile(&self) -> Result<Profile, Error> {
        debug!("fetching profile");
        self.fetch(|| RequestEnvelope::new(Endpoint::Profile)).await
    }

    /// The backend's OpenAPI document, unvalidated.
    ///
    /// `GET /swagger/swagger.json`
    pub async fn swagger(&self) -> Result<Value, Error> {
        debug!("fetching API documentation");
        self.session
            .send(RequestEnvelope::new(Endpoint::Swagger))
            .await?
            .json()
    }

    /// Send and validate, re-attempting transient failures up to
    /// `query_retries` times. Each attempt is a fresh request.
    async fn fetch<T: Contract>(&self, request: impl Fn() -> RequestEnvelope) -> Result<T, Error> {
        let mut attempt = 0;
        loop {
            let result = match self.session.send(request()).await {
                Ok(response) => response.parse::<T>(),
                Err(err) => Err(err),
            };
            match result {
                Err(err) if err.is_transient() && attempt < self.query_retries => {
                    attempt += 1;
                    debug!(error = %err, attempt, contract = T::NAME, "transient failure, retrying");
                }
                other => return other,
            }
        }
    }
}
