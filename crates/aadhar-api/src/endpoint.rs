// Backend endpoint table
//
// Every request the client makes names one of these endpoints. Paths are
// relative to the deployment base URL.

use reqwest::Method;

/// An endpoint of the Aadhar record service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `POST /login` -- exchange username/password for an access + refresh pair.
    Login,
    /// `POST /register` -- create a new user.
    Register,
    /// `POST /refresh` -- mint a new access token (bearer: refresh token).
    Refresh,
    /// `GET /get-data` -- paginated user records (bearer: access token).
    GetData,
    /// `GET /profile` -- the signed-in user (bearer: access token).
    Profile,
    /// `GET /swagger/swagger.json` -- OpenAPI document.
    Swagger,
}

impl Endpoint {
    /// Path relative to the API base URL (no leading slash).
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
            Self::Refresh => "refresh",
            Self::GetData => "get-data",
            Self::Profile => "profile",
            Self::Swagger => "swagger/swagger.json",
        }
    }

    pub fn method(self) -> Method {
        match self {
            Self::Login | Self::Register | Self::Refresh => Method::POST,
            Self::GetData | Self::Profile | Self::Swagger => Method::GET,
        }
    }

    /// Endpoints whose failures must never trigger a token refresh.
    ///
    /// Login and register are unauthenticated; refresh failing is itself the
    /// terminal case.
    pub fn skips_refresh(self) -> bool {
        matches!(self, Self::Login | Self::Register | Self::Refresh)
    }
}
