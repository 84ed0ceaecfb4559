//! Wire shapes of the `/auth` endpoints.
//!
//! The calls themselves live on [`AuthSession`](crate::auth::AuthSession): login, refresh, and
//! logout bypass the refresh interceptor by construction.

// self
use crate::{_prelude::*, api::MemberProfile};

/// Path of the credential login endpoint.
pub const LOGIN_PATH: &str = "auth/login";
/// Path of the access-token refresh endpoint.
pub const REFRESH_PATH: &str = "auth/refresh";
/// Path of the logout endpoint.
pub const LOGOUT_PATH: &str = "auth/logout";

/// Body of `POST /auth/login`.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
	/// Sign-in email.
	pub email: String,
	/// Plain-text password.
	pub password: String,
}
impl Debug for LoginRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginRequest")
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Payload of a successful login.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
	/// Short-lived bearer token.
	pub access_token: String,
	/// Signed-in member.
	pub user: MemberProfile,
}

/// Payload of a successful refresh.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
	/// Replacement bearer token.
	pub access_token: String,
}
