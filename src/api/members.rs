//! Member endpoints: sign-up and the signed-in member's profile.

// self
use crate::{
	_prelude::*,
	client::ApiClient,
	http::{ApiRequest, ApiTransport},
};

/// Public profile of a member, also the shape cached between sessions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberProfile {
	/// Member identifier.
	pub id: i64,
	/// Sign-in email.
	pub email: String,
	/// Display name.
	pub nickname: String,
}

/// Registration payload for `POST /members`.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
	/// Sign-in email.
	pub email: String,
	/// Plain-text password; only ever sent over the configured transport.
	pub password: String,
	/// Display name.
	pub nickname: String,
}
impl Debug for SignupRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SignupRequest")
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.field("nickname", &self.nickname)
			.finish()
	}
}

impl<C> ApiClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// `POST /members`: registers a new member.
	pub async fn signup(&self, request: &SignupRequest) -> Result<MemberProfile> {
		self.fetch_data(ApiRequest::post("members").json(request)?).await
	}

	/// `GET /members/me`: profile of the member owning the current token.
	pub async fn me(&self) -> Result<MemberProfile> {
		self.fetch_data(ApiRequest::get("members/me")).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn signup_debug_redacts_password() {
		let request = SignupRequest {
			email: "new@blog.example".into(),
			password: "hunter2".into(),
			nickname: "newbie".into(),
		};
		let rendered = format!("{request:?}");

		assert!(rendered.contains("<redacted>"));
		assert!(!rendered.contains("hunter2"));
	}
}
