//! Session contract consumed by the refresh interceptor and its default implementation.
//!
//! [`AuthSession`] talks to `/auth/*` through the raw transport rather than through
//! [`ApiClient`](crate::client::ApiClient): login and refresh are never eligible for refresh
//! handling, so routing them around the interceptor keeps the dependency graph acyclic without
//! changing behavior. The refresh credential itself is an HTTP-only cookie held by the
//! transport's cookie store.

// self
use crate::{
	_prelude::*,
	api::{
		self, LOGIN_PATH, LOGOUT_PATH, LoginRequest, LoginResponse, MemberProfile, REFRESH_PATH,
		TokenResponse,
	},
	auth::AccessToken,
	client,
	config::ClientConfig,
	http::{ApiRequest, ApiResponse, ApiTransport},
	obs::{self, OpKind, OpOutcome, OpSpan},
	store::ProfileCache,
};

/// Boxed future returned by [`SessionStore`] operations.
pub type SessionFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a + Send>>;

/// Session operations the API client depends on.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Current access token; `None` when signed out.
	fn token(&self) -> Option<AccessToken>;

	/// Replaces the access token.
	fn set_token(&self, token: Option<AccessToken>);

	/// Obtains a new access token or fails; on success [`SessionStore::token`] returns it.
	fn refresh(&self) -> SessionFuture<'_, Result<()>>;

	/// Tears the session down. Never fails toward the caller.
	fn logout(&self) -> SessionFuture<'_, ()>;
}

#[derive(Debug, Default)]
struct SessionState {
	token: Option<AccessToken>,
	user: Option<MemberProfile>,
}

/// Default [`SessionStore`]: in-memory token, cached member profile, cookie-based refresh.
pub struct AuthSession<C>
where
	C: ?Sized + ApiTransport,
{
	config: ClientConfig,
	transport: Arc<C>,
	cache: Arc<dyn ProfileCache>,
	state: RwLock<SessionState>,
}
impl<C> AuthSession<C>
where
	C: ?Sized + ApiTransport,
{
	/// Creates a signed-out session.
	pub fn new(
		config: ClientConfig,
		transport: impl Into<Arc<C>>,
		cache: Arc<dyn ProfileCache>,
	) -> Self {
		Self { config, transport: transport.into(), cache, state: Default::default() }
	}

	/// Returns `true` while an access token is held.
	pub fn is_logged_in(&self) -> bool {
		self.state.read().token.is_some()
	}

	/// Profile of the signed-in member, or the cached one restored at startup.
	pub fn user(&self) -> Option<MemberProfile> {
		self.state.read().user.clone()
	}

	/// Exchanges credentials for an access token and stores the returned profile.
	pub async fn login(
		&self,
		email: impl Into<String>,
		password: impl Into<String>,
	) -> Result<MemberProfile> {
		let span = OpSpan::for_path(OpKind::Login, "login", LOGIN_PATH);

		obs::observe(OpKind::Login, span, async move {
			let body = LoginRequest { email: email.into(), password: password.into() };
			let response = self.call(ApiRequest::post(LOGIN_PATH).json(&body)?).await?;
			let login: LoginResponse = api::decode_data(&response)?;

			self.set_token(AccessToken::new(login.access_token));
			self.set_user(login.user.clone()).await;

			Ok(login.user)
		})
		.await
	}

	/// Records `profile` as the signed-in member and caches it.
	pub async fn set_user(&self, profile: MemberProfile) {
		self.state.write().user = Some(profile.clone());

		// The cache only speeds up the next start; a write failure is not a session failure.
		if let Err(_e) = self.cache.save(profile).await {
			#[cfg(feature = "tracing")]
			tracing::warn!(error = %_e, "failed to cache member profile");
		}
	}

	/// Forgets the profile in memory and in the cache.
	pub async fn clear_user(&self) {
		self.state.write().user = None;

		if let Err(_e) = self.cache.clear().await {
			#[cfg(feature = "tracing")]
			tracing::warn!(error = %_e, "failed to clear cached member profile");
		}
	}

	/// Loads the cached profile into memory, returning it when present.
	pub async fn restore_cached_user(&self) -> Result<Option<MemberProfile>> {
		let cached = self.cache.load().await?;

		if let Some(profile) = &cached {
			self.state.write().user = Some(profile.clone());
		}

		Ok(cached)
	}

	async fn refresh_token(&self) -> Result<()> {
		let span = OpSpan::for_path(OpKind::Refresh, "refresh_token", REFRESH_PATH);

		obs::observe(OpKind::Refresh, span, async move {
			let response = self.call(ApiRequest::post(REFRESH_PATH)).await?;
			let refreshed: TokenResponse = api::decode_data(&response)?;
			let token = AccessToken::new(refreshed.access_token).ok_or(Error::Unauthenticated)?;

			self.set_token(Some(token));

			Ok(())
		})
		.await
	}

	async fn teardown(&self) {
		const KIND: OpKind = OpKind::Logout;

		let span = OpSpan::new(KIND, "teardown");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);
		span.instrument(async move {
			let token = self.state.read().token.clone();

			if let Some(token) = token {
				// Best effort: the member is signed out locally whatever the server answers,
				// so a failed server-side logout is ignored and teardown continues.
				match ApiRequest::post(LOGOUT_PATH).bearer(token.expose()) {
					Ok(request) =>
						if let Err(_e) = self.call(request).await {
							#[cfg(feature = "tracing")]
							tracing::debug!(error = %_e, "ignoring server-side logout failure");
						},
					Err(_e) => {
						#[cfg(feature = "tracing")]
						tracing::debug!(error = %_e, "skipping server-side logout");
					},
				}
			}

			self.set_token(None);
			self.clear_user().await;
		})
		.await;
		span.record_outcome(OpOutcome::Success);
		obs::record_op_outcome(KIND, OpOutcome::Success);
	}

	async fn call(&self, request: ApiRequest) -> Result<ApiResponse> {
		let token = self.token();
		let prepared = client::prepare(&self.config, &request, token.as_ref())?;
		let response = self.transport.execute(prepared).await?;

		response.error_for_status()
	}
}
impl<C> SessionStore for AuthSession<C>
where
	C: ?Sized + ApiTransport,
{
	fn token(&self) -> Option<AccessToken> {
		self.state.read().token.clone()
	}

	fn set_token(&self, token: Option<AccessToken>) {
		self.state.write().token = token;
	}

	fn refresh(&self) -> SessionFuture<'_, Result<()>> {
		Box::pin(self.refresh_token())
	}

	fn logout(&self) -> SessionFuture<'_, ()> {
		Box::pin(self.teardown())
	}
}
impl<C> Debug for AuthSession<C>
where
	C: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let state = self.state.read();

		f.debug_struct("AuthSession")
			.field("base_url", &self.config.base_url.as_str())
			.field("token", &state.token)
			.field("user", &state.user)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// crates.io
	use http::StatusCode;
	// self
	use super::*;
	use crate::{
		http::{TransportFuture, TransportRequest},
		store::MemoryProfileCache,
	};

	struct Scripted {
		refresh_body: &'static str,
		calls: AtomicUsize,
	}
	impl ApiTransport for Scripted {
		fn execute(&self, request: TransportRequest) -> TransportFuture<'_> {
			self.calls.fetch_add(1, Ordering::SeqCst);

			Box::pin(async move {
				let body = match request.path.as_str() {
					REFRESH_PATH => self.refresh_body,
					_ => r#"{"success":true}"#,
				};

				Ok(ApiResponse::new(StatusCode::OK, request.path, body))
			})
		}
	}

	fn session(refresh_body: &'static str) -> AuthSession<Scripted> {
		let origin = Url::parse("https://blog.example").expect("Origin fixture should parse.");
		let config = ClientConfig::builder(origin).build().expect("Config fixture should build.");
		let transport = Scripted { refresh_body, calls: AtomicUsize::new(0) };

		AuthSession::new(config, transport, Arc::new(MemoryProfileCache::default()))
	}

	#[tokio::test]
	async fn refresh_rejects_blank_tokens() {
		let session = session(r#"{"success":true,"data":{"accessToken":""}}"#);
		let err = SessionStore::refresh(&session).await.expect_err("Blank token should fail.");

		assert!(matches!(err, Error::Unauthenticated));
		assert!(!session.is_logged_in());
	}

	#[tokio::test]
	async fn refresh_requires_a_data_payload() {
		let session = session(r#"{"success":true,"data":null}"#);
		let err = SessionStore::refresh(&session).await.expect_err("Missing data should fail.");

		assert!(matches!(err, Error::Decode(_)), "unexpected error: {err:?}");
	}

	#[tokio::test]
	async fn signed_out_teardown_skips_the_server() {
		let session = session(r#"{"success":true,"data":{"accessToken":"unused"}}"#);

		SessionStore::logout(&session).await;

		assert_eq!(session.transport.calls.load(Ordering::SeqCst), 0);
		assert!(session.user().is_none());
	}

	#[test]
	fn debug_output_redacts_the_token() {
		let session = session("{}");

		session.set_token(AccessToken::new("very-secret"));

		let rendered = format!("{session:?}");

		assert!(!rendered.contains("very-secret"), "token leaked: {rendered}");
	}
}
