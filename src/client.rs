//! API client with bearer decoration and the refresh-and-replay interceptor.
//!
//! [`ApiClient::send`] dispatches a request with the current access token. When the backend
//! answers 401 the request is eligible for a refresh-and-replay cycle unless it targets the
//! login/refresh endpoints themselves. Eligible callers are admitted through the client's
//! [`RefreshCoordinator`], so N concurrent 401s collapse into one refresh call followed by N
//! replays, or N failures sharing the refresh error. Only the caller that led a refresh is
//! marked retried; a 401 on its replay propagates, while queued callers stay eligible.

pub mod refresh;

pub use refresh::*;

// std
use std::ops::Deref;
// crates.io
use http::{StatusCode, header::AUTHORIZATION};
// self
use crate::{
	_prelude::*,
	api::MemberProfile,
	auth::{AccessToken, AuthSession, SessionStore},
	config::ClientConfig,
	error::ConfigError,
	http::{ApiRequest, ApiResponse, ApiTransport, TransportRequest},
	obs::{self, OpKind, OpOutcome, OpSpan},
	store::ProfileCache,
};
#[cfg(feature = "reqwest")] use crate::{http::ReqwestTransport, store::MemoryProfileCache};

const REFRESH_EXEMPT_PATHS: [&str; 2] = ["/auth/refresh", "/auth/login"];

/// Intercepting HTTP client bound to one API base URL and one session.
pub struct ApiClient<C>
where
	C: ?Sized + ApiTransport,
{
	config: ClientConfig,
	transport: Arc<C>,
	session: Arc<dyn SessionStore>,
	coordinator: Arc<RefreshCoordinator>,
}
impl<C> ApiClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Creates a client; clones share the same refresh coordinator.
	pub fn new(
		config: ClientConfig,
		transport: impl Into<Arc<C>>,
		session: Arc<dyn SessionStore>,
	) -> Self {
		Self {
			config,
			transport: transport.into(),
			session,
			coordinator: Default::default(),
		}
	}

	/// Configuration the client was built with.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Session consulted for tokens, refreshes, and teardown.
	pub fn session(&self) -> &Arc<dyn SessionStore> {
		&self.session
	}

	/// Refresh coordinator owning the in-flight flag and waiter queue.
	pub fn coordinator(&self) -> &RefreshCoordinator {
		&self.coordinator
	}

	/// Sends `request`, refreshing the session and replaying once on an eligible 401.
	///
	/// Non-success statuses surface as [`Error::Api`]; transport failures propagate untouched.
	pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
		let span = OpSpan::for_path(OpKind::Send, "send", request.path());

		obs::observe(OpKind::Send, span, self.send_intercepted(request)).await
	}

	async fn send_intercepted(&self, mut request: ApiRequest) -> Result<ApiResponse> {
		loop {
			let response = self.dispatch(&request).await?;

			if !is_refresh_eligible(&request, &response) {
				return response.error_for_status();
			}

			match self.coordinator.admit() {
				// Queued requests replay as fresh; a 401 on replay goes through admission again.
				Admission::Waiter(waiter) => {
					#[cfg(feature = "tracing")]
					tracing::debug!(path = request.path(), "queued behind in-flight refresh");

					waiter.wait().await?;
				},
				Admission::Leader(mut lease) => {
					#[cfg(feature = "tracing")]
					tracing::debug!(path = request.path(), "starting session refresh");

					request.mark_retried();

					match self.session.refresh().await {
						Ok(()) => lease.resolve(),
						Err(e) => {
							#[cfg(feature = "tracing")]
							tracing::warn!(error = %e, "session refresh failed; signing out");

							let cause = Arc::new(e);

							lease.reject(cause.clone());
							self.session.logout().await;

							return Err(Error::RefreshFailed(cause));
						},
					}
				},
			}
		}
	}

	async fn dispatch(&self, request: &ApiRequest) -> Result<ApiResponse> {
		let token = self.session.token();
		let prepared = prepare(&self.config, request, token.as_ref())?;

		Ok(self.transport.execute(prepared).await?)
	}
}
impl<C> Clone for ApiClient<C>
where
	C: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		Self {
			config: self.config.clone(),
			transport: self.transport.clone(),
			session: self.session.clone(),
			coordinator: self.coordinator.clone(),
		}
	}
}
impl<C> Debug for ApiClient<C>
where
	C: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("base_url", &self.config.base_url.as_str())
			.field("coordinator", &self.coordinator)
			.finish()
	}
}

/// Resolves `request` against the base URL and attaches the bearer credential.
///
/// An `Authorization` header already present on the request takes precedence.
pub(crate) fn prepare(
	config: &ClientConfig,
	request: &ApiRequest,
	token: Option<&AccessToken>,
) -> Result<TransportRequest, ConfigError> {
	let url = config.endpoint(request.path())?;
	let mut prepared = request.to_transport(url);

	if let Some(token) = token {
		if !prepared.headers.contains_key(AUTHORIZATION) {
			prepared.headers.insert(AUTHORIZATION, crate::http::bearer_value(token.expose())?);
		}
	}

	Ok(prepared)
}

fn is_refresh_eligible(request: &ApiRequest, response: &ApiResponse) -> bool {
	if response.status != StatusCode::UNAUTHORIZED || request.is_retried() {
		return false;
	}

	let path = format!("/{}", request.path().trim_start_matches('/'));

	!REFRESH_EXEMPT_PATHS.iter().any(|exempt| path.contains(exempt))
}

/// Application-level facade pairing an [`ApiClient`] with its [`AuthSession`].
///
/// Dereferences to the [`ApiClient`], so every endpoint wrapper is callable directly.
pub struct BlogClient<C>
where
	C: ?Sized + ApiTransport,
{
	api: ApiClient<C>,
	session: Arc<AuthSession<C>>,
}
impl<C> BlogClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Wires a session and an API client over a shared transport.
	pub fn new(
		config: ClientConfig,
		transport: impl Into<Arc<C>>,
		cache: Arc<dyn ProfileCache>,
	) -> Self {
		let transport = transport.into();
		let session = Arc::new(AuthSession::new(config.clone(), transport.clone(), cache));
		let api = ApiClient::new(config, transport, session.clone());

		Self { api, session }
	}

	/// Assembles a facade from pre-built parts; `api` must use `session` as its session store.
	pub fn from_parts(api: ApiClient<C>, session: Arc<AuthSession<C>>) -> Self {
		Self { api, session }
	}

	/// Intercepting API client.
	pub fn api(&self) -> &ApiClient<C> {
		&self.api
	}

	/// Session backing the client.
	pub fn session(&self) -> &Arc<AuthSession<C>> {
		&self.session
	}

	/// Signs in with credentials.
	pub async fn login(
		&self,
		email: impl Into<String>,
		password: impl Into<String>,
	) -> Result<MemberProfile> {
		self.session.login(email, password).await
	}

	/// Registers a new member; does not sign in.
	pub async fn register(
		&self,
		email: impl Into<String>,
		password: impl Into<String>,
		nickname: impl Into<String>,
	) -> Result<MemberProfile> {
		let request = crate::api::SignupRequest {
			email: email.into(),
			password: password.into(),
			nickname: nickname.into(),
		};

		self.api.signup(&request).await
	}

	/// Fetches `/members/me` and records it as the signed-in profile.
	pub async fn fetch_me(&self) -> Result<MemberProfile> {
		let profile = self.api.me().await?;

		self.session.set_user(profile.clone()).await;

		Ok(profile)
	}

	/// Signs out; never fails.
	pub async fn logout(&self) {
		SessionStore::logout(self.session.as_ref()).await;
	}

	/// Restores a session at startup.
	///
	/// Paints the cached profile first, then tries a cookie-based refresh followed by
	/// `/members/me`. Any failure leaves the client signed out with the cache cleared and
	/// yields `None`; an unreachable backend is not an initialization error.
	pub async fn initialize(&self) -> Option<MemberProfile> {
		const KIND: OpKind = OpKind::Initialize;

		let span = OpSpan::new(KIND, "initialize");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let restored = span
			.instrument(async move {
				if let Err(_e) = self.session.restore_cached_user().await {
					#[cfg(feature = "tracing")]
					tracing::warn!(error = %_e, "ignoring unreadable profile cache");
				}

				let validated = match SessionStore::refresh(self.session.as_ref()).await {
					Ok(()) => self.fetch_me().await,
					Err(e) => Err(e),
				};

				match validated {
					Ok(profile) => Some(profile),
					Err(_e) => {
						#[cfg(feature = "tracing")]
						tracing::debug!(error = %_e, "no resumable session");

						// No token is kept without a loaded profile.
						SessionStore::set_token(self.session.as_ref(), None);
						self.session.clear_user().await;

						None
					},
				}
			})
			.await;

		let outcome = if restored.is_some() { OpOutcome::Success } else { OpOutcome::Failure };

		span.record_outcome(outcome);
		obs::record_op_outcome(KIND, outcome);

		restored
	}
}
#[cfg(feature = "reqwest")]
impl BlogClient<ReqwestTransport> {
	/// Builds a reqwest-backed client with an in-memory profile cache.
	pub fn connect(config: ClientConfig) -> Result<Self> {
		let transport = ReqwestTransport::from_config(&config)?;

		Ok(Self::new(config, transport, Arc::new(MemoryProfileCache::default())))
	}
}
impl<C> Deref for BlogClient<C>
where
	C: ?Sized + ApiTransport,
{
	type Target = ApiClient<C>;

	fn deref(&self) -> &Self::Target {
		&self.api
	}
}
impl<C> Debug for BlogClient<C>
where
	C: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BlogClient").field("api", &self.api).field("session", &self.session).finish()
	}
}
