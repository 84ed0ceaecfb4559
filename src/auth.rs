//! Session state: access-token secret, the session contract consumed by the interceptor, and
//! the default cookie-backed session implementation.

pub mod secret;
pub mod session;

pub use secret::*;
pub use session::*;
