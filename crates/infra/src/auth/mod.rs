//! OAuth sign-in and session management
//!
//! Single-provider authorization-code flow with PKCE, exchanging the code
//! for tokens and a userinfo document, then issuing opaque local sessions.

mod manager;
mod pkce;
mod session;

pub use manager::{AuthorizationRequest, OAuthManager, UserInfo};
pub use pkce::PkceChallenge;
pub use session::SessionManager;
