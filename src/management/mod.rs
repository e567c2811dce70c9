mod auth;
mod duplicates;
mod session;

pub use auth::EXPIRY_MARGIN_SECS;
pub use auth::TokenManager;
pub use auth::is_expired;
pub use duplicates::Comparison;
pub use duplicates::compare;
pub use duplicates::resolve;
pub use session::ANONYMOUS_SESSION_IDLE_SECS;
pub use session::SESSION_COOKIE_NAME;
pub use session::SESSION_IDLE_SECS;
pub use session::Session;
pub use session::SessionData;
pub use session::SessionStore;
