//! Session layer. The session is the durable home of each shopper's cart.

use tower_sessions::cookie::{SameSite, time::Duration};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "storecart_session";

/// Idle time after which a cart is forgotten.
const SESSION_IDLE_DAYS: i64 = 7;

/// Build the session layer over a fresh in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::days(SESSION_IDLE_DAYS)))
        .with_secure(serves_https(&config.base_url))
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// `Secure` cookies would never come back over plain HTTP in local dev.
fn serves_https(base_url: &str) -> bool {
    base_url
        .get(..8)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("https://"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serves_https() {
        assert!(serves_https("https://shop.example.com"));
        assert!(serves_https("HTTPS://shop.example.com"));
        assert!(!serves_https("http://localhost:3000"));
        assert!(!serves_https(""));
    }
}
