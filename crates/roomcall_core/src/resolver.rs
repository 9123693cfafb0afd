//! Room Resolver.
//!
//! Decides whether the landing step may proceed and validates room URLs
//! that the user (or the startup query) supplies by hand. A valid room URL
//! has exactly one subdomain label under the provider domain and exactly one
//! path segment:
//!
//! ```text
//! https://<subdomain>.<provider-domain>/<room-name>
//! ```
//!
//! Candidates are never normalized. The literal string that validated is the
//! one forwarded to the call client.

use regex::Regex;
use tracing::debug;

use crate::config::Capabilities;
use crate::error::{CoreError, CoreResult};

/// Provider domain used when none is configured.
pub const DEFAULT_ROOM_DOMAIN: &str = "example-provider.com";

/// Validates room URLs for a single provider domain.
#[derive(Debug, Clone)]
pub struct RoomResolver {
    domain: String,
    pattern: Regex,
}

impl RoomResolver {
    /// Create a resolver for the given provider domain.
    pub fn new(domain: &str) -> CoreResult<Self> {
        let pattern = Regex::new(&format!(
            r"^https://[A-Za-z0-9-]+\.{}/[A-Za-z0-9_-]+$",
            regex::escape(domain)
        ))?;
        Ok(Self {
            domain: domain.to_string(),
            pattern,
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Check a candidate room URL.
    pub fn validate(&self, candidate: Option<&str>) -> bool {
        candidate.is_some_and(|url| self.pattern.is_match(url))
    }

    /// Same as [`validate`](Self::validate), returning the accepted URL.
    pub fn check<'a>(&self, candidate: Option<&'a str>) -> CoreResult<&'a str> {
        match candidate {
            None => Err(CoreError::MissingRoomUrl),
            Some(url) if self.pattern.is_match(url) => Ok(url),
            Some(url) => Err(CoreError::InvalidRoomUrl(url.to_string())),
        }
    }

    /// Whether the "proceed" action on the landing step is enabled.
    ///
    /// Enabled when rooms are created automatically or the candidate
    /// validates. Always disabled when a room URL was supplied at startup
    /// but no provisioning backend is available.
    pub fn can_proceed(&self, capabilities: &Capabilities, candidate: Option<&str>) -> bool {
        if capabilities.auto_room_creation {
            return true;
        }

        // A pre-supplied room is never entered without a backend.
        if capabilities.manual_room_url_from_query.is_some() && !capabilities.provisioning_available {
            debug!(candidate = ?candidate, "Proceed disabled: pre-supplied room without provisioning backend");
            return false;
        }

        self.validate(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> RoomResolver {
        RoomResolver::new(DEFAULT_ROOM_DOMAIN).unwrap()
    }

    fn manual_caps() -> Capabilities {
        Capabilities {
            auto_room_creation: false,
            provisioning_available: false,
            manual_room_url_from_query: None,
            show_config_options: true,
        }
    }

    #[test]
    fn test_validate_accepts_single_level_room() {
        let resolver = resolver();
        assert!(resolver.validate(Some("https://foo.example-provider.com/room1")));
        assert!(resolver.validate(Some("https://my-team.example-provider.com/Daily_Standup-2")));
    }

    #[test]
    fn test_validate_rejects_malformed_rooms() {
        let resolver = resolver();
        for candidate in [
            "https://foo.example-provider.com/room1/",
            "https://example-provider.com/room1",
            "https://a.b.example-provider.com/room1",
            "https://foo.example-provider.com/",
            "https://foo.example-provider.com/room1/extra",
            "http://foo.example-provider.com/room1",
            "https://foo.example-provider.com/room1?t=1",
            "https://foo.example-provider.com.evil.io/room1",
            " https://foo.example-provider.com/room1",
            "",
        ] {
            assert!(!resolver.validate(Some(candidate)), "{candidate} should be rejected");
        }
        assert!(!resolver.validate(None));
    }

    #[test]
    fn test_domain_is_escaped() {
        let resolver = resolver();
        assert!(!resolver.validate(Some("https://foo.exampleXprovider.com/room1")));
    }

    #[test]
    fn test_custom_domain() {
        let resolver = RoomResolver::new("rooms.test").unwrap();
        assert_eq!(resolver.domain(), "rooms.test");
        assert!(resolver.validate(Some("https://acme.rooms.test/lobby")));
        assert!(!resolver.validate(Some("https://acme.example-provider.com/lobby")));
    }

    #[test]
    fn test_check_reports_reason() {
        let resolver = resolver();
        assert_eq!(
            resolver.check(Some("https://foo.example-provider.com/room1")).unwrap(),
            "https://foo.example-provider.com/room1"
        );
        assert!(matches!(resolver.check(None), Err(CoreError::MissingRoomUrl)));
        assert!(matches!(
            resolver.check(Some("https://foo.example-provider.com/room1/")),
            Err(CoreError::InvalidRoomUrl(_))
        ));
    }

    #[test]
    fn test_auto_creation_always_proceeds() {
        let resolver = resolver();
        let caps = Capabilities {
            auto_room_creation: true,
            provisioning_available: true,
            ..manual_caps()
        };
        assert!(resolver.can_proceed(&caps, None));
        assert!(resolver.can_proceed(&caps, Some("not a url")));
    }

    #[test]
    fn test_manual_mode_requires_valid_candidate() {
        let resolver = resolver();
        let caps = manual_caps();
        assert!(!resolver.can_proceed(&caps, None));
        assert!(!resolver.can_proceed(&caps, Some("https://foo.example-provider.com/room1/")));
        assert!(resolver.can_proceed(&caps, Some("https://foo.example-provider.com/room1")));
    }

    #[test]
    fn test_presupplied_room_without_backend() {
        let resolver = resolver();
        let caps = Capabilities {
            manual_room_url_from_query: Some("https://foo.example-provider.com/a".to_string()),
            ..manual_caps()
        };
        assert!(!resolver.can_proceed(&caps, Some("https://foo.example-provider.com/a/b")));
        assert!(!resolver.can_proceed(&caps, Some("https://foo.example-provider.com/a")));
        assert!(!resolver.can_proceed(&caps, None));
    }

    #[test]
    fn test_presupplied_room_with_backend() {
        let resolver = resolver();
        let caps = Capabilities {
            provisioning_available: true,
            manual_room_url_from_query: Some("https://foo.example-provider.com/a".to_string()),
            ..manual_caps()
        };
        assert!(resolver.can_proceed(&caps, Some("https://foo.example-provider.com/a")));
        assert!(!resolver.can_proceed(&caps, Some("https://foo.example-provider.com/a/b")));
    }
}
