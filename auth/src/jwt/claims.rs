use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Session token payload.
///
/// A session asserts exactly two things about its bearer: who they are
/// (`sub`) and which role they held when the token was issued (`role`).
/// Both timestamps are Unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Role name at issue time
    pub role: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a subject expiring `ttl` from now.
    ///
    /// # Arguments
    /// * `subject` - Unique user identifier
    /// * `role` - Role name to embed
    /// * `ttl` - Token lifetime
    ///
    /// # Returns
    /// Claims with sub, role, iat, and exp set
    pub fn for_subject(subject: impl ToString, role: impl ToString, ttl: Duration) -> Self {
        Self::issued_at(subject, role, Utc::now(), ttl)
    }

    /// Create claims as if issued at `issued_at`.
    pub fn issued_at(
        subject: impl ToString,
        role: impl ToString,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            sub: subject.to_string(),
            role: role.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }

    /// Check if the token is expired at `current_timestamp`.
    ///
    /// The expiry instant itself is already outside the validity window.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_subject() {
        let claims = Claims::for_subject("user123", "WORKER", Duration::hours(24));

        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.role, "WORKER");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60); // 24 hours
    }

    #[test]
    fn test_issued_at() {
        let issued = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = Claims::issued_at("user123", "ADMIN", issued, Duration::minutes(5));

        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_000_300);
    }

    #[test]
    fn test_is_expired() {
        let issued = DateTime::from_timestamp(0, 0).unwrap();
        let claims = Claims::issued_at("user123", "WORKER", issued, Duration::seconds(1000));

        assert!(!claims.is_expired(999)); // Not expired
        assert!(claims.is_expired(1000)); // Exactly at expiration
        assert!(claims.is_expired(1001)); // Expired
    }
}
