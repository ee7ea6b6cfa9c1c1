use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;

/// JWT token handler for encoding and decoding session tokens.
///
/// Uses HS256 (HMAC with SHA-256). Signature checks go through the
/// HMAC verifier of `jsonwebtoken`, which compares tags in constant time.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Minimum signing key size for HS256.
    pub const MIN_SECRET_LENGTH: usize = 32;

    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Returns
    /// JwtHandler instance configured with HS256 algorithm
    ///
    /// # Errors
    /// * `InvalidSigningKey` - Secret is shorter than 256 bits
    ///
    /// # Security Notes
    /// - Store secrets in environment variables or secure vaults, never in code
    /// - Rotating the secret invalidates every outstanding token
    pub fn new(secret: &[u8]) -> Result<Self, JwtError> {
        if secret.len() < Self::MIN_SECRET_LENGTH {
            return Err(JwtError::InvalidSigningKey {
                min: Self::MIN_SECRET_LENGTH,
                actual: secret.len(),
            });
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        })
    }

    /// Encode claims into a signed token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a token against the current time.
    ///
    /// # Errors
    /// * `MalformedToken` - Structure, signature, or claims are invalid
    /// * `TokenExpired` - Current time is at or past `exp`
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        self.decode_at(token, Utc::now().timestamp())
    }

    /// Decode and validate a token as of `now` (Unix seconds).
    ///
    /// Signature is verified before expiry so a forged token never reports
    /// `TokenExpired`.
    pub fn decode_at(&self, token: &str, now: i64) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_required_spec_claims(&["exp", "sub"]);
        // Expiry is checked below with no leeway and an inclusive bound.
        validation.validate_exp = false;
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| JwtError::MalformedToken(e.to_string()))?;

        if token_data.claims.is_expired(now) {
            return Err(JwtError::TokenExpired);
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use chrono::Duration;

    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    #[test]
    fn test_encode_and_decode() {
        let handler = JwtHandler::new(SECRET).unwrap();
        let claims = Claims::for_subject("user123", "EMPLOYER", Duration::hours(1));

        let token = handler.encode(&claims).expect("Failed to encode token");
        assert!(!token.is_empty());

        let decoded = handler.decode(&token).expect("Failed to decode token");
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_short_secret_rejected() {
        let result = JwtHandler::new(b"too-short");
        assert!(matches!(
            result,
            Err(JwtError::InvalidSigningKey { min: 32, actual: 9 })
        ));
    }

    #[test]
    fn test_decode_invalid_token() {
        let handler = JwtHandler::new(SECRET).unwrap();

        let result = handler.decode("invalid.token.here");
        assert!(matches!(result, Err(JwtError::MalformedToken(_))));
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let handler1 = JwtHandler::new(b"secret1_at_least_32_bytes_long_key!").unwrap();
        let handler2 = JwtHandler::new(b"secret2_at_least_32_bytes_long_key!").unwrap();

        let claims = Claims::for_subject("user123", "ADMIN", Duration::hours(1));
        let token = handler1.encode(&claims).expect("Failed to encode token");

        // Rotating the key invalidates the token
        let result = handler2.decode(&token);
        assert!(matches!(result, Err(JwtError::MalformedToken(_))));
    }

    #[test]
    fn test_expired_token() {
        let handler = JwtHandler::new(SECRET).unwrap();
        let issued = DateTime::from_timestamp(1_000, 0).unwrap();
        let claims = Claims::issued_at("user123", "WORKER", issued, Duration::seconds(60));
        let token = handler.encode(&claims).unwrap();

        assert!(handler.decode_at(&token, 1_059).is_ok());
        assert_eq!(handler.decode_at(&token, 1_060), Err(JwtError::TokenExpired));
        assert_eq!(handler.decode_at(&token, 9_999), Err(JwtError::TokenExpired));
        // Against the real clock this token expired long ago
        assert_eq!(handler.decode(&token), Err(JwtError::TokenExpired));
    }

    #[test]
    fn test_tampered_expired_token_is_malformed() {
        let handler = JwtHandler::new(SECRET).unwrap();
        let issued = DateTime::from_timestamp(1_000, 0).unwrap();
        let claims = Claims::issued_at("user123", "WORKER", issued, Duration::seconds(60));
        let mut token = handler.encode(&claims).unwrap();
        token.push('x');

        assert!(matches!(
            handler.decode_at(&token, 5_000),
            Err(JwtError::MalformedToken(_))
        ));
    }

    #[test]
    fn test_missing_role_claim_is_malformed() {
        #[derive(serde::Serialize)]
        struct Partial {
            sub: String,
            exp: i64,
        }

        let handler = JwtHandler::new(SECRET).unwrap();
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &Partial {
                sub: "user123".to_string(),
                exp: Utc::now().timestamp() + 60,
            },
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(matches!(
            handler.decode(&token),
            Err(JwtError::MalformedToken(_))
        ));
    }
}
