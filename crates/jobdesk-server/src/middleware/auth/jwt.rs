//! JWT encoding and decoding utilities.

use super::types::Claims;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

/// Encode claims into a JWT token.
///
/// Tokens are issued by the auth provider in production; this exists for
/// tooling and tests.
pub fn encode_token(claims: &Claims, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Decode and validate a JWT token.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key_32_chars_long!!!";

    #[test]
    fn test_decode_preserves_identity_claims() {
        let claims = Claims::new("user-1", "test@example.com", "Test", "SUPER_ADMIN", 3600);

        let token = encode_token(&claims, SECRET).unwrap();
        let decoded = decode_token(&token, SECRET).unwrap();

        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.role, "SUPER_ADMIN");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = Claims::new("user-1", "test@example.com", "Test", "ADMIN", 3600);
        let token = encode_token(&claims, SECRET).unwrap();

        assert!(decode_token(&token, "another_secret_key_32_chars_long").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let claims = Claims::new("user-1", "test@example.com", "Test", "ADMIN", -3600);
        let token = encode_token(&claims, SECRET).unwrap();

        assert!(decode_token(&token, SECRET).is_err());
    }
}
