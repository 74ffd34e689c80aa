use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use tracing::debug;

use shared_models::auth::JwtClaims;

/// Decode the claims segment of an access token. No signature check happens
/// here: the client never holds the signing secret, it only needs to read
/// the expiry to know whether a stored session is still usable.
pub fn decode_claims(token: &str) -> Result<JwtClaims, String> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid token format".to_string());
    }

    let claims_json = match URL_SAFE_NO_PAD.decode(parts[1]) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(json_str) => json_str,
            Err(_) => return Err("Invalid claims encoding".to_string()),
        },
        Err(_) => return Err("Invalid claims encoding".to_string()),
    };

    let claims: JwtClaims = match serde_json::from_str(&claims_json) {
        Ok(c) => c,
        Err(e) => {
            debug!("Failed to parse claims: {}", e);
            return Err("Invalid claims format".to_string());
        }
    };

    Ok(claims)
}

/// Only a decodable claims segment with a past `exp` counts as expired.
/// Opaque tokens cannot be judged client-side, so they pass through and the
/// backend's 401 stays authoritative.
pub fn is_expired(token: &str) -> bool {
    match decode_claims(token) {
        Ok(claims) => match claims.exp {
            Some(exp) => {
                let now = chrono::Utc::now().timestamp() as u64;
                exp < now
            }
            None => false,
        },
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TestUser, TokenTestUtils};

    #[test]
    fn decodes_claims_from_test_token() {
        let user = TestUser::paciente("ana@example.com");
        let token = TokenTestUtils::create_test_token(&user, Some(24));

        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some(user.id.as_str()));
        assert_eq!(claims.email.as_deref(), Some("ana@example.com"));
        assert_eq!(claims.role.as_deref(), Some("paciente"));
    }

    #[test]
    fn fresh_token_is_not_expired() {
        let token = TokenTestUtils::create_test_token(&TestUser::default(), Some(24));
        assert!(!is_expired(&token));
    }

    #[test]
    fn past_exp_counts_as_expired() {
        let token = TokenTestUtils::create_expired_token(&TestUser::default());
        assert!(is_expired(&token));
    }

    #[test]
    fn opaque_token_is_not_judged_client_side() {
        assert!(!is_expired("not-a-token"));
        assert!(!is_expired("a.b"));
    }

    #[test]
    fn token_without_exp_never_expires() {
        let token = TokenTestUtils::create_token_without_exp(&TestUser::default());
        assert!(!is_expired(&token));
    }
}
