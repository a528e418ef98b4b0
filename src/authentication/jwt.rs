use chrono::Duration;
use chrono::Local;
use hmac::{Hmac, Mac};
use jwt::SignWithKey;
use jwt::VerifyWithKey;
use serde::Deserialize;
use serde::Serialize;
use sha2::Sha256;

use crate::constants::SESSION_LIFETIME_HOURS;
use crate::database::error::{ApiError, RequestError};
use crate::database::schema::User;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JwtSessionData {
    pub user_id: i32,
    pub email: String,
    iat: i64,
    exp: i64,
}

impl JwtSessionData {
    pub fn new(id: i32, email: String) -> Self {
        let now = Local::now();
        let iat = now.timestamp();
        let exp = (now + Duration::hours(SESSION_LIFETIME_HOURS)).timestamp();

        Self {
            user_id: id,
            email,
            iat,
            exp,
        }
    }
}

/// Authenticated requester, extracted from a verified token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionData {
    pub user_id: i32,
    pub email: String,
}

impl From<JwtSessionData> for SessionData {
    fn from(value: JwtSessionData) -> Self {
        SessionData {
            user_id: value.user_id,
            email: value.email,
        }
    }
}

pub fn generate_jwt_session(user: &User, secret: &str) -> String {
    let key: Hmac<Sha256> = Hmac::new_from_slice(secret.as_bytes()).unwrap();
    let claims = JwtSessionData::new(user.id, user.email.to_owned());

    claims.sign_with_key(&key).unwrap()
}

pub fn verify_jwt_session(token: &str, secret: &str) -> Result<JwtSessionData, ApiError> {
    let key: Hmac<Sha256> = Hmac::new_from_slice(secret.as_bytes()).unwrap();

    token
        .verify_with_key(&key)
        .map_err(|_| RequestError::Unauthorized.new("Invalid session; Invalid token"))
        .map(|session: JwtSessionData| {
            let now = Local::now().timestamp();

            if (session.exp - now).is_negative() {
                return Err(RequestError::Unauthorized.new("Invalid session; Token expired"));
            }
            Ok(session)
        })?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 7,
            email: "test@example.com".to_string(),
            password: "hash".to_string(),
            name: "Test".to_string(),
        }
    }

    #[test]
    fn verifies_generated_token() {
        let token = generate_jwt_session(&user(), "secret");
        let session = verify_jwt_session(&token, "secret").unwrap();

        assert_eq!(session.user_id, 7);
        assert_eq!(session.email, "test@example.com");
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = generate_jwt_session(&user(), "other");

        assert!(verify_jwt_session(&token, "secret").is_err());
    }

    #[test]
    fn rejects_garbage_token() {
        assert!(verify_jwt_session("not-a-token", "secret").is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let key: Hmac<Sha256> = Hmac::new_from_slice(b"secret").unwrap();
        let claims = JwtSessionData {
            user_id: 7,
            email: "test@example.com".to_string(),
            iat: 0,
            exp: 1,
        };
        let token = claims.sign_with_key(&key).unwrap();

        assert!(verify_jwt_session(&token, "secret").is_err());
    }
}
