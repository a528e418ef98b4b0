use warp::{reject::Rejection, Filter};

use crate::constants::TOKEN_PREFIX;
use crate::database::error::RequestError;

use super::jwt::{verify_jwt_session, SessionData};

/// Requires a valid `Authorization: Token <jwt>` header and extracts the
/// session it carries.
pub fn with_session(
    secret: String,
) -> impl Filter<Extract = (SessionData,), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization").and_then(move |header: Option<String>| {
        let secret = secret.clone();
        async move {
            match header.as_deref().and_then(parse_authorization) {
                Some(token) => verify_jwt_session(token, &secret)
                    .map(SessionData::from)
                    .map_err(warp::reject::custom),
                None => Err(warp::reject::custom(RequestError::Unauthorized.new(
                    "Authentication credentials were not provided",
                ))),
            }
        }
    })
}

fn parse_authorization(value: &str) -> Option<&str> {
    value
        .strip_prefix(TOKEN_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_token_header() {
        assert_eq!(parse_authorization("Token abc.def.ghi"), Some("abc.def.ghi"));
    }

    #[test]
    fn rejects_other_schemes() {
        assert_eq!(parse_authorization("Bearer abc"), None);
        assert_eq!(parse_authorization("Token "), None);
        assert_eq!(parse_authorization("abc"), None);
    }
}
