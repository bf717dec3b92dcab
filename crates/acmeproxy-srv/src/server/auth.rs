//! HTTP Basic authentication for the challenge endpoints.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine};

use super::AppState;
use crate::error::ChallengeError;

/// Name of the user that passed Basic auth, attached to the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

/// Reject requests without valid Basic credentials.
///
/// On success the user name is stored as an [`AuthenticatedUser`] request
/// extension for the handlers.
pub async fn require_basic_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ChallengeError> {
    let (user, token) = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_basic)
        .ok_or(ChallengeError::Unauthorized)?;

    let user = state
        .coordinator
        .model()
        .authenticate(&user, &token)
        .ok_or(ChallengeError::Unauthorized)?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser(user.name().to_string()));
    Ok(next.run(request).await)
}

/// Split an `Authorization: Basic ...` value into user and password.
fn parse_basic(header: &str) -> Option<(String, String)> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    // Passwords may contain ':'; user names may not.
    let (user, token) = decoded.split_once(':')?;
    Some((user.to_string(), token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        assert_eq!(
            parse_basic("Basic eDpzZWNyZXQ="),
            Some(("x".to_string(), "secret".to_string()))
        );
        assert_eq!(
            parse_basic("basic eDpzZWNyZXQ="),
            Some(("x".to_string(), "secret".to_string()))
        );
    }

    #[test]
    fn test_parse_basic_password_with_colon() {
        // "x:a:b"
        assert_eq!(
            parse_basic("Basic eDphOmI="),
            Some(("x".to_string(), "a:b".to_string()))
        );
    }

    #[test]
    fn test_parse_basic_rejects_garbage() {
        assert_eq!(parse_basic("Bearer eDpzZWNyZXQ="), None);
        assert_eq!(parse_basic("Basic"), None);
        assert_eq!(parse_basic("Basic !!!"), None);
        // "nocolon"
        assert_eq!(parse_basic("Basic bm9jb2xvbg=="), None);
    }
}
