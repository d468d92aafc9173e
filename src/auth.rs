use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
use crate::models::Role;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Identity injected by the upstream gateway. The gateway has already
/// authenticated the caller; we consume the headers as given and only check
/// that they are present and well-formed.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn can_inspect(&self) -> bool {
        matches!(self.role, Role::Inspector | Role::Admin)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ApiError::Auth("missing user identity".to_string()))?
            .to_string();

        let role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(Role::parse)
            .ok_or_else(|| ApiError::Auth("missing or unknown role".to_string()))?;

        Ok(AuthUser { user_id, role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::FromRequestParts;
    use axum::http::Request;

    async fn extract(req: Request<()>) -> Result<AuthUser, ApiError> {
        let (mut parts, _) = req.into_parts();
        AuthUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_extracts_identity_headers() {
        let req = Request::builder()
            .header(USER_ID_HEADER, "u-123")
            .header(USER_ROLE_HEADER, "inspector")
            .body(())
            .unwrap();
        let user = extract(req).await.unwrap();
        assert_eq!(user.user_id, "u-123");
        assert_eq!(user.role, Role::Inspector);
        assert!(user.can_inspect());
        assert!(!user.is_admin());
    }

    #[tokio::test]
    async fn test_missing_identity_is_auth_error() {
        let req = Request::builder().body(()).unwrap();
        let err = extract(req).await.unwrap_err();
        assert!(matches!(err, ApiError::Auth(_)));
    }

    #[tokio::test]
    async fn test_unknown_role_is_rejected() {
        let req = Request::builder()
            .header(USER_ID_HEADER, "u-123")
            .header(USER_ROLE_HEADER, "superuser")
            .body(())
            .unwrap();
        let err = extract(req).await.unwrap_err();
        assert!(matches!(err, ApiError::Auth(_)));
    }
}
