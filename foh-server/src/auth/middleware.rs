//! 认证中间件
//!
//! 为 JWT 认证和授权提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::future::Future;
use std::pin::Pin;

use shared::ErrorCode;
use shared::models::StaffStatus;

use crate::AppError;
use crate::auth::permissions::get_default_permissions;
use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::db::repository::StaffRepository;
use crate::security_log;

/// Routes under `/api/` reachable without a bearer token
///
/// `/api/sync/ws` authenticates through its `token` query parameter instead.
const PUBLIC_API_ROUTES: &[&str] = &[
    "/api/auth/login",
    "/api/auth/register",
    "/api/menu",
    "/api/sync/ws",
];

pub fn is_public_api_route(path: &str) -> bool {
    PUBLIC_API_ROUTES.contains(&path)
}

/// Validate the `Authorization` header value and build the request user
pub(crate) fn authenticate_header(
    jwt: &JwtService,
    header: Option<&str>,
    uri: &http::Uri,
) -> Result<CurrentUser, AppError> {
    let token = match header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = uri.to_string());
            return Err(AppError::not_authenticated());
        }
    };
    authenticate_token(jwt, token, uri)
}

/// Validate a raw token (header or query string)
pub(crate) fn authenticate_token(
    jwt: &JwtService,
    token: &str,
    uri: &http::Uri,
) -> Result<CurrentUser, AppError> {
    jwt.authenticate(token).map_err(|e| {
        security_log!(
            "WARN",
            "auth_failed",
            error = e.to_string(),
            uri = uri.to_string()
        );
        match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        }
    })
}

/// Re-check the token holder against the staff table
///
/// Role and permissions come from the stored record, not the claims, so a
/// rejected, deleted or demoted account loses access on its next request.
pub(crate) async fn load_staff_user(
    state: &ServerState,
    claimed: CurrentUser,
    uri: &http::Uri,
) -> Result<CurrentUser, AppError> {
    let repo = StaffRepository::new(state.get_db());
    let Some(staff) = repo.find_by_id(&claimed.id).await? else {
        security_log!(
            "WARN",
            "auth_unknown_staff",
            user_id = claimed.id.clone(),
            uri = uri.to_string()
        );
        return Err(AppError::invalid_token("Account no longer exists"));
    };

    let code = match staff.status {
        StaffStatus::Active => None,
        StaffStatus::Pending => Some(ErrorCode::AccountPending),
        StaffStatus::Rejected => Some(ErrorCode::AccountRejected),
    };
    if let Some(code) = code {
        security_log!(
            "WARN",
            "auth_inactive_staff",
            user_id = claimed.id.clone(),
            status = staff.status.as_str(),
            uri = uri.to_string()
        );
        return Err(AppError::new(code));
    }

    Ok(CurrentUser {
        id: claimed.id,
        username: staff.username,
        display_name: staff.display_name,
        role: staff.role,
        permissions: get_default_permissions(staff.role),
    })
}

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT，
/// 成功后将 [`CurrentUser`] 注入请求扩展。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径 (health)
/// - [`PUBLIC_API_ROUTES`]
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 NotAuthenticated |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 | 401 TokenInvalid |
/// | 账号待审批 / 已拒绝 | 403 AccountPending / AccountRejected |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS
        || !path.starts_with("/api/")
        || is_public_api_route(path)
    {
        return Ok(next.run(req).await);
    }

    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());
    let claimed = authenticate_header(state.get_jwt_service(), header, req.uri())?;
    let user = load_staff_user(&state, claimed, req.uri()).await?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// 权限检查中间件 - 要求特定权限
///
/// ```ignore
/// Router::new()
///     .route("/api/menu-items", post(handler::create))
///     .layer(middleware::from_fn(require_permission("menu:manage")));
/// ```
///
/// 无权限返回 403 PermissionDenied
pub fn require_permission(
    permission: &'static str,
) -> impl Fn(Request, Next) -> Pin<Box<dyn Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or_else(AppError::not_authenticated)?;

            if !user.has_permission(permission) {
                security_log!(
                    "WARN",
                    "permission_denied",
                    user_id = user.id.clone(),
                    username = user.username.clone(),
                    required_permission = permission
                );
                return Err(AppError::forbidden(format!(
                    "Permission denied: {}",
                    permission
                )));
            }

            Ok(next.run(req).await)
        })
    }
}

/// 管理员中间件 - 要求管理员角色
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::not_authenticated)?;
    if !user.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            user_id = user.id.clone(),
            username = user.username.clone(),
            user_role = user.role.as_str()
        );
        return Err(AppError::new(shared::ErrorCode::AdminRequired));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_routes() {
        assert!(is_public_api_route("/api/auth/login"));
        assert!(is_public_api_route("/api/menu"));
        assert!(!is_public_api_route("/api/menu-items"));
        assert!(!is_public_api_route("/api/auth/me"));
    }
}
