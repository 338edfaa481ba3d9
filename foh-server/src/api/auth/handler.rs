//! Authentication Handlers
//!
//! Registration, login, current user and logout

use std::time::Duration;

use axum::{Json, extract::State};
use shared::ErrorCode;
use shared::client::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserInfo};
use shared::models::{StaffRole, StaffStatus};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::auth::permissions::get_default_permissions;
use crate::core::ServerState;
use crate::db::models::Staff;
use crate::db::repository::{RepoError, StaffRepository};
use crate::security_log;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, MIN_PASSWORD_LEN,
    normalize_optional, validate_request,
};
use crate::utils::{ApiResponse, AppError, AppResult, ok};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

const RESOURCE: &str = "staff";

// `validator` length bounds are u64
const FORM_USERNAME_MIN: u64 = 3;
const FORM_SHORT_TEXT_MAX: u64 = MAX_SHORT_TEXT_LEN as u64;
const FORM_PASSWORD_MIN: u64 = MIN_PASSWORD_LEN as u64;
const FORM_PASSWORD_MAX: u64 = MAX_PASSWORD_LEN as u64;
const FORM_NAME_MAX: u64 = MAX_NAME_LEN as u64;
const FORM_EMAIL_MAX: u64 = MAX_EMAIL_LEN as u64;

/// Field rules for self-registration
#[derive(Debug, Validate)]
struct RegisterForm {
    #[validate(length(min = FORM_USERNAME_MIN, max = FORM_SHORT_TEXT_MAX))]
    username: String,
    #[validate(length(min = FORM_PASSWORD_MIN, max = FORM_PASSWORD_MAX))]
    password: String,
    #[validate(length(min = 1, max = FORM_NAME_MAX))]
    display_name: String,
    #[validate(email, length(max = FORM_EMAIL_MAX))]
    email: Option<String>,
    #[validate(length(max = FORM_SHORT_TEXT_MAX))]
    phone: Option<String>,
}

/// POST /api/auth/register - 员工自助注册 (待管理员审批)
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<RegisterResponse>> {
    let form = RegisterForm {
        username: req.username.trim().to_string(),
        password: req.password,
        display_name: req.display_name.trim().to_string(),
        email: normalize_optional(req.email),
        phone: normalize_optional(req.phone),
    };
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::with_message(
            ErrorCode::PasswordTooShort,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    validate_request(&form)?;

    if req.role == StaffRole::Admin {
        security_log!("WARN", "register_admin_refused", username = form.username.clone());
        return Err(AppError::permission_denied(
            "Admin accounts cannot be self-registered",
        ));
    }

    let password_hash = Staff::hash_password(&form.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;
    let now = shared::util::now_millis();
    let staff = Staff {
        id: None,
        username: form.username,
        display_name: form.display_name,
        email: form.email,
        phone: form.phone,
        role: req.role,
        status: StaffStatus::Pending,
        password_hash,
        approved_by: None,
        created_at: now,
        updated_at: now,
    };

    let repo = StaffRepository::new(state.get_db());
    let staff = repo.create(staff).await.map_err(|e| match e {
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::StaffUsernameExists, msg),
        other => other.into(),
    })?;

    let id = staff.id_string();
    security_log!(
        "INFO",
        "staff_registered",
        user_id = id.clone(),
        username = staff.username.clone(),
        role = staff.role.as_str()
    );
    state.broadcast_sync(RESOURCE, "created", &id, Some(&staff));

    Ok(Json(RegisterResponse {
        id,
        username: staff.username,
        status: staff.status,
    }))
}

/// POST /api/auth/login
///
/// Unknown users and wrong passwords get the same answer after the same
/// delay. Account status is only revealed once the password matched.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let username = req.username.trim().to_string();
    let repo = StaffRepository::new(state.get_db());
    let staff = repo.find_by_username(&username).await?;

    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let staff = match staff {
        Some(s) => {
            let password_valid = s
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
            if !password_valid {
                security_log!(
                    "WARN",
                    "login_failed",
                    username = username.clone(),
                    reason = "invalid_credentials"
                );
                return Err(AppError::invalid_credentials());
            }
            s
        }
        None => {
            security_log!(
                "WARN",
                "login_failed",
                username = username.clone(),
                reason = "user_not_found"
            );
            return Err(AppError::invalid_credentials());
        }
    };

    match staff.status {
        StaffStatus::Active => {}
        StaffStatus::Pending => {
            security_log!("INFO", "login_pending", username = username.clone());
            return Err(AppError::new(ErrorCode::AccountPending));
        }
        StaffStatus::Rejected => {
            security_log!("WARN", "login_rejected", username = username.clone());
            return Err(AppError::new(ErrorCode::AccountRejected));
        }
    }

    let jwt_service = state.get_jwt_service();
    let user_id = staff.id_string();
    let permissions = get_default_permissions(staff.role);
    let token = jwt_service
        .generate_token(
            &user_id,
            &staff.username,
            &staff.display_name,
            staff.role,
            &permissions,
        )
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    security_log!(
        "INFO",
        "login_success",
        user_id = user_id.clone(),
        username = staff.username.clone(),
        role = staff.role.as_str()
    );

    Ok(Json(LoginResponse {
        token,
        expires_in: jwt_service.expires_in_seconds(),
        user: UserInfo {
            id: user_id,
            username: staff.username,
            display_name: staff.display_name,
            role: staff.role,
            permissions,
        },
    }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<UserInfo>> {
    let repo = StaffRepository::new(state.get_db());
    let staff = repo
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::StaffNotFound))?;
    if !staff.is_active() {
        return Err(AppError::new(ErrorCode::NotAuthenticated));
    }

    Ok(Json(UserInfo {
        id: user.id,
        username: staff.username,
        display_name: staff.display_name,
        role: staff.role,
        permissions: user.permissions,
    }))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; the client drops it.
pub async fn logout(user: CurrentUser) -> Json<ApiResponse<()>> {
    security_log!(
        "INFO",
        "logout",
        user_id = user.id.clone(),
        username = user.username.clone()
    );
    ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> RegisterForm {
        RegisterForm {
            username: "sam".into(),
            password: "secret1".into(),
            display_name: "Sam".into(),
            email: Some("sam@example.com".into()),
            phone: None,
        }
    }

    #[test]
    fn test_register_form_rules() {
        assert!(validate_request(&form()).is_ok());

        let mut f = form();
        f.email = Some("not-an-email".into());
        let err = validate_request(&f).unwrap_err();
        assert_eq!(err.message, "Invalid value for email");

        let mut f = form();
        f.username = "ab".into();
        assert!(validate_request(&f).is_err());
    }
}
