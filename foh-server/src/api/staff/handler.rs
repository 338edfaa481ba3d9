//! Staff API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::{Map, Value, json};
use shared::ErrorCode;
use shared::models::{StaffQuery, StaffRole, StaffStatus, StaffUpdate};
use shared::util::now_millis;
use validator::ValidateEmail;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Staff;
use crate::db::repository::StaffRepository;
use crate::security_log;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, MIN_PASSWORD_LEN,
    normalize_optional, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};

const RESOURCE: &str = "staff";

/// Whether moving `target` to `role` / `status` leaves no active admin
fn removes_last_admin(
    target: &Staff,
    role: StaffRole,
    status: StaffStatus,
    active_admins: usize,
) -> bool {
    let is_active_admin = target.role.is_admin() && target.is_active();
    let stays_active_admin = role.is_admin() && status == StaffStatus::Active;
    is_active_admin && !stays_active_admin && active_admins <= 1
}

async fn load(repo: &StaffRepository, id: &str) -> AppResult<Staff> {
    repo.find_by_id(id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::StaffNotFound, format!("Staff {id} not found"))
    })
}

async fn guard_last_admin(
    repo: &StaffRepository,
    target: &Staff,
    role: StaffRole,
    status: StaffStatus,
) -> AppResult<()> {
    if target.role.is_admin() && target.is_active() {
        let admins = repo.count_active_admins().await?;
        if removes_last_admin(target, role, status, admins) {
            return Err(AppError::with_message(
                ErrorCode::LastAdmin,
                "The last active admin cannot be removed or demoted",
            ));
        }
    }
    Ok(())
}

/// GET /api/staff?role=waiter&status=pending
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<StaffQuery>,
) -> AppResult<Json<Vec<Staff>>> {
    let repo = StaffRepository::new(state.get_db());
    Ok(Json(repo.find_all(&query).await?))
}

/// GET /api/staff/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Staff>> {
    let repo = StaffRepository::new(state.get_db());
    Ok(Json(load(&repo, &id).await?))
}

/// PUT /api/staff/{id} - 修改资料 / 角色 / 密码
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<StaffUpdate>,
) -> AppResult<Json<Staff>> {
    let repo = StaffRepository::new(state.get_db());
    let target = load(&repo, &id).await?;
    let mut patch = Map::new();

    if let Some(display_name) = payload.display_name {
        let display_name = display_name.trim().to_string();
        validate_required_text(&display_name, "display_name", MAX_NAME_LEN)?;
        patch.insert("display_name".into(), json!(display_name));
    }
    if let Some(email) = payload.email {
        let email = normalize_optional(Some(email));
        validate_optional_text(&email, "email", MAX_EMAIL_LEN)?;
        if let Some(e) = &email
            && !e.validate_email()
        {
            return Err(AppError::validation("Invalid value for email").with_detail("field", "email"));
        }
        patch.insert("email".into(), json!(email));
    }
    if let Some(phone) = payload.phone {
        let phone = normalize_optional(Some(phone));
        validate_optional_text(&phone, "phone", MAX_SHORT_TEXT_LEN)?;
        patch.insert("phone".into(), json!(phone));
    }
    if let Some(role) = payload.role
        && role != target.role
    {
        guard_last_admin(&repo, &target, role, target.status).await?;
        patch.insert("role".into(), json!(role));
    }
    if let Some(password) = payload.password {
        let len = password.chars().count();
        if len < MIN_PASSWORD_LEN || len > MAX_PASSWORD_LEN {
            return Err(AppError::with_message(
                ErrorCode::PasswordTooShort,
                format!("Password must be {MIN_PASSWORD_LEN}-{MAX_PASSWORD_LEN} characters"),
            ));
        }
        let hash = Staff::hash_password(&password)
            .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;
        patch.insert("password_hash".into(), json!(hash));
    }

    if patch.is_empty() {
        return Ok(Json(target));
    }
    patch.insert("updated_at".into(), json!(now_millis()));

    let role_changed = patch.contains_key("role");
    let password_changed = patch.contains_key("password_hash");
    let staff = repo.merge(&id, Value::Object(patch)).await?;

    if role_changed || password_changed {
        security_log!(
            "INFO",
            "staff_updated",
            user_id = staff.id_string(),
            by = current_user.username.clone(),
            role = staff.role.as_str(),
            password_changed = password_changed
        );
    }
    state.broadcast_sync(RESOURCE, "updated", &staff.id_string(), Some(&staff));

    Ok(Json(staff))
}

/// POST /api/staff/{id}/approve - 审批通过
pub async fn approve(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Staff>> {
    let repo = StaffRepository::new(state.get_db());
    let target = load(&repo, &id).await?;
    if target.status == StaffStatus::Active {
        return Ok(Json(target));
    }

    let staff = repo
        .merge(
            &id,
            json!({
                "status": StaffStatus::Active,
                "approved_by": current_user.id,
                "updated_at": now_millis(),
            }),
        )
        .await?;

    security_log!(
        "INFO",
        "staff_approved",
        user_id = staff.id_string(),
        username = staff.username.clone(),
        by = current_user.username.clone()
    );
    state.broadcast_sync(RESOURCE, "updated", &staff.id_string(), Some(&staff));

    Ok(Json(staff))
}

/// POST /api/staff/{id}/reject - 拒绝 / 停用
pub async fn reject(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Staff>> {
    let repo = StaffRepository::new(state.get_db());
    let target = load(&repo, &id).await?;
    if target.id_string() == current_user.id {
        return Err(AppError::with_message(
            ErrorCode::StaffCannotDeleteSelf,
            "You cannot reject your own account",
        ));
    }
    guard_last_admin(&repo, &target, target.role, StaffStatus::Rejected).await?;

    let staff = repo
        .merge(
            &id,
            json!({
                "status": StaffStatus::Rejected,
                "updated_at": now_millis(),
            }),
        )
        .await?;

    security_log!(
        "INFO",
        "staff_rejected",
        user_id = staff.id_string(),
        username = staff.username.clone(),
        by = current_user.username.clone()
    );
    state.broadcast_sync(RESOURCE, "updated", &staff.id_string(), Some(&staff));

    Ok(Json(staff))
}

/// DELETE /api/staff/{id}
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = StaffRepository::new(state.get_db());
    let target = load(&repo, &id).await?;
    let target_id = target.id_string();

    if target_id == current_user.id {
        return Err(AppError::new(ErrorCode::StaffCannotDeleteSelf));
    }
    guard_last_admin(&repo, &target, target.role, StaffStatus::Rejected).await?;

    repo.delete(&id).await?;

    security_log!(
        "INFO",
        "staff_deleted",
        user_id = target_id.clone(),
        username = target.username.clone(),
        by = current_user.username.clone()
    );
    state.broadcast_sync::<()>(RESOURCE, "deleted", &target_id, None);

    Ok(Json(true))
}
