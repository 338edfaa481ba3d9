//! JWT 令牌服务
//!
//! 处理 JWT 令牌的生成、验证和解析。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use shared::models::StaffRole;
use thiserror::Error;

const MIN_SECRET_LEN: usize = 32;

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// JWT 密钥 (至少 32 字节)
    pub secret: String,
    /// 令牌过期时间 (分钟)
    pub expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

impl JwtConfig {
    /// Load from `JWT_SECRET`, `JWT_EXPIRATION_MINUTES`, `JWT_ISSUER`, `JWT_AUDIENCE`.
    ///
    /// A missing or short secret is replaced by a random one; tokens then
    /// stop being valid after a restart.
    pub fn from_env() -> Self {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if secret.len() >= MIN_SECRET_LEN => secret,
            Ok(_) => {
                tracing::warn!(
                    "JWT_SECRET is shorter than {} characters, using a temporary key",
                    MIN_SECRET_LEN
                );
                generate_secure_printable_jwt_secret()
            }
            Err(_) => {
                tracing::warn!("JWT_SECRET not set, using a temporary key");
                generate_secure_printable_jwt_secret()
            }
        };

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(720), // 默认 12 小时 (一个班次)
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "foh-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "foh-staff".to_string()),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Staff id ("staff:xxx")
    pub sub: String,
    pub username: String,
    pub display_name: String,
    pub role: String,
    /// 权限列表 (逗号分隔)
    pub permissions: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("无效签名")]
    InvalidSignature,

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),
}

/// 生成可打印的安全 JWT 密钥
pub fn generate_secure_printable_jwt_secret() -> String {
    const ALLOWED: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_=+.";

    let rng = SystemRandom::new();
    let mut bytes = [0u8; 64];
    if rng.fill(&mut bytes).is_err() {
        tracing::error!("System RNG unavailable, falling back to time-based key");
        let seed = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        return format!("foh-server-fallback-key-{seed:0>32}");
    }

    bytes
        .iter()
        .map(|b| ALLOWED[*b as usize % ALLOWED.len()] as char)
        .collect()
}

/// JWT 令牌服务
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 为员工生成新令牌
    pub fn generate_token(
        &self,
        user_id: &str,
        username: &str,
        display_name: &str,
        role: StaffRole,
        permissions: &[String],
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            display_name: display_name.to_string(),
            role: role.as_str().to_string(),
            permissions: permissions.join(","),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Validate and turn the claims into a request user
    pub fn authenticate(&self, token: &str) -> Result<CurrentUser, JwtError> {
        self.validate_token(token).and_then(CurrentUser::try_from)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }

    /// 令牌有效期 (秒)
    pub fn expires_in_seconds(&self) -> i64 {
        self.config.expiration_minutes * 60
    }
}

/// 当前用户上下文 (从 JWT Claims 解析)
///
/// 由认证中间件放入 request extensions
///
/// ```ignore
/// async fn handler(Extension(user): Extension<CurrentUser>) -> Json<()> {
///     if user.has_permission("orders:settle") {
///         // cashier work
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub role: StaffRole,
    pub permissions: Vec<String>,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let role = claims
            .role
            .parse::<StaffRole>()
            .map_err(JwtError::InvalidToken)?;
        let permissions = claims
            .permissions
            .split(',')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            id: claims.sub,
            username: claims.username,
            display_name: claims.display_name,
            role,
            permissions,
        })
    }
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// 检查是否拥有指定权限
    ///
    /// 1. 管理员拥有所有权限
    /// 2. 权限列表包含 `"all"` 则拥有所有权限
    /// 3. 精确匹配或前缀匹配 (`orders:*` 匹配 `orders:settle`)
    pub fn has_permission(&self, permission: &str) -> bool {
        if self.is_admin() {
            return true;
        }

        self.permissions.iter().any(|p| {
            if p == "all" || p == permission {
                return true;
            }
            p.strip_suffix(":*").is_some_and(|prefix| {
                permission
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with(':'))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: generate_secure_printable_jwt_secret(),
            expiration_minutes: 60,
            issuer: "foh-server".into(),
            audience: "foh-staff".into(),
        })
    }

    fn user(role: StaffRole, permissions: &[&str]) -> CurrentUser {
        CurrentUser {
            id: "staff:1".into(),
            username: "sam".into(),
            display_name: "Sam".into(),
            role,
            permissions: permissions.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = service();
        let permissions = vec!["orders:confirm".to_string(), "orders:serve".to_string()];

        let token = service
            .generate_token("staff:abc", "sam", "Sam", StaffRole::Waiter, &permissions)
            .unwrap();
        let current = service.authenticate(&token).unwrap();

        assert_eq!(current.id, "staff:abc");
        assert_eq!(current.username, "sam");
        assert_eq!(current.role, StaffRole::Waiter);
        assert_eq!(current.permissions, permissions);
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let token = service()
            .generate_token("staff:abc", "sam", "Sam", StaffRole::Chef, &[])
            .unwrap();
        assert!(matches!(
            service().validate_token(&token),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_expired_token() {
        let mut config = service().config;
        config.expiration_minutes = -10;
        let service = JwtService::with_config(config);
        let token = service
            .generate_token("staff:abc", "sam", "Sam", StaffRole::Chef, &[])
            .unwrap();
        assert!(matches!(
            service.validate_token(&token),
            Err(JwtError::ExpiredToken)
        ));
    }

    #[test]
    fn test_empty_permissions_parse_to_empty_list() {
        let service = service();
        let token = service
            .generate_token("staff:abc", "sam", "Sam", StaffRole::Chef, &[])
            .unwrap();
        assert!(service.authenticate(&token).unwrap().permissions.is_empty());
    }

    #[test]
    fn test_has_permission() {
        let waiter = user(StaffRole::Waiter, &["orders:confirm", "menu:*"]);
        assert!(waiter.has_permission("orders:confirm"));
        assert!(waiter.has_permission("menu:manage"));
        assert!(!waiter.has_permission("orders:settle"));
        assert!(!waiter.has_permission("menuitems:manage"));

        let admin = user(StaffRole::Admin, &[]);
        assert!(admin.has_permission("staff:manage"));

        let all = user(StaffRole::Cashier, &["all"]);
        assert!(all.has_permission("reports:view"));
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }

    #[test]
    fn test_printable_secret() {
        let a = generate_secure_printable_jwt_secret();
        let b = generate_secure_printable_jwt_secret();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }
}
