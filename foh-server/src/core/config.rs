use std::path::PathBuf;

use crate::auth::JwtConfig;

/// 服务器配置
///
/// # 环境变量
///
/// `.env` 文件会在启动时由 `dotenv` 加载。
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./work_dir | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_PATH | `<WORK_DIR>/database/foh.db` | 数据库路径，`:memory:` 为内存库 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 格式日志 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 优雅关闭超时(毫秒) |
/// | ADMIN_USERNAME | admin | 初始管理员用户名 |
/// | ADMIN_PASSWORD | admin123 | 初始管理员密码 |
/// | JWT_SECRET 等 | 见 [`JwtConfig`] | |
///
/// ```ignore
/// WORK_DIR=/data/foh HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub http_port: u16,
    /// `None` = in-memory database
    pub database_path: Option<PathBuf>,
    pub jwt: JwtConfig,
    /// development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    pub request_timeout_ms: u64,
    pub shutdown_timeout_ms: u64,
    pub admin_username: String,
    pub admin_password: String,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置，未设置时使用默认值
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./work_dir".into());
        let database_path = match std::env::var("DATABASE_PATH") {
            Ok(p) if p == ":memory:" => None,
            Ok(p) => Some(PathBuf::from(p)),
            Err(_) => Some(PathBuf::from(&work_dir).join("database").join("foh.db")),
        };

        Self {
            work_dir,
            http_port: env_or("HTTP_PORT", 3000),
            database_path,
            jwt: JwtConfig::from_env(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_or("LOG_JSON", false),
            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", 30_000),
            shutdown_timeout_ms: env_or("SHUTDOWN_TIMEOUT_MS", 10_000),
            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            admin_password: std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".into()),
        }
    }

    /// 测试用配置: 内存数据库 + 固定 JWT 密钥
    pub fn for_tests(work_dir: impl Into<String>) -> Self {
        Self {
            work_dir: work_dir.into(),
            http_port: 0,
            database_path: None,
            jwt: JwtConfig {
                secret: "test-secret-key-with-at-least-32-characters".into(),
                expiration_minutes: 60,
                issuer: "foh-server".into(),
                audience: "foh-staff".into(),
            },
            environment: "test".into(),
            log_level: "warn".into(),
            log_json: false,
            request_timeout_ms: 30_000,
            shutdown_timeout_ms: 1_000,
            admin_username: "admin".into(),
            admin_password: "admin123".into(),
        }
    }

    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Warn about settings that are fine locally but not in production
    ///
    /// Called once the logger is up; `from_env` runs before it.
    pub fn warn_insecure_defaults(&self) {
        if !self.is_development() && self.admin_password == "admin123" {
            tracing::warn!(
                environment = %self.environment,
                "ADMIN_PASSWORD is the default value, change it"
            );
        }
        let jwt_from_env = std::env::var("JWT_SECRET").is_ok_and(|s| s == self.jwt.secret);
        if !jwt_from_env {
            tracing::warn!("JWT_SECRET missing or too short, tokens will not survive a restart");
        }
        if self.database_path.is_none() && self.is_production() {
            tracing::warn!("DATABASE_PATH=:memory: in production, data will be lost on restart");
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_falls_back_on_parse_error() {
        // SAFETY: test-only variable name, not read concurrently by other tests
        unsafe { std::env::set_var("FOH_TEST_PORT_BAD", "not-a-number") };
        assert_eq!(env_or("FOH_TEST_PORT_BAD", 3000u16), 3000);
        assert_eq!(env_or("FOH_TEST_PORT_MISSING", 42u64), 42);
    }

    #[test]
    fn test_for_tests_uses_memory_db() {
        let config = Config::for_tests("/tmp/foh");
        assert!(config.database_path.is_none());
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/foh").join("logs"));
        assert!(!config.is_production());
    }
}
