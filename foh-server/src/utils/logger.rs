//! Logging Infrastructure
//!
//! - console output, pretty in development and JSON in production
//! - optional daily rolling files under `<WORK_DIR>/logs`:
//!   `app/` (everything except security events, pruned after 14 days) and
//!   `security/` (target `"security"`, never pruned)

use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, filter::filter_fn, fmt, layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Application logs older than this are deleted
pub const APP_LOG_RETENTION_DAYS: i64 = 14;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn file_layer(dir: PathBuf, prefix: &str, json: bool, security: bool) -> BoxedLayer {
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, prefix);
    let only_security = filter_fn(move |meta| (meta.target() == "security") == security);

    if json {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_writer(std::sync::Mutex::new(appender))
            .with_filter(only_security)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(appender))
            .with_filter(only_security)
            .boxed()
    }
}

/// Initialize the logging system
///
/// `RUST_LOG` overrides `level` when set.
///
/// ```no_run
/// // console only
/// foh_server::init_logger("debug", false, None)?;
///
/// // console + rolling files
/// foh_server::init_logger("info", true, Some("./work_dir/logs"))?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logger(level: &str, json_format: bool, log_dir: Option<&str>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let mut layers: Vec<BoxedLayer> = Vec::new();

    let console = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };
    layers.push(console);

    if let Some(dir) = log_dir {
        let log_dir = Path::new(dir);
        let app_dir = log_dir.join("app");
        let security_dir = log_dir.join("security");
        fs::create_dir_all(&app_dir)?;
        fs::create_dir_all(&security_dir)?;

        layers.push(file_layer(app_dir, "app", json_format, false));
        layers.push(file_layer(security_dir, "security", json_format, true));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()?;

    Ok(())
}

/// Delete `app.YYYY-MM-DD` files older than [`APP_LOG_RETENTION_DAYS`]
///
/// Returns the number of removed files.
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<usize> {
    let app_dir = log_dir.join("app");
    if !app_dir.exists() {
        return Ok(0);
    }

    let cutoff = chrono::Utc::now().date_naive() - chrono::Duration::days(APP_LOG_RETENTION_DAYS);
    let mut removed = 0;

    for entry in fs::read_dir(app_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(date) = name
            .strip_prefix("app.")
            .and_then(|d| chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        else {
            continue;
        };
        if date < cutoff {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "Deleted old log file");
            removed += 1;
        }
    }

    Ok(removed)
}

/// Prune old logs once an hour
pub async fn periodic_cleanup(log_dir: PathBuf) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(3600));
    loop {
        interval.tick().await;
        if let Err(e) = cleanup_old_logs(&log_dir) {
            tracing::warn!(error = %e, "Log cleanup failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_old_logs() {
        let dir = tempfile::tempdir().unwrap();
        let app = dir.path().join("app");
        fs::create_dir_all(&app).unwrap();

        let old = chrono::Utc::now().date_naive() - chrono::Duration::days(30);
        let today = chrono::Utc::now().date_naive();
        fs::write(app.join(format!("app.{}", old.format("%Y-%m-%d"))), "x").unwrap();
        fs::write(app.join(format!("app.{}", today.format("%Y-%m-%d"))), "x").unwrap();
        fs::write(app.join("notes.txt"), "x").unwrap();

        assert_eq!(cleanup_old_logs(dir.path()).unwrap(), 1);
        assert_eq!(fs::read_dir(&app).unwrap().count(), 2);
    }

    #[test]
    fn test_cleanup_without_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(cleanup_old_logs(dir.path()).unwrap(), 0);
    }
}
