use std::path::{Path, PathBuf};

use chrono::Duration;

use crate::error::AppError;

pub const HOME_ENV: &str = "KEEPSAKE_HOME";
const DEFAULT_DIR_NAME: &str = ".keepsake";
const DEFAULT_LOG_FILTER: &str = "warn";
/// One day.
pub const MAX_NOTIFICATION_SECS: u64 = 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub notification_ttl: Duration,
}

impl Settings {
    pub fn resolve(data_dir: Option<PathBuf>, notify_secs: u64) -> Result<Self, AppError> {
        let data_dir = resolve_data_dir(
            data_dir,
            std::env::var_os(HOME_ENV).map(PathBuf::from),
            std::env::var_os("HOME").map(PathBuf::from),
        )?;
        Ok(Self {
            data_dir,
            notification_ttl: notification_ttl(notify_secs)?,
        })
    }
}

fn notification_ttl(secs: u64) -> Result<Duration, AppError> {
    if secs > MAX_NOTIFICATION_SECS {
        return Err(AppError::InvalidInput(format!(
            "notify-secs must be at most {MAX_NOTIFICATION_SECS}, got {secs}"
        )));
    }
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| AppError::InvalidInput(format!("notify-secs out of range: {secs}")))
}

/// `--data-dir`, then `KEEPSAKE_HOME`, then `~/.keepsake`.
fn resolve_data_dir(
    flag: Option<PathBuf>,
    env_home: Option<PathBuf>,
    user_home: Option<PathBuf>,
) -> Result<PathBuf, AppError> {
    if let Some(dir) = flag.or(env_home).filter(|dir| !is_blank(dir)) {
        return Ok(dir);
    }
    if let Some(home) = user_home.filter(|dir| !is_blank(dir)) {
        return Ok(home.join(DEFAULT_DIR_NAME));
    }
    Err(AppError::InvalidInput(format!(
        "unable to resolve data directory; pass --data-dir or set {HOME_ENV}"
    )))
}

fn is_blank(path: &Path) -> bool {
    path.as_os_str().is_empty()
}

/// Logs go to stderr so command output on stdout stays parseable.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
