use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use url::Url;

use crate::entities::entry;
use crate::error::AppError;

pub fn resolve_db_path(data_dir: &Path) -> PathBuf {
    data_dir.join("keepsake.db")
}

pub fn ensure_parent_dir(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

pub fn open_lock(path: &Path) -> Result<fd_lock::RwLock<File>, AppError> {
    let lock_path = path.with_extension("lock");
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(lock_path)?;
    Ok(fd_lock::RwLock::new(file))
}

pub fn sqlite_url(path: &Path) -> Result<String, AppError> {
    let mut url = Url::from_file_path(path)
        .map_err(|_| AppError::InvalidInput(format!("invalid sqlite path: {}", path.display())))?;
    url.set_query(Some("mode=rwc"));
    Ok(url.as_str().replacen("file://", "sqlite://", 1))
}

pub async fn connect(path: &Path) -> Result<DatabaseConnection, AppError> {
    let sqlite_url = sqlite_url(path)?;
    tracing::debug!(url = %sqlite_url, "connecting to store");
    Ok(Database::connect(&sqlite_url).await?)
}

pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), AppError> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut entry_stmt = schema.create_table_from_entity(entry::Entity);
    entry_stmt.if_not_exists();
    db.execute(builder.build(&entry_stmt)).await?;

    Ok(())
}
