use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{}", Labeled("Not found", .0))]
    NotFound(String),
    #[error("{}", Labeled("Invalid input", .0))]
    InvalidInput(String),
}

struct Labeled<'a>(&'a str, &'a str);

impl fmt::Display for Labeled<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Labeled(label, message) = self;
        if message.contains('\n') {
            write!(f, "{label}:\n{message}")
        } else {
            write!(f, "{label}: {message}")
        }
    }
}
