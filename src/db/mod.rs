//! Connection pool, shared identifiers and the repository error type.
//!
//! Each feature module (`auth`, `categories`, `notes`) declares its own
//! repository trait; [`PgStore`] implements all of them over one pool.

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::AppConfig;

#[cfg(test)]
pub mod memory;

pub type UserId = i64;
pub type CategoryId = i64;
pub type NoteId = i64;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Failures a repository call can report. Storage constraint violations are
/// translated into the specific variants here; anything else is `Storage`.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("username already exists")]
    DuplicateUsername,
    #[error("user not found")]
    UserNotFound,
    /// The row does not exist or belongs to someone else. The two cases are
    /// never distinguished.
    #[error("not found or not permitted")]
    NotFoundOrForbidden,
    #[error("referenced category does not exist")]
    CategoryMissing,
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    sqlstate(err).as_deref() == Some(UNIQUE_VIOLATION)
}

pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    sqlstate(err).as_deref() == Some(FOREIGN_KEY_VIOLATION)
}

fn sqlstate(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map(|c| c.into_owned()),
        _ => None,
    }
}

/// Postgres-backed implementation of every repository trait.
#[derive(Clone)]
pub struct PgStore {
    pub(crate) pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("connect to database")
}

pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("run database migrations")
}
