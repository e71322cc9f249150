//! SQLite-backed credential store.
//!
//! Table:
//! - `users`: username (primary key), password_hash, email, created_at
//!
//! Every call opens its own connection and drops it before returning, so
//! concurrent sessions never share a handle. Username uniqueness is enforced
//! by the primary key alone.

use chrono::{Local, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::password::{self, PasswordScheme};
use crate::error::AuthError;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// How long a connection waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A stored account.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct CredentialStore {
    db_path: PathBuf,
    scheme: PasswordScheme,
}

impl CredentialStore {
    /// Open (or create) the credential database at the given path.
    pub fn open(db_path: &Path, scheme: PasswordScheme) -> Result<Self, AuthError> {
        if let Some(dir) = db_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }

        let store = Self {
            db_path: db_path.to_path_buf(),
            scheme,
        };

        let conn = store.connect()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                username TEXT PRIMARY KEY,
                password_hash TEXT,
                email TEXT,
                created_at TIMESTAMP
            );",
        )?;

        log::info!("Credential store ready at {}", db_path.display());
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> Result<Connection, AuthError> {
        let conn = Connection::open(&self.db_path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }

    /// Insert a new account. The insert itself is the uniqueness check, so
    /// two sessions racing on one username yield exactly one record and a
    /// `DuplicateUser` for the loser.
    pub fn create(&self, username: &str, password: &str, email: &str) -> Result<(), AuthError> {
        let password_hash = password::digest(self.scheme, password)?;
        let created_at = Local::now().naive_local().format(TIMESTAMP_FORMAT).to_string();

        let mut conn = self.connect()?;
        // Take the write lock up front so the busy timeout covers contention.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let result = tx.execute(
            "INSERT INTO users (username, password_hash, email, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![username, password_hash, email, created_at],
        );

        match result.and_then(|_| tx.commit()) {
            Ok(_) => {
                log::info!("Created account '{username}'");
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(AuthError::DuplicateUser(username.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// True iff the account exists and `password` matches its digest.
    /// Unknown users and wrong passwords are indistinguishable.
    pub fn verify(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        let conn = self.connect()?;
        let stored: Option<Option<String>> = conn
            .query_row(
                "SELECT password_hash FROM users WHERE username = ?1",
                params![username],
                |row| row.get(0),
            )
            .optional()?;

        Ok(matches!(stored, Some(Some(ref hash)) if password::matches(password, hash)))
    }

    pub fn exists(&self, username: &str) -> Result<bool, AuthError> {
        let conn = self.connect()?;
        let found = conn
            .query_row(
                "SELECT 1 FROM users WHERE username = ?1",
                params![username],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Look up a full record.
    pub fn get(&self, username: &str) -> Result<Option<UserRecord>, AuthError> {
        let conn = self.connect()?;
        let record = conn
            .query_row(
                "SELECT username, password_hash, email, created_at FROM users WHERE username = ?1",
                params![username],
                |row| {
                    let created_at: String = row.get(3)?;
                    let created_at = NaiveDateTime::parse_from_str(&created_at, TIMESTAMP_FORMAT)
                        .map_err(|e| {
                            rusqlite::Error::FromSqlConversionFailure(
                                3,
                                rusqlite::types::Type::Text,
                                Box::new(e),
                            )
                        })?;
                    Ok(UserRecord {
                        username: row.get(0)?,
                        password_hash: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                        email: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                        created_at,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// Count registered users.
    pub fn count(&self) -> Result<u64, AuthError> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
