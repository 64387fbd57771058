use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

const LOOKUP_BY_PATH: &str = r#"
    SELECT
        repo.id,
        repo.name,
        repo.owner_id,
        owner.username,
        repo.path,
        repo.visibility,
        pusher.user_type,
        pusher.suspension_notice,
        access.mode
    FROM repository repo
    JOIN "user" owner  ON owner.id  = repo.owner_id
    JOIN "user" pusher ON pusher.id = ?1
    LEFT JOIN access
        ON (access.repo_id = repo.id AND access.user_id = ?1)
    WHERE
        repo.path = ?2
"#;

const LOOKUP_BY_REDIRECT: &str = r#"
    SELECT
        repo.id,
        repo.name,
        repo.owner_id,
        owner.username,
        repo.path,
        repo.visibility,
        pusher.user_type,
        pusher.suspension_notice,
        access.mode
    FROM repository repo
    JOIN "user" owner  ON owner.id  = repo.owner_id
    JOIN "user" pusher ON pusher.id = ?1
    JOIN redirect      ON redirect.new_repo_id = repo.id
    LEFT JOIN access
        ON (access.repo_id = repo.id AND access.user_id = ?1)
    WHERE
        redirect.path = ?2
"#;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens the database named by the configured connection string, which is
    /// a filesystem path or a `file:` URI.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lookup(&self, sql: &str, pusher_id: i64, path: &str, redirected: bool) -> Result<Option<RepoLookup>> {
        let conn = self.conn();
        conn.query_row(sql, params![pusher_id, path], |row| {
            repo_lookup_from_row(row, redirected)
        })
        .optional()
        .map_err(Error::from)
    }
}

fn repo_lookup_from_row(row: &Row<'_>, redirected: bool) -> rusqlite::Result<RepoLookup> {
    Ok(RepoLookup {
        id: row.get(0)?,
        name: row.get(1)?,
        owner_id: row.get(2)?,
        owner_name: row.get(3)?,
        path: row.get(4)?,
        visibility: Visibility::from(row.get::<_, String>(5)?),
        pusher: Pusher {
            user_type: UserType::from(row.get::<_, String>(6)?),
            suspension_notice: row.get(7)?,
        },
        access: row.get::<_, Option<String>>(8)?.map(AccessMode::from),
        redirected,
    })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    fn lookup_repository(&self, pusher_id: i64, path: &str) -> Result<Option<RepoLookup>> {
        self.lookup(LOOKUP_BY_PATH, pusher_id, path, false)
    }

    fn lookup_redirect(&self, pusher_id: i64, path: &str) -> Result<Option<RepoLookup>> {
        self.lookup(LOOKUP_BY_REDIRECT, pusher_id, path, true)
    }

    fn lookup_pusher(&self, pusher_id: i64) -> Result<Option<Pusher>> {
        let conn = self.conn();
        conn.query_row(
            r#"SELECT user_type, suspension_notice FROM "user" WHERE id = ?1"#,
            params![pusher_id],
            |row| {
                Ok(Pusher {
                    user_type: UserType::from(row.get::<_, String>(0)?),
                    suspension_notice: row.get(1)?,
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn create_autocreated_repository(
        &self,
        name: &str,
        owner_id: i64,
        path: &str,
    ) -> Result<Option<i64>> {
        let now = format_datetime(&Utc::now());
        let conn = self.conn();

        // A concurrent first push to the same path lands on the same row.
        conn.execute(
            "INSERT INTO repository (created, updated, name, owner_id, path, visibility)
             VALUES (?1, ?1, ?2, ?3, ?4, 'autocreated')
             ON CONFLICT(path) DO NOTHING",
            params![now, name, owner_id, path],
        )?;

        conn.query_row(
            "SELECT id FROM repository WHERE path = ?1 AND owner_id = ?2",
            params![path, owner_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(Error::from)
    }

    fn create_user(&self, user: &User) -> Result<()> {
        self.conn().execute(
            r#"INSERT INTO "user" (id, username, user_type, suspension_notice)
               VALUES (?1, ?2, ?3, ?4)"#,
            params![
                user.id,
                user.username,
                user.user_type,
                user.suspension_notice,
            ],
        )?;
        Ok(())
    }

    fn create_repository(&self, repo: &NewRepository) -> Result<i64> {
        let now = format_datetime(&Utc::now());
        let conn = self.conn();
        conn.execute(
            "INSERT INTO repository (created, updated, name, owner_id, path, visibility)
             VALUES (?1, ?1, ?2, ?3, ?4, ?5)",
            params![now, repo.name, repo.owner_id, repo.path, repo.visibility],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn create_access(&self, repo_id: i64, user_id: i64, mode: &str) -> Result<()> {
        self.conn().execute(
            "INSERT INTO access (repo_id, user_id, mode) VALUES (?1, ?2, ?3)",
            params![repo_id, user_id, mode],
        )?;
        Ok(())
    }

    fn create_redirect(&self, path: &str, new_repo_id: i64) -> Result<()> {
        self.conn().execute(
            "INSERT INTO redirect (path, new_repo_id) VALUES (?1, ?2)",
            params![path, new_repo_id],
        )?;
        Ok(())
    }
}
