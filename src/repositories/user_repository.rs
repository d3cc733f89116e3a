// src/repositories/user_repository.rs
//
// User persistence

use rusqlite::{params, OptionalExtension, Row};
use std::sync::Arc;

use super::row_mapping::{now_rfc3339, sync_status, timestamp};
use crate::db::ConnectionPool;
use crate::domain::{NewUser, User};
use crate::error::{AppError, AppResult};

const USER_COLUMNS: &str =
    "id, email, nombre, firebase_uid, sync_status, created_at, updated_at";

pub trait UserRepository: Send + Sync {
    fn insert(&self, user: &NewUser) -> AppResult<i64>;
    fn get_by_id(&self, id: i64) -> AppResult<Option<User>>;
    fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;
    fn get_by_firebase_uid(&self, uid: &str) -> AppResult<Option<User>>;
    fn list_all(&self) -> AppResult<Vec<User>>;
    fn update(&self, user: &User) -> AppResult<()>;
    fn delete(&self, id: i64) -> AppResult<()>;
    fn exists(&self, id: i64) -> AppResult<bool>;
}

pub struct SqliteUserRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteUserRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    pub(crate) fn row_to_user(row: &Row) -> Result<User, rusqlite::Error> {
        Ok(User {
            id: row.get("id")?,
            email: row.get("email")?,
            nombre: row.get("nombre")?,
            firebase_uid: row.get("firebase_uid")?,
            sync_status: sync_status(row, "sync_status")?,
            created_at: timestamp(row, "created_at")?,
            updated_at: timestamp(row, "updated_at")?,
        })
    }

    fn get_where(&self, column: &str, value: &dyn rusqlite::ToSql) -> AppResult<Option<User>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM usuarios WHERE {} = ?1",
            USER_COLUMNS, column
        ))?;

        let user = stmt.query_row([value], Self::row_to_user).optional()?;
        Ok(user)
    }
}

impl UserRepository for SqliteUserRepository {
    fn insert(&self, user: &NewUser) -> AppResult<i64> {
        let conn = self.pool.get()?;
        let now = now_rfc3339();

        conn.execute(
            "INSERT INTO usuarios (email, nombre, firebase_uid, sync_status, created_at, updated_at)
             VALUES (?1, ?2, ?3, 'pending', ?4, ?4)",
            params![user.email, user.nombre, user.firebase_uid, now],
        )?;

        Ok(conn.last_insert_rowid())
    }

    fn get_by_id(&self, id: i64) -> AppResult<Option<User>> {
        self.get_where("id", &id)
    }

    fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.get_where("email", &email)
    }

    fn get_by_firebase_uid(&self, uid: &str) -> AppResult<Option<User>> {
        self.get_where("firebase_uid", &uid)
    }

    fn list_all(&self) -> AppResult<Vec<User>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM usuarios ORDER BY created_at DESC, id DESC",
            USER_COLUMNS
        ))?;

        let users = stmt
            .query_map([], Self::row_to_user)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    fn update(&self, user: &User) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute(
            "UPDATE usuarios
             SET email = ?1, nombre = ?2, firebase_uid = ?3, sync_status = ?4, updated_at = ?5
             WHERE id = ?6",
            params![
                user.email,
                user.nombre,
                user.firebase_uid,
                user.sync_status.as_str(),
                user.updated_at.to_rfc3339(),
                user.id,
            ],
        )?;

        if rows_affected == 0 {
            return Err(AppError::not_found("User", user.id));
        }
        Ok(())
    }

    fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute("DELETE FROM usuarios WHERE id = ?1", params![id])?;

        if rows_affected == 0 {
            return Err(AppError::not_found("User", id));
        }
        Ok(())
    }

    fn exists(&self, id: i64) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM usuarios WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }
}
