use crate::error::{LottoError, Result};
use crate::storage::{from_millis, now, to_millis};
use crate::types::User;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, created_at";

pub struct UserStore<'a> {
    conn: &'a Connection,
}

impl<'a> UserStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create(&self, username: &str) -> Result<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LottoError::InvalidUsername("username cannot be empty".to_string()));
        }

        if self.find_by_name(username)?.is_some() {
            return Err(LottoError::UserExists {
                name: username.to_string(),
            });
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            created_at: now(),
        };

        self.conn.execute(
            "INSERT INTO users (id, username, created_at) VALUES (?1, ?2, ?3)",
            params![user.id, user.username, to_millis(user.created_at)],
        )?;

        Ok(user)
    }

    pub fn find_by_name(&self, username: &str) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("SELECT {} FROM users WHERE username = ?1", USER_COLUMNS),
                params![username],
                user_from_row,
            )
            .optional()?;

        Ok(user)
    }

    /// Like [`find_by_name`](Self::find_by_name) but a missing user is an error.
    pub fn get_by_name(&self, username: &str) -> Result<User> {
        self.find_by_name(username)?
            .ok_or_else(|| LottoError::UserNotFound {
                name: username.to_string(),
            })
    }

    pub fn get(&self, user_id: &str) -> Result<User> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
                params![user_id],
                user_from_row,
            )
            .optional()?
            .ok_or_else(|| LottoError::UserNotFound {
                name: user_id.to_string(),
            })
    }

    pub fn list(&self) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM users ORDER BY username",
            USER_COLUMNS
        ))?;

        let users = stmt
            .query_map([], user_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(users)
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        created_at: from_millis(row.get(2)?),
    })
}
