use std::future::Future;

use chrono::Utc;

use crate::entities::{parse_timestamp, AnyStore, NewUser, User};

pub trait UserStore: Send + Sync + 'static {
    fn find_user_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, sqlx::Error>> + Send;

    fn find_user_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>, sqlx::Error>> + Send;

    fn get_user(&self, id: i64) -> impl Future<Output = Result<Option<User>, sqlx::Error>> + Send;

    /// Insert a user. Duplicate email or username fails with the database's
    /// unique-violation error.
    fn insert_user(&self, user: NewUser) -> impl Future<Output = Result<User, sqlx::Error>> + Send;

    fn list_users(&self) -> impl Future<Output = Result<Vec<User>, sqlx::Error>> + Send;
}

type UserRow = (i64, String, String, String, String);

const USER_COLUMNS: &str = "SELECT id, email, username, password, created_at FROM users";

fn from_row((id, email, username, password_hash, created_at): UserRow) -> User {
    User {
        id,
        email,
        username,
        password_hash,
        created_at: parse_timestamp(&created_at),
    }
}

impl UserStore for AnyStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{USER_COLUMNS} WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(from_row))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{USER_COLUMNS} WHERE username = ?"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(from_row))
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, sqlx::Error> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{USER_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(from_row))
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, sqlx::Error> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO users (email, username, password, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        let id = match result.last_insert_id() {
            Some(id) => id,
            None => {
                let (id,): (i64,) = sqlx::query_as("SELECT id FROM users WHERE email = ?")
                    .bind(&user.email)
                    .fetch_one(&self.pool)
                    .await?;
                id
            }
        };
        Ok(User {
            id,
            email: user.email,
            username: user.username,
            password_hash: user.password_hash,
            created_at,
        })
    }

    async fn list_users(&self) -> Result<Vec<User>, sqlx::Error> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!("{USER_COLUMNS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(from_row).collect())
    }
}
