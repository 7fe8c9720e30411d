/// User model and database operations
///
/// This is the credential store: it persists a user's identity together
/// with the Argon2id digest of their password. Usernames are unique
/// case-insensitively, and the uniqueness is enforced by a database
/// constraint rather than an application-level pre-check, so concurrent
/// registrations with the same name resolve to exactly one winner.
///
/// Users are immutable after registration. There is no update or delete
/// operation; the `ON DELETE RESTRICT` / `SET NULL` rules on tasks are
/// dormant until one is ever added.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id            BIGSERIAL PRIMARY KEY,
///     username      TEXT NOT NULL,
///     password_hash VARCHAR(255) NOT NULL,
///     created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE UNIQUE INDEX users_username_key ON users (LOWER(username));
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// User model representing an account
///
/// The password digest is never serialized onto the wire.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (monotonic, assigned by the database)
    pub id: i64,

    /// Username, unique across all users (case-insensitive)
    pub username: String,

    /// Argon2id password digest
    ///
    /// Never store or log plaintext passwords.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Username as supplied at registration
    pub username: String,

    /// Argon2id password digest (NOT the plaintext password)
    pub password_hash: String,
}

/// Wire shape for user listings: id and username only
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSummary {
    /// User ID
    pub id: i64,

    /// Username
    pub username: String,
}

impl User {
    /// Creates a new user
    ///
    /// The insert and the uniqueness check are a single atomic statement:
    /// a duplicate username surfaces as a unique-constraint violation on
    /// `users_username_key`, never as a second successful row.
    ///
    /// # Errors
    ///
    /// Returns a database error on constraint violation or connection
    /// failure.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(data.username)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by username
    ///
    /// Lookup is case-insensitive, matching the uniqueness rule, so login
    /// and registration agree on what "the same username" means.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE LOWER(username) = LOWER($1)
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Checks whether a user with the given ID exists
    ///
    /// Used by task assignment for its read-before-write validation.
    pub async fn exists(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;

        Ok(exists)
    }

    /// Lists all users as id/username pairs, in creation order
    pub async fn list(pool: &PgPool) -> Result<Vec<UserSummary>, sqlx::Error> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, username
            FROM users
            ORDER BY id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }
}
