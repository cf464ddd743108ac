use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::{MagicLinkModel, NewUser, UserModel};
use crate::shared::AppError;

/// Trait for user repository operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<UserModel, AppError>;
    async fn get_user(&self, user_id: i64) -> Result<Option<UserModel>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError>;
    async fn list_users(&self) -> Result<Vec<UserModel>, AppError>;
}

/// Trait for magic link repository operations
#[async_trait]
pub trait MagicLinkRepository: Send + Sync {
    async fn create_link(&self, link: &MagicLinkModel) -> Result<(), AppError>;
    async fn get_link(&self, token: &str) -> Result<Option<MagicLinkModel>, AppError>;

    /// Atomically marks an unused link as used.
    /// Returns false when the link was already consumed or does not exist.
    async fn mark_used(&self, token: &str, used_at: DateTime<Utc>) -> Result<bool, AppError>;

    async fn cleanup_expired_links(&self) -> Result<u64, AppError>;
}

/// In-memory implementation of UserRepository for development and testing
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<i64, UserModel>>,
    next_id: AtomicI64,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user(&self, user: NewUser) -> Result<UserModel, AppError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            warn!("User with email already exists in memory");
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let model = UserModel {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            email: user.email,
            name: user.name,
            is_admin: user.is_admin,
            created_at: Utc::now(),
        };
        users.insert(model.id, model.clone());

        debug!(user_id = model.id, "User created in memory");
        Ok(model)
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<UserModel>, AppError> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<UserModel>, AppError> {
        let mut users: Vec<UserModel> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }
}

/// In-memory implementation of MagicLinkRepository for development and testing
#[derive(Default)]
pub struct InMemoryMagicLinkRepository {
    links: RwLock<HashMap<String, MagicLinkModel>>,
}

impl InMemoryMagicLinkRepository {
    pub fn new() -> Self {
        Self {
            links: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl MagicLinkRepository for InMemoryMagicLinkRepository {
    #[instrument(skip(self, link), fields(user_id = link.user_id))]
    async fn create_link(&self, link: &MagicLinkModel) -> Result<(), AppError> {
        let mut links = self.links.write().await;
        if links.contains_key(&link.token) {
            warn!("Magic link token collision in memory");
            return Err(AppError::Conflict("Magic link already exists".to_string()));
        }
        links.insert(link.token.clone(), link.clone());
        Ok(())
    }

    async fn get_link(&self, token: &str) -> Result<Option<MagicLinkModel>, AppError> {
        Ok(self.links.read().await.get(token).cloned())
    }

    async fn mark_used(&self, token: &str, used_at: DateTime<Utc>) -> Result<bool, AppError> {
        let mut links = self.links.write().await;
        match links.get_mut(token) {
            Some(link) if link.used_at.is_none() => {
                link.used_at = Some(used_at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn cleanup_expired_links(&self) -> Result<u64, AppError> {
        let mut links = self.links.write().await;
        let now = Utc::now();
        let initial_count = links.len();
        links.retain(|_, link| link.expires_at > now);

        let removed = initial_count - links.len();
        debug!(expired_links_removed = removed, "Expired magic links cleaned up");
        Ok(removed as u64)
    }
}

fn user_from_row(row: &PgRow) -> UserModel {
    UserModel {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        is_admin: row.get("is_admin"),
        created_at: row.get("created_at"),
    }
}

/// PostgreSQL implementation of user repository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user(&self, user: NewUser) -> Result<UserModel, AppError> {
        let row = sqlx::query(
            "INSERT INTO users (email, name, is_admin, created_at) VALUES ($1, $2, $3, $4)
             ON CONFLICT (email) DO NOTHING
             RETURNING id, email, name, is_admin, created_at",
        )
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.is_admin)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create user in database");
            AppError::DatabaseError(e.to_string())
        })?;

        row.map(|row| user_from_row(&row))
            .ok_or_else(|| AppError::Conflict("User already exists".to_string()))
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<UserModel>, AppError> {
        let row = sqlx::query("SELECT id, email, name, is_admin, created_at FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|row| user_from_row(&row)))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        let row =
            sqlx::query("SELECT id, email, name, is_admin, created_at FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|row| user_from_row(&row)))
    }

    async fn list_users(&self) -> Result<Vec<UserModel>, AppError> {
        let rows = sqlx::query("SELECT id, email, name, is_admin, created_at FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(user_from_row).collect())
    }
}

/// PostgreSQL implementation of magic link repository
pub struct PostgresMagicLinkRepository {
    pool: PgPool,
}

impl PostgresMagicLinkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MagicLinkRepository for PostgresMagicLinkRepository {
    #[instrument(skip(self, link), fields(user_id = link.user_id))]
    async fn create_link(&self, link: &MagicLinkModel) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO magic_links (token, user_id, created_at, expires_at, used_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&link.token)
        .bind(link.user_id)
        .bind(link.created_at)
        .bind(link.expires_at)
        .bind(link.used_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to store magic link");
            AppError::DatabaseError(e.to_string())
        })?;
        Ok(())
    }

    async fn get_link(&self, token: &str) -> Result<Option<MagicLinkModel>, AppError> {
        let row = sqlx::query(
            "SELECT token, user_id, created_at, expires_at, used_at FROM magic_links WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| MagicLinkModel {
            token: row.get("token"),
            user_id: row.get("user_id"),
            created_at: row.get("created_at"),
            expires_at: row.get("expires_at"),
            used_at: row.get("used_at"),
        }))
    }

    async fn mark_used(&self, token: &str, used_at: DateTime<Utc>) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE magic_links SET used_at = $2 WHERE token = $1 AND used_at IS NULL")
                .bind(token)
                .bind(used_at)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn cleanup_expired_links(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM magic_links WHERE expires_at < $1")
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected();
        debug!(expired_links_removed = removed, "Expired magic links cleaned up");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            name: "Fan".to_string(),
            is_admin: false,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create_user(new_user("fan@example.com")).await.unwrap();

        assert_eq!(created.id, 1);
        let by_id = repo.get_user(created.id).await.unwrap().unwrap();
        assert_eq!(by_id, created);
        let by_email = repo.find_by_email("fan@example.com").await.unwrap();
        assert_eq!(by_email, Some(created));
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = InMemoryUserRepository::new();
        repo.create_user(new_user("fan@example.com")).await.unwrap();

        let result = repo.create_user(new_user("fan@example.com")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_list_users_sorted_by_id() {
        let repo = InMemoryUserRepository::new();
        for i in 0..3 {
            repo.create_user(new_user(&format!("user-{i}@example.com")))
                .await
                .unwrap();
        }

        let ids: Vec<i64> = repo.list_users().await.unwrap().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_mark_used_only_once() {
        let repo = InMemoryMagicLinkRepository::new();
        let link = MagicLinkModel::new(1, 15);
        repo.create_link(&link).await.unwrap();

        assert!(repo.mark_used(&link.token, Utc::now()).await.unwrap());
        assert!(!repo.mark_used(&link.token, Utc::now()).await.unwrap());
        assert!(!repo.mark_used("missing", Utc::now()).await.unwrap());

        let stored = repo.get_link(&link.token).await.unwrap().unwrap();
        assert!(stored.is_used());
    }

    #[tokio::test]
    async fn test_cleanup_expired_links() {
        let repo = InMemoryMagicLinkRepository::new();
        let mut expired = MagicLinkModel::new(1, 15);
        expired.expires_at = Utc::now() - Duration::minutes(1);
        let valid = MagicLinkModel::new(1, 15);
        repo.create_link(&expired).await.unwrap();
        repo.create_link(&valid).await.unwrap();

        assert_eq!(repo.cleanup_expired_links().await.unwrap(), 1);
        assert!(repo.get_link(&expired.token).await.unwrap().is_none());
        assert!(repo.get_link(&valid.token).await.unwrap().is_some());
    }
}
