use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    generators::{DisplayNameGenerator, PetNameGenerator},
    models::{MagicLinkModel, NewUser, UserModel},
    repository::{MagicLinkRepository, UserRepository},
    token::TokenConfig,
    types::{AuthResponse, MagicLinkRequest, MagicLinkResponse, UserResponse},
};
use crate::config::AppConfig;
use crate::notify::{Notification, Notifier};
use crate::shared::AppError;

const INVALID_LINK: &str = "Sign-in link is invalid or has expired";

/// Service for magic-link sign-in and bearer token issuance
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    links: Arc<dyn MagicLinkRepository>,
    notifier: Arc<dyn Notifier>,
    token_config: TokenConfig,
    config: Arc<AppConfig>,
    name_generator: Arc<dyn DisplayNameGenerator>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        links: Arc<dyn MagicLinkRepository>,
        notifier: Arc<dyn Notifier>,
        token_config: TokenConfig,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            users,
            links,
            notifier,
            token_config,
            config,
            name_generator: Arc::new(PetNameGenerator::new()),
        }
    }

    /// Finds or registers the user and mails them a single-use sign-in link.
    /// Blocks until delivery succeeds or the notifier gives up.
    #[instrument(skip(self, request))]
    pub async fn request_magic_link(
        &self,
        request: MagicLinkRequest,
    ) -> Result<MagicLinkResponse, AppError> {
        let email = normalize_email(&request.email)?;
        let user = self.find_or_register(&email, request.name).await?;

        if let Err(e) = self.links.cleanup_expired_links().await {
            warn!(error = %e, "Failed to clean up expired magic links");
        }

        let link = MagicLinkModel::new(user.id, self.config.magic_link_ttl_minutes);
        self.links.create_link(&link).await?;
        debug!(user_id = user.id, expires_at = %link.expires_at, "Magic link stored");

        let notification = Notification::MagicLink {
            to: user.email.clone(),
            name: user.name.clone(),
            link: format!(
                "{}/auth/verify?token={}",
                self.config.app_base_url.trim_end_matches('/'),
                link.token
            ),
        };
        self.notifier
            .send(&notification)
            .await
            .map_err(|e| AppError::Notification(e.to_string()))?;

        info!(user_id = user.id, "Magic link sent");
        Ok(MagicLinkResponse {
            message: format!("A sign-in link has been sent to {}", user.email),
        })
    }

    /// Exchanges an unused, unexpired link token for a bearer token
    #[instrument(skip(self, token))]
    pub async fn verify_magic_link(&self, token: &str) -> Result<AuthResponse, AppError> {
        let link = self.links.get_link(token).await?.ok_or_else(|| {
            warn!("Magic link not found");
            AppError::Unauthorized(INVALID_LINK.to_string())
        })?;

        if link.is_expired() || link.is_used() {
            warn!(
                user_id = link.user_id,
                expired = link.is_expired(),
                used = link.is_used(),
                "Rejected stale magic link"
            );
            return Err(AppError::Unauthorized(INVALID_LINK.to_string()));
        }

        // A concurrent verification may have consumed the link since the read
        if !self.links.mark_used(token, Utc::now()).await? {
            return Err(AppError::Unauthorized(INVALID_LINK.to_string()));
        }

        let user = self
            .users
            .get_user(link.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;

        let token = self.token_config.create_token(&user)?;
        info!(user_id = user.id, is_admin = user.is_admin, "User signed in");

        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    pub async fn current_user(&self, user_id: i64) -> Result<UserResponse, AppError> {
        self.users
            .get_user(user_id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    pub async fn list_users(&self) -> Result<Vec<UserResponse>, AppError> {
        Ok(self
            .users
            .list_users()
            .await?
            .into_iter()
            .map(UserResponse::from)
            .collect())
    }

    async fn find_or_register(
        &self,
        email: &str,
        name: Option<String>,
    ) -> Result<UserModel, AppError> {
        if let Some(user) = self.users.find_by_email(email).await? {
            return Ok(user);
        }

        let name = match name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
            Some(name) => name,
            None => self.name_generator.generate().await,
        };
        let is_admin = self.config.is_admin_email(email);

        let user = self
            .users
            .create_user(NewUser {
                email: email.to_string(),
                name,
                is_admin,
            })
            .await?;
        info!(user_id = user.id, is_admin, "Registered new user");
        Ok(user)
    }
}

/// Lower-cases and sanity-checks an email address
pub fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    };

    if valid && !email.contains(char::is_whitespace) {
        Ok(email)
    } else {
        Err(AppError::validation("A valid email address is required"))
    }
}
