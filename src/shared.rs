use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::error;

use crate::auth::repository::{
    InMemoryMagicLinkRepository, InMemoryUserRepository, MagicLinkRepository,
    PostgresMagicLinkRepository, PostgresUserRepository, UserRepository,
};
use crate::auth::{AuthService, TokenConfig};
use crate::config::AppConfig;
use crate::notify::{Notifier, OutboxNotifier, RetryingNotifier};
use crate::pool_config::repository::{
    InMemoryPoolConfigRepository, PoolConfigRepository, PostgresPoolConfigRepository,
};
use crate::pool_config::PoolConfigService;
use crate::predictions::repository::{
    InMemoryPredictionRepository, PostgresPredictionRepository, PredictionRepository,
};
use crate::predictions::PredictionService;
use crate::rounds::repository::{
    InMemoryRoundRepository, PostgresRoundRepository, RoundRepository,
};
use crate::rounds::RoundService;
use crate::scoring::ScoringService;
use crate::series::repository::{
    InMemorySeriesRepository, PostgresSeriesRepository, SeriesRepository,
};
use crate::series::SeriesService;
use crate::stanley_cup::repository::{CupRepository, InMemoryCupRepository, PostgresCupRepository};
use crate::stanley_cup::CupService;
use crate::teams::repository::{InMemoryTeamRepository, PostgresTeamRepository, TeamRepository};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub token_config: TokenConfig,
    pub notifier: Arc<dyn Notifier>,
    pub user_repository: Arc<dyn UserRepository>,
    pub magic_link_repository: Arc<dyn MagicLinkRepository>,
    pub team_repository: Arc<dyn TeamRepository>,
    pub round_repository: Arc<dyn RoundRepository>,
    pub series_repository: Arc<dyn SeriesRepository>,
    pub prediction_repository: Arc<dyn PredictionRepository>,
    pub cup_repository: Arc<dyn CupRepository>,
    pub pool_config_repository: Arc<dyn PoolConfigRepository>,
}

impl AppState {
    /// State backed by in-memory repositories (development and tests)
    pub fn in_memory(config: AppConfig) -> Self {
        let notifier = Self::retrying_notifier(
            &config,
            Arc::new(OutboxNotifier::with_capacity(config.outbox_capacity)),
        );
        Self {
            token_config: TokenConfig::from_config(&config),
            config: Arc::new(config),
            notifier,
            user_repository: Arc::new(InMemoryUserRepository::new()),
            magic_link_repository: Arc::new(InMemoryMagicLinkRepository::new()),
            team_repository: Arc::new(InMemoryTeamRepository::new()),
            round_repository: Arc::new(InMemoryRoundRepository::new()),
            series_repository: Arc::new(InMemorySeriesRepository::new()),
            prediction_repository: Arc::new(InMemoryPredictionRepository::new()),
            cup_repository: Arc::new(InMemoryCupRepository::new()),
            pool_config_repository: Arc::new(InMemoryPoolConfigRepository::new()),
        }
    }

    /// State backed by PostgreSQL repositories sharing one pool
    pub fn postgres(config: AppConfig, pool: PgPool) -> Self {
        let notifier = Self::retrying_notifier(
            &config,
            Arc::new(OutboxNotifier::with_capacity(config.outbox_capacity)),
        );
        Self {
            token_config: TokenConfig::from_config(&config),
            config: Arc::new(config),
            notifier,
            user_repository: Arc::new(PostgresUserRepository::new(pool.clone())),
            magic_link_repository: Arc::new(PostgresMagicLinkRepository::new(pool.clone())),
            team_repository: Arc::new(PostgresTeamRepository::new(pool.clone())),
            round_repository: Arc::new(PostgresRoundRepository::new(pool.clone())),
            series_repository: Arc::new(PostgresSeriesRepository::new(pool.clone())),
            prediction_repository: Arc::new(PostgresPredictionRepository::new(pool.clone())),
            cup_repository: Arc::new(PostgresCupRepository::new(pool.clone())),
            pool_config_repository: Arc::new(PostgresPoolConfigRepository::new(pool)),
        }
    }

    fn retrying_notifier(config: &AppConfig, transport: Arc<dyn Notifier>) -> Arc<dyn Notifier> {
        Arc::new(RetryingNotifier::new(
            transport,
            config.email_retry_attempts,
            Duration::from_millis(config.email_retry_delay_ms),
        ))
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(
            Arc::clone(&self.user_repository),
            Arc::clone(&self.magic_link_repository),
            Arc::clone(&self.notifier),
            self.token_config.clone(),
            Arc::clone(&self.config),
        )
    }

    pub fn scoring_service(&self) -> ScoringService {
        ScoringService::new(
            Arc::clone(&self.prediction_repository),
            Arc::clone(&self.cup_repository),
            Arc::clone(&self.round_repository),
            Arc::clone(&self.pool_config_repository),
        )
    }

    pub fn series_service(&self) -> SeriesService {
        SeriesService::new(
            Arc::clone(&self.series_repository),
            Arc::clone(&self.round_repository),
            Arc::clone(&self.team_repository),
            self.scoring_service(),
        )
    }

    pub fn round_service(&self) -> RoundService {
        RoundService::new(
            Arc::clone(&self.round_repository),
            Arc::clone(&self.series_repository),
            Arc::clone(&self.team_repository),
        )
    }

    pub fn prediction_service(&self) -> PredictionService {
        PredictionService::new(
            Arc::clone(&self.prediction_repository),
            Arc::clone(&self.series_repository),
            Arc::clone(&self.round_repository),
            Arc::clone(&self.pool_config_repository),
            Arc::clone(&self.user_repository),
            self.scoring_service(),
        )
    }

    pub fn pool_config_service(&self) -> PoolConfigService {
        PoolConfigService::new(
            Arc::clone(&self.pool_config_repository),
            Arc::clone(&self.round_repository),
            Arc::clone(&self.series_repository),
            self.scoring_service(),
            self.config.default_season.clone(),
        )
    }

    pub fn cup_service(&self) -> CupService {
        CupService::new(
            Arc::clone(&self.cup_repository),
            Arc::clone(&self.team_repository),
            self.scoring_service(),
            self.config.default_season.clone(),
        )
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Internal server error")]
    Internal,
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(msg) | AppError::Precondition(msg) => {
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::JwtError(msg) | AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, msg)
            }
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::DatabaseError(msg) => {
                error!(error = %msg, "Database failure while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Notification(msg) => {
                error!(error = %msg, "Notification delivery failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
