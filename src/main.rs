use cup_pool::{app_router, AppConfig, AppState};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cup_pool=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting playoff pool server");
    let config = AppConfig::from_env();
    let port = config.port;

    // PostgreSQL when DATABASE_URL is set, in-memory otherwise
    let app_state = match config.database_url.clone() {
        Some(database_url) => match sqlx::PgPool::connect(&database_url).await {
            Ok(pool) => {
                info!("Connected to PostgreSQL");
                AppState::postgres(config, pool)
            }
            Err(e) => {
                error!(error = %e, "Failed to connect to database");
                std::process::exit(1);
            }
        },
        None => {
            info!("DATABASE_URL not set, using in-memory repositories");
            AppState::in_memory(config)
        }
    };

    let app = app_router(app_state);

    let address = format!("0.0.0.0:{port}");
    let listener = match tokio::net::TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, %address, "Failed to bind listener");
            std::process::exit(1);
        }
    };
    info!("Server running on http://localhost:{port}");
    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "Server stopped with an error");
    }
}
