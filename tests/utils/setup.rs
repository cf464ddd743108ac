use std::sync::Arc;

use cup_pool::{notify::OutboxNotifier, AppConfig, AppState};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub const ADMIN_EMAIL: &str = "commissioner@pool.test";

pub struct TestSetup {
    pub state: AppState,
    pub outbox: Arc<OutboxNotifier>,
}

pub struct TestSetupBuilder {
    config: AppConfig,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig {
                jwt_secret: "integration-secret".to_string(),
                admin_emails: vec![ADMIN_EMAIL.to_string()],
                email_retry_delay_ms: 1,
                default_season: "2025".to_string(),
                ..AppConfig::default()
            },
        }
    }

    #[allow(dead_code)]
    pub fn with_season(mut self, season: &str) -> Self {
        self.config.default_season = season.to_string();
        self
    }

    pub fn build(self) -> TestSetup {
        let mut state = AppState::in_memory(self.config);

        // Tests read issued links straight from the outbox
        let outbox = Arc::new(OutboxNotifier::new());
        state.notifier = outbox.clone();

        TestSetup { state, outbox }
    }
}
