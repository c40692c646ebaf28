use notify_service::config::{AdminConfig, NotifyConfig, ResendConfig};
use notify_service::services::{EmailProvider, MockEmailProvider, ResendProvider};
use notify_service::startup::Application;
use secrecy::SecretString;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub mock_provider: Option<Arc<MockEmailProvider>>,
}

pub fn test_config(api_url: &str, resend_enabled: bool) -> NotifyConfig {
    NotifyConfig {
        // Use random port for testing (port 0)
        common: CoreConfig { port: 0 },
        resend: ResendConfig {
            api_url: api_url.to_string(),
            api_key: SecretString::new("test-key".to_string()),
            from: "Validation <onboarding@resend.dev>".to_string(),
            enabled: resend_enabled,
        },
        admin: AdminConfig {
            email: "admin@test.local".to_string(),
        },
    }
}

impl TestApp {
    /// Spawn the app with a counting mock provider.
    pub async fn spawn() -> Self {
        let mock = Arc::new(MockEmailProvider::new(true));
        let mut app = Self::spawn_with_provider(mock.clone()).await;
        app.mock_provider = Some(mock);
        app
    }

    /// Spawn the app with a provider whose every send fails with `message`.
    pub async fn spawn_failing(message: &str) -> Self {
        let mock = Arc::new(MockEmailProvider::failing(message));
        let mut app = Self::spawn_with_provider(mock.clone()).await;
        app.mock_provider = Some(mock);
        app
    }

    /// Spawn the app with a real Resend provider pointed at `api_url`.
    pub async fn spawn_with_resend(api_url: &str) -> Self {
        let config = test_config(api_url, true);
        let provider =
            ResendProvider::new(config.resend.clone()).expect("Failed to build Resend provider");
        Self::spawn_app(config, Arc::new(provider)).await
    }

    pub async fn spawn_with_provider(provider: Arc<dyn EmailProvider>) -> Self {
        Self::spawn_app(test_config("https://api.resend.com", false), provider).await
    }

    async fn spawn_app(config: NotifyConfig, provider: Arc<dyn EmailProvider>) -> Self {
        let app = Application::build_with_provider(config, provider)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            mock_provider: None,
        }
    }

    pub async fn post_notify(&self, body: String) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/notify", self.address))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub fn send_count(&self) -> u64 {
        self.mock_provider
            .as_ref()
            .expect("TestApp was not spawned with a mock provider")
            .send_count()
    }
}
