//! Common test utilities for transaction-service integration tests.

use std::path::PathBuf;
use std::sync::Once;
use transaction_service::config::{Config, DatabaseConfig, GatewayConfig, ServerConfig};
use transaction_service::startup::Application;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,transaction_service=debug,sqlx=warn")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

pub fn test_config(gateway_base_url: &str, secret_in_query: bool) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        gateway: GatewayConfig {
            base_url: gateway_base_url.to_string(),
            secret_in_query,
            secret_header: "x-secret-key".to_string(),
            timeout_secs: 5,
        },
        service_name: "transaction-service".to_string(),
        log_level: "debug".to_string(),
        otlp_endpoint: None,
        static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static"),
    }
}

impl TestApp {
    /// Spawn an app whose gateway points nowhere.
    pub async fn spawn() -> Self {
        Self::spawn_with(test_config("http://127.0.0.1:1", false)).await
    }

    pub async fn spawn_with(config: Config) -> Self {
        init_tracing();

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        Self::launch(app).await
    }

    /// Spawn an app whose `transactions` table has been dropped, so every
    /// store query fails.
    pub async fn spawn_with_broken_store() -> Self {
        init_tracing();

        let app = Application::build(test_config("http://127.0.0.1:1", false))
            .await
            .expect("Failed to build test application");

        sqlx::query("DROP TABLE transactions")
            .execute(app.state().repository.pool())
            .await
            .expect("Failed to drop transactions table");

        Self::launch(app).await
    }

    async fn launch(app: Application) -> Self {
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until(std::future::pending()).await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
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
            port,
            client,
        }
    }

    pub async fn post_json(&self, path: &str, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn transactions(&self) -> Vec<serde_json::Value> {
        self.get("/transactions")
            .await
            .json()
            .await
            .expect("Failed to parse transactions")
    }
}
