use axum::http::HeaderValue;
use axum::Router;
use log_monitor_backend::infrastructure::config::{Config, Environment, LogFormat};
use log_monitor_backend::infrastructure::http::{create_app, AppState};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;

pub mod log_capture;

use api_client::TestClient;

static UPLOAD_DIRS: AtomicUsize = AtomicUsize::new(0);

pub struct TestContext {
    pub client: TestClient,
    pub config: Arc<Config>,
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async { Self::with_config(test_config(Environment::Development)).await }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async move {
            let _ = std::fs::remove_dir_all(&self.config.upload_dir);
        }
    }
}

impl TestContext {
    /// Serve the real application with the given configuration
    pub async fn with_config(config: Config) -> Self {
        let config = Arc::new(config);
        let app = create_app(AppState::new(config.clone()));
        let client = serve(app).await;

        Self { client, config }
    }
}

/// Start a server for `app` on an OS-assigned port and return a client for it
pub async fn serve(app: Router) -> TestClient {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to get local addr");
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestClient::new(&base_url)
}

pub fn test_config(environment: Environment) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0, // Will be assigned by the OS
        environment,
        log_format: LogFormat::Pretty,
        cors_origin: HeaderValue::from_static("http://localhost:5173"),
        upload_dir: fresh_upload_dir(),
        uploads_prefix: "/uploads".to_string(),
        body_limit_bytes: 10 * 1024 * 1024,
    }
}

/// Empty uploads directory unique to this test
pub fn fresh_upload_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "log-monitor-uploads-{}-{}",
        std::process::id(),
        UPLOAD_DIRS.fetch_add(1, Ordering::SeqCst)
    ));
    std::fs::create_dir_all(&dir).expect("Failed to create uploads dir");
    dir
}
