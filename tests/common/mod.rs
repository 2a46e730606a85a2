use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Form, Json, Router};
use reqwest::Client;
use serde_json::{json, Value};

use contact_relay::config::{Config, MailConfig};

pub const TENANT: &str = "test-tenant";
pub const SENDER: &str = "website@example.com";
pub const RECIPIENT: &str = "sales@example.com";
pub const ACCESS_TOKEN: &str = "mock-access-token";

/// How the mock identity/mail provider should answer.
#[derive(Clone, Copy)]
pub struct ProviderBehavior {
    pub token_status: StatusCode,
    pub send_status: StatusCode,
    /// When false, a successful token response carries a non-JSON body.
    pub token_json: bool,
}

impl Default for ProviderBehavior {
    fn default() -> Self {
        Self {
            token_status: StatusCode::OK,
            send_status: StatusCode::ACCEPTED,
            token_json: true,
        }
    }
}

/// A captured `sendMail` call.
#[derive(Clone, Debug)]
pub struct SentMail {
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Default)]
pub struct Recorded {
    pub token_requests: Vec<HashMap<String, String>>,
    pub sent: Vec<SentMail>,
}

#[derive(Clone)]
struct ProviderState {
    behavior: ProviderBehavior,
    recorded: Arc<Mutex<Recorded>>,
}

/// A running test server instance backed by a mock mail provider.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    recorded: Arc<Mutex<Recorded>>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Submit JSON to the contact endpoint, return (body, status).
    pub async fn submit_json(&self, data: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/contact"))
            .json(data)
            .send()
            .await
            .expect("submit json failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Submit form-urlencoded data to the contact endpoint, return (body, status).
    pub async fn submit_form(&self, data: &[(&str, &str)]) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/contact"))
            .form(data)
            .send()
            .await
            .expect("submit form failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Submit a raw body with an explicit content type.
    pub async fn submit_raw(&self, content_type: &str, body: &'static str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/contact"))
            .header("content-type", content_type)
            .body(body)
            .send()
            .await
            .expect("submit raw failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub fn token_requests(&self) -> Vec<HashMap<String, String>> {
        self.recorded.lock().unwrap().token_requests.clone()
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.recorded.lock().unwrap().sent.clone()
    }
}

/// Map numeric entities onto their named spelling so assertions don't
/// depend on which form the template escaper picks.
pub fn named_entities(html: &str) -> String {
    html.replace("&#60;", "&lt;")
        .replace("&#62;", "&gt;")
        .replace("&#38;", "&amp;")
        .replace("&#34;", "&quot;")
        .replace("&#x27;", "&#39;")
}

pub fn valid_submission() -> Value {
    json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "company": "Analytical Engines",
        "interests": ["consulting", "training"],
        "message": "I'd like to hear more.",
        "honeypot": "",
    })
}

async fn token(
    State(state): State<ProviderState>,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    state.recorded.lock().unwrap().token_requests.push(params);

    let status = state.behavior.token_status;
    if !status.is_success() {
        return (status, Json(json!({ "error": "invalid_client" }))).into_response();
    }
    if !state.behavior.token_json {
        return (status, "not json").into_response();
    }

    (
        status,
        Json(json!({
            "token_type": "Bearer",
            "expires_in": 3599,
            "access_token": ACCESS_TOKEN,
        })),
    )
        .into_response()
}

async fn send_mail(
    State(state): State<ProviderState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    state
        .recorded
        .lock()
        .unwrap()
        .sent
        .push(SentMail { authorization, body });

    state.behavior.send_status
}

async fn spawn_provider(behavior: ProviderBehavior) -> (SocketAddr, Arc<Mutex<Recorded>>) {
    let recorded = Arc::new(Mutex::new(Recorded::default()));
    let state = ProviderState {
        behavior,
        recorded: recorded.clone(),
    };

    let router = Router::new()
        .route(&format!("/{TENANT}/oauth2/v2.0/token"), post(token))
        .route(&format!("/v1.0/users/{SENDER}/sendMail"), post(send_mail))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock provider");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Mock provider failed");
    });

    (addr, recorded)
}

pub fn test_config(provider: SocketAddr) -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        max_body_size: 16 * 1024,
        allowed_origin: "https://www.example.com".to_string(),
        trusted_proxies: vec![],
        honeypot_field: "honeypot".to_string(),
        rate_limit: 0,
        rate_limit_window_secs: 600,
        http_timeout_secs: 5,
        log_level: "warn".to_string(),
        mail: MailConfig {
            tenant_id: TENANT.to_string(),
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            sender: SENDER.to_string(),
            recipient: RECIPIENT.to_string(),
            authority_url: format!("http://{provider}"),
            api_url: format!("http://{provider}"),
        },
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(ProviderBehavior::default(), |_| {}).await
}

/// Spawn the app against a mock provider, letting the caller tweak config.
pub async fn spawn_app_with(
    behavior: ProviderBehavior,
    configure: impl FnOnce(&mut Config),
) -> TestApp {
    let (provider, recorded) = spawn_provider(behavior).await;

    let mut config = test_config(provider);
    configure(&mut config);

    let state = contact_relay::build_state(config).expect("Failed to build state");
    let app = contact_relay::build_app(state);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        recorded,
    }
}
