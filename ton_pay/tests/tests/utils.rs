use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::IntoResponse;
use log::LevelFilter;
use log4rs::Config;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Root};
use std::sync::{Arc, Mutex, Once};
use tokio::net::TcpListener;

static LOG: Once = Once::new();

pub fn init_logging() {
    LOG.call_once(|| {
        let stderr = ConsoleAppender::builder()
            .target(Target::Stderr)
            .encoder(Box::new(log4rs::encode::pattern::PatternEncoder::new(
                "{d(%Y-%m-%d %H:%M:%S%.6f)} {T:>15.15} {h({l:>5.5})} {t}:{L} - {m}{n}",
            )))
            .build();

        let config = Config::builder()
            .appender(Appender::builder().build("stderr", Box::new(stderr)))
            .build(Root::builder().appender("stderr").build(LevelFilter::Debug))
            .unwrap();

        log4rs::init_config(config).unwrap();
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// `METHOD /path?query`
    pub target: String,
    pub api_key: Option<String>,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    body: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// axum server answering every request with one canned JSON response
pub struct MockHttpServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpServer {
    pub async fn start(status: u16, body: &str) -> anyhow::Result<Self> {
        let requests = Arc::new(Mutex::new(vec![]));
        let state = MockState {
            status: StatusCode::from_u16(status)?,
            body: body.to_string(),
            requests: requests.clone(),
        };
        let app = Router::new().fallback(canned_response).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);
        tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                log::error!("mock server stopped: {err}");
            }
        });
        Ok(Self { base_url, requests })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> { self.requests.lock().unwrap().clone() }
}

async fn canned_response(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> impl IntoResponse {
    let api_key = headers.get("x-api-key").and_then(|value| value.to_str().ok()).map(str::to_string);
    state.requests.lock().unwrap().push(RecordedRequest {
        target: format!("{method} {uri}"),
        api_key,
    });
    (state.status, [(header::CONTENT_TYPE, "application/json")], state.body)
}
