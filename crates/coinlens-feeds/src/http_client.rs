use std::collections::{BTreeMap, VecDeque};
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};

/// Header-based authentication applied to outgoing requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpAuth {
    None,
    Header { name: String, value: String },
}

impl HttpAuth {
    pub fn apply(&self, headers: &mut BTreeMap<String, String>) {
        match self {
            Self::None => {}
            Self::Header { name, value } => {
                headers.insert(name.to_ascii_lowercase(), value.clone());
            }
        }
    }
}

/// GET request issued by a feed adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub timeout_ms: u64,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
            timeout_ms: 10_000,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_auth(mut self, auth: &HttpAuth) -> Self {
        auth.apply(&mut self.headers);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok_json(body: impl Into<String>) -> Self {
        Self::with_status(200, body)
    }

    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Transport-level HTTP error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    message: String,
    retryable: bool,
    timed_out: bool,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: true,
            timed_out: false,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: true,
            timed_out: true,
        }
    }

    pub fn non_retryable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: false,
            timed_out: false,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn timed_out(&self) -> bool {
        self.timed_out
    }
}

impl Display for HttpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HttpError {}

/// Async transport used by every feed adapter.
pub trait HttpClient: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;
}

/// Production client backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Arc<reqwest::Client>,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: Arc::new(
                reqwest::Client::builder()
                    .user_agent(concat!("coinlens/", env!("CARGO_PKG_VERSION")))
                    .build()
                    .unwrap_or_else(|_| reqwest::Client::new()),
            ),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            let mut builder = self
                .client
                .get(&request.url)
                .timeout(std::time::Duration::from_millis(request.timeout_ms));
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }

            let response = builder.send().await.map_err(|e| {
                if e.is_timeout() {
                    HttpError::timeout(format!("request timeout: {e}"))
                } else if e.is_connect() {
                    HttpError::new(format!("connection failed: {e}"))
                } else if e.is_builder() {
                    HttpError::non_retryable(format!("invalid request: {e}"))
                } else {
                    HttpError::new(format!("request failed: {e}"))
                }
            })?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| HttpError::new(format!("failed to read response body: {e}")))?;

            Ok(HttpResponse { status, body })
        })
    }
}

type Scripted = Result<HttpResponse, HttpError>;

/// Serves canned responses for URLs containing a registered pattern.
///
/// Each route replays its queue in order and keeps repeating the last
/// entry. Requests matching no route get a 404. Every request is recorded.
#[derive(Debug, Default)]
pub struct FixtureHttpClient {
    routes: Mutex<Vec<(String, VecDeque<Scripted>)>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FixtureHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a route that always answers `200` with `body`.
    pub fn with_json(self, pattern: impl Into<String>, body: impl Into<String>) -> Self {
        self.with_sequence(pattern, vec![Ok(HttpResponse::ok_json(body))])
    }

    pub fn with_sequence(self, pattern: impl Into<String>, responses: Vec<Scripted>) -> Self {
        lock(&self.routes).push((pattern.into(), responses.into()));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    pub fn request_count(&self, pattern: &str) -> usize {
        lock(&self.requests)
            .iter()
            .filter(|request| request.url.contains(pattern))
            .count()
    }

    fn respond(&self, request: HttpRequest) -> Scripted {
        let mut routes = lock(&self.routes);
        let reply = routes
            .iter_mut()
            .find(|(pattern, _)| request.url.contains(pattern.as_str()))
            .and_then(|(_, queue)| {
                if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                }
            });
        drop(routes);

        lock(&self.requests).push(request);
        reply.unwrap_or_else(|| Ok(HttpResponse::with_status(404, "{}")))
    }
}

impl HttpClient for FixtureHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let reply = self.respond(request);
        Box::pin(async move { reply })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_auth_is_lowercased() {
        let request = HttpRequest::get("https://example.test/price").with_auth(&HttpAuth::Header {
            name: String::from("X-CG-Demo-API-Key"),
            value: String::from("demo"),
        });

        assert_eq!(
            request.headers.get("x-cg-demo-api-key").map(String::as_str),
            Some("demo")
        );
    }

    #[tokio::test]
    async fn fixture_replays_sequence_then_repeats_last() {
        let client = FixtureHttpClient::new().with_sequence(
            "/fng/",
            vec![
                Ok(HttpResponse::with_status(503, "")),
                Ok(HttpResponse::ok_json("{\"ok\":true}")),
            ],
        );

        let statuses = [
            client.execute(HttpRequest::get("https://x/fng/")).await,
            client.execute(HttpRequest::get("https://x/fng/")).await,
            client.execute(HttpRequest::get("https://x/fng/")).await,
        ]
        .map(|reply| reply.map(|response| response.status).unwrap_or(0));

        assert_eq!(statuses, [503, 200, 200]);
        assert_eq!(client.request_count("/fng/"), 3);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let client = FixtureHttpClient::new();
        let response = client
            .execute(HttpRequest::get("https://x/unknown"))
            .await
            .expect("fixture never fails transport");
        assert_eq!(response.status, 404);
    }
}
