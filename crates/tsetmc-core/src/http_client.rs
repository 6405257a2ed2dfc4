use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

/// HTTP GET request envelope used by the fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    /// Query parameters in the order they are appended to the URL.
    pub query: Vec<(String, String)>,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            timeout: Duration::from_secs(4),
        }
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Value of the first query parameter called `name`.
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Full URL with percent-encoded query string.
    pub fn full_url(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }

        let query = self
            .query
            .iter()
            .map(|(name, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(name),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&");
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{separator}{query}", self.url)
    }
}

/// HTTP response envelope returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub const fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Transport failure category; only timeouts and connection failures are transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpErrorKind {
    Timeout,
    Connect,
    Other,
}

/// Transport-level HTTP error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    kind: HttpErrorKind,
    message: String,
}

impl HttpError {
    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: HttpErrorKind::Timeout,
            message: message.into(),
        }
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self {
            kind: HttpErrorKind::Connect,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self {
            kind: HttpErrorKind::Other,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> HttpErrorKind {
        self.kind
    }

    pub const fn retryable(&self) -> bool {
        matches!(self.kind, HttpErrorKind::Timeout | HttpErrorKind::Connect)
    }
}

impl Display for HttpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HttpError {}

/// Blocking transport contract. Implementations must be shareable across worker threads.
pub trait HttpClient: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

impl<T: HttpClient + ?Sized> HttpClient for Arc<T> {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        (**self).execute(request)
    }
}

/// Production HTTP client on top of `reqwest::blocking`.
///
/// Must not be created or dropped from inside an async runtime context.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::blocking::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Result<Self, HttpError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("tsetmc/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| HttpError::other(format!("failed to build http client: {error}")))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let response = self
            .client
            .get(&request.url)
            .query(&request.query)
            .timeout(request.timeout)
            .send()
            .map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(map_reqwest_error)?;

        Ok(HttpResponse { status, body })
    }
}

/// Timeouts are `Timeout`. Any I/O failure while sending the request or reading the
/// body is `Connect`, whether the connection was refused or dropped after it was
/// established. Builder, URL and redirect failures are `Other`.
fn map_reqwest_error(error: reqwest::Error) -> HttpError {
    if error.is_timeout() {
        HttpError::timeout(format!("request timeout: {error}"))
    } else if error.is_connect() || error.is_request() || error.is_body() {
        HttpError::connect(format!("connection failed: {error}"))
    } else {
        HttpError::other(format!("request failed: {error}"))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;
    use std::net::{TcpListener, TcpStream};

    use super::*;

    #[test]
    fn full_url_appends_encoded_query_in_order() {
        let request = HttpRequest::get("http://tsetmc.com/Loader.aspx")
            .with_query("ParTree", "151311")
            .with_query("i", "123 456");

        assert_eq!(
            request.full_url(),
            "http://tsetmc.com/Loader.aspx?ParTree=151311&i=123%20456"
        );
        assert_eq!(request.query_value("i"), Some("123 456"));
        assert_eq!(request.query_value("c"), None);
    }

    #[test]
    fn only_timeouts_and_connect_failures_are_retryable() {
        assert!(HttpError::timeout("t").retryable());
        assert!(HttpError::connect("c").retryable());
        assert!(!HttpError::other("o").retryable());
    }

    /// Accepts one connection, reads the request head and closes the socket unanswered.
    fn hang_up_once() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
        let address = listener.local_addr().expect("local address");
        std::thread::spawn(move || {
            if let Ok((stream, _)) = listener.accept() {
                read_request_head(stream);
            }
        });
        format!("http://{address}/tsev2/data/instinfodata.aspx")
    }

    fn read_request_head(mut stream: TcpStream) {
        let mut head = Vec::new();
        let mut buffer = [0_u8; 512];
        while !head.windows(4).any(|window| window == b"\r\n\r\n") {
            match stream.read(&mut buffer) {
                Ok(0) | Err(_) => break,
                Ok(read) => head.extend_from_slice(&buffer[..read]),
            }
        }
    }

    #[test]
    fn connection_dropped_after_connect_is_a_connect_failure() {
        let client = ReqwestHttpClient::new().expect("client builds");
        let request = HttpRequest::get(hang_up_once()).with_timeout(Duration::from_secs(5));

        let error = client.execute(request).expect_err("server hung up");

        assert_eq!(error.kind(), HttpErrorKind::Connect);
        assert!(error.retryable());
    }

    #[test]
    fn refused_connection_is_a_connect_failure() {
        let address = {
            let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
            listener.local_addr().expect("local address")
        };
        let client = ReqwestHttpClient::new().expect("client builds");

        let error = client
            .execute(HttpRequest::get(format!("http://{address}/")).with_timeout(Duration::from_secs(5)))
            .expect_err("nothing listens");

        assert_eq!(error.kind(), HttpErrorKind::Connect);
    }

    #[test]
    fn malformed_url_is_not_retryable() {
        let client = ReqwestHttpClient::new().expect("client builds");
        let error = client
            .execute(HttpRequest::get("not a url"))
            .expect_err("invalid url");

        assert_eq!(error.kind(), HttpErrorKind::Other);
    }
}
