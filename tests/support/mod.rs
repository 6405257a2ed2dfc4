//! Shared fakes and page builders for the behavior tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tsetmc_core::{
    ClientConfig, HttpClient, HttpError, HttpRequest, HttpResponse, InsCode, RetryPolicy,
    TseClient,
};

mod pages;

pub use pages::*;

pub const INS_CODE: &str = "46348559193224090";
pub const SECTOR_CODE: &str = "27";

/// Which upstream page a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Static,
    Identity,
    Live,
}

impl Page {
    fn of(request: &HttpRequest) -> Option<Self> {
        if request.url.ends_with("/tsev2/data/instinfodata.aspx") {
            return Some(Self::Live);
        }
        match (request.query_value("ParTree"), request.query_value("Partree")) {
            (Some("151311"), _) => Some(Self::Static),
            (_, Some("15131M")) => Some(Self::Identity),
            _ => None,
        }
    }
}

/// In-memory transport answering each page from its own script.
///
/// Responses are consumed in order; the last one is repeated once a script runs dry.
#[derive(Default)]
pub struct ScriptedHttpClient {
    scripts: Mutex<HashMap<Page, VecDeque<Result<HttpResponse, HttpError>>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script(&self, page: Page, responses: Vec<Result<HttpResponse, HttpError>>) {
        self.scripts.lock().entry(page).or_default().extend(responses);
    }

    pub fn serve(&self, page: Page, body: impl Into<String>) {
        self.script(page, vec![Ok(HttpResponse::ok(body))]);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn requests_to(&self, page: Page) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|request| Page::of(request) == Some(page))
            .collect()
    }

    pub fn pages(&self) -> Vec<Option<Page>> {
        self.requests().iter().map(Page::of).collect()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let page = Page::of(&request);
        self.requests.lock().push(request);

        let Some(page) = page else {
            return Err(HttpError::other("unscripted url"));
        };
        let mut scripts = self.scripts.lock();
        let Some(script) = scripts.get_mut(&page) else {
            return Err(HttpError::other(format!("no script for {page:?}")));
        };
        match script.len() {
            0 => Err(HttpError::other(format!("script for {page:?} is empty"))),
            1 => script.front().cloned().unwrap_or_else(|| Err(HttpError::other("empty"))),
            _ => script.pop_front().unwrap_or_else(|| Err(HttpError::other("empty"))),
        }
    }
}

pub fn config() -> ClientConfig {
    ClientConfig::default()
        .with_retry(RetryPolicy::immediate())
        .with_static_retry(3, Duration::ZERO)
}

pub fn client(http: &Arc<ScriptedHttpClient>) -> TseClient {
    TseClient::new(config(), http.clone())
}

pub fn ins_code() -> InsCode {
    InsCode::parse(INS_CODE).expect("valid code")
}

/// Scripts a healthy static page pair.
pub fn serve_static(http: &ScriptedHttpClient, assignments: &[(&str, &str)]) {
    http.serve(Page::Static, static_page(assignments));
    http.serve(Page::Identity, identity_page());
}
