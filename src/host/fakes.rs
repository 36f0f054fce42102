//! In-process fakes of the host capabilities for unit tests

use super::{FetchRequest, FetchResponse, Fetcher};
use crate::error::{Error, Result};
use crate::types::JsonValue;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Mutex;

type QueryHandler = Box<dyn Fn(&str) -> JsonValue + Send + Sync>;

enum Route {
    Json(JsonValue),
    Binary(Bytes),
    Status(u16),
}

/// Routes requests by URL suffix and records every request it sees
#[derive(Default)]
pub(crate) struct FakeFetcher {
    routes: Vec<(String, Route)>,
    query_handler: Option<QueryHandler>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl FakeFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn json(mut self, suffix: &str, body: JsonValue) -> Self {
        self.routes.push((suffix.to_string(), Route::Json(body)));
        self
    }

    pub(crate) fn binary(mut self, suffix: &str, body: &'static [u8]) -> Self {
        self.routes
            .push((suffix.to_string(), Route::Binary(Bytes::from_static(body))));
        self
    }

    pub(crate) fn status(mut self, suffix: &str, status: u16) -> Self {
        self.routes.push((suffix.to_string(), Route::Status(status)));
        self
    }

    /// Answer `/query` requests by calling `handler` with the query text
    pub(crate) fn on_query(
        mut self,
        handler: impl Fn(&str) -> JsonValue + Send + Sync + 'static,
    ) -> Self {
        self.query_handler = Some(Box::new(handler));
        self
    }

    pub(crate) fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn requests_to(&self, suffix: &str) -> Vec<FetchRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.ends_with(suffix))
            .collect()
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse> {
        self.requests.lock().unwrap().push(request.clone());

        if request.url.ends_with("/query") {
            if let Some(handler) = &self.query_handler {
                let query = request.query_value("query").unwrap_or_default();
                return Ok(FetchResponse::Json(handler(query)));
            }
        }

        for (suffix, route) in &self.routes {
            if request.url.ends_with(suffix.as_str()) {
                return match route {
                    Route::Json(body) => Ok(FetchResponse::Json(body.clone())),
                    Route::Binary(body) => Ok(FetchResponse::Binary(body.clone())),
                    Route::Status(status) => Err(Error::http_status(*status, "fake failure")),
                };
            }
        }

        Err(Error::http_status(404, format!("no fake route for {}", request.url)))
    }
}

/// `(startposition, maxresults)` from a query string
pub(crate) fn paging_of(query: &str) -> (u32, u32) {
    let value_after = |keyword: &str| {
        let tokens: Vec<&str> = query.split_whitespace().collect();
        tokens
            .iter()
            .position(|t| t.eq_ignore_ascii_case(keyword))
            .and_then(|i| tokens.get(i + 1))
            .and_then(|t| t.parse().ok())
            .unwrap_or(0)
    };
    (value_after("startposition"), value_after("maxresults"))
}
