//! Canned [`AnalyticsSource`] for unit tests

use super::category::DisasterCategory;
use super::client::{AnalyticsSource, Endpoint};
use super::error::{ApiError, ApiResult};
use crate::range::QueryString;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum Canned {
    Body(String),
    Status(u16),
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub endpoint: Endpoint,
    pub category: Option<DisasterCategory>,
    pub query: QueryString,
}

type Key = (Endpoint, Option<DisasterCategory>);

/// Answers by (endpoint, category); unknown keys are unavailable
#[derive(Default)]
pub struct StaticSource {
    responses: Mutex<HashMap<Key, Canned>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(self, endpoint: Endpoint, category: Option<DisasterCategory>, body: &str) -> Self {
        self.set_body(endpoint, category, body);
        self
    }

    pub fn status(self, endpoint: Endpoint, category: Option<DisasterCategory>, status: u16) -> Self {
        self.set(endpoint, category, Canned::Status(status));
        self
    }

    pub fn set_body(&self, endpoint: Endpoint, category: Option<DisasterCategory>, body: &str) {
        self.set(endpoint, category, Canned::Body(body.to_string()));
    }

    pub fn set_unavailable(&self, endpoint: Endpoint, category: Option<DisasterCategory>) {
        self.set(endpoint, category, Canned::Unavailable);
    }

    fn set(&self, endpoint: Endpoint, category: Option<DisasterCategory>, canned: Canned) {
        self.responses.lock().unwrap().insert((endpoint, category), canned);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalyticsSource for StaticSource {
    async fn get_text(
        &self,
        endpoint: Endpoint,
        params: &[(&str, String)],
        query: &QueryString,
    ) -> ApiResult<String> {
        let category = params
            .iter()
            .find(|(key, _)| *key == "disaster_type")
            .and_then(|(_, value)| value.parse().ok());

        self.calls.lock().unwrap().push(RecordedCall {
            endpoint,
            category,
            query: query.clone(),
        });

        let canned = self.responses.lock().unwrap().get(&(endpoint, category)).cloned();
        match canned {
            Some(Canned::Body(body)) => Ok(body),
            Some(Canned::Status(status)) => Err(ApiError::Status {
                status,
                message: String::new(),
            }),
            Some(Canned::Unavailable) | None => Err(ApiError::Unavailable),
        }
    }
}
