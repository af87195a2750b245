#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use gas_client::{Settings, Transport, TransportError, WireFields};
use serde::de::DeserializeOwned;
use tokio::sync::Barrier;

/// Records every request and answers GETs from a queue of canned bodies.
#[derive(Default)]
pub struct MockTransport {
    posts: Mutex<Vec<WireFields>>,
    gets: Mutex<Vec<WireFields>>,
    responses: Mutex<VecDeque<Result<String, TransportError>>>,
    post_failure: Mutex<Option<TransportError>>,
    post_barrier: Option<Arc<Barrier>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every POST waits until `parties` POSTs are in flight at once.
    pub fn with_post_barrier(parties: usize) -> Self {
        Self {
            post_barrier: Some(Arc::new(Barrier::new(parties))),
            ..Self::default()
        }
    }

    pub fn respond_with(&self, body: &str) {
        self.responses.lock().unwrap().push_back(Ok(body.to_string()));
    }

    pub fn fail_next_get(&self, err: TransportError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn fail_posts(&self, err: TransportError) {
        *self.post_failure.lock().unwrap() = Some(err);
    }

    pub fn posts(&self) -> Vec<WireFields> {
        self.posts.lock().unwrap().clone()
    }

    pub fn gets(&self) -> Vec<WireFields> {
        self.gets.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    async fn post_form(&self, fields: &[(String, String)]) -> Result<(), TransportError> {
        if let Some(barrier) = &self.post_barrier {
            barrier.wait().await;
        }

        self.posts.lock().unwrap().push(fields.to_vec());

        match self.post_failure.lock().unwrap().as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn get_json<R>(&self, query: &[(String, String)]) -> Result<R, TransportError>
    where
        R: DeserializeOwned + Send,
    {
        self.gets.lock().unwrap().push(query.to_vec());

        let next = self.responses.lock().unwrap().pop_front();
        let body = next.unwrap_or_else(|| {
            Err(TransportError::Network("no canned response".to_string()))
        })?;

        Ok(serde_json::from_str(&body)?)
    }
}

pub fn test_settings() -> Settings {
    Settings::new("test-deploy", "test-token", "test-sheet-id")
}

pub fn field<'a>(fields: &'a WireFields, name: &str) -> Option<&'a str> {
    fields
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

pub fn as_pairs(fields: &WireFields) -> Vec<(&str, &str)> {
    fields.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
}
