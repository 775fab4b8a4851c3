//! In-memory [`Fetcher`] for tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use url::Url;

use crate::api::Fetcher;
use crate::error::{Error, Result};

enum Canned {
    Text(String),
    Bytes(Vec<u8>),
    Status(u16),
}

/// Serves canned responses keyed by full URL and records every request.
/// Unknown URLs answer 404.
#[derive(Default)]
pub struct FakeFetcher {
    responses: HashMap<String, Canned>,
    requests: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, url: &str, body: &str) -> Self {
        self.responses
            .insert(url.to_string(), Canned::Text(body.to_string()));
        self
    }

    pub fn with_bytes(mut self, url: &str, body: &[u8]) -> Self {
        self.responses
            .insert(url.to_string(), Canned::Bytes(body.to_vec()));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(url.to_string(), Canned::Status(status));
        self
    }

    /// Requested URLs, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn lookup(&self, url: &Url) -> Result<&Canned> {
        self.requests.lock().unwrap().push(url.to_string());
        match self.responses.get(url.as_str()) {
            Some(Canned::Status(status)) => Err(Error::HttpStatus {
                url: url.to_string(),
                status: *status,
            }),
            Some(canned) => Ok(canned),
            None => Err(Error::HttpStatus {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn get_text(&self, url: &Url) -> Result<String> {
        match self.lookup(url)? {
            Canned::Text(body) => Ok(body.clone()),
            Canned::Bytes(body) => Ok(String::from_utf8_lossy(body).into_owned()),
            Canned::Status(_) => unreachable!(),
        }
    }

    async fn download_to(&self, url: &Url, dest: &Path) -> Result<u64> {
        let body = match self.lookup(url)? {
            Canned::Text(body) => body.as_bytes().to_vec(),
            Canned::Bytes(body) => body.clone(),
            Canned::Status(_) => unreachable!(),
        };
        tokio::fs::write(dest, &body).await?;
        Ok(body.len() as u64)
    }
}
