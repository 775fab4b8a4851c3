//! Fantia HTTP client.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::cookie::Jar;
use reqwest::{Client, Response};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::error::{Error, Result};
use crate::output::create_download_bar;

/// Path of the private JSON API below the platform root.
const API_PATH: &str = "api/v1";

/// Name of the cookie carrying the logged-in session.
const SESSION_COOKIE: &str = "_session_id";

/// Minimum file size to show progress bar (20 MB).
const PROGRESS_THRESHOLD: u64 = 20 * 1024 * 1024;

/// URL layout of the platform.
#[derive(Debug, Clone)]
pub struct Endpoints {
    root: Url,
}

impl Endpoints {
    /// Build endpoints below `base_url` (e.g. `https://fantia.jp/`).
    pub fn new(base_url: &str) -> Result<Self> {
        let mut root = Url::parse(base_url)?;
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }
        Ok(Self { root })
    }

    /// Platform root URL.
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// Listing page `page` (1-based) of a fan club's posts.
    pub fn listing_page(&self, fan_club_id: &str, page: u32) -> Result<Url> {
        let mut url = self.root.join(&format!("fanclubs/{}/posts", fan_club_id))?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    /// JSON API URL for a post link such as `/posts/123`.
    pub fn post_api(&self, post_path: &str) -> Result<Url> {
        let post = self.root.join(post_path)?;
        let mut api = self.root.join(API_PATH)?;
        let relative = post
            .path()
            .strip_prefix(self.root.path())
            .unwrap_or_else(|| post.path().trim_start_matches('/'));
        let path = format!("{}/{}", api.path().trim_end_matches('/'), relative);
        api.set_path(&path);
        Ok(api)
    }

    /// Resolve a platform-relative path (or pass an absolute URL through).
    pub fn resolve(&self, reference: &str) -> Result<Url> {
        Ok(self.root.join(reference)?)
    }
}

/// Authenticated GET access to the platform.
///
/// Every request carries the session cookie and the configured user agent.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch a page or API response as text.
    async fn get_text(&self, url: &Url) -> Result<String>;

    /// Fetch `url` and write the body to `dest`. Returns the number of bytes written.
    async fn download_to(&self, url: &Url, dest: &Path) -> Result<u64>;
}

/// reqwest-backed [`Fetcher`].
pub struct FantiaClient {
    client: Client,
    show_progress: bool,
}

impl FantiaClient {
    /// Create a client whose cookie jar holds the session for `root`.
    pub fn new(session_id: &str, user_agent: &str, root: &Url, show_progress: bool) -> Result<Self> {
        let jar = Jar::default();
        jar.add_cookie_str(&format!("{}={}", SESSION_COOKIE, session_id), root);

        let client = Client::builder()
            .user_agent(user_agent)
            .cookie_provider(Arc::new(jar))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            show_progress,
        })
    }

    /// Make an authenticated GET request, rejecting non-success statuses.
    async fn get(&self, url: &Url) -> Result<Response> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    async fn stream_to_file(&self, response: Response, dest: &Path) -> Result<u64> {
        let content_length = response.content_length();
        let progress = if self.show_progress
            && content_length.map(|l| l > PROGRESS_THRESHOLD).unwrap_or(false)
        {
            Some(create_download_bar(content_length.unwrap_or(0)))
        } else {
            None
        };

        let mut file = File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;

            if let Some(ref pb) = progress {
                pb.set_position(downloaded);
            }
        }

        file.flush().await?;

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        Ok(downloaded)
    }
}

#[async_trait]
impl Fetcher for FantiaClient {
    async fn get_text(&self, url: &Url) -> Result<String> {
        let response = self.get(url).await?;
        Ok(response.text().await?)
    }

    async fn download_to(&self, url: &Url, dest: &Path) -> Result<u64> {
        let response = self.get(url).await?;

        match self.stream_to_file(response, dest).await {
            Ok(written) => Ok(written),
            Err(e) => {
                // Don't leave a truncated file behind.
                if e.is_transient() {
                    let _ = tokio::fs::remove_file(dest).await;
                }
                Err(e)
            }
        }
    }
}
