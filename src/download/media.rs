//! Worklist downloading.

use std::path::PathBuf;
use std::time::Duration;

use tokio::time::sleep;

use crate::api::{Endpoints, Fetcher};
use crate::download::state::DownloadState;
use crate::download::worklist::Worklist;
use crate::error::{Error, Result};
use crate::fs::{sanitize_filename, ExtensionDenylist, OutputLayout};
use crate::media::item::{is_archive_extension, photo_file_name, FileNumbers};
use crate::media::ContentItem;

/// Sequential, paced downloader.
pub struct Downloader<'a> {
    fetcher: &'a dyn Fetcher,
    endpoints: &'a Endpoints,
    layout: &'a OutputLayout,
    denylist: &'a ExtensionDenylist,
    interval: Duration,
}

impl<'a> Downloader<'a> {
    pub fn new(
        fetcher: &'a dyn Fetcher,
        endpoints: &'a Endpoints,
        layout: &'a OutputLayout,
        denylist: &'a ExtensionDenylist,
        interval: Duration,
    ) -> Self {
        Self {
            fetcher,
            endpoints,
            layout,
            denylist,
            interval,
        }
    }

    /// Download every item in order, waiting `interval` before each one.
    ///
    /// A failed fetch or an item with an unusable path is logged and skipped;
    /// filesystem errors abort.
    pub async fn download_worklist(
        &self,
        worklist: &Worklist,
        state: &mut DownloadState,
    ) -> Result<()> {
        self.layout.create_all()?;

        for item in worklist {
            sleep(self.interval).await;

            match self.download_item(item).await {
                Ok(Some((path, bytes))) => {
                    state.record_download(bytes);
                    tracing::info!("download {}", path.display());
                }
                Ok(None) => {
                    state.increment_denied();
                    tracing::debug!("Skipping denied item: {}", item.uri());
                }
                Err(e) if is_item_error(&e) => {
                    state.increment_failed();
                    tracing::warn!("Failed to download {}: {}", item.uri(), e);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }

    /// Download one item. Returns `None` when its extension is denied.
    pub async fn download_item(&self, item: &ContentItem) -> Result<Option<(PathBuf, u64)>> {
        let (url, dest) = match item {
            ContentItem::Photo { source_uri } => {
                let name = sanitize_filename(&photo_file_name(source_uri)?)?;
                (
                    self.endpoints.resolve(source_uri)?,
                    self.layout.fan_club_dir().join(name),
                )
            }
            ContentItem::File {
                download_uri,
                filename,
                extension,
            } => {
                if self.denylist.denies(extension) {
                    return Ok(None);
                }

                let numbers = FileNumbers::from_download_uri(download_uri)?;
                let dest = if is_archive_extension(extension) {
                    self.layout.staging_dir().join(numbers.archive_name())
                } else {
                    let name = sanitize_filename(&numbers.file_name(filename))?;
                    self.layout.fan_club_dir().join(name)
                };
                (self.endpoints.resolve(download_uri)?, dest)
            }
        };

        let bytes = self.fetcher.download_to(&url, &dest).await?;
        Ok(Some((dest, bytes)))
    }
}

/// Errors that only cost the current item.
fn is_item_error(e: &Error) -> bool {
    e.is_transient()
        || matches!(
            e,
            Error::MalformedResponse(_) | Error::InvalidFilename(_) | Error::UrlParse(_)
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeFetcher;

    struct Fixture {
        _dir: tempfile::TempDir,
        layout: OutputLayout,
        endpoints: Endpoints,
        denylist: ExtensionDenylist,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path().join("1096"));
        Fixture {
            _dir: dir,
            layout,
            endpoints: Endpoints::new("https://fantia.jp/").unwrap(),
            denylist: ExtensionDenylist::new([".psd", ".txt"]),
        }
    }

    fn worklist(items: Vec<ContentItem>) -> Worklist {
        let mut worklist = Worklist::new();
        worklist.extend(items);
        worklist
    }

    #[tokio::test]
    async fn test_file_routes() {
        let fx = fixture();
        let fetcher = FakeFetcher::new()
            .with_bytes("https://fantia.jp/posts/123/post_content_file/456", b"zip")
            .with_bytes("https://fantia.jp/posts/123/post_content_file/457", b"png");
        let downloader = Downloader::new(&fetcher, &fx.endpoints, &fx.layout, &fx.denylist, Duration::ZERO);
        let mut state = DownloadState::default();

        let items = worklist(vec![
            ContentItem::file("/posts/123/post_content_file/456", "pic.zip"),
            ContentItem::file("/posts/123/post_content_file/457", "pic.png"),
        ]);
        downloader.download_worklist(&items, &mut state).await.unwrap();

        assert_eq!(
            std::fs::read(fx.layout.staging_dir().join("123_456.zip")).unwrap(),
            b"zip"
        );
        assert_eq!(
            std::fs::read(fx.layout.fan_club_dir().join("123_457_pic.png")).unwrap(),
            b"png"
        );
        assert_eq!(state.downloaded, 2);
        assert_eq!(state.bytes_downloaded, 6);
    }

    #[tokio::test]
    async fn test_denied_extension_has_no_io() {
        let fx = fixture();
        let fetcher = FakeFetcher::new();
        let downloader = Downloader::new(&fetcher, &fx.endpoints, &fx.layout, &fx.denylist, Duration::ZERO);
        let mut state = DownloadState::default();

        let items = worklist(vec![
            ContentItem::file("/posts/1/post_content_file/2", "layers.psd"),
            ContentItem::file("/posts/1/post_content_file/3", "NOTES.TXT"),
        ]);
        downloader.download_worklist(&items, &mut state).await.unwrap();

        assert!(fetcher.requests().is_empty());
        assert_eq!(state.denied, 2);
        assert_eq!(
            std::fs::read_dir(fx.layout.fan_club_dir())
                .unwrap()
                .filter(|e| e.as_ref().unwrap().path().is_file())
                .count(),
            0
        );
    }

    #[tokio::test]
    async fn test_failures_do_not_abort_worklist() {
        let fx = fixture();
        let fetcher = FakeFetcher::new()
            .with_status("https://cc.fantia.jp/uploads/a.jpg", 500)
            .with_bytes("https://cc.fantia.jp/uploads/c.jpg", b"c");
        let downloader = Downloader::new(&fetcher, &fx.endpoints, &fx.layout, &fx.denylist, Duration::ZERO);
        let mut state = DownloadState::default();

        let items = worklist(vec![
            ContentItem::photo("https://cc.fantia.jp/uploads/a.jpg"),
            ContentItem::file("/broken", "x.png"),
            ContentItem::photo("https://cc.fantia.jp/uploads/c.jpg"),
        ]);
        downloader.download_worklist(&items, &mut state).await.unwrap();

        assert_eq!(state.failed, 2);
        assert_eq!(state.downloaded, 1);
        assert!(fx.layout.fan_club_dir().join("c.jpg").is_file());
        assert!(!fx.layout.fan_club_dir().join("a.jpg").exists());
    }

    #[tokio::test]
    async fn test_interval_applies_before_every_item() {
        let fx = fixture();
        let fetcher = FakeFetcher::new();
        let downloader = Downloader::new(
            &fetcher,
            &fx.endpoints,
            &fx.layout,
            &fx.denylist,
            Duration::from_millis(30),
        );
        let mut state = DownloadState::default();

        let items = worklist(vec![
            ContentItem::file("/posts/1/post_content_file/2", "a.psd"),
            ContentItem::file("/posts/1/post_content_file/3", "b.psd"),
        ]);

        let started = std::time::Instant::now();
        downloader.download_worklist(&items, &mut state).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(60));
    }
}
