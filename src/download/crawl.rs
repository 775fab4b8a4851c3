//! Listing crawl and post resolution.

use crate::api::{Endpoints, Fetcher};
use crate::config::ContentMode;
use crate::download::state::DownloadState;
use crate::download::worklist::Worklist;
use crate::error::{Error, Result};
use crate::media::{
    file_items, parse_listing_page, parse_original_image_src, parse_post_response,
    photo_viewer_paths, ContentItem, ListingPage,
};

/// Crawl settings for one fan club.
#[derive(Debug, Clone, Copy)]
pub struct CrawlOptions<'a> {
    pub fan_club_id: &'a str,
    pub mode: ContentMode,
    /// Pages to visit; 0 uses the count advertised on page 1.
    pub max_page: u32,
}

/// Crawl listing pages 1..N and resolve every post found into one worklist.
///
/// A listing page that cannot be fetched aborts the crawl; problems with a
/// single post only cost that post's items.
pub async fn crawl_fan_club(
    fetcher: &dyn Fetcher,
    endpoints: &Endpoints,
    options: CrawlOptions<'_>,
    state: &mut DownloadState,
) -> Result<Worklist> {
    let mut worklist = Worklist::new();

    let first = fetch_listing_page(fetcher, endpoints, options.fan_club_id, 1).await?;
    let page_count = if options.max_page > 0 {
        options.max_page
    } else {
        first.page_count()
    };

    let mut first = Some(first);
    for page_number in 1..=page_count {
        let log_message = format!("page {}/{} parse ", page_number, page_count);
        tracing::info!("{}start.", log_message);

        let listing = match first.take() {
            Some(listing) => listing,
            None => {
                fetch_listing_page(fetcher, endpoints, options.fan_club_id, page_number).await?
            }
        };
        state.pages_scanned += 1;

        let posts_count = listing.post_urls.len();
        for (i, post_url) in listing.post_urls.iter().enumerate() {
            let items = resolve_post(fetcher, endpoints, post_url, options.mode).await;
            state.posts_resolved += 1;
            state.items_planned += items.len() as u64;
            worklist.extend(items);
            tracing::info!("post {}/{}: [{}] parse end.", i + 1, posts_count, post_url);
        }

        tracing::info!("{}end.", log_message);
    }

    Ok(worklist)
}

async fn fetch_listing_page(
    fetcher: &dyn Fetcher,
    endpoints: &Endpoints,
    fan_club_id: &str,
    page_number: u32,
) -> Result<ListingPage> {
    let url = endpoints.listing_page(fan_club_id, page_number)?;
    let html = fetcher.get_text(&url).await?;
    Ok(parse_listing_page(&html))
}

/// Resolve one post into content items.
///
/// Never fails: a post whose API response cannot be fetched or understood
/// yields no items, with a warning.
pub async fn resolve_post(
    fetcher: &dyn Fetcher,
    endpoints: &Endpoints,
    post_url: &str,
    mode: ContentMode,
) -> Vec<ContentItem> {
    match try_resolve_post(fetcher, endpoints, post_url, mode).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!("Skipping post {}: {}", post_url, e);
            Vec::new()
        }
    }
}

async fn try_resolve_post(
    fetcher: &dyn Fetcher,
    endpoints: &Endpoints,
    post_url: &str,
    mode: ContentMode,
) -> Result<Vec<ContentItem>> {
    let api_url = endpoints.post_api(post_url)?;
    let body = fetcher.get_text(&api_url).await?;
    let response = parse_post_response(&body)?;

    match mode {
        ContentMode::File => Ok(file_items(&response)),
        ContentMode::Photo => {
            let mut items = Vec::new();
            for viewer_path in photo_viewer_paths(&response) {
                match resolve_photo(fetcher, endpoints, &viewer_path).await {
                    Ok(item) => items.push(item),
                    Err(e) => tracing::warn!("Skipping photo {}: {}", viewer_path, e),
                }
            }
            Ok(items)
        }
    }
}

/// The listing JSON only references a viewer page; the asset URL is the
/// first image on that page.
async fn resolve_photo(
    fetcher: &dyn Fetcher,
    endpoints: &Endpoints,
    viewer_path: &str,
) -> Result<ContentItem> {
    let viewer_url = endpoints.resolve(viewer_path)?;
    let html = fetcher.get_text(&viewer_url).await?;
    let src = parse_original_image_src(&html)
        .ok_or_else(|| Error::MalformedResponse(format!("no image in {}", viewer_url)))?;
    let source = endpoints.resolve(&src)?;
    Ok(ContentItem::photo(source.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeFetcher;

    const ROOT: &str = "https://fantia.jp/";

    fn listing(posts: &[&str], last_page: Option<u32>) -> String {
        let mut html = String::from("<html><body>");
        for post in posts {
            html.push_str(&format!(r#"<a class="link-block" href="{}">post</a>"#, post));
        }
        if let Some(last) = last_page {
            for page in 1..=last {
                html.push_str(&format!(
                    r#"<a class="page-link" href="/fanclubs/7/posts?page={}">{}</a>"#,
                    page, page
                ));
            }
        }
        html.push_str("</body></html>");
        html
    }

    fn page_url(page: u32) -> String {
        format!("https://fantia.jp/fanclubs/7/posts?page={}", page)
    }

    fn options(mode: ContentMode, max_page: u32) -> CrawlOptions<'static> {
        CrawlOptions {
            fan_club_id: "7",
            mode,
            max_page,
        }
    }

    #[tokio::test]
    async fn test_visits_each_advertised_page_once_in_order() {
        let fetcher = FakeFetcher::new()
            .with_text(&page_url(1), &listing(&[], Some(3)))
            // Later pages advertise a different pager; it is ignored.
            .with_text(&page_url(2), &listing(&[], Some(9)))
            .with_text(&page_url(3), &listing(&[], None));
        let endpoints = Endpoints::new(ROOT).unwrap();
        let mut state = DownloadState::default();

        let worklist = crawl_fan_club(&fetcher, &endpoints, options(ContentMode::File, 0), &mut state)
            .await
            .unwrap();

        assert!(worklist.is_empty());
        assert_eq!(fetcher.requests(), vec![page_url(1), page_url(2), page_url(3)]);
        assert_eq!(state.pages_scanned, 3);
    }

    #[tokio::test]
    async fn test_single_page_listing() {
        let fetcher = FakeFetcher::new().with_text(&page_url(1), &listing(&[], None));
        let endpoints = Endpoints::new(ROOT).unwrap();
        let mut state = DownloadState::default();

        crawl_fan_club(&fetcher, &endpoints, options(ContentMode::Photo, 0), &mut state)
            .await
            .unwrap();
        assert_eq!(fetcher.requests(), vec![page_url(1)]);
    }

    #[tokio::test]
    async fn test_override_ignores_pager() {
        let fetcher = FakeFetcher::new()
            .with_text(&page_url(1), &listing(&[], Some(5)))
            .with_text(&page_url(2), &listing(&[], Some(5)));
        let endpoints = Endpoints::new(ROOT).unwrap();
        let mut state = DownloadState::default();

        crawl_fan_club(&fetcher, &endpoints, options(ContentMode::File, 2), &mut state)
            .await
            .unwrap();
        assert_eq!(fetcher.requests(), vec![page_url(1), page_url(2)]);
    }

    #[tokio::test]
    async fn test_listing_failure_is_fatal() {
        let fetcher = FakeFetcher::new()
            .with_text(&page_url(1), &listing(&[], Some(2)))
            .with_status(&page_url(2), 500);
        let endpoints = Endpoints::new(ROOT).unwrap();
        let mut state = DownloadState::default();

        let result =
            crawl_fan_club(&fetcher, &endpoints, options(ContentMode::File, 0), &mut state).await;
        assert!(matches!(result, Err(Error::HttpStatus { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_photo_mode_resolves_viewer_pages() {
        let fetcher = FakeFetcher::new()
            .with_text(&page_url(1), &listing(&["/posts/10"], None))
            .with_text(
                "https://fantia.jp/api/v1/posts/10",
                r#"{"post": {"post_contents": [
                    {"post_content_photos": [
                        {"show_original_uri": "/posts/10/post_content_photo/1"},
                        {"show_original_uri": "/posts/10/post_content_photo/2"},
                        {"show_original_uri": "/posts/10/post_content_photo/3"}
                    ]}
                ]}}"#,
            )
            .with_text(
                "https://fantia.jp/posts/10/post_content_photo/1",
                r#"<img src="https://cc.fantia.jp/uploads/1/one.jpg">"#,
            )
            .with_text(
                "https://fantia.jp/posts/10/post_content_photo/2",
                r#"<p>expired</p>"#,
            )
            .with_text(
                "https://fantia.jp/posts/10/post_content_photo/3",
                r#"<img src="/uploads/3/three.png"><img src="/other.png">"#,
            );
        let endpoints = Endpoints::new(ROOT).unwrap();
        let mut state = DownloadState::default();

        let worklist = crawl_fan_club(&fetcher, &endpoints, options(ContentMode::Photo, 0), &mut state)
            .await
            .unwrap();

        assert_eq!(
            worklist.into_items(),
            vec![
                ContentItem::photo("https://cc.fantia.jp/uploads/1/one.jpg"),
                ContentItem::photo("https://fantia.jp/uploads/3/three.png"),
            ]
        );
        assert_eq!(state.items_planned, 2);
    }

    #[tokio::test]
    async fn test_bad_post_does_not_stop_crawl() {
        let fetcher = FakeFetcher::new()
            .with_text(&page_url(1), &listing(&["/posts/1", "/posts/2", "/posts/3"], None))
            .with_text("https://fantia.jp/api/v1/posts/1", "<html>maintenance</html>")
            .with_status("https://fantia.jp/api/v1/posts/2", 503)
            .with_text(
                "https://fantia.jp/api/v1/posts/3",
                r#"{"post": {"post_contents": [
                    {"download_uri": "/posts/3/post_content_file/30", "filename": "a.mp4"}
                ]}}"#,
            );
        let endpoints = Endpoints::new(ROOT).unwrap();
        let mut state = DownloadState::default();

        let worklist = crawl_fan_club(&fetcher, &endpoints, options(ContentMode::File, 0), &mut state)
            .await
            .unwrap();

        assert_eq!(
            worklist.into_items(),
            vec![ContentItem::file("/posts/3/post_content_file/30", "a.mp4")]
        );
        assert_eq!(state.posts_resolved, 3);
    }

    #[tokio::test]
    async fn test_duplicate_posts_resolved_each_time() {
        let post = r#"{"post": {"post_contents": [
            {"download_uri": "/posts/4/post_content_file/40", "filename": "b.png"}
        ]}}"#;
        let fetcher = FakeFetcher::new()
            .with_text(&page_url(1), &listing(&["/posts/4"], Some(2)))
            .with_text(&page_url(2), &listing(&["/posts/4"], None))
            .with_text("https://fantia.jp/api/v1/posts/4", post);
        let endpoints = Endpoints::new(ROOT).unwrap();
        let mut state = DownloadState::default();

        let worklist = crawl_fan_club(&fetcher, &endpoints, options(ContentMode::File, 0), &mut state)
            .await
            .unwrap();
        assert_eq!(worklist.len(), 2);
    }
}
