//! Markup and API response parsing.

use scraper::{Html, Selector};

use crate::api::types::PostResponse;
use crate::error::{Error, Result};
use crate::media::item::ContentItem;

/// Anchors linking to a post on a listing page.
const POST_LINK_SELECTOR: &str = "a.link-block";

/// Anchors of the listing pager.
const PAGE_LINK_SELECTOR: &str = "a.page-link";

/// What one listing page yields.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListingPage {
    /// Post links in listing order.
    pub post_urls: Vec<String>,
    /// Highest page number advertised by the pager, if any pager link parsed.
    pub last_page: Option<u32>,
}

impl ListingPage {
    /// Advertised page count, defaulting to a single page.
    pub fn page_count(&self) -> u32 {
        self.last_page.unwrap_or(1)
    }
}

/// Extract post links and the pager's last page from listing markup.
///
/// Anchors without an `href`, or pager links without a numeric `page`
/// parameter, are skipped.
pub fn parse_listing_page(html: &str) -> ListingPage {
    let doc = Html::parse_document(html);

    let post_selector = Selector::parse(POST_LINK_SELECTOR).unwrap();
    let post_urls = doc
        .select(&post_selector)
        .filter_map(|e| e.value().attr("href"))
        .map(|s| s.to_string())
        .collect::<Vec<String>>();

    let page_selector = Selector::parse(PAGE_LINK_SELECTOR).unwrap();
    let last_page = doc
        .select(&page_selector)
        .filter_map(|e| e.value().attr("href"))
        .filter_map(page_parameter)
        .max();

    tracing::debug!(
        "Listing page: {} post links, last page {:?}",
        post_urls.len(),
        last_page
    );

    ListingPage {
        post_urls,
        last_page,
    }
}

/// Read the `page` query parameter of a pager link.
fn page_parameter(href: &str) -> Option<u32> {
    let (_, query) = href.split_once('?')?;
    let query = query.split('#').next().unwrap_or(query);
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "page")
        .and_then(|(_, value)| value.parse().ok())
}

/// Extract the `src` of the first image in a photo viewer fragment.
pub fn parse_original_image_src(html: &str) -> Option<String> {
    let doc = Html::parse_fragment(html);
    let img_selector = Selector::parse("img").unwrap();

    doc.select(&img_selector)
        .find_map(|e| e.value().attr("src"))
        .map(|s| s.to_string())
}

/// Parse a post API response body.
pub fn parse_post_response(body: &str) -> Result<PostResponse> {
    serde_json::from_str(body).map_err(|e| Error::MalformedResponse(format!("post JSON: {}", e)))
}

/// Viewer page paths of every photo in a post, in content and entry order.
pub fn photo_viewer_paths(response: &PostResponse) -> Vec<String> {
    response
        .post
        .post_contents
        .iter()
        .filter_map(|content| content.post_content_photos.as_ref())
        .flatten()
        .filter_map(|photo| photo.show_original_uri.clone())
        .collect()
}

/// File items of a post, in content order.
///
/// Blocks lacking either a download path or a filename carry no file.
pub fn file_items(response: &PostResponse) -> Vec<ContentItem> {
    response
        .post
        .post_contents
        .iter()
        .filter_map(|content| match (&content.download_uri, &content.filename) {
            (Some(uri), Some(filename)) if !uri.is_empty() && !filename.is_empty() => {
                Some(ContentItem::file(uri.as_str(), filename.as_str()))
            }
            _ => None,
        })
        .collect()
}
