//! API response type definitions.

use serde::Deserialize;

/// Response of `GET {api_root}/posts/{id}`.
#[derive(Debug, Deserialize)]
pub struct PostResponse {
    pub post: Post,
}

/// A single fan club post.
#[derive(Debug, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub post_contents: Vec<PostContent>,
}

/// One content block of a post. Every field is optional; a block holds
/// photos, a file, or something this tool does not download.
#[derive(Debug, Default, Deserialize)]
pub struct PostContent {
    #[serde(default)]
    pub post_content_photos: Option<Vec<PostContentPhoto>>,
    #[serde(default)]
    pub download_uri: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

/// A photo entry inside a content block.
#[derive(Debug, Deserialize)]
pub struct PostContentPhoto {
    /// Path of the viewer page that embeds the original image.
    pub show_original_uri: Option<String>,
}
