//! Content item representation.

use url::Url;

use crate::error::{Error, Result};

/// Extension routed to the archive staging directory.
pub const ARCHIVE_EXTENSION: &str = ".zip";

/// A resolved download target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentItem {
    /// A fully resolved original-image URL.
    Photo { source_uri: String },
    /// A platform-relative download path with its declared filename.
    File {
        download_uri: String,
        filename: String,
        /// Extension of `filename`, including the leading dot (may be empty).
        extension: String,
    },
}

impl ContentItem {
    /// Create a photo item.
    pub fn photo(source_uri: impl Into<String>) -> Self {
        ContentItem::Photo {
            source_uri: source_uri.into(),
        }
    }

    /// Create a file item, splitting the extension off `filename`.
    pub fn file(download_uri: impl Into<String>, filename: impl Into<String>) -> Self {
        let filename = filename.into();
        let extension = split_extension(&filename).to_string();
        ContentItem::File {
            download_uri: download_uri.into(),
            filename,
            extension,
        }
    }

    /// The URI this item is fetched from, as the platform reported it.
    pub fn uri(&self) -> &str {
        match self {
            ContentItem::Photo { source_uri } => source_uri,
            ContentItem::File { download_uri, .. } => download_uri,
        }
    }
}

/// Return the extension of the last path component, dot included.
///
/// Leading dots of a hidden file name do not count as an extension.
pub fn split_extension(filename: &str) -> &str {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let stem_start = base.len() - base.trim_start_matches('.').len();
    match base[stem_start..].rfind('.') {
        Some(pos) => &base[stem_start + pos..],
        None => "",
    }
}

/// Whether `extension` routes to the archive staging directory.
pub fn is_archive_extension(extension: &str) -> bool {
    extension.eq_ignore_ascii_case(ARCHIVE_EXTENSION)
}

/// Post and file numbers encoded in a download path.
///
/// The platform serves files from `/posts/{post}/post_content_file/{file}`;
/// the numbers sit at fixed positions of the `/`-split path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNumbers {
    pub post: String,
    pub file: String,
}

impl FileNumbers {
    const POST_SEGMENT: usize = 2;
    const FILE_SEGMENT: usize = 4;

    /// Extract the numbers from a download path.
    pub fn from_download_uri(download_uri: &str) -> Result<Self> {
        let segments: Vec<&str> = download_uri.split('/').collect();

        let segment = |index: usize| -> Result<String> {
            match segments.get(index) {
                Some(s) if !s.is_empty() => Ok((*s).to_string()),
                _ => Err(Error::MalformedResponse(format!(
                    "download path '{}' has no segment {}",
                    download_uri, index
                ))),
            }
        };

        Ok(Self {
            post: segment(Self::POST_SEGMENT)?,
            file: segment(Self::FILE_SEGMENT)?,
        })
    }

    /// Staging name of an archive: `{post}_{file}.zip`.
    pub fn archive_name(&self) -> String {
        format!("{}_{}{}", self.post, self.file, ARCHIVE_EXTENSION)
    }

    /// Output name of a non-archive file: `{post}_{file}_{filename}`.
    pub fn file_name(&self, filename: &str) -> String {
        format!("{}_{}_{}", self.post, self.file, filename)
    }
}

/// Output name of a photo: the last path segment of its URL.
pub fn photo_file_name(source_uri: &str) -> Result<String> {
    let url = Url::parse(source_uri)?;
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            Error::MalformedResponse(format!("image URL has no file name: {}", source_uri))
        })
}
