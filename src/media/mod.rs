//! Media module for content item representation and parsing.

pub mod item;
pub mod parser;

pub use item::{ContentItem, FileNumbers};
pub use parser::{
    file_items, parse_listing_page, parse_original_image_src, parse_post_response,
    photo_viewer_paths, ListingPage,
};
