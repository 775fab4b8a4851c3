//! Ordered download worklist.

use crate::media::ContentItem;

/// Resolved content in discovery order.
///
/// Items are only appended: page ascending, then listing order within a page,
/// then content order within a post. No deduplication takes place.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Worklist {
    items: Vec<ContentItem>,
}

impl Worklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContentItem> {
        self.items.iter()
    }

    pub fn into_items(self) -> Vec<ContentItem> {
        self.items
    }
}

impl Extend<ContentItem> for Worklist {
    fn extend<T: IntoIterator<Item = ContentItem>>(&mut self, iter: T) {
        self.items.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Worklist {
    type Item = &'a ContentItem;
    type IntoIter = std::slice::Iter<'a, ContentItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
