use std::collections::BTreeMap;

use crate::comment::Comment;

/// Comments grouped by the page URL they were left on.
///
/// URLs are compared verbatim. Nothing is deduplicated: two messages
/// carrying the same ID are both kept.
#[derive(Debug, Clone, Default)]
pub struct CommentIndex {
    pages: BTreeMap<String, Vec<Comment>>,
}

/// All comments for one page, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub url: String,
    pub comments: Vec<Comment>,
}

impl CommentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a comment to its page's group.
    pub fn insert(&mut self, comment: Comment) {
        self.pages
            .entry(comment.url.clone())
            .or_default()
            .push(comment);
    }

    /// Append every group of `other` onto this index.
    pub fn merge(&mut self, other: CommentIndex) {
        for (url, comments) in other.pages {
            self.pages.entry(url).or_default().extend(comments);
        }
    }

    /// Number of distinct pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Number of comments across all pages.
    pub fn comment_count(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    /// Comments for `url` in insertion order.
    pub fn get(&self, url: &str) -> Option<&[Comment]> {
        self.pages.get(url).map(Vec::as_slice)
    }

    /// Consume the index, yielding pages in URL order with each page's
    /// comments sorted by time and then ID.
    pub fn into_pages(self) -> Vec<Page> {
        self.pages
            .into_iter()
            .map(|(url, mut comments)| {
                comments.sort_by(Comment::cmp_chronological);
                Page { url, comments }
            })
            .collect()
    }
}

impl Extend<Comment> for CommentIndex {
    fn extend<I: IntoIterator<Item = Comment>>(&mut self, iter: I) {
        for comment in iter {
            self.insert(comment);
        }
    }
}

impl FromIterator<Comment> for CommentIndex {
    fn from_iter<I: IntoIterator<Item = Comment>>(iter: I) -> Self {
        let mut index = Self::new();
        index.extend(iter);
        index
    }
}
