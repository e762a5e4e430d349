//! Static HTML comment fragments from a Maildir of comment notifications.
//!
//! Each mail in the Maildir carries one comment as a JSON notification in its
//! body. `commenter` parses every mail, groups the comments by the page URL
//! they were left on, and writes one HTML fragment per page for a static site
//! generator to include.
//!
//! # Quick start
//!
//! ```no_run
//! use commenter::{generate, Config};
//!
//! let config = Config::new("/var/mail/comments", "site/comments");
//! for page in generate(&config).unwrap() {
//!     println!("{page}");
//! }
//! ```
//!
//! [`generate_with`] reports each page as soon as it is on disk, so a caller
//! still sees the pages written before a failed write.
//!
//! The pipeline stops at the first bad message or URL; no partial output is
//! produced for URL problems because every output name is derived before the
//! first write.

mod aggregate;
mod comment;
mod error;
mod message;
mod render;
mod walk;

pub use aggregate::{CommentIndex, Page};
pub use comment::{Comment, Field};
pub use error::{CommenterError, MessageError, MissingField, UrlError};
pub use message::{parse_message, parse_notification, read_comment};
pub use render::{page_file_name, Renderer, WrittenPage};
pub use walk::Maildir;

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Where to read mail from and where to write fragments to.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Root of the Maildir holding comment notifications.
    pub maildir: PathBuf,
    /// Directory receiving one HTML fragment per page. Created if missing.
    pub html_dir: PathBuf,
}

impl Config {
    pub fn new(maildir: impl Into<PathBuf>, html_dir: impl Into<PathBuf>) -> Self {
        Self {
            maildir: maildir.into(),
            html_dir: html_dir.into(),
        }
    }
}

/// Read every comment under `config.maildir` and write one fragment per page
/// into `config.html_dir`.
///
/// Returns the written pages in URL order.
pub fn generate(config: &Config) -> Result<Vec<WrittenPage>, CommenterError> {
    generate_with(config, |_| {})
}

/// Like [`generate`], calling `on_written` right after each page is written.
pub fn generate_with(
    config: &Config,
    on_written: impl FnMut(&WrittenPage),
) -> Result<Vec<WrittenPage>, CommenterError> {
    let index = Maildir::open(&config.maildir)?.comments()?;
    tracing::debug!(
        pages = index.len(),
        comments = index.comment_count(),
        "collected comments"
    );
    write_pages(index, config, on_written)
}

/// Write one fragment per page of `index` into `config.html_dir`, calling
/// `on_written` after each successful write.
pub fn write_pages(
    index: CommentIndex,
    config: &Config,
    mut on_written: impl FnMut(&WrittenPage),
) -> Result<Vec<WrittenPage>, CommenterError> {
    let renderer = Renderer::new()?;

    let mut targets: Vec<(PathBuf, Page)> = Vec::with_capacity(index.len());
    let mut seen: HashMap<String, String> = HashMap::new();
    for page in index.into_pages() {
        let name = page_file_name(&page.url)?;
        if let Some(previous) = seen.insert(name.clone(), page.url.clone()) {
            tracing::warn!(
                file = %name,
                previous = %previous,
                url = %page.url,
                "two page URLs share an output file; the later one wins"
            );
        }
        targets.push((config.html_dir.join(name), page));
    }

    if !targets.is_empty() {
        fs::create_dir_all(&config.html_dir).map_err(|source| CommenterError::Write {
            path: config.html_dir.clone(),
            source,
        })?;
    }

    let mut written = Vec::with_capacity(targets.len());
    for (path, page) in &targets {
        let page = renderer.write_page(path, page)?;
        on_written(&page);
        written.push(page);
    }
    Ok(written)
}
