use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use serde::Serialize;
use tera::{Context, Tera};
use url::Url;

use crate::aggregate::Page;
use crate::comment::Comment;
use crate::error::{CommenterError, UrlError};

/// Name ends in `.html` so Tera auto-escapes every interpolation.
const TEMPLATE_NAME: &str = "comments.html";
const TEMPLATE: &str = include_str!("templates/comments.html");

/// Base for page URLs given as bare paths such as `/foo`.
const RELATIVE_BASE: &str = "http://localhost/";

/// Derive the output file name for a page from its URL's path.
///
/// Only single-segment paths are supported: `https://example.com/foo` and
/// `/foo` both map to `foo`, while `/`, `/a/b` and `/a/` are rejected.
/// The path is percent-decoded first, so `/caf%C3%A9` maps to `café` and an
/// encoded `%2F` counts as a separator.
pub fn page_file_name(raw_url: &str) -> Result<String, UrlError> {
    let url = parse_page_url(raw_url).map_err(|source| UrlError::Invalid {
        url: raw_url.to_owned(),
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(UrlError::NoPath {
            url: raw_url.to_owned(),
        });
    }

    let path = match percent_decode_str(url.path()).decode_utf8() {
        Ok(path) if !path.contains('\0') => path,
        _ => {
            return Err(UrlError::UndecodablePath {
                url: raw_url.to_owned(),
            })
        }
    };
    let name = path.strip_prefix('/').unwrap_or(&path);
    if name.is_empty() {
        return Err(UrlError::NoPath {
            url: raw_url.to_owned(),
        });
    }
    if name.contains('/') {
        return Err(UrlError::TooManySegments {
            url: raw_url.to_owned(),
        });
    }
    Ok(name.to_owned())
}

fn parse_page_url(raw_url: &str) -> Result<Url, url::ParseError> {
    match Url::parse(raw_url) {
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(RELATIVE_BASE)?.join(raw_url),
        other => other,
    }
}

#[derive(Serialize)]
struct CommentView<'a> {
    name: &'a str,
    time: String,
    text: &'a str,
}

impl<'a> From<&'a Comment> for CommentView<'a> {
    fn from(comment: &'a Comment) -> Self {
        Self {
            name: &comment.name,
            time: comment.time.to_string(),
            text: &comment.text,
        }
    }
}

/// Renders comment lists into HTML fragments.
#[derive(Debug)]
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    pub fn new() -> Result<Self, CommenterError> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;
        Ok(Self { tera })
    }

    /// Render `comments`, in the order given, as an HTML fragment.
    pub fn render(&self, comments: &[Comment]) -> Result<String, CommenterError> {
        let views: Vec<CommentView<'_>> = comments.iter().map(CommentView::from).collect();
        let mut context = Context::new();
        context.insert("comments", &views);
        Ok(self.tera.render(TEMPLATE_NAME, &context)?)
    }

    /// Render `page` and write it to `path`, replacing any existing file.
    ///
    /// Nothing is written if rendering fails.
    pub fn write_page(&self, path: &Path, page: &Page) -> Result<WrittenPage, CommenterError> {
        let html = self.render(&page.comments)?;
        fs::write(path, html).map_err(|source| CommenterError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(
            path = %path.display(),
            url = %page.url,
            comments = page.comments.len(),
            "wrote page"
        );
        Ok(WrittenPage {
            path: path.to_path_buf(),
            url: page.url.clone(),
            comments: page.comments.len(),
        })
    }
}

/// Result of writing one page's fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenPage {
    pub path: PathBuf,
    pub url: String,
    /// Number of comments rendered.
    pub comments: usize,
}

impl fmt::Display for WrittenPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Wrote {} ({} comments)", self.path.display(), self.comments)
    }
}
