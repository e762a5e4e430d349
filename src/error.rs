use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::comment::Field;

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum CommenterError {
    #[error("unable to open maildir {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("unable to walk maildir: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("unable to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: {source}", .path.display())]
    Message {
        path: PathBuf,
        #[source]
        source: MessageError,
    },
    #[error(transparent)]
    Url(#[from] UrlError),
    #[error("unable to render comments: {0}")]
    Template(#[from] tera::Error),
    #[error("unable to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors turning one mail message into a comment.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("unable to parse mail: {0}")]
    Parse(#[source] mailparse::MailParseError),
    #[error("unable to parse mail: no header found")]
    NoHeaders,
    #[error("unable to parse mail: malformed header line: {0:?}")]
    MalformedHeader(String),
    #[error("unable to read body: {0}")]
    Body(#[source] mailparse::MailParseError),
    #[error("unable to decode JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid IP found in message: {value}")]
    InvalidIp {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid unixtime: {value}: {source}")]
    InvalidTime {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("unixtime out of range: {0}")]
    TimeOutOfRange(i64),
    #[error("invalid comment: {0}")]
    InvalidComment(#[from] MissingField),
}

impl MessageError {
    /// The attribute this error is about, if it concerns a single field.
    pub fn field(&self) -> Option<Field> {
        match self {
            Self::InvalidIp { .. } => Some(Field::Ip),
            Self::InvalidTime { .. } | Self::TimeOutOfRange(_) => Some(Field::Time),
            Self::InvalidComment(MissingField(field)) => Some(*field),
            Self::Parse(_)
            | Self::NoHeaders
            | Self::MalformedHeader(_)
            | Self::Body(_)
            | Self::Decode(_) => None,
        }
    }
}

/// A required attribute was absent or empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("missing {0}")]
pub struct MissingField(pub Field);

/// Errors deriving an output file name from a page URL.
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("invalid URL: {url}: {source}")]
    Invalid {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("path is not valid UTF-8 or contains NUL once decoded: {url}")]
    UndecodablePath { url: String },
    #[error("no path found in URL: {url}")]
    NoPath { url: String },
    #[error("unexpected path, too many '/' characters: {url}")]
    TooManySegments { url: String },
}
