//! Mail message → [`Comment`].
//!
//! Each message body is a JSON notification whose fields are wrapped the
//! way the upstream notification service wraps message attributes:
//!
//! ```json
//! {"MessageAttributes": {"Name": {"Type": "String", "Value": "Alice"}, ...}}
//! ```

use std::fs;
use std::net::IpAddr;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::comment::{Comment, Field};
use crate::error::{CommenterError, MessageError, MissingField};

#[derive(Debug, Deserialize)]
struct Notification {
    #[serde(rename = "MessageAttributes", default)]
    message_attributes: MessageAttributes,
}

#[derive(Debug, Default, Deserialize)]
struct MessageAttributes {
    #[serde(rename = "Name")]
    name: Option<Attribute>,
    #[serde(rename = "Email")]
    email: Option<Attribute>,
    #[serde(rename = "Text")]
    text: Option<Attribute>,
    #[serde(rename = "URL")]
    url: Option<Attribute>,
    #[serde(rename = "IP")]
    ip: Option<Attribute>,
    #[serde(rename = "UserAgent")]
    user_agent: Option<Attribute>,
    #[serde(rename = "Time")]
    time: Option<Attribute>,
    #[serde(rename = "ID")]
    id: Option<Attribute>,
}

#[derive(Debug, Deserialize)]
struct Attribute {
    #[serde(rename = "Value")]
    value: Option<String>,
}

impl MessageAttributes {
    fn get(&self, field: Field) -> Option<&str> {
        let attribute = match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Text => &self.text,
            Field::Url => &self.url,
            Field::Ip => &self.ip,
            Field::UserAgent => &self.user_agent,
            Field::Time => &self.time,
            Field::Id => &self.id,
        };
        attribute
            .as_ref()
            .and_then(|a| a.value.as_deref())
            .filter(|value| !value.is_empty())
    }

    fn require(&self, field: Field) -> Result<&str, MissingField> {
        self.get(field).ok_or(MissingField(field))
    }
}

/// Read the mail at `path` and decode its comment.
pub fn read_comment(path: &Path) -> Result<Comment, CommenterError> {
    let raw = fs::read(path).map_err(|source| CommenterError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_message(&raw).map_err(|source| CommenterError::Message {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a raw mail message (headers + body) and decode its comment.
///
/// The header block must hold at least one `Key: value` field and nothing
/// else but folded continuation lines.
pub fn parse_message(raw: &[u8]) -> Result<Comment, MessageError> {
    check_header_block(raw)?;
    let mail = mailparse::parse_mail(raw).map_err(MessageError::Parse)?;
    let body = mail.get_body_raw().map_err(MessageError::Body)?;
    parse_notification(&body)
}

fn check_header_block(raw: &[u8]) -> Result<(), MessageError> {
    let mut fields = 0;
    for line in raw.split(|&b| b == b'\n') {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.is_empty() {
            break;
        }
        if matches!(line[0], b' ' | b'\t') && fields > 0 {
            continue;
        }
        let key = match line.iter().position(|&b| b == b':') {
            Some(colon) => &line[..colon],
            None => &[][..],
        };
        if key.is_empty() || !key.iter().copied().all(is_token_byte) {
            return Err(MessageError::MalformedHeader(
                String::from_utf8_lossy(line).into_owned(),
            ));
        }
        fields += 1;
    }
    if fields == 0 {
        return Err(MessageError::NoHeaders);
    }
    Ok(())
}

/// Header names are RFC 7230 tokens.
fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

/// Decode a notification JSON body into a validated comment.
pub fn parse_notification(body: &[u8]) -> Result<Comment, MessageError> {
    let notification: Notification = serde_json::from_slice(body)?;
    let attrs = &notification.message_attributes;

    let name = attrs.require(Field::Name)?;
    let email = attrs.require(Field::Email)?;
    let text = attrs.require(Field::Text)?;
    let url = attrs.require(Field::Url)?;
    let ip = parse_ip(attrs.require(Field::Ip)?)?;
    let user_agent = attrs.require(Field::UserAgent)?;
    let time = parse_time(attrs.require(Field::Time)?)?;
    let id = attrs.require(Field::Id)?;

    Ok(Comment {
        name: name.to_owned(),
        email: email.to_owned(),
        text: text.to_owned(),
        url: url.to_owned(),
        ip,
        user_agent: user_agent.to_owned(),
        time,
        id: id.to_owned(),
    })
}

fn parse_ip(value: &str) -> Result<IpAddr, MessageError> {
    value.parse().map_err(|source| MessageError::InvalidIp {
        value: value.to_owned(),
        source,
    })
}

/// Milliseconds since the epoch, truncated to whole seconds.
fn parse_time(value: &str) -> Result<DateTime<Utc>, MessageError> {
    let millis: i64 = value.parse().map_err(|source| MessageError::InvalidTime {
        value: value.to_owned(),
        source,
    })?;
    let secs = millis / 1000;
    if secs == 0 {
        return Err(MissingField(Field::Time).into());
    }
    DateTime::from_timestamp(secs, 0).ok_or(MessageError::TimeOutOfRange(millis))
}
