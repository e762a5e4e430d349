use std::cmp::Ordering;
use std::fmt;
use std::net::IpAddr;

use chrono::{DateTime, Utc};

/// The attributes a comment notification carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Text,
    Url,
    Ip,
    UserAgent,
    Time,
    Id,
}

impl Field {
    /// Every field, in the order they are checked.
    pub const ALL: [Field; 8] = [
        Field::Name,
        Field::Email,
        Field::Text,
        Field::Url,
        Field::Ip,
        Field::UserAgent,
        Field::Time,
        Field::Id,
    ];

    /// Key of this field under `MessageAttributes` in the notification JSON.
    pub fn attribute(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Text => "Text",
            Field::Url => "URL",
            Field::Ip => "IP",
            Field::UserAgent => "UserAgent",
            Field::Time => "Time",
            Field::Id => "ID",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Text => "text",
            Field::Time => "time",
            other => other.attribute(),
        };
        f.write_str(label)
    }
}

/// A single validated comment, decoded from one mail message.
///
/// Only the message parser constructs these, so every field is present
/// and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Comment {
    /// Display name of the commenter.
    pub name: String,
    pub email: String,
    /// Comment body, as submitted (rendered escaped).
    pub text: String,
    /// Page the comment belongs to. Grouping key, compared verbatim.
    pub url: String,
    pub ip: IpAddr,
    pub user_agent: String,
    /// Submission time, truncated to whole seconds.
    pub time: DateTime<Utc>,
    /// Unique identifier, used to break ties between equal times.
    pub id: String,
}

impl Comment {
    /// Order by time, then by ID.
    pub fn cmp_chronological(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then_with(|| self.id.cmp(&other.id))
    }
}
