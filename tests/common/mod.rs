// Shared fixtures: comment notification mails on disk.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use serde_json::{json, Map, Value};

/// Attribute values for one comment; override fields before writing.
#[derive(Debug, Clone)]
pub struct Mail {
    pub name: String,
    pub email: String,
    pub text: String,
    pub url: String,
    pub ip: String,
    pub user_agent: String,
    pub time: String,
    pub id: String,
}

impl Mail {
    pub fn new(url: &str, time_ms: i64, id: &str) -> Self {
        Self {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            text: format!("Comment {id}"),
            url: url.to_string(),
            ip: "198.51.100.4".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64)".to_string(),
            time: time_ms.to_string(),
            id: id.to_string(),
        }
    }

    pub fn body(&self) -> String {
        let mut attrs = Map::new();
        for (key, value) in [
            ("Name", &self.name),
            ("Email", &self.email),
            ("Text", &self.text),
            ("URL", &self.url),
            ("IP", &self.ip),
            ("UserAgent", &self.user_agent),
            ("Time", &self.time),
            ("ID", &self.id),
        ] {
            attrs.insert(key.into(), json!({"Type": "String", "Value": value}));
        }
        let notification: Value = json!({
            "Type": "Notification",
            "MessageId": format!("msg-{}", self.id),
            "Message": "New comment",
            "MessageAttributes": attrs,
        });
        notification.to_string()
    }

    /// Render as a complete mail message.
    pub fn message(&self) -> String {
        format!(
            "Return-Path: <notifications@example.com>\r\n\
             From: notifications@example.com\r\n\
             To: comments@example.com\r\n\
             Subject: New comment {}\r\n\
             Content-Type: text/plain; charset=UTF-8\r\n\
             \r\n\
             {}\r\n",
            self.id,
            self.body()
        )
    }

    /// Write the message to `maildir/rel`, creating parent directories.
    pub fn write(&self, maildir: &Path, rel: &str) {
        let path = maildir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, self.message()).unwrap();
    }
}
