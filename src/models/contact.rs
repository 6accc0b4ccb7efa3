use anyhow::Result;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const FULLNAME_MIN: usize = 2;
const FULLNAME_MAX: usize = 100;
const MESSAGE_MIN: usize = 10;
const MESSAGE_MAX: usize = 2000;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));
static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern"));

/// One visitor-submitted contact-form entry, stored newest-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub id: String,
    pub fullname: String,
    pub email: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

impl ContactRecord {
    pub fn from_submission(submission: ContactSubmission) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            fullname: submission.fullname,
            email: submission.email,
            message: submission.message,
            timestamp: Utc::now(),
            read: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactSubmission {
    pub fullname: String,
    pub email: String,
    pub message: String,
}

impl ContactSubmission {
    /// Strip HTML tags from every field before validation or persistence.
    pub fn sanitized(self) -> Self {
        Self {
            fullname: strip_tags(&self.fullname),
            email: strip_tags(&self.email),
            message: strip_tags(&self.message),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let fullname = self.fullname.trim();
        if fullname.len() < FULLNAME_MIN || fullname.len() > FULLNAME_MAX {
            anyhow::bail!(
                "fullname must be between {} and {} characters",
                FULLNAME_MIN,
                FULLNAME_MAX
            );
        }

        if !EMAIL.is_match(self.email.trim()) {
            anyhow::bail!("email must be a valid email address");
        }

        let message = self.message.trim();
        if message.len() < MESSAGE_MIN || message.len() > MESSAGE_MAX {
            anyhow::bail!(
                "message must be between {} and {} characters",
                MESSAGE_MIN,
                MESSAGE_MAX
            );
        }

        Ok(())
    }
}

fn strip_tags(text: &str) -> String {
    HTML_TAG.replace_all(text, "").trim().to_string()
}
