use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::repository::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    #[default]
    New,
    Read,
    Replied,
    Archived,
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::New => "new",
            ContactStatus::Read => "read",
            ContactStatus::Replied => "replied",
            ContactStatus::Archived => "archived",
        }
    }
}

/// A message from the public contact form. Unordered: listings sort newest
/// first. `status` is triage metadata, not a state machine — any transition
/// is allowed, but moving to `replied` stamps `replied_at` and moving away
/// from it does not clear the stamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub status: ContactStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub replied_at: Option<DateTime<Utc>>,
}

/// Repository input for a new submission. Built by the handler, which adds
/// the request metadata the public form body does not carry.
#[derive(Debug, Deserialize)]
pub struct CreateContactSubmission {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateContactStatus {
    pub status: ContactStatus,
}

impl Entity for ContactSubmission {
    const KIND: &'static str = "contact";
    const FILE: &'static str = "contact.json";
    const LABEL: &'static str = "Contact submission";

    type Create = CreateContactSubmission;
    type Update = UpdateContactStatus;

    fn from_create(input: CreateContactSubmission, now: DateTime<Utc>) -> Self {
        ContactSubmission {
            id: String::new(),
            name: input.name,
            email: input.email,
            subject: input.subject,
            message: input.message,
            // Always starts in triage regardless of what the form sent.
            status: ContactStatus::New,
            ip_address: input.ip_address,
            user_agent: input.user_agent,
            created_at: now,
            replied_at: None,
        }
    }

    fn apply_update(&mut self, patch: UpdateContactStatus, now: DateTime<Utc>) {
        self.status = patch.status;
        if patch.status == ContactStatus::Replied {
            self.replied_at = Some(now);
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    // Submissions carry no updated_at; created_at is the only timestamp the
    // admin inbox sorts on.
    fn touch(&mut self, _now: DateTime<Utc>) {}

    fn status_label(&self) -> Option<&str> {
        Some(self.status.as_str())
    }

    fn sort(items: &mut [Self]) {
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }
}
