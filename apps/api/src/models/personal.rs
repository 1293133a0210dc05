use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File name of the singleton record under the data directory.
pub const PERSONAL_FILE: &str = "personal.json";

/// Singleton bio/contact block shown on the marketing site. No id, no
/// collection semantics: get and full replace only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    /// Provider name → profile URL.
    #[serde(default)]
    pub social_links: BTreeMap<String, String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersonalInfoInput {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub social_links: BTreeMap<String, String>,
}

impl PersonalInfoInput {
    /// Full replace: the stored record is exactly this input plus a fresh
    /// `updated_at` stamp.
    pub fn into_record(self, now: DateTime<Utc>) -> PersonalInfo {
        PersonalInfo {
            full_name: self.full_name,
            title: self.title,
            bio: self.bio,
            tagline: self.tagline,
            email: self.email,
            phone: self.phone,
            location: self.location,
            avatar_url: self.avatar_url,
            resume_url: self.resume_url,
            social_links: self.social_links,
            updated_at: now,
        }
    }
}
