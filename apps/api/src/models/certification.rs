use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::repository::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificationStatus {
    #[default]
    InProgress,
    Completed,
    Planned,
}

impl CertificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CertificationStatus::InProgress => "in_progress",
            CertificationStatus::Completed => "completed",
            CertificationStatus::Planned => "planned",
        }
    }
}

/// A certification, earned or pursued. Dates are kept as free-form strings
/// since issuers use anything from "2024-05-01" to "May 2024".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certification {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub status: CertificationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub study_topics: Vec<String>,
    #[serde(default)]
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCertification {
    pub title: String,
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub status: CertificationStatus,
    #[serde(default)]
    pub issue_date: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub credential_id: Option<String>,
    #[serde(default)]
    pub credential_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub study_topics: Vec<String>,
    #[serde(default)]
    pub order: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCertification {
    pub title: Option<String>,
    pub issuer: Option<String>,
    pub status: Option<CertificationStatus>,
    pub issue_date: Option<String>,
    pub expiry_date: Option<String>,
    pub credential_id: Option<String>,
    pub credential_url: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub study_topics: Option<Vec<String>>,
    pub order: Option<i64>,
}

impl Entity for Certification {
    const KIND: &'static str = "cert";
    const FILE: &'static str = "certifications.json";
    const LABEL: &'static str = "Certification";

    type Create = CreateCertification;
    type Update = UpdateCertification;

    fn from_create(input: CreateCertification, now: DateTime<Utc>) -> Self {
        Certification {
            id: String::new(),
            title: input.title,
            issuer: input.issuer,
            status: input.status,
            issue_date: input.issue_date,
            expiry_date: input.expiry_date,
            credential_id: input.credential_id,
            credential_url: input.credential_url,
            image_url: input.image_url,
            description: input.description,
            study_topics: input.study_topics,
            order: input.order.unwrap_or(0),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, patch: UpdateCertification, _now: DateTime<Utc>) {
        if let Some(v) = patch.title {
            self.title = v;
        }
        if let Some(v) = patch.issuer {
            self.issuer = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        if patch.issue_date.is_some() {
            self.issue_date = patch.issue_date;
        }
        if patch.expiry_date.is_some() {
            self.expiry_date = patch.expiry_date;
        }
        if patch.credential_id.is_some() {
            self.credential_id = patch.credential_id;
        }
        if patch.credential_url.is_some() {
            self.credential_url = patch.credential_url;
        }
        if patch.image_url.is_some() {
            self.image_url = patch.image_url;
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
        if let Some(v) = patch.study_topics {
            self.study_topics = v;
        }
        if let Some(v) = patch.order {
            self.order = v;
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    fn order(&self) -> Option<i64> {
        Some(self.order)
    }

    fn set_order(&mut self, order: i64) {
        self.order = order;
    }

    fn status_label(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}
