use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::repository::Entity;

/// A homelab / practice-lab write-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lab {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_completed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateLab {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub date_completed: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub repository_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateLab {
    pub title: Option<String>,
    pub description: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub date_completed: Option<String>,
    pub image_url: Option<String>,
    pub repository_url: Option<String>,
    pub notes: Option<String>,
    pub order: Option<i64>,
}

impl Entity for Lab {
    const KIND: &'static str = "lab";
    const FILE: &'static str = "labs.json";
    const LABEL: &'static str = "Lab";

    type Create = CreateLab;
    type Update = UpdateLab;

    fn from_create(input: CreateLab, now: DateTime<Utc>) -> Self {
        Lab {
            id: String::new(),
            title: input.title,
            description: input.description,
            technologies: input.technologies,
            date_completed: input.date_completed,
            image_url: input.image_url,
            repository_url: input.repository_url,
            notes: input.notes,
            order: input.order.unwrap_or(0),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, patch: UpdateLab, _now: DateTime<Utc>) {
        if let Some(v) = patch.title {
            self.title = v;
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
        if let Some(v) = patch.technologies {
            self.technologies = v;
        }
        if patch.date_completed.is_some() {
            self.date_completed = patch.date_completed;
        }
        if patch.image_url.is_some() {
            self.image_url = patch.image_url;
        }
        if patch.repository_url.is_some() {
            self.repository_url = patch.repository_url;
        }
        if patch.notes.is_some() {
            self.notes = patch.notes;
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
}
