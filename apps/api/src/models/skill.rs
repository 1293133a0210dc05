use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::repository::Entity;

/// A single skill. `category` is a free-text grouping key; the by-category
/// endpoint buckets on it verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    /// Self-assessed 1–5. Convention only, not validated.
    #[serde(default)]
    pub proficiency: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateSkill {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub proficiency: i64,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub order: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateSkill {
    pub name: Option<String>,
    pub category: Option<String>,
    pub proficiency: Option<i64>,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub order: Option<i64>,
}

impl Entity for Skill {
    const KIND: &'static str = "skill";
    const FILE: &'static str = "skills.json";
    const LABEL: &'static str = "Skill";

    type Create = CreateSkill;
    type Update = UpdateSkill;

    fn from_create(input: CreateSkill, now: DateTime<Utc>) -> Self {
        Skill {
            id: String::new(),
            name: input.name,
            category: input.category,
            proficiency: input.proficiency,
            icon: input.icon,
            description: input.description,
            order: input.order.unwrap_or(0),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, patch: UpdateSkill, _now: DateTime<Utc>) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.category {
            self.category = v;
        }
        if let Some(v) = patch.proficiency {
            self.proficiency = v;
        }
        if patch.icon.is_some() {
            self.icon = patch.icon;
        }
        if let Some(v) = patch.description {
            self.description = v;
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
