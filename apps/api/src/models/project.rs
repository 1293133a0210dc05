use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::repository::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Draft,
    Published,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::Published => "published",
        }
    }
}

/// A portfolio project. `order` drives display sequencing on the marketing
/// site; `status` gates whether the marketing site shows it at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateProject {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub status: ProjectStatus,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub order: Option<i64>,
    pub status: Option<ProjectStatus>,
}

impl Entity for Project {
    const KIND: &'static str = "project";
    const FILE: &'static str = "projects.json";
    const LABEL: &'static str = "Project";

    type Create = CreateProject;
    type Update = UpdateProject;

    fn from_create(input: CreateProject, now: DateTime<Utc>) -> Self {
        Project {
            id: String::new(),
            title: input.title,
            summary: input.summary,
            description: input.description,
            color: input.color,
            image_url: input.image_url,
            video_url: input.video_url,
            github_url: input.github_url,
            live_url: input.live_url,
            technologies: input.technologies,
            features: input.features,
            category: input.category,
            featured: input.featured,
            order: input.order.unwrap_or(0),
            status: input.status,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, patch: UpdateProject, _now: DateTime<Utc>) {
        if let Some(v) = patch.title {
            self.title = v;
        }
        if let Some(v) = patch.summary {
            self.summary = v;
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
        if patch.color.is_some() {
            self.color = patch.color;
        }
        if patch.image_url.is_some() {
            self.image_url = patch.image_url;
        }
        if patch.video_url.is_some() {
            self.video_url = patch.video_url;
        }
        if patch.github_url.is_some() {
            self.github_url = patch.github_url;
        }
        if patch.live_url.is_some() {
            self.live_url = patch.live_url;
        }
        if let Some(v) = patch.technologies {
            self.technologies = v;
        }
        if let Some(v) = patch.features {
            self.features = v;
        }
        if let Some(v) = patch.category {
            self.category = v;
        }
        if let Some(v) = patch.featured {
            self.featured = v;
        }
        if let Some(v) = patch.order {
            self.order = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample(now: DateTime<Utc>) -> Project {
        Project::from_create(
            CreateProject {
                title: "Homelab".into(),
                summary: "S".into(),
                description: "D".into(),
                color: None,
                image_url: Some("/uploads/x.webp".into()),
                video_url: None,
                github_url: None,
                live_url: None,
                technologies: vec!["Rust".into()],
                features: vec![],
                category: "infra".into(),
                featured: false,
                order: None,
                status: ProjectStatus::Draft,
            },
            now,
        )
    }

    #[test]
    fn update_merges_only_supplied_fields() {
        let now = Utc::now();
        let mut project = sample(now);
        project.apply_update(
            UpdateProject {
                title: Some("Homelab v2".into()),
                featured: Some(true),
                ..Default::default()
            },
            now,
        );
        assert_eq!(project.title, "Homelab v2");
        assert!(project.featured);
        // Unspecified fields stay untouched.
        assert_eq!(project.summary, "S");
        assert_eq!(project.image_url.as_deref(), Some("/uploads/x.webp"));
        assert_eq!(project.status, ProjectStatus::Draft);
    }

    #[test]
    fn update_input_rejects_unknown_fields() {
        // A client-supplied id must be rejected at the boundary, never merged.
        let err = serde_json::from_value::<UpdateProject>(json!({ "id": "project-evil" }));
        assert!(err.is_err());
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(ProjectStatus::Published).unwrap(),
            json!("published")
        );
        assert_eq!(ProjectStatus::default(), ProjectStatus::Draft);
    }
}
