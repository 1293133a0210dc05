pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::services::ServeDir;

use crate::content::handlers::{
    create_contact, create_entity, delete_entity, get_entity, get_personal, list_entities,
    put_personal, reorder_projects, skills_by_category, update_entity,
};
use crate::media::handlers::{delete_file, upload_file};
use crate::media::UPLOAD_BODY_LIMIT;
use crate::models::{Certification, ContactSubmission, Lab, Project, Skill};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let uploads_dir = state.media.uploads_dir().to_path_buf();

    Router::new()
        .route("/api/health", get(health::health_handler))
        // Projects
        .route(
            "/api/projects",
            get(list_entities::<Project>).post(create_entity::<Project>),
        )
        .route("/api/projects/reorder", patch(reorder_projects))
        .route(
            "/api/projects/:id",
            get(get_entity::<Project>)
                .put(update_entity::<Project>)
                .delete(delete_entity::<Project>),
        )
        // Skills
        .route(
            "/api/skills",
            get(list_entities::<Skill>).post(create_entity::<Skill>),
        )
        .route("/api/skills/by-category", get(skills_by_category))
        .route(
            "/api/skills/:id",
            put(update_entity::<Skill>).delete(delete_entity::<Skill>),
        )
        // Certifications
        .route(
            "/api/certifications",
            get(list_entities::<Certification>).post(create_entity::<Certification>),
        )
        .route(
            "/api/certifications/:id",
            get(get_entity::<Certification>)
                .put(update_entity::<Certification>)
                .delete(delete_entity::<Certification>),
        )
        // Labs
        .route(
            "/api/labs",
            get(list_entities::<Lab>).post(create_entity::<Lab>),
        )
        .route(
            "/api/labs/:id",
            put(update_entity::<Lab>).delete(delete_entity::<Lab>),
        )
        // Contact
        .route(
            "/api/contact",
            get(list_entities::<ContactSubmission>).post(create_contact),
        )
        .route(
            "/api/contact/:id/status",
            patch(update_entity::<ContactSubmission>),
        )
        .route("/api/contact/:id", delete(delete_entity::<ContactSubmission>))
        // Personal info singleton
        .route("/api/personal", get(get_personal).put(put_personal))
        // Uploads
        .route(
            "/api/upload",
            post(upload_file).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/api/upload/:filename", delete(delete_file))
        // Stored files and derivatives, served at a stable prefix
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .with_state(state)
}
