//! Entity Repository — generic CRUD and display ordering over one
//! JSON-array-backed collection, parameterized by entity kind.
//!
//! Each kind describes itself through the `Entity` trait: id prefix, backing
//! file, typed create/update inputs, and ordering hooks. The repository owns
//! the read-modify-write cycle; every mutation holds the collection's file
//! lock from first read to final write.

use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::store::JsonStore;

pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Id prefix, e.g. `project` in `project-<uuid>`.
    const KIND: &'static str;
    /// Collection file name under the data directory.
    const FILE: &'static str;
    /// Human label used in error messages ("Project not found").
    const LABEL: &'static str;

    type Create: DeserializeOwned + Send + 'static;
    type Update: DeserializeOwned + Send + 'static;

    /// Builds a new record from validated input. The repository assigns the
    /// id and, for ordered kinds, the default display rank afterwards.
    fn from_create(input: Self::Create, now: DateTime<Utc>) -> Self;

    /// Shallow-merges the patch over the record. Field absence means "leave
    /// untouched"; the id is not part of any patch type.
    fn apply_update(&mut self, patch: Self::Update, now: DateTime<Utc>);

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);

    /// Refreshes `updated_at`. No-op for kinds without one.
    fn touch(&mut self, now: DateTime<Utc>);

    /// Display rank, for kinds that have one. Zero means "unset": the
    /// repository assigns `count + 1` on create.
    fn order(&self) -> Option<i64> {
        None
    }

    fn set_order(&mut self, _order: i64) {}

    /// Exact-match value for `?status=` list filtering. Kinds without a
    /// status return `None` and the filter is ignored for them.
    fn status_label(&self) -> Option<&str> {
        None
    }

    /// Display ordering for `list`. Ordered kinds sort ascending by rank;
    /// unordered kinds override (contact sorts newest first).
    fn sort(items: &mut [Self]) {
        items.sort_by_key(|e| e.order().unwrap_or(i64::MAX));
    }
}

pub struct Repository<'a, E: Entity> {
    store: &'a JsonStore,
    _kind: PhantomData<E>,
}

impl<'a, E: Entity> Repository<'a, E> {
    pub fn new(store: &'a JsonStore) -> Self {
        Repository {
            store,
            _kind: PhantomData,
        }
    }

    /// Loads the collection, optionally filtered by status, in display order.
    /// The filter only applies to kinds that expose a status label.
    pub async fn list(&self, status: Option<&str>) -> Result<Vec<E>, AppError> {
        let mut items: Vec<E> = self.store.read_array(E::FILE).await?;
        if let Some(status) = status {
            items.retain(|e| e.status_label().map_or(true, |label| label == status));
        }
        E::sort(&mut items);
        Ok(items)
    }

    pub async fn get(&self, id: &str) -> Result<E, AppError> {
        self.store
            .read_array::<E>(E::FILE)
            .await?
            .into_iter()
            .find(|e| e.id() == id)
            .ok_or_else(not_found::<E>)
    }

    pub async fn create(&self, input: E::Create) -> Result<E, AppError> {
        let _guard = self.store.lock(E::FILE).await;
        let mut items: Vec<E> = self.store.read_array(E::FILE).await?;

        let mut entity = E::from_create(input, Utc::now());
        entity.set_id(format!("{}-{}", E::KIND, Uuid::new_v4()));
        if entity.order() == Some(0) {
            entity.set_order(items.len() as i64 + 1);
        }

        items.push(entity.clone());
        self.store.write_array(E::FILE, &items).await?;
        Ok(entity)
    }

    pub async fn update(&self, id: &str, patch: E::Update) -> Result<E, AppError> {
        let _guard = self.store.lock(E::FILE).await;
        let mut items: Vec<E> = self.store.read_array(E::FILE).await?;

        let Some(entity) = items.iter_mut().find(|e| e.id() == id) else {
            return Err(not_found::<E>());
        };
        let now = Utc::now();
        entity.apply_update(patch, now);
        entity.touch(now);
        let updated = entity.clone();

        self.store.write_array(E::FILE, &items).await?;
        Ok(updated)
    }

    pub async fn remove(&self, id: &str) -> Result<(), AppError> {
        let _guard = self.store.lock(E::FILE).await;
        let mut items: Vec<E> = self.store.read_array(E::FILE).await?;

        let before = items.len();
        items.retain(|e| e.id() != id);
        if items.len() == before {
            return Err(not_found::<E>());
        }

        self.store.write_array(E::FILE, &items).await?;
        Ok(())
    }

    /// Assigns ranks `1..N` following the supplied id sequence. Unknown ids
    /// are ignored; records omitted from the list keep their previous rank,
    /// which can collide with the newly assigned ones — callers are expected
    /// to send the full collection.
    pub async fn reorder(&self, ids: &[String]) -> Result<(), AppError> {
        let _guard = self.store.lock(E::FILE).await;
        let mut items: Vec<E> = self.store.read_array(E::FILE).await?;

        let now = Utc::now();
        for (position, id) in ids.iter().enumerate() {
            if let Some(entity) = items.iter_mut().find(|e| e.id() == id) {
                entity.set_order(position as i64 + 1);
                entity.touch(now);
            }
        }

        self.store.write_array(E::FILE, &items).await?;
        Ok(())
    }
}

fn not_found<E: Entity>() -> AppError {
    AppError::NotFound(format!("{} not found", E::LABEL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contact::CreateContactSubmission;
    use crate::models::project::{CreateProject, ProjectStatus, UpdateProject};
    use crate::models::skill::CreateSkill;
    use crate::models::{ContactSubmission, Project, Skill};

    fn store() -> (tempfile::TempDir, JsonStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonStore::new(dir.path());
        (dir, store)
    }

    fn create_input(title: &str) -> CreateProject {
        serde_json::from_value(serde_json::json!({ "title": title })).expect("valid input")
    }

    async fn seed(repo: &Repository<'_, Project>, titles: &[&str]) -> Vec<Project> {
        let mut created = Vec::new();
        for title in titles {
            created.push(repo.create(create_input(title)).await.unwrap());
        }
        created
    }

    #[tokio::test]
    async fn create_assigns_prefixed_id_and_timestamps() {
        let (_dir, store) = store();
        let repo = Repository::<Project>::new(&store);

        let project = repo.create(create_input("X")).await.unwrap();
        assert!(project.id.starts_with("project-"));
        assert!(project.id.len() > "project-".len());
        assert_eq!(project.created_at, project.updated_at);
        assert_eq!(project.order, 1);
        assert_eq!(project.status, ProjectStatus::Draft);

        // Retrievable immediately under the returned id.
        let fetched = repo.get(&project.id).await.unwrap();
        assert_eq!(fetched.id, project.id);
    }

    #[tokio::test]
    async fn create_defaults_order_to_count_plus_one() {
        let (_dir, store) = store();
        let repo = Repository::<Project>::new(&store);

        let created = seed(&repo, &["a", "b", "c"]).await;
        let orders: Vec<i64> = created.iter().map(|p| p.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn create_keeps_explicit_order() {
        let (_dir, store) = store();
        let repo = Repository::<Project>::new(&store);

        let input: CreateProject =
            serde_json::from_value(serde_json::json!({ "title": "X", "order": 42 })).unwrap();
        let project = repo.create(input).await.unwrap();
        assert_eq!(project.order, 42);
    }

    #[tokio::test]
    async fn ids_are_unique_across_creates() {
        let (_dir, store) = store();
        let repo = Repository::<Project>::new(&store);

        let created = seed(&repo, &["a", "b", "c", "d"]).await;
        let mut ids: Vec<&str> = created.iter().map(|p| p.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let (_dir, store) = store();
        let repo = Repository::<Project>::new(&store);

        let err = repo.get("project-missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Project not found"));
    }

    #[tokio::test]
    async fn update_merges_and_preserves_identity() {
        let (_dir, store) = store();
        let repo = Repository::<Project>::new(&store);

        let created = repo.create(create_input("X")).await.unwrap();
        let patch = UpdateProject {
            title: Some("Y".into()),
            ..Default::default()
        };
        let updated = repo.update(&created.id, patch).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.title, "Y");
        // Unspecified fields untouched.
        assert_eq!(updated.order, created.order);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let (_dir, store) = store();
        let repo = Repository::<Project>::new(&store);

        let err = repo
            .update("project-missing", UpdateProject::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn remove_deletes_exactly_one() {
        let (_dir, store) = store();
        let repo = Repository::<Project>::new(&store);

        let created = seed(&repo, &["a", "b"]).await;
        repo.remove(&created[0].id).await.unwrap();

        let remaining = repo.list(None).await.unwrap();
        assert_eq!(remaining.len(), 1);
        let err = repo.get(&created[0].id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        // Deleting again is NotFound, not a silent no-op.
        let err = repo.remove(&created[0].id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn reorder_assigns_ranks_in_supplied_sequence() {
        let (_dir, store) = store();
        let repo = Repository::<Project>::new(&store);

        let created = seed(&repo, &["a", "b", "c"]).await;
        let ids = vec![
            created[2].id.clone(),
            created[0].id.clone(),
            created[1].id.clone(),
        ];
        repo.reorder(&ids).await.unwrap();

        assert_eq!(repo.get(&created[2].id).await.unwrap().order, 1);
        assert_eq!(repo.get(&created[0].id).await.unwrap().order, 2);
        assert_eq!(repo.get(&created[1].id).await.unwrap().order, 3);

        let listed = repo.list(None).await.unwrap();
        let titles: Vec<&str> = listed.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn reorder_ignores_unknown_ids_and_keeps_omitted_ranks() {
        let (_dir, store) = store();
        let repo = Repository::<Project>::new(&store);

        let created = seed(&repo, &["a", "b", "c"]).await;
        // "c" (order 3) is omitted; a bogus id is included.
        let ids = vec![
            created[1].id.clone(),
            "project-bogus".to_string(),
            created[0].id.clone(),
        ];
        repo.reorder(&ids).await.unwrap();

        assert_eq!(repo.get(&created[1].id).await.unwrap().order, 1);
        assert_eq!(repo.get(&created[0].id).await.unwrap().order, 3);
        // Omitted record retains its stale rank.
        assert_eq!(repo.get(&created[2].id).await.unwrap().order, 3);
    }

    #[tokio::test]
    async fn list_filters_contact_by_status() {
        let (_dir, store) = store();
        let repo = Repository::<ContactSubmission>::new(&store);

        let input: CreateContactSubmission = serde_json::from_value(serde_json::json!({
            "name": "Ada",
            "email": "ada@example.com",
            "message": "hi"
        }))
        .unwrap();
        repo.create(input).await.unwrap();

        // New submissions always start in `new`.
        let fresh = repo.list(Some("new")).await.unwrap();
        assert_eq!(fresh.len(), 1);

        let archived = repo.list(Some("archived")).await.unwrap();
        assert!(archived.is_empty());
    }

    #[tokio::test]
    async fn list_ignores_status_filter_for_kinds_without_one() {
        let (_dir, store) = store();
        let repo = Repository::<Skill>::new(&store);

        let input: CreateSkill =
            serde_json::from_value(serde_json::json!({ "name": "Rust" })).unwrap();
        repo.create(input).await.unwrap();

        let listed = repo.list(Some("anything")).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn list_filters_by_status() {
        let (_dir, store) = store();
        let repo = Repository::<Project>::new(&store);

        let input: CreateProject =
            serde_json::from_value(serde_json::json!({ "title": "pub", "status": "published" }))
                .unwrap();
        repo.create(input).await.unwrap();
        repo.create(create_input("draft")).await.unwrap();

        let published = repo.list(Some("published")).await.unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].title, "pub");

        let all = repo.list(None).await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
