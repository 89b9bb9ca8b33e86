//! The catalog façade: one reducer over the record store and view config.
//!
//! Remote mutations follow a single mutate-then-confirm flow: validate
//! locally, call the gateway, and only after it confirms apply the server's
//! answer to the [`RecordStore`]. A failure at any step leaves local state as
//! it was, emits an error notification and is returned to the caller.

use crate::command::{Command, CommandOutcome};
use crate::error::{Result, ServiceError};
use bridge_traits::time::Clock;
use core_library::{
    all_tags, popular_tags, tag_counts, CatalogSnapshot, CategoryCounts, LibraryError,
    MediaDraft, MediaId, MediaPatch, MediaRecord, RecordStore, SearchScope, TagCount, ViewConfig,
};
use core_metadata::{ExternalCandidate, MetadataSearch};
use core_runtime::config::CatalogConfig;
use core_runtime::events::{CatalogEvent, EventBus, EventStream, Notification};
use core_sync::{HttpMediaGateway, MediaGateway, SyncError};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub struct CatalogService {
    store: RecordStore,
    view: ViewConfig,
    gateway: Arc<dyn MediaGateway>,
    search: MetadataSearch,
    clock: Arc<dyn Clock>,
    events: EventBus,
}

impl CatalogService {
    /// Wire the REST gateway and external search from `config`.
    ///
    /// Nothing is fetched; dispatch [`Command::Reload`] to load the collection.
    pub fn new(config: &CatalogConfig) -> Self {
        Self::with_parts(
            Arc::new(HttpMediaGateway::new(config)),
            MetadataSearch::from_config(config),
            config.clock.clone(),
            EventBus::new(config.event_buffer_size),
        )
    }

    pub fn with_parts(
        gateway: Arc<dyn MediaGateway>,
        search: MetadataSearch,
        clock: Arc<dyn Clock>,
        events: EventBus,
    ) -> Self {
        Self {
            store: RecordStore::new(),
            view: ViewConfig::default(),
            gateway,
            search,
            clock,
            events,
        }
    }

    // =========================================================================
    // Read side
    // =========================================================================

    pub fn records(&self) -> &[MediaRecord] {
        self.store.records()
    }

    /// The filtered and sorted records, as of the last dispatch.
    pub fn view(&self) -> &[MediaRecord] {
        self.store.view()
    }

    pub fn view_config(&self) -> &ViewConfig {
        &self.view
    }

    pub fn get(&self, id: &MediaId) -> Option<&MediaRecord> {
        self.store.get(id)
    }

    pub fn counts(&self) -> CategoryCounts {
        CategoryCounts::from_records(self.store.records())
    }

    pub fn tag_counts(&self) -> HashMap<String, usize> {
        tag_counts(self.store.records())
    }

    pub fn popular_tags(&self, limit: usize) -> Vec<TagCount> {
        popular_tags(self.store.records(), limit)
    }

    pub fn all_tags(&self) -> Vec<String> {
        all_tags(self.store.records())
    }

    pub fn search_scope(&self) -> SearchScope {
        SearchScope::for_category(self.view.category)
    }

    /// Snapshot of the full collection stamped with the current time.
    pub fn export_snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot::new(self.store.records().to_vec(), self.clock.now())
    }

    pub fn export_file_name(&self) -> String {
        CatalogSnapshot::file_name(self.clock.now())
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self) -> EventStream {
        EventStream::new(self.events.subscribe())
    }

    // =========================================================================
    // Reducer
    // =========================================================================

    /// Handle one command.
    ///
    /// On `Err` an error notification has already been emitted and local
    /// state is unchanged, except for [`Command::Reload`] which leaves an
    /// empty collection behind when the remote cannot be read.
    #[instrument(skip_all, fields(command = command.name()))]
    pub async fn dispatch(&mut self, command: Command) -> Result<CommandOutcome> {
        let result = match command {
            Command::Reload => self.reload().await,
            Command::SetCategory(category) => {
                self.view.category = category;
                Ok(self.refresh())
            }
            Command::SetSearch(query) => {
                self.view.set_search(&query);
                Ok(self.refresh())
            }
            Command::QuickSearch(query) => self.quick_search(&query).await,
            Command::SetAdvanced(advanced) => {
                self.view.advanced = advanced;
                Ok(self.refresh())
            }
            Command::ClearAdvanced => {
                self.view.advanced = Default::default();
                Ok(self.refresh())
            }
            Command::SelectTag(tag) => self.select_tag(&tag),
            Command::DeselectTag(tag) => {
                if self.view.deselect_tag(&tag) {
                    Ok(self.refresh())
                } else {
                    Ok(CommandOutcome::Unchanged)
                }
            }
            Command::ToggleTag(tag) => match self.view.toggle_tag(&tag) {
                Ok(_) => Ok(self.refresh()),
                Err(e) => Err(e.into()),
            },
            Command::ClearTags => {
                self.view.clear_tags();
                Ok(self.refresh())
            }
            Command::SetSort { key, direction } => {
                self.view.sort_key = key;
                self.view.sort_direction = direction;
                Ok(self.refresh())
            }
            Command::ToggleFavorite(id) => self.toggle_favorite(&id).await,
            Command::ToggleWatched(id) => self.toggle_watched(&id).await,
            Command::IncrementViews(id) => self.increment_views(&id).await,
            Command::Update { id, patch } => self.apply_update(&id, patch, "Changes saved").await,
            Command::Delete(id) => self.delete(&id).await,
            Command::Add(draft) => self.add(draft).await,
            Command::AddFromExternal(candidate) => self.add_from_external(&candidate).await,
            Command::Import(json) => self.import(&json),
        };

        result.map_err(|error| self.report(error))
    }

    fn refresh(&mut self) -> CommandOutcome {
        let visible = self.store.refresh_view(&self.view).len();
        self.events.catalog(CatalogEvent::ViewChanged {
            visible,
            total: self.store.len(),
        });
        CommandOutcome::Applied
    }

    fn report(&self, error: ServiceError) -> ServiceError {
        if error.is_validation() {
            debug!(error = %error, "Command rejected");
        } else {
            warn!(error = %error, "Command failed");
        }
        self.events.notify(Notification::error(error.user_message()));
        error
    }

    fn existing(&self, id: &MediaId) -> Result<&MediaRecord> {
        self.store
            .get(id)
            .ok_or_else(|| SyncError::from(LibraryError::record_not_found(id)).into())
    }

    async fn reload(&mut self) -> Result<CommandOutcome> {
        let fetched = self.gateway.fetch_all().await;
        let count = self.store.load(fetched.records);
        self.refresh();

        match fetched.error {
            None => {
                info!(count, "Catalog loaded");
                self.events.catalog(CatalogEvent::Loaded { count });
                Ok(CommandOutcome::Applied)
            }
            Some(error) => Err(error.into()),
        }
    }

    async fn quick_search(&mut self, query: &str) -> Result<CommandOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LibraryError::invalid("query", "Enter something to search for").into());
        }

        let scope = self.search_scope();
        if !scope.is_external() {
            self.view.set_search(query);
            let outcome = self.refresh();
            self.events
                .notify(Notification::success(format!("Found {} media", self.view().len())));
            return Ok(outcome);
        }

        let outcome = self.search.search(scope, query).await;
        for warning in &outcome.warnings {
            self.events.notify(Notification::warning(warning.message()));
        }
        if outcome.is_empty() && outcome.warnings.is_empty() {
            self.events
                .notify(Notification::info(format!("Nothing found for \"{}\"", query)));
        }
        Ok(CommandOutcome::SearchResults(outcome))
    }

    fn select_tag(&mut self, tag: &str) -> Result<CommandOutcome> {
        if self.view.select_tag(tag)? {
            Ok(self.refresh())
        } else {
            self.events.notify(Notification::warning(format!(
                "Tag \"{}\" is already selected",
                tag.trim()
            )));
            Ok(CommandOutcome::Unchanged)
        }
    }

    async fn toggle_favorite(&mut self, id: &MediaId) -> Result<CommandOutcome> {
        let record = self.existing(id)?;
        let message = if record.favorite {
            "Removed from favorites"
        } else {
            "Added to favorites"
        };
        let patch = record.toggle_favorite_patch();
        self.apply_update(id, patch, message).await
    }

    async fn toggle_watched(&mut self, id: &MediaId) -> Result<CommandOutcome> {
        let record = self.existing(id)?;
        let message = if record.watched {
            "Marked as not watched"
        } else {
            "Marked as watched"
        };
        let patch = record.toggle_watched_patch();
        self.apply_update(id, patch, message).await
    }

    async fn increment_views(&mut self, id: &MediaId) -> Result<CommandOutcome> {
        let patch = self.existing(id)?.increment_views_patch();
        self.apply_update(id, patch, "View counted").await
    }

    async fn apply_update(
        &mut self,
        id: &MediaId,
        patch: MediaPatch,
        message: &str,
    ) -> Result<CommandOutcome> {
        patch
            .validate_against(self.existing(id)?)
            .map_err(SyncError::from)?;

        let fields = self.gateway.update(id, &patch).await?;
        self.store
            .patch_local(id, &fields)
            .map_err(|e| SyncError::MalformedResponse(e.to_string()))?;

        info!(%id, fields = ?patch.field_names(), "Record updated");
        self.events.catalog(CatalogEvent::RecordUpdated {
            id: id.to_string(),
            updated_fields: patch.field_names(),
        });
        self.events.notify(Notification::success(message));
        Ok(self.refresh())
    }

    async fn delete(&mut self, id: &MediaId) -> Result<CommandOutcome> {
        let title = self.existing(id)?.title.clone();

        self.gateway.delete(id).await?;
        self.store.remove_local(id)?;

        info!(%id, "Record deleted");
        self.events
            .catalog(CatalogEvent::RecordDeleted { id: id.to_string() });
        self.events
            .notify(Notification::success(format!("\"{}\" deleted", title)));
        self.refresh();
        Ok(CommandOutcome::Applied)
    }

    async fn add(&mut self, draft: MediaDraft) -> Result<CommandOutcome> {
        let new_record = draft
            .into_new_record(self.clock.now())
            .map_err(SyncError::from)?;

        let record = self.gateway.create(&new_record).await?;
        self.store.upsert_local(record.clone());

        info!(id = %record.id, media_type = record.media_type.as_str(), "Record added");
        self.events.catalog(CatalogEvent::RecordAdded {
            id: record.id.to_string(),
            title: record.title.clone(),
        });
        self.events.notify(Notification::success(format!(
            "\"{}\" added to the catalog",
            record.title
        )));
        self.refresh();
        Ok(CommandOutcome::Created(record))
    }

    async fn add_from_external(&mut self, candidate: &ExternalCandidate) -> Result<CommandOutcome> {
        debug!(
            source = candidate.source.display_name(),
            external_id = %candidate.external_id,
            "Adding external candidate"
        );
        let draft = self.search.draft_for(candidate).await?;
        self.add(draft).await
    }

    fn import(&mut self, json: &str) -> Result<CommandOutcome> {
        let records = CatalogSnapshot::parse_records(json)?;
        let count = self.store.load(records);

        info!(count, "Catalog imported");
        self.events.catalog(CatalogEvent::Imported { count });
        self.events
            .notify(Notification::success(format!("Imported {} items", count)));
        Ok(self.refresh())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::time::FixedClock;
    use core_library::{AdvancedFilter, Category, MediaType, NewMediaRecord, SortDirection, SortKey};
    use core_runtime::events::{CoreEvent, NotificationLevel};
    use core_sync::{FetchResult, Result as SyncResult};
    use mockall::mock;
    use serde_json::{json, Map, Value};

    mock! {
        Gateway {}

        #[async_trait]
        impl MediaGateway for Gateway {
            async fn fetch_all(&self) -> FetchResult;
            async fn create(&self, record: &NewMediaRecord) -> SyncResult<MediaRecord>;
            async fn update(&self, id: &MediaId, patch: &MediaPatch) -> SyncResult<Map<String, Value>>;
            async fn delete(&self, id: &MediaId) -> SyncResult<()>;
        }
    }

    fn record(value: Value) -> MediaRecord {
        serde_json::from_value(value).unwrap()
    }

    fn seed() -> Vec<MediaRecord> {
        vec![
            record(json!({
                "id": 1, "type": "movie", "title": "Dune", "year": 2021, "rating": 8.0,
                "tags": ["scifi"], "dateAdded": "2024-01-01", "views": 0,
                "favorite": true, "watched": false, "director": "Denis Villeneuve"
            })),
            record(json!({
                "id": 2, "type": "book", "title": "Emma", "year": 1815, "rating": 7.0,
                "tags": ["classic", "romance"], "dateAdded": "2024-02-01", "views": 3,
                "favorite": false, "watched": true, "author": "Jane Austen"
            })),
        ]
    }

    fn gateway_with_seed() -> MockGateway {
        let mut gateway = MockGateway::new();
        gateway.expect_fetch_all().times(1).returning(|| FetchResult {
            records: seed(),
            error: None,
        });
        gateway
    }

    fn service(gateway: MockGateway) -> CatalogService {
        let clock = Arc::new(FixedClock("2025-06-01T08:00:00Z".parse().unwrap()));
        CatalogService::with_parts(
            Arc::new(gateway),
            MetadataSearch::new(None, None, clock.clone()),
            clock,
            EventBus::new(64),
        )
    }

    async fn loaded(gateway: MockGateway) -> CatalogService {
        let mut service = service(gateway);
        service.dispatch(Command::Reload).await.unwrap();
        service
    }

    fn notifications(events: Vec<CoreEvent>) -> Vec<(NotificationLevel, String)> {
        events
            .into_iter()
            .filter_map(|event| match event {
                CoreEvent::Notification(n) => Some((n.level, n.message)),
                _ => None,
            })
            .collect()
    }

    fn ids(records: &[MediaRecord]) -> Vec<MediaId> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    #[tokio::test]
    async fn test_reload_derives_default_view() {
        let service = loaded(gateway_with_seed()).await;

        assert_eq!(service.records().len(), 2);
        // Default sort: newest first
        assert_eq!(ids(service.view()), vec![MediaId::Number(2), MediaId::Number(1)]);
        assert_eq!(service.counts().movies, 1);
        assert_eq!(service.all_tags(), vec!["classic", "romance", "scifi"]);
    }

    #[tokio::test]
    async fn test_reload_failure_leaves_empty_catalog_and_notifies() {
        let mut gateway = MockGateway::new();
        gateway.expect_fetch_all().times(1).returning(|| FetchResult {
            records: Vec::new(),
            error: Some(SyncError::Transport("connection refused".to_string())),
        });
        let mut service = service(gateway);
        let mut events = service.subscribe();

        let err = service.dispatch(Command::Reload).await.unwrap_err();
        assert!(matches!(err, ServiceError::Sync(SyncError::Transport(_))));
        assert!(service.view().is_empty());
        assert_eq!(
            notifications(events.drain()),
            vec![(
                NotificationLevel::Error,
                "Could not reach the media server".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_view_commands_rederive() {
        let mut service = loaded(gateway_with_seed()).await;

        service
            .dispatch(Command::SetCategory(Category::Favorites))
            .await
            .unwrap();
        assert_eq!(ids(service.view()), vec![MediaId::Number(1)]);

        service.dispatch(Command::SetCategory(Category::All)).await.unwrap();
        service
            .dispatch(Command::SetSort {
                key: SortKey::Year,
                direction: SortDirection::Asc,
            })
            .await
            .unwrap();
        assert_eq!(ids(service.view()), vec![MediaId::Number(2), MediaId::Number(1)]);

        service
            .dispatch(Command::SetAdvanced(AdvancedFilter {
                year_from: Some(2000),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(ids(service.view()), vec![MediaId::Number(1)]);

        service.dispatch(Command::ClearAdvanced).await.unwrap();
        service
            .dispatch(Command::SetSearch("  AUSTEN ".to_string()))
            .await
            .unwrap();
        assert_eq!(ids(service.view()), vec![MediaId::Number(2)]);
    }

    #[tokio::test]
    async fn test_selected_tags() {
        let mut service = loaded(gateway_with_seed()).await;
        let mut events = service.subscribe();

        let outcome = service
            .dispatch(Command::SelectTag(" Classic ".to_string()))
            .await
            .unwrap();
        assert_eq!(outcome, CommandOutcome::Applied);
        assert_eq!(ids(service.view()), vec![MediaId::Number(2)]);

        let outcome = service
            .dispatch(Command::SelectTag("Classic".to_string()))
            .await
            .unwrap();
        assert_eq!(outcome, CommandOutcome::Unchanged);
        assert_eq!(
            notifications(events.drain()),
            vec![(
                NotificationLevel::Warning,
                "Tag \"Classic\" is already selected".to_string()
            )]
        );

        let err = service
            .dispatch(Command::SelectTag("   ".to_string()))
            .await
            .unwrap_err();
        assert!(err.is_validation());

        service
            .dispatch(Command::ToggleTag("Classic".to_string()))
            .await
            .unwrap();
        assert!(service.view_config().selected_tags.is_empty());
        assert_eq!(service.view().len(), 2);
    }

    #[tokio::test]
    async fn test_toggle_watched_counts_first_view() {
        let mut gateway = gateway_with_seed();
        gateway
            .expect_update()
            .withf(|id, patch| {
                *id == MediaId::Number(1) && patch.watched == Some(true) && patch.views == Some(1)
            })
            .times(1)
            .returning(|_, _| {
                let fields = json!({
                    "id": 1, "type": "movie", "title": "Dune", "year": 2021, "rating": 8.0,
                    "tags": ["scifi"], "dateAdded": "2024-01-01", "views": 1,
                    "favorite": true, "watched": true, "director": "Denis Villeneuve"
                });
                match fields {
                    Value::Object(map) => Ok(map),
                    _ => unreachable!(),
                }
            });
        let mut service = loaded(gateway).await;
        let mut events = service.subscribe();

        service
            .dispatch(Command::ToggleWatched(MediaId::Number(1)))
            .await
            .unwrap();

        let dune = service.get(&MediaId::Number(1)).unwrap();
        assert!(dune.watched);
        assert_eq!(dune.views, 1);
        assert_eq!(
            notifications(events.drain()),
            vec![(NotificationLevel::Success, "Marked as watched".to_string())]
        );
    }

    #[tokio::test]
    async fn test_rejected_update_leaves_state_untouched() {
        let mut gateway = gateway_with_seed();
        gateway.expect_update().times(1).returning(|_, _| {
            Err(SyncError::RemoteRejected {
                status: 500,
                body: "oops".to_string(),
            })
        });
        let mut service = loaded(gateway).await;
        let before = service.records().to_vec();
        let mut events = service.subscribe();

        let err = service
            .dispatch(Command::ToggleFavorite(MediaId::Number(1)))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Sync(SyncError::RemoteRejected { status: 500, .. })
        ));
        assert_eq!(service.records(), before.as_slice());
        assert_eq!(
            notifications(events.drain()),
            vec![(
                NotificationLevel::Error,
                "The media server rejected the request (HTTP 500)".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_unknown_id_and_decreasing_views_never_reach_gateway() {
        let mut gateway = gateway_with_seed();
        gateway.expect_update().never();
        gateway.expect_delete().never();
        let mut service = loaded(gateway).await;

        let err = service
            .dispatch(Command::ToggleFavorite(MediaId::Number(99)))
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let err = service
            .dispatch(Command::Update {
                id: MediaId::Number(2),
                patch: MediaPatch::default().with_views(1),
            })
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let err = service
            .dispatch(Command::Delete(MediaId::Text("gone".to_string())))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_record() {
        let mut gateway = gateway_with_seed();
        gateway
            .expect_delete()
            .times(1)
            .returning(|_| Err(SyncError::Transport("timeout".to_string())));
        let mut service = loaded(gateway).await;

        assert!(service
            .dispatch(Command::Delete(MediaId::Number(2)))
            .await
            .is_err());
        assert!(service.get(&MediaId::Number(2)).is_some());
        assert_eq!(service.view().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_draft_is_rejected_before_create() {
        let mut gateway = gateway_with_seed();
        gateway.expect_create().never();
        let mut service = loaded(gateway).await;

        let draft = MediaDraft::new(MediaType::Movie, "  ", 2020, 7.0, "Plot");
        let err = service.dispatch(Command::Add(draft)).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Sync(SyncError::Validation { ref field, .. }) if field == "title"
        ));
        assert_eq!(service.records().len(), 2);
    }

    #[tokio::test]
    async fn test_add_inserts_server_record() {
        let mut gateway = gateway_with_seed();
        gateway
            .expect_create()
            .withf(|new_record| new_record.title == "Heat" && new_record.views == 0)
            .times(1)
            .returning(|new_record| Ok(new_record.clone().into_record(MediaId::Number(7))));
        let mut service = loaded(gateway).await;

        let draft = MediaDraft::new(MediaType::Movie, "Heat", 1995, 8.3, "Cops and robbers");
        let outcome = service.dispatch(Command::Add(draft)).await.unwrap();

        let CommandOutcome::Created(created) = outcome else {
            panic!("expected a created record");
        };
        assert_eq!(created.id, MediaId::Number(7));
        assert_eq!(service.records()[0].id, MediaId::Number(7));
        // Newest dateAdded sorts first
        assert_eq!(service.view()[0].id, MediaId::Number(7));
    }

    #[tokio::test]
    async fn test_quick_search_routing() {
        let mut service = loaded(gateway_with_seed()).await;
        let mut events = service.subscribe();

        assert!(service
            .dispatch(Command::QuickSearch(" ".to_string()))
            .await
            .unwrap_err()
            .is_validation());

        // External scope without providers: one warning, no results
        let outcome = service
            .dispatch(Command::QuickSearch("heat".to_string()))
            .await
            .unwrap();
        let CommandOutcome::SearchResults(results) = outcome else {
            panic!("expected search results");
        };
        assert!(results.is_empty());
        assert_eq!(results.warnings.len(), 2);
        let levels: Vec<_> = notifications(events.drain())
            .into_iter()
            .map(|(level, _)| level)
            .collect();
        assert_eq!(
            levels,
            vec![
                NotificationLevel::Error,
                NotificationLevel::Warning,
                NotificationLevel::Warning
            ]
        );

        // Local scope filters in place
        service
            .dispatch(Command::SetCategory(Category::Watched))
            .await
            .unwrap();
        service
            .dispatch(Command::QuickSearch("EMMA".to_string()))
            .await
            .unwrap();
        assert_eq!(service.view_config().search, "emma");
        assert_eq!(ids(service.view()), vec![MediaId::Number(2)]);
        assert!(notifications(events.drain())
            .contains(&(NotificationLevel::Success, "Found 1 media".to_string())));
    }

    #[tokio::test]
    async fn test_import_replaces_local_records_only() {
        let mut service = loaded(gateway_with_seed()).await;

        let err = service
            .dispatch(Command::Import(r#"{"version": "1.0"}"#.to_string()))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.records().len(), 2);

        let snapshot = r#"{"media": [
            {"id": "a1", "type": "book", "title": "Beloved", "year": 1987, "rating": 9},
            "garbage"
        ], "exportDate": "2025-01-01T00:00:00.000Z", "version": "1.0"}"#;
        service
            .dispatch(Command::Import(snapshot.to_string()))
            .await
            .unwrap();
        assert_eq!(ids(service.records()), vec![MediaId::Text("a1".to_string())]);
    }

    #[tokio::test]
    async fn test_export_snapshot() {
        let service = loaded(gateway_with_seed()).await;

        let snapshot = service.export_snapshot();
        assert_eq!(snapshot.media.len(), 2);
        assert_eq!(snapshot.export_date, "2025-06-01T08:00:00.000Z");
        assert_eq!(service.export_file_name(), "media-catalog-2025-06-01.json");
    }

    #[test]
    fn test_command_wire_format() {
        let command: Command = serde_json::from_value(json!({
            "command": "set_sort",
            "args": {"key": "rating", "direction": "asc"}
        }))
        .unwrap();
        assert_eq!(
            command,
            Command::SetSort {
                key: SortKey::Rating,
                direction: SortDirection::Asc
            }
        );
        assert!(!command.is_mutation());
        assert!(Command::Delete(MediaId::Number(1)).is_mutation());
    }
}
