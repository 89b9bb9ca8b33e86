//! Gateway flows against the in-memory REST fake.

use bridge_traits::http::HttpMethod;
use chrono::{DateTime, Utc};
use core_library::{MediaDraft, MediaId, MediaPatch, MediaType};
use core_runtime::config::CatalogConfig;
use core_sync::memory::{IdStrategy, InMemoryMediaServer, InjectedFailure};
use core_sync::{HttpMediaGateway, MediaGateway, SyncError};
use serde_json::json;
use std::sync::Arc;

const BASE_URL: &str = "http://localhost:3001";

fn now() -> DateTime<Utc> {
    "2025-06-01T08:00:00Z".parse().unwrap()
}

fn setup(server: InMemoryMediaServer) -> (Arc<InMemoryMediaServer>, HttpMediaGateway) {
    let server = Arc::new(server);
    let config = CatalogConfig::builder()
        .api_base_url(BASE_URL)
        .http_client(server.clone())
        .build()
        .unwrap();
    (server, HttpMediaGateway::new(&config))
}

fn empty_server() -> InMemoryMediaServer {
    InMemoryMediaServer::new(BASE_URL, "media")
}

#[tokio::test]
async fn test_create_then_fetch_returns_exactly_one_record() {
    let (_server, gateway) = setup(empty_server());

    let draft = MediaDraft::new(MediaType::Book, "Dune", 1965, 9.0, "Desert planet")
        .with_tags(["scifi", "classic"]);
    let created = gateway
        .create(&draft.into_new_record(now()).unwrap())
        .await
        .unwrap();

    let fetched = gateway.fetch_all().await;
    assert!(fetched.is_ok());
    assert_eq!(fetched.records.len(), 1);

    let record = &fetched.records[0];
    assert_eq!(record.id, created.id);
    assert_eq!(record.title, "Dune");
    assert_eq!(record.media_type, MediaType::Book);
    assert_eq!(record.year, 1965);
    assert_eq!(record.views, 0);
    assert_eq!(record.date_added, Some(now()));
}

#[tokio::test]
async fn test_random_string_ids_round_trip() {
    let (_server, gateway) =
        setup(empty_server().with_id_strategy(IdStrategy::Random));

    let draft = MediaDraft::new(MediaType::Movie, "Heat", 1995, 8.3, "Cops and robbers");
    let created = gateway
        .create(&draft.into_new_record(now()).unwrap())
        .await
        .unwrap();
    assert!(matches!(created.id, MediaId::Text(_)));

    let fields = gateway
        .update(&created.id, &MediaPatch::default().with_favorite(true))
        .await
        .unwrap();
    assert_eq!(fields["favorite"], json!(true));

    gateway.delete(&created.id).await.unwrap();
    assert!(gateway.fetch_all().await.records.is_empty());
}

#[tokio::test]
async fn test_update_returns_full_server_record() {
    let (server, gateway) = setup(empty_server().with_records(vec![json!({
        "id": 1, "type": "movie", "title": "Dune", "year": 2021, "rating": 8.0,
        "views": 0, "watched": false, "director": "Denis Villeneuve"
    })]));

    let patch = MediaPatch::default().with_watched(true).with_views(1);
    let fields = gateway.update(&MediaId::Number(1), &patch).await.unwrap();

    assert_eq!(fields["director"], json!("Denis Villeneuve"));
    assert_eq!(fields["views"], json!(1));

    let requests = server.requests();
    assert_eq!(requests[0].method, HttpMethod::Patch);
    assert_eq!(requests[0].url, "http://localhost:3001/media/1");
    assert_eq!(requests[0].body, Some(json!({"watched": true, "views": 1})));
}

#[tokio::test]
async fn test_delete_unknown_id_is_rejected() {
    let (_server, gateway) = setup(empty_server());

    let err = gateway.delete(&MediaId::Number(404)).await.unwrap_err();
    assert!(matches!(err, SyncError::RemoteRejected { status: 404, .. }));
}

#[tokio::test]
async fn test_failures_are_not_retried() {
    let (server, gateway) = setup(empty_server().with_records(vec![json!({
        "id": 1, "type": "book", "title": "Emma", "year": 1815, "rating": 7.5
    })]));

    server.fail_next(InjectedFailure::Status(503, "busy".into()));
    let err = gateway
        .update(&MediaId::Number(1), &MediaPatch::default().with_favorite(true))
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::RemoteRejected { status: 503, .. }));
    assert_eq!(server.request_count(), 1);

    server.fail_next(InjectedFailure::Transport);
    let err = gateway.delete(&MediaId::Number(1)).await.unwrap_err();
    assert!(matches!(err, SyncError::Transport(_)));
    assert_eq!(server.request_count(), 2);

    // Nothing changed remotely
    assert_eq!(server.items()[0]["favorite"], serde_json::Value::Null);
    assert_eq!(server.items().len(), 1);
}

#[tokio::test]
async fn test_malformed_collection_loads_as_empty() {
    let (server, gateway) = setup(empty_server().with_records(vec![json!({
        "id": 1, "type": "book", "title": "Emma"
    })]));

    server.fail_next(InjectedFailure::Body("<html>proxy error</html>".into()));
    let fetched = gateway.fetch_all().await;
    assert!(fetched.records.is_empty());
    assert!(matches!(fetched.error, Some(SyncError::MalformedResponse(_))));

    let fetched = gateway.fetch_all().await;
    assert_eq!(fetched.records.len(), 1);
}
