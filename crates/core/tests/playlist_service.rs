//! Playlist service integration tests over the in-memory repository.

mod support;

use std::sync::Arc;

use learnarc_core::PlaylistService;
use learnarc_domain::LearnArcError;
use support::{video, MemoryPlaylistRepository};

fn service() -> PlaylistService {
    PlaylistService::new(Arc::new(MemoryPlaylistRepository::default()))
}

#[tokio::test]
async fn created_playlist_is_empty_and_immediately_listed() {
    let service = service();
    let playlist = service.create("Rust basics", "getting started").await.unwrap();

    assert!(playlist.videos.is_empty());

    let listed = service.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, playlist.id);
}

#[tokio::test]
async fn create_rejects_blank_names() {
    let service = service();
    let err = service.create("   ", "").await.unwrap_err();
    assert!(matches!(err, LearnArcError::InvalidInput(_)));
}

#[tokio::test]
async fn add_video_dedups_and_moves_to_end() {
    let service = service();
    let playlist = service.create("Rust", "").await.unwrap();

    service.add_video(playlist.id, video("a")).await.unwrap();
    service.add_video(playlist.id, video("b")).await.unwrap();
    let updated = service.add_video(playlist.id, video("a")).await.unwrap();

    let ids: Vec<&str> = updated.videos.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
}

#[tokio::test]
async fn remove_video_errors_when_absent() {
    let service = service();
    let playlist = service.create("Rust", "").await.unwrap();
    service.add_video(playlist.id, video("a")).await.unwrap();

    let updated = service.remove_video(playlist.id, "a").await.unwrap();
    assert!(updated.videos.is_empty());

    let err = service.remove_video(playlist.id, "a").await.unwrap_err();
    assert!(matches!(err, LearnArcError::NotFound(_)));
}

#[tokio::test]
async fn update_changes_only_provided_fields() {
    let service = service();
    let playlist = service.create("Rust", "original").await.unwrap();

    let updated = service.update(playlist.id, Some("Advanced Rust".into()), None).await.unwrap();
    assert_eq!(updated.name, "Advanced Rust");
    assert_eq!(updated.description, "original");
}

#[tokio::test]
async fn operations_on_missing_playlist_return_not_found() {
    let service = service();
    let id = uuid::Uuid::new_v4();

    assert!(matches!(service.get(id).await.unwrap_err(), LearnArcError::NotFound(_)));
    assert!(matches!(service.delete(id).await.unwrap_err(), LearnArcError::NotFound(_)));
    assert!(matches!(
        service.add_video(id, video("a")).await.unwrap_err(),
        LearnArcError::NotFound(_)
    ));
}
