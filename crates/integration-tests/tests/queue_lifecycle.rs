// Queue Registry end-to-end tests

mod support;

use support::{create_queue, join, spawn_app};
use waitline_core::application::{CreateQueueRequest, UpdateQueueRequest};
use waitline_core::domain::{Page, QueueStatus};
use waitline_core::error::AppError;

#[tokio::test]
async fn create_makes_the_creator_sole_admin() {
    let app = spawn_app().await;

    let queue_id = create_queue(&app, "front-desk", "owner-1", 5).await;

    let view = app.registry.get(&queue_id).await.unwrap();
    assert_eq!(view.name, "front-desk");
    assert_eq!(view.status, QueueStatus::Active);
    assert_eq!(view.current_size, 0);
    assert_eq!(view.admin_ids, vec!["owner-1".to_string()]);
}

#[tokio::test]
async fn duplicate_queue_name_is_a_conflict() {
    let app = spawn_app().await;
    create_queue(&app, "front-desk", "owner-1", 5).await;

    let err = app
        .registry
        .create(
            CreateQueueRequest {
                name: "front-desk".to_string(),
                business_name: "Other Shop".to_string(),
                description: None,
                address: None,
                estimated_service_minutes: 5,
            },
            &"owner-2".to_string(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn get_unknown_queue_is_not_found() {
    let app = spawn_app().await;
    let err = app.registry.get(&"nope".to_string()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn list_defaults_to_active_queues_only() {
    let app = spawn_app().await;
    let active_id = create_queue(&app, "open-line", "owner-1", 5).await;
    let closed_id = create_queue(&app, "closed-line", "owner-1", 5).await;

    app.registry
        .update(
            &closed_id,
            UpdateQueueRequest {
                status: Some(QueueStatus::Closed),
                ..Default::default()
            },
            &"owner-1".to_string(),
        )
        .await
        .unwrap();

    let default_view = app.registry.list(None, Page::default()).await.unwrap();
    assert_eq!(default_view.len(), 1);
    assert_eq!(default_view[0].id, active_id);

    let closed_view = app
        .registry
        .list(Some(QueueStatus::Closed), Page::default())
        .await
        .unwrap();
    assert_eq!(closed_view.len(), 1);
    assert_eq!(closed_view[0].id, closed_id);
}

#[tokio::test]
async fn partial_update_leaves_absent_fields_untouched() {
    let app = spawn_app().await;
    let queue_id = create_queue(&app, "front-desk", "owner-1", 5).await;

    let updated = app
        .registry
        .update(
            &queue_id,
            UpdateQueueRequest {
                estimated_service_minutes: Some(8),
                ..Default::default()
            },
            &"owner-1".to_string(),
        )
        .await
        .unwrap();

    assert_eq!(updated.estimated_service_minutes, 8);
    // Untouched fields survive
    assert_eq!(updated.name, "front-desk");
    assert_eq!(updated.business_name, "Acme Barbers");
    assert!(updated.updated_at.is_some());
}

#[tokio::test]
async fn update_and_delete_are_admin_gated() {
    let app = spawn_app().await;
    let queue_id = create_queue(&app, "front-desk", "owner-1", 5).await;

    let err = app
        .registry
        .update(
            &queue_id,
            UpdateQueueRequest {
                business_name: Some("Takeover".to_string()),
                ..Default::default()
            },
            &"stranger".to_string(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = app
        .registry
        .delete(&queue_id, &"stranger".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    // The actual admin can delete
    app.registry
        .delete(&queue_id, &"owner-1".to_string())
        .await
        .unwrap();
    assert!(matches!(
        app.registry.get(&queue_id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[tokio::test]
async fn delete_cascades_to_entries() {
    let app = spawn_app().await;
    let queue_id = create_queue(&app, "front-desk", "owner-1", 5).await;
    let entry_id = join(&app, &queue_id, "Dana").await;

    app.registry
        .delete(&queue_id, &"owner-1".to_string())
        .await
        .unwrap();

    assert!(matches!(
        app.ledger.get(&entry_id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[tokio::test]
async fn add_admin_full_contract() {
    let app = spawn_app().await;
    let queue_id = create_queue(&app, "front-desk", "owner-1", 5).await;
    app.users.upsert(&"helper".to_string(), None).await.unwrap();

    // Non-admin actor is rejected
    let err = app
        .registry
        .add_admin(&queue_id, &"helper".to_string(), &"stranger".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    // Unknown target user is rejected
    let err = app
        .registry
        .add_admin(&queue_id, &"ghost".to_string(), &"owner-1".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // Happy path
    app.registry
        .add_admin(&queue_id, &"helper".to_string(), &"owner-1".to_string())
        .await
        .unwrap();

    let view = app.registry.get(&queue_id).await.unwrap();
    assert_eq!(
        view.admin_ids,
        vec!["helper".to_string(), "owner-1".to_string()]
    );

    // Adding twice is a conflict
    let err = app
        .registry
        .add_admin(&queue_id, &"helper".to_string(), &"owner-1".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // The new admin can operate the ledger
    let entry_id = join(&app, &queue_id, "Dana").await;
    app.ledger
        .call(&entry_id, &"helper".to_string())
        .await
        .unwrap();
}

#[tokio::test]
async fn current_size_counts_only_the_active_view() {
    let app = spawn_app().await;
    let queue_id = create_queue(&app, "front-desk", "owner-1", 5).await;

    let first = join(&app, &queue_id, "Ann").await;
    let second = join(&app, &queue_id, "Ben").await;
    join(&app, &queue_id, "Cam").await;

    app.ledger.call(&first, &"owner-1".to_string()).await.unwrap();
    app.ledger.serve(&second, &"owner-1".to_string()).await.unwrap();

    // CALLED still counts, SERVED does not
    let view = app.registry.get(&queue_id).await.unwrap();
    assert_eq!(view.current_size, 2);
}
