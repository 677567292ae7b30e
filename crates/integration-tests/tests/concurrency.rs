// Races the join and call paths against themselves

mod support;

use support::{create_queue, join, spawn_app};
use waitline_core::application::JoinRequest;
use waitline_core::error::AppError;

#[tokio::test]
async fn concurrent_joins_get_distinct_contiguous_positions() {
    let app = spawn_app().await;
    let queue_id = create_queue(&app, "front-desk", "owner-1", 5).await;

    let mut handles = Vec::new();
    for i in 0..10 {
        let ledger = app.ledger.clone();
        let queue_id = queue_id.clone();
        handles.push(tokio::spawn(async move {
            ledger
                .join(JoinRequest {
                    queue_id,
                    customer_name: format!("customer-{i}"),
                    phone_number: "+12025550123".to_string(),
                    party_size: 1,
                })
                .await
        }));
    }

    let mut positions = Vec::new();
    for handle in handles {
        let view = handle.await.unwrap().unwrap();
        positions.push(view.position);
    }

    positions.sort_unstable();
    assert_eq!(positions, (1..=10).collect::<Vec<i64>>());
}

#[tokio::test]
async fn concurrent_calls_on_one_entry_have_a_single_winner() {
    let app = spawn_app().await;
    let queue_id = create_queue(&app, "front-desk", "owner-1", 5).await;
    let entry_id = join(&app, &queue_id, "Ann").await;

    let mut handles = Vec::new();
    for _ in 0..2 {
        let ledger = app.ledger.clone();
        let entry_id = entry_id.clone();
        handles.push(tokio::spawn(async move {
            ledger.call(&entry_id, &"owner-1".to_string()).await
        }));
    }

    let mut wins = 0;
    let mut losses = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => wins += 1,
            Err(AppError::InvalidState(_)) => losses += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(wins, 1);
    assert_eq!(losses, 1);
}

#[tokio::test]
async fn concurrent_serve_and_cancel_leave_one_terminal_state() {
    let app = spawn_app().await;
    let queue_id = create_queue(&app, "front-desk", "owner-1", 5).await;
    let entry_id = join(&app, &queue_id, "Ann").await;

    let serve = {
        let ledger = app.ledger.clone();
        let entry_id = entry_id.clone();
        tokio::spawn(async move { ledger.serve(&entry_id, &"owner-1".to_string()).await })
    };
    let cancel = {
        let ledger = app.ledger.clone();
        let entry_id = entry_id.clone();
        tokio::spawn(async move { ledger.cancel(&entry_id).await })
    };

    let results = [serve.await.unwrap().is_ok(), cancel.await.unwrap().is_ok()];
    assert_eq!(results.iter().filter(|ok| **ok).count(), 1);

    let view = app.ledger.get(&entry_id).await.unwrap();
    assert!(view.status.is_terminal());
}
