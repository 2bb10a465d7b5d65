// Photo capacity gate and ordering rules

mod common;

use std::collections::HashSet;
use uuid::Uuid;

use shutterlist_backend::services::photo::{
    admit_and_upload, ensure_photo_capacity, next_position, order_assignments,
    MAX_PHOTOS_PER_LISTING,
};
use shutterlist_backend::ServiceError;

#[test]
fn test_append_positions_are_zero_based_counts() {
    assert_eq!(next_position(0), 0);
    assert_eq!(next_position(1), 1);
    assert_eq!(next_position(49), 49);
}

#[test]
fn test_capacity_boundary() {
    assert!(ensure_photo_capacity(MAX_PHOTOS_PER_LISTING - 1).is_ok());
    assert!(matches!(
        ensure_photo_capacity(MAX_PHOTOS_PER_LISTING),
        Err(ServiceError::LimitExceeded(_))
    ));
}

#[tokio::test]
async fn test_full_listing_never_reaches_provider() {
    let host = common::RecordingImageHost::default();

    let result = admit_and_upload(
        MAX_PHOTOS_PER_LISTING,
        &host,
        vec![0xFF, 0xD8],
        "kitchen.jpg".to_string(),
    )
    .await;

    assert!(matches!(result, Err(ServiceError::LimitExceeded(_))));
    // The rejection happened before any provider call
    assert_eq!(host.upload_count(), 0);
}

#[tokio::test]
async fn test_admitted_upload_reaches_provider_once() {
    let host = common::RecordingImageHost::default();

    let uploaded = admit_and_upload(3, &host, vec![0xFF, 0xD8], "porch.jpg".to_string())
        .await
        .unwrap();

    assert_eq!(host.upload_count(), 1);
    assert_eq!(uploaded.provider_id, "img-mock");
}

#[test]
fn test_reorder_assigns_submitted_indexes() {
    let p1 = Uuid::new_v4();
    let p2 = Uuid::new_v4();
    let p3 = Uuid::new_v4();
    let owned: HashSet<Uuid> = [p1, p2, p3].into_iter().collect();

    let assignments = order_assignments(&owned, &[p3, p1, p2]);
    assert_eq!(assignments, vec![(p3, 0), (p1, 1), (p2, 2)]);
}

#[test]
fn test_reorder_swap_two_photos() {
    // Listing holds [p1(pos0), p2(pos1)]; submitting [p2, p1] swaps them
    let p1 = Uuid::new_v4();
    let p2 = Uuid::new_v4();
    let owned: HashSet<Uuid> = [p1, p2].into_iter().collect();

    let assignments = order_assignments(&owned, &[p2, p1]);
    assert_eq!(assignments, vec![(p2, 0), (p1, 1)]);
}

#[test]
fn test_reorder_ignores_foreign_ids_silently() {
    let p1 = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let owned: HashSet<Uuid> = [p1].into_iter().collect();

    // The foreign id is skipped, not an error; p1 keeps its submitted index
    let assignments = order_assignments(&owned, &[stranger, p1]);
    assert_eq!(assignments, vec![(p1, 1)]);
}

#[test]
fn test_reorder_with_empty_submission() {
    let owned: HashSet<Uuid> = [Uuid::new_v4()].into_iter().collect();
    assert!(order_assignments(&owned, &[]).is_empty());
}
