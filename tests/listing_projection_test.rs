// Projection shapes: owner summary/detail, public branded/unbranded

mod common;

use serde_json::to_value;
use uuid::Uuid;

#[test]
fn test_owner_summary_fields() {
    let graph = common::graph();
    let summary = graph.to_summary();

    assert_eq!(summary.slug, "123-main-street-austin-tx");
    assert_eq!(summary.branded_url, "/p/123-main-street-austin-tx");
    assert_eq!(summary.unbranded_url, "/p/123-main-street-austin-tx/mls");
    assert_eq!(summary.agent_name.as_deref(), Some("Dana Reyes"));
    // First photo by position supplies the card thumbnail
    assert_eq!(
        summary.first_photo_url.as_deref(),
        Some("https://imagedelivery.net/acct/img-0/thumbnail")
    );
}

#[test]
fn test_owner_summary_without_photos() {
    let mut graph = common::graph();
    graph.photos.clear();

    assert_eq!(graph.to_summary().first_photo_url, None);
}

#[test]
fn test_owner_detail_includes_all_video_statuses() {
    let graph = common::graph();
    let detail = graph.to_detail();

    assert_eq!(detail.photos.len(), 2);
    // Owner sees processing videos too
    assert_eq!(detail.videos.len(), 2);
}

#[test]
fn test_public_branded_includes_agent_block() {
    let graph = common::graph();
    let branded = graph.to_public_branded();

    let agent = branded.agent.expect("branded page must carry the agent");
    assert_eq!(agent.name, "Dana Reyes");
    assert_eq!(agent.brokerage_name.as_deref(), Some("Reyes Realty"));
}

#[test]
fn test_public_views_filter_to_ready_videos() {
    let graph = common::graph();

    let branded = graph.to_public_branded();
    assert_eq!(branded.videos.len(), 1);
    assert_eq!(branded.videos[0].status, "ready");
    assert_eq!(branded.videos[0].playback_id.as_deref(), Some("pb-1"));

    let unbranded = graph.to_public_unbranded();
    assert_eq!(unbranded.videos.len(), 1);
    assert_eq!(unbranded.videos[0].status, "ready");
}

#[test]
fn test_unbranded_has_no_agent_key_at_all() {
    let graph = common::graph();

    let branded = to_value(graph.to_public_branded()).unwrap();
    let unbranded = to_value(graph.to_public_unbranded()).unwrap();

    assert!(branded.get("agent").is_some());
    // Absent from the shape, not nulled: optional-field inspection must not
    // leak agent identity into syndication feeds
    assert!(unbranded.get("agent").is_none());
}

#[test]
fn test_photo_order_is_position_ascending() {
    let mut graph = common::graph();
    let listing_id = graph.listing.id;

    // Feed photos out of order; every projection must sort by position
    graph.photos = vec![
        common::photo(listing_id, 2, 0),
        common::photo(listing_id, 0, 1),
        common::photo(listing_id, 1, 2),
    ];

    let detail = graph.to_detail();
    let positions: Vec<i32> = detail.photos.iter().map(|p| p.position).collect();
    assert_eq!(positions, vec![0, 1, 2]);

    let branded = graph.to_public_branded();
    let positions: Vec<i32> = branded.photos.iter().map(|p| p.position).collect();
    assert_eq!(positions, vec![0, 1, 2]);
}

#[test]
fn test_position_ties_keep_insertion_order() {
    let mut graph = common::graph();
    let listing_id = graph.listing.id;

    // Gaps and duplicate positions happen after deletions; insertion order
    // (vector order from the loader) breaks the tie
    let first = common::photo(listing_id, 3, 0);
    let second = common::photo(listing_id, 3, 1);
    let first_id = first.id;
    let second_id = second.id;
    graph.photos = vec![first, second];

    let detail = graph.to_detail();
    assert_eq!(detail.photos[0].id, first_id);
    assert_eq!(detail.photos[1].id, second_id);
}

#[test]
fn test_summary_survives_missing_agent() {
    let user_id = Uuid::new_v4();
    let agent = common::agent(user_id);
    let listing = common::listing(user_id, agent.id, "active");

    let graph = shutterlist_backend::ListingGraph {
        listing,
        agent: None,
        photos: vec![],
        videos: vec![],
    };

    let summary = graph.to_summary();
    assert_eq!(summary.agent_name, None);
}
