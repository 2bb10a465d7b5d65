// Tier activation policy

use shutterlist_backend::services::subscription::{can_activate, check_activation};
use shutterlist_backend::{ServiceError, SubscriptionTier};

#[test]
fn test_free_tier_cap_is_five() {
    for count in 0..5 {
        assert!(can_activate(SubscriptionTier::Free, count));
    }
    assert!(!can_activate(SubscriptionTier::Free, 5));
    assert!(!can_activate(SubscriptionTier::Free, 99));
}

#[test]
fn test_paid_tier_is_unlimited() {
    for count in [0, 5, 50, 100_000] {
        assert!(can_activate(SubscriptionTier::Paid, count));
    }
}

#[test]
fn test_quota_error_carries_limit() {
    match check_activation(SubscriptionTier::Free, 5) {
        Err(ServiceError::QuotaExceeded(limit)) => assert_eq!(limit, 5),
        other => panic!("expected QuotaExceeded(5), got {:?}", other),
    }
}

#[test]
fn test_archive_then_activate_cycle() {
    // At the cap a sixth activation fails; archiving one frees a slot
    let mut active_count = 5;
    assert!(check_activation(SubscriptionTier::Free, active_count).is_err());

    active_count -= 1; // archive one listing
    assert!(check_activation(SubscriptionTier::Free, active_count).is_ok());
}
