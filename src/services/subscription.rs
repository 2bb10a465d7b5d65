// Subscription tier policy
// SL-41: free accounts are capped at 5 simultaneously active listings

use crate::models::user::SubscriptionTier;
use crate::utils::service_error::ServiceError;

/// Decide whether an account may bring one more listing into the active
/// state. Invoked on listing creation and on any non-active -> active
/// transition; archiving never consults this.
pub fn can_activate(tier: SubscriptionTier, active_count: i64) -> bool {
    match tier.max_active_listings() {
        None => true,
        Some(limit) => active_count < limit as i64,
    }
}

/// Enforce the activation policy, mapping a violation to the quota error
/// that carries the limit for user messaging.
pub fn check_activation(tier: SubscriptionTier, active_count: i64) -> Result<(), ServiceError> {
    if can_activate(tier, active_count) {
        Ok(())
    } else {
        // Only capped tiers can fail the check, so the limit is present here
        let limit = tier.max_active_listings().unwrap_or(0);
        Err(ServiceError::QuotaExceeded(limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_tier_under_limit() {
        for count in 0..5 {
            assert!(can_activate(SubscriptionTier::Free, count));
        }
    }

    #[test]
    fn test_free_tier_at_limit() {
        assert!(!can_activate(SubscriptionTier::Free, 5));
        assert!(!can_activate(SubscriptionTier::Free, 6));
    }

    #[test]
    fn test_paid_tier_unlimited() {
        assert!(can_activate(SubscriptionTier::Paid, 0));
        assert!(can_activate(SubscriptionTier::Paid, 5));
        assert!(can_activate(SubscriptionTier::Paid, 10_000));
    }

    #[test]
    fn test_check_activation_error_carries_limit() {
        let err = check_activation(SubscriptionTier::Free, 5).unwrap_err();
        match err {
            ServiceError::QuotaExceeded(limit) => assert_eq!(limit, 5),
            other => panic!("expected QuotaExceeded, got {:?}", other),
        }
    }
}
