//! Fraud-risk score from declared fraud flags

use super::clamp_score;
use super::flags::FraudFlag;
use crate::policy::FraudPolicy;
use std::collections::BTreeMap;

fn delta(policy: &FraudPolicy, flag: FraudFlag) -> i32 {
    match flag {
        FraudFlag::SuspiciousOwnership => policy.suspicious_ownership,
        FraudFlag::RecentTransfer => policy.recent_transfer,
        FraudFlag::UnrealisticValue => policy.unrealistic_value,
        FraudFlag::ExpiredDocument => policy.expired_document,
        FraudFlag::UnauthorizedIssuer => policy.unauthorized_issuer,
        FraudFlag::InconsistentData => policy.inconsistent_data,
        FraudFlag::MismatchedAddress => policy.mismatched_address,
    }
}

/// Flags the uploader marked as present, in declaration order of [`FraudFlag::ALL`]
pub fn present_fraud_flags(declared: &BTreeMap<String, String>) -> Vec<FraudFlag> {
    FraudFlag::ALL
        .iter()
        .copied()
        .filter(|flag| flag.is_set(declared))
        .collect()
}

pub fn fraud_risk_score(declared: &BTreeMap<String, String>, policy: &FraudPolicy) -> u8 {
    let total = present_fraud_flags(declared)
        .into_iter()
        .fold(policy.base as i64, |acc, flag| acc + delta(policy, flag) as i64);
    clamp_score(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_base_risk() {
        assert_eq!(fraud_risk_score(&BTreeMap::new(), &FraudPolicy::default()), 20);
    }

    #[test]
    fn test_single_flag() {
        let fields = declared(&[("unauthorizedIssuer", "true")]);
        assert_eq!(fraud_risk_score(&fields, &FraudPolicy::default()), 55);
    }

    #[test]
    fn test_flags_clamp_at_100() {
        let fields = declared(&[
            ("suspiciousOwnership", "true"),
            ("recentTransfer", "true"),
            ("unrealisticValue", "true"),
            ("mismatchedAddress", "true"),
        ]);
        assert_eq!(fraud_risk_score(&fields, &FraudPolicy::default()), 100);
    }

    #[test]
    fn test_present_flags_in_fixed_order() {
        let fields = declared(&[("mismatchedAddress", "y"), ("suspiciousOwnership", "TRUE")]);
        assert_eq!(
            present_fraud_flags(&fields),
            vec![FraudFlag::SuspiciousOwnership, FraudFlag::MismatchedAddress]
        );
    }
}
