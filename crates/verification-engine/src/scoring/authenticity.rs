//! Authenticity score from declared check flags

use super::clamp_score;
use super::flags::AuthenticityFlag;
use crate::policy::AuthenticityPolicy;
use std::collections::BTreeMap;

fn delta(policy: &AuthenticityPolicy, flag: AuthenticityFlag) -> i32 {
    match flag {
        AuthenticityFlag::DigitalSignature => policy.digital_signature,
        AuthenticityFlag::OfficialStamp => policy.official_stamp,
        AuthenticityFlag::ConsistentFormatting => policy.consistent_formatting,
        AuthenticityFlag::SuspiciousPatterns => policy.suspicious_patterns,
        AuthenticityFlag::InconsistentData => policy.inconsistent_data,
    }
}

pub fn authenticity_score(declared: &BTreeMap<String, String>, policy: &AuthenticityPolicy) -> u8 {
    let total = AuthenticityFlag::ALL
        .iter()
        .filter(|flag| flag.is_set(declared))
        .fold(policy.base as i64, |acc, flag| acc + delta(policy, *flag) as i64);
    clamp_score(total)
}
