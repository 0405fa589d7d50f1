//! Boolean check flags declared by the uploader or a prior review step

use std::collections::BTreeMap;

/// Whether a declared value reads as "true"
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    )
}

/// Flags that move the authenticity score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticityFlag {
    DigitalSignature,
    OfficialStamp,
    ConsistentFormatting,
    SuspiciousPatterns,
    InconsistentData,
}

impl AuthenticityFlag {
    pub const ALL: [AuthenticityFlag; 5] = [
        AuthenticityFlag::DigitalSignature,
        AuthenticityFlag::OfficialStamp,
        AuthenticityFlag::ConsistentFormatting,
        AuthenticityFlag::SuspiciousPatterns,
        AuthenticityFlag::InconsistentData,
    ];

    pub fn key(self) -> &'static str {
        match self {
            AuthenticityFlag::DigitalSignature => "hasDigitalSignature",
            AuthenticityFlag::OfficialStamp => "hasOfficialStamp",
            AuthenticityFlag::ConsistentFormatting => "consistentFormatting",
            AuthenticityFlag::SuspiciousPatterns => "suspiciousPatterns",
            AuthenticityFlag::InconsistentData => "inconsistentData",
        }
    }

    pub fn is_set(self, declared: &BTreeMap<String, String>) -> bool {
        declared.get(self.key()).is_some_and(|v| is_truthy(v))
    }
}

/// Named fraud indicators that add to the fraud-risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FraudFlag {
    SuspiciousOwnership,
    RecentTransfer,
    UnrealisticValue,
    ExpiredDocument,
    UnauthorizedIssuer,
    InconsistentData,
    MismatchedAddress,
}

impl FraudFlag {
    pub const ALL: [FraudFlag; 7] = [
        FraudFlag::SuspiciousOwnership,
        FraudFlag::RecentTransfer,
        FraudFlag::UnrealisticValue,
        FraudFlag::ExpiredDocument,
        FraudFlag::UnauthorizedIssuer,
        FraudFlag::InconsistentData,
        FraudFlag::MismatchedAddress,
    ];

    pub fn key(self) -> &'static str {
        match self {
            FraudFlag::SuspiciousOwnership => "suspiciousOwnership",
            FraudFlag::RecentTransfer => "recentTransfer",
            FraudFlag::UnrealisticValue => "unrealisticValue",
            FraudFlag::ExpiredDocument => "expiredDocument",
            FraudFlag::UnauthorizedIssuer => "unauthorizedIssuer",
            FraudFlag::InconsistentData => "inconsistentData",
            FraudFlag::MismatchedAddress => "mismatchedAddress",
        }
    }

    /// Reviewer-facing description used in fraud indicator lists
    pub fn description(self) -> &'static str {
        match self {
            FraudFlag::SuspiciousOwnership => "Suspicious ownership history",
            FraudFlag::RecentTransfer => "Property was transferred recently",
            FraudFlag::UnrealisticValue => "Declared value is unrealistic",
            FraudFlag::ExpiredDocument => "Document has expired",
            FraudFlag::UnauthorizedIssuer => "Issuer is not an authorized body",
            FraudFlag::InconsistentData => "Document data is internally inconsistent",
            FraudFlag::MismatchedAddress => "Address does not match the listing",
        }
    }

    pub fn is_set(self, declared: &BTreeMap<String, String>) -> bool {
        declared.get(self.key()).is_some_and(|v| is_truthy(v))
    }

    /// Whether the uploader said anything at all about this check
    pub fn is_declared(self, declared: &BTreeMap<String, String>) -> bool {
        declared
            .get(self.key())
            .is_some_and(|v| !v.trim().is_empty())
    }
}
