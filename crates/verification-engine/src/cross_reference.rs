//! Fraud cross-reference against the listing and file metadata
//!
//! Signals found here are reported to the reviewer as fraud indicators. They
//! never change the fraud-risk score, which comes from declared flags alone.

use crate::extractors::{parse_amount, ExtractedRecord};
use crate::policy::CheckPolicy;
use crate::scoring::{present_fraud_flags, FraudFlag};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use shared_types::ListingRecord;
use std::collections::BTreeMap;

/// A single cross-reference finding
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FraudSignal {
    /// Owner on the document is the agent listing the property
    AgentIsOwner { name: String },

    /// Declared property value is far from the listing price
    ValueDiscrepancy {
        property_value: f64,
        listing_price: f64,
        ratio: f64,
    },

    /// File was modified shortly before upload
    RecentlyModified { modified_at: DateTime<Utc> },

    /// Uploader marked a fraud flag as present
    DeclaredFlag { flag: &'static str },
}

impl FraudSignal {
    pub fn indicator(&self) -> String {
        match self {
            FraudSignal::AgentIsOwner { .. } => {
                "Listing agent appears to be the property owner".to_string()
            }
            FraudSignal::ValueDiscrepancy {
                property_value,
                listing_price,
                ratio,
            } => format!(
                "Significant value discrepancy: property value {:.0} vs listing price {:.0} ({:.0}% difference)",
                property_value,
                listing_price,
                ratio * 100.0
            ),
            FraudSignal::RecentlyModified { modified_at } => format!(
                "Document was recently modified ({})",
                modified_at.format("%Y-%m-%d %H:%M UTC")
            ),
            FraudSignal::DeclaredFlag { flag } => flag_description(flag).to_string(),
        }
    }

    pub fn recommendation(&self) -> Option<&'static str> {
        match self {
            FraudSignal::AgentIsOwner { .. } => Some("Verify property ownership independently"),
            FraudSignal::ValueDiscrepancy { .. } => {
                Some("Cross-reference the listing price with the documented property value")
            }
            FraudSignal::RecentlyModified { .. } => {
                Some("Verify document authenticity with the issuing authority")
            }
            FraudSignal::DeclaredFlag { .. } => None,
        }
    }
}

fn flag_description(key: &str) -> &'static str {
    FraudFlag::ALL
        .iter()
        .find(|flag| flag.key() == key)
        .map(|flag| flag.description())
        .unwrap_or("Declared fraud indicator")
}

/// Case, punctuation and whitespace-insensitive form of a person's name
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '\'' | '.' | '\u{2019}'))
        .flat_map(|c| {
            let folded: Vec<char> = if c.is_alphanumeric() {
                c.to_lowercase().collect()
            } else {
                vec![' ']
            };
            folded
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Everything cross-reference needs for one document
pub struct CrossReferenceInput<'a> {
    pub record: &'a ExtractedRecord,
    pub declared: &'a BTreeMap<String, String>,
    pub listing: Option<&'a ListingRecord>,
    pub modified_at: Option<DateTime<Utc>>,
    pub now: DateTime<Utc>,
}

pub struct CrossReference;

impl CrossReference {
    /// Run all cross-reference checks in a fixed order
    pub fn check(input: &CrossReferenceInput<'_>, checks: &CheckPolicy) -> Vec<FraudSignal> {
        let mut signals = vec![];

        // 1. Declared fraud flags
        for flag in present_fraud_flags(input.declared) {
            signals.push(FraudSignal::DeclaredFlag { flag: flag.key() });
        }

        if let Some(listing) = input.listing {
            // 2. Owner is the listing agent
            if let Some(owner) = Self::value("ownerName", input) {
                let owner_norm = normalize_name(owner);
                if !owner_norm.is_empty() && owner_norm == normalize_name(&listing.agent_name) {
                    signals.push(FraudSignal::AgentIsOwner {
                        name: owner.to_string(),
                    });
                }
            }

            // 3. Property value far from listing price
            if listing.price > 0.0 {
                if let Some(value) = Self::value("propertyValue", input).and_then(parse_amount) {
                    let ratio = (value - listing.price).abs() / listing.price;
                    if ratio > checks.value_discrepancy_ratio {
                        signals.push(FraudSignal::ValueDiscrepancy {
                            property_value: value,
                            listing_price: listing.price,
                            ratio,
                        });
                    }
                }
            }
        }

        // 4. Recently modified file
        if let Some(modified_at) = input.modified_at {
            let age = input.now - modified_at;
            if age >= Duration::zero() && age <= Duration::days(checks.recent_modification_days) {
                signals.push(FraudSignal::RecentlyModified { modified_at });
            }
        }

        signals
    }

    fn value<'a>(name: &str, input: &'a CrossReferenceInput<'_>) -> Option<&'a str> {
        input
            .declared
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .or_else(|| input.record.field(name))
    }
}
