//! Required-field completeness

use super::round_score;
use shared_types::KeyFieldMap;
use std::collections::BTreeMap;

/// Completeness reported when a type has no required fields
pub const UNKNOWN_TYPE_COMPLETENESS: u8 = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct Completeness {
    pub score: u8,
    pub missing: Vec<&'static str>,
}

fn has_value(map: &BTreeMap<String, String>, field: &str) -> bool {
    map.get(field).is_some_and(|v| !v.trim().is_empty())
}

/// A required field counts as present if extraction found it or the uploader entered it
pub fn completeness(
    required: &[&'static str],
    key_fields: &KeyFieldMap,
    declared: &BTreeMap<String, String>,
) -> Completeness {
    if required.is_empty() {
        return Completeness {
            score: UNKNOWN_TYPE_COMPLETENESS,
            missing: Vec::new(),
        };
    }

    let missing: Vec<&'static str> = required
        .iter()
        .copied()
        .filter(|field| !has_value(key_fields, field) && !has_value(declared, field))
        .collect();
    let present = required.len() - missing.len();

    Completeness {
        score: round_score(100.0 * present as f64 / required.len() as f64),
        missing,
    }
}
