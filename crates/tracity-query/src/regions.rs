//! Region alias table and canonicalization.
//!
//! Free text names regions loosely: cities, former names, abbreviations,
//! capitals. Detection matches any alias as a substring of the lower-cased
//! text. Detected keys are then canonicalized into the values actually
//! stored in the `state` field.

use tracing::warn;

use crate::collections::title_word;

/// Canonical region key → surface-form aliases, in detection order.
pub const REGION_ALIASES: &[(&str, &[&str])] = &[
    ("delhi", &["delhi", "new delhi", "ncr"]),
    ("mumbai", &["mumbai", "bombay", "maharashtra"]),
    ("bangalore", &["bangalore", "bengaluru", "karnataka"]),
    ("chennai", &["chennai", "madras", "tamil nadu"]),
    ("kolkata", &["kolkata", "calcutta", "west bengal"]),
    ("hyderabad", &["hyderabad", "telangana"]),
    ("kerala", &["kerala", "kochi", "trivandrum"]),
    ("punjab", &["punjab", "chandigarh"]),
    ("gujarat", &["gujarat", "ahmedabad", "surat"]),
    ("rajasthan", &["rajasthan", "jaipur", "jodhpur"]),
    ("uttar pradesh", &["uttar pradesh", "up", "lucknow", "kanpur"]),
    ("bihar", &["bihar", "patna"]),
    ("andhra pradesh", &["andhra pradesh", "ap", "visakhapatnam"]),
    ("odisha", &["odisha", "orissa", "bhubaneswar"]),
    ("madhya pradesh", &["madhya pradesh", "mp", "bhopal"]),
    ("assam", &["assam", "guwahati"]),
    ("jharkhand", &["jharkhand", "ranchi"]),
    ("haryana", &["haryana", "gurgaon", "faridabad"]),
    ("chhattisgarh", &["chhattisgarh", "raipur"]),
    ("uttarakhand", &["uttarakhand", "dehradun"]),
    ("himachal pradesh", &["himachal pradesh", "shimla"]),
    ("goa", &["goa", "panaji"]),
    ("tripura", &["tripura", "agartala"]),
    ("meghalaya", &["meghalaya", "shillong"]),
    ("manipur", &["manipur", "imphal"]),
    ("nagaland", &["nagaland", "kohima"]),
    ("arunachal pradesh", &["arunachal pradesh", "itanagar"]),
    ("mizoram", &["mizoram", "aizawl"]),
    ("sikkim", &["sikkim", "gangtok"]),
];

/// Metro keys whose records may be stored under more than one name.
const FAN_OUT: &[(&str, &[&str])] = &[
    ("delhi", &["Delhi"]),
    ("mumbai", &["Maharashtra", "Mumbai"]),
    ("bangalore", &["Karnataka", "Bangalore"]),
    ("kerala", &["Kerala"]),
];

/// Every region key with at least one alias in `text_lower`.
pub fn detect(text_lower: &str) -> Vec<String> {
    REGION_ALIASES
        .iter()
        .filter(|(_, aliases)| aliases.iter().any(|alias| text_lower.contains(alias)))
        .map(|(key, _)| key.to_string())
        .collect()
}

/// Stored values for one detected key. Unlisted keys are title-cased.
pub fn canonical_values(key: &str) -> Vec<String> {
    let key = key.trim().to_lowercase();
    if let Some((_, values)) = FAN_OUT.iter().find(|(k, _)| *k == key) {
        return values.iter().map(|v| v.to_string()).collect();
    }
    vec![key.split_whitespace().map(title_word).collect::<Vec<_>>().join(" ")]
}

/// Canonicalize detected keys, keeping every fan-out candidate and
/// dropping duplicates in first-seen order.
pub fn expand(keys: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for key in keys {
        let values = canonical_values(key);
        if values.len() > 1 {
            warn!(
                "Region '{}' is ambiguous, filtering on all of: {}",
                key,
                values.join(", ")
            );
        }
        for value in values {
            if !out.contains(&value) {
                out.push(value);
            }
        }
    }
    out
}
