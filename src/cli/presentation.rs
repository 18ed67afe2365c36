//! CLI presentation: text and json formatters per command family.

use crate::dag::DirectoryNode;
use crate::error::ApiError;
use crate::pin::PinMode;
use crate::types::ContentId;
use serde_json::json;
use std::collections::BTreeSet;

pub fn format_init_summary(seeded: &[(&str, ContentId)]) -> String {
    let mut output = String::from("Seeded bundled assets:\n");
    for (label, root) in seeded {
        output.push_str(&format!("  ✓ {:<16} {}\n", label, root));
    }
    output.push_str("\nAll roots pinned recursively.");
    output
}

pub fn format_add_summary(root: &ContentId, count: usize) -> String {
    format!("Added {} file(s)\n  Root: {} (pinned)", count, root)
}

pub fn format_directory_listing(dir: &DirectoryNode) -> String {
    if dir.is_empty() {
        return "(empty directory)".to_string();
    }
    dir.entries()
        .iter()
        .map(|entry| format!("{}  {}", entry.target, entry.name))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_pin_list_text(pins: &[(ContentId, PinMode)]) -> String {
    if pins.is_empty() {
        return "No pins.".to_string();
    }
    pins.iter()
        .map(|(id, mode)| format!("{} {}", id, mode))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_pin_list_json(pins: &[(ContentId, PinMode)]) -> Result<String, ApiError> {
    let records: Vec<_> = pins
        .iter()
        .map(|(id, mode)| json!({ "id": id.to_hex(), "mode": mode }))
        .collect();
    serde_json::to_string_pretty(&json!({ "pins": records }))
        .map_err(|e| ApiError::InvalidArgument(format!("Failed to render pins: {}", e)))
}

pub fn format_live_set(live: &BTreeSet<ContentId>) -> String {
    let mut output = format!("Live objects: {}", live.len());
    for id in live {
        output.push_str(&format!("\n  {}", id));
    }
    output
}
