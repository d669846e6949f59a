use serde_json::{Map, Value};

use crate::cleaner::{classify, is_clean_marker};
use crate::models::{DeltaReport, Document, ProjectDelta};

/// Sentinel every image payload and image marker normalizes to before
/// comparison, so "same item, differently cleaned" never looks like new data
const NORMALIZED_IMAGE: &str = "[IMAGE]";

/// Compare the current document against a destructively simulated backup
/// and report everything current has that the backup doesn't.
///
/// Projects absent from the backup are new wholesale. For shared projects
/// the backup history is expected to be a prefix of the current one (new
/// items are appended); the items past that prefix are the project's new
/// items, in order. Histories where the prefix assumption fails are flagged
/// `diverged` and matched conservatively instead: an unmatched current item
/// counts as new (never dropped), matching never reorders.
pub fn diff(current: &Document, backup_destructive: &Document) -> DeltaReport {
    let mut report = DeltaReport::default();

    for (project_id, _) in current.projects() {
        if !backup_destructive.contains_project(project_id) {
            report.new_projects.push(project_id.clone());
            continue;
        }

        static EMPTY: Vec<Value> = Vec::new();
        let cur = current.history(project_id).unwrap_or(&EMPTY);
        let bak = backup_destructive.history(project_id).unwrap_or(&EMPTY);

        let delta = diff_history(project_id, cur, bak);
        if !delta.new_items.is_empty() || delta.diverged {
            report.changed.push(delta);
        }
    }

    report
}

fn diff_history(project_id: &str, cur: &[Value], bak: &[Value]) -> ProjectDelta {
    let cur_norm: Vec<Value> = cur.iter().map(normalize_item).collect();
    let bak_norm: Vec<Value> = bak.iter().map(normalize_item).collect();

    // Common case: the backup is a strict prefix of current
    if cur_norm.len() >= bak_norm.len() && cur_norm[..bak_norm.len()] == bak_norm[..] {
        return ProjectDelta {
            project: project_id.to_string(),
            new_items: cur[bak_norm.len()..].to_vec(),
            diverged: false,
        };
    }

    // Diverged: older entries were edited or removed. Match current items
    // against backup items in order; whatever finds no counterpart is new.
    let mut new_items = Vec::new();
    let mut bak_cursor = 0;
    for (item, item_norm) in cur.iter().zip(&cur_norm) {
        match bak_norm[bak_cursor..].iter().position(|b| b == item_norm) {
            Some(offset) => bak_cursor += offset + 1,
            None => new_items.push(item.clone()),
        }
    }

    ProjectDelta { project: project_id.to_string(), new_items, diverged: true }
}

/// Rebuild an item with every image payload or image marker string collapsed
/// to one sentinel, leaving all other content intact
fn normalize_item(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut rebuilt = Map::new();
            for (key, child) in map {
                rebuilt.insert(key.clone(), normalize_item(child));
            }
            Value::Object(rebuilt)
        }
        Value::Array(items) => Value::Array(items.iter().map(normalize_item).collect()),
        Value::String(s) if classify(s).is_some() || is_clean_marker(s) => {
            Value::String(NORMALIZED_IMAGE.to_string())
        }
        other => other.clone(),
    }
}
