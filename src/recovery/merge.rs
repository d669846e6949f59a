use crate::models::{DeltaReport, Document};

/// Combine the image-recovered backup with everything the delta found in
/// the current document.
///
/// The backup's projects come first, in backup order, with the delta's new
/// items appended to each history in current-document order. Projects the
/// delta marked new are copied wholesale from current and appended after.
/// Projects that exist only in the backup are kept as-is, so nothing from
/// either side is dropped, and nothing already represented is added twice.
/// For diverged projects the backup's overlapping region wins; the
/// comparator already restricted their new items to what the backup could
/// not account for.
pub fn merge(backup_lossless: &Document, delta: &DeltaReport, current: &Document) -> Document {
    let mut merged = backup_lossless.clone();

    for project_delta in &delta.changed {
        if project_delta.new_items.is_empty() {
            continue;
        }
        if merged.append_history(&project_delta.project, project_delta.new_items.iter().cloned())
        {
            continue;
        }
        // The backup's record can't carry history (not an object, or its
        // history key is not an array). The new items came out of current,
        // so keep current's whole record rather than dropping them.
        if let Some(record) = current.project(&project_delta.project) {
            eprintln!(
                "Warning: backup record for {} cannot hold history; \
                 keeping the current document's record",
                project_delta.project
            );
            merged.insert_project(project_delta.project.clone(), record.clone());
        }
    }

    for project_id in &delta.new_projects {
        if let Some(record) = current.project(project_id) {
            merged.insert_project(project_id.clone(), record.clone());
        }
    }

    merged
}
