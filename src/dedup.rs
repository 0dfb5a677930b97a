use std::collections::HashMap;

use tracing::warn;

use crate::domain::Record;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub kept: String,
    pub dropped: String,
}

pub fn dedup_by_sequence(records: Vec<Record>) -> (Vec<Record>, Vec<Collision>) {
    let mut first_by_seq = HashMap::<String, String>::with_capacity(records.len());
    let mut kept = Vec::with_capacity(records.len());
    let mut collisions = Vec::new();

    for record in records {
        if let Some(first) = first_by_seq.get(&record.seq) {
            warn!(
                "removing duplicate sequence {} (same as {first})",
                record.id
            );
            collisions.push(Collision {
                kept: first.clone(),
                dropped: record.id,
            });
            continue;
        }
        first_by_seq.insert(record.seq.clone(), record.id.clone());
        kept.push(record);
    }

    (kept, collisions)
}
