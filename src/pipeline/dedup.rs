use super::record::{CanonicalRecord, RawRecord, RecordKey};
use super::status::{StatusRanker, StatusTier};
use std::collections::HashMap;
use tracing::debug;

/// Column names forming the composite identity of a record.
#[derive(Debug, Clone, Copy)]
pub struct KeyFields<'a> {
    pub subject: &'a str,
    pub position: &'a str,
}

impl<'a> KeyFields<'a> {
    pub fn new(subject: &'a str, position: &'a str) -> Self {
        Self { subject, position }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DedupOutcome {
    pub records: Vec<CanonicalRecord>,
    /// Rows dropped because a key component was missing or blank.
    pub missing_key: usize,
    /// Rows that lost to a better-ranked row sharing their key.
    pub superseded: usize,
}

/// Collapses rows sharing a composite key down to the best-ranked one.
#[derive(Debug, Clone, Default)]
pub struct Deduplicator {
    ranker: StatusRanker,
}

struct Slot<'r> {
    input_index: usize,
    key: RecordKey,
    record: &'r RawRecord,
    tier: StatusTier,
}

impl Deduplicator {
    pub fn new(ranker: StatusRanker) -> Self {
        Self { ranker }
    }

    /// Keeps the lowest-ranked status per key; the first row seen wins ties.
    ///
    /// Output follows the input position of each winning row.
    pub fn deduplicate(
        &self,
        records: &[RawRecord],
        key_fields: KeyFields<'_>,
        status_field: &str,
    ) -> DedupOutcome {
        let mut slots: Vec<Slot<'_>> = Vec::new();
        let mut by_key: HashMap<RecordKey, usize> = HashMap::new();
        let mut missing_key = 0;

        for (input_index, record) in records.iter().enumerate() {
            let Some(key) = record_key(record, key_fields) else {
                debug!(
                    row_number = record.row_number(),
                    "dropping row with blank composite key"
                );
                missing_key += 1;
                continue;
            };

            let tier = self.ranker.tier(record.text(status_field).as_deref());
            match by_key.get(&key) {
                Some(&slot_index) => {
                    let slot = &mut slots[slot_index];
                    if tier.rank() < slot.tier.rank() {
                        slot.input_index = input_index;
                        slot.record = record;
                        slot.tier = tier;
                    }
                }
                None => {
                    by_key.insert(key.clone(), slots.len());
                    slots.push(Slot {
                        input_index,
                        key,
                        record,
                        tier,
                    });
                }
            }
        }

        let superseded = records.len() - missing_key - slots.len();
        slots.sort_by_key(|slot| slot.input_index);

        DedupOutcome {
            records: slots
                .into_iter()
                .map(|slot| CanonicalRecord::new(slot.record.clone(), slot.key, slot.tier))
                .collect(),
            missing_key,
            superseded,
        }
    }
}

fn record_key(record: &RawRecord, fields: KeyFields<'_>) -> Option<RecordKey> {
    let subject = record.text(fields.subject)?;
    let position = record.text(fields.position)?;
    Some(RecordKey { subject, position })
}
