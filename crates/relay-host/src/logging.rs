//! Hash-chained event log
//!
//! Units emit events through their call context. Each record links to its
//! predecessor by SHA-256 digest so that any edit to committed history is
//! detectable with [`EventLog::verify_integrity`]. Records emitted inside a
//! frame that later fails are discarded together with the frame's storage
//! writes.

use crate::error::LogError;
use relay_abi::Address;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One emitted event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub sequence: u64,
    pub emitter: Address,
    pub topic: String,
    pub data: serde_json::Value,
    pub prev_hash: [u8; 32],
    pub hash: [u8; 32],
}

impl EventRecord {
    /// Digest prefix for display
    #[must_use]
    pub fn short_hash(&self) -> String {
        hex::encode(&self.hash[..8])
    }
}

#[derive(Debug, Default, Clone)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    pub fn append(&mut self, emitter: Address, topic: &str, data: serde_json::Value) -> u64 {
        let prev_hash = self.records.last().map_or([0u8; 32], |r| r.hash);
        let mut record = EventRecord {
            sequence: self.records.len() as u64,
            emitter,
            topic: topic.to_string(),
            data,
            prev_hash,
            hash: [0u8; 32],
        };
        record.hash = compute_hash(&record);
        let sequence = record.sequence;
        self.records.push(record);
        sequence
    }

    /// Drop every record from `len` on; the remaining chain stays valid
    pub(crate) fn truncate(&mut self, len: usize) {
        self.records.truncate(len);
    }

    #[must_use]
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records with `topic` emitted by `emitter`, oldest first
    pub fn by_topic<'a>(
        &'a self,
        emitter: Address,
        topic: &'a str,
    ) -> impl Iterator<Item = &'a EventRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| r.emitter == emitter && r.topic == topic)
    }

    /// Check every chain link and digest
    ///
    /// # Errors
    /// Returns the index of the first record that does not verify
    pub fn verify_integrity(&self) -> Result<(), LogError> {
        let mut prev = [0u8; 32];
        for (index, record) in self.records.iter().enumerate() {
            if record.prev_hash != prev || record.hash != compute_hash(record) {
                return Err(LogError::IntegrityViolation { index });
            }
            prev = record.hash;
        }
        Ok(())
    }
}

fn compute_hash(record: &EventRecord) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(record.sequence.to_le_bytes());
    hasher.update(record.emitter.as_bytes());
    hasher.update(record.topic.as_bytes());
    hasher.update([0]);
    hasher.update(record.data.to_string().as_bytes());
    hasher.update([0]);
    hasher.update(record.prev_hash);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_log() -> EventLog {
        let mut log = EventLog::default();
        let emitter = Address::from_label("frontend");
        log.append(emitter, "Upgraded", json!({ "backend": "0x01" }));
        log.append(emitter, "AdminChanged", json!({ "previous": "0x02", "new": "0x03" }));
        log
    }

    #[test]
    fn appended_records_chain() {
        let log = sample_log();
        assert_eq!(log.len(), 2);
        assert_eq!(log.records()[0].prev_hash, [0u8; 32]);
        assert_eq!(log.records()[1].prev_hash, log.records()[0].hash);
        assert!(log.verify_integrity().is_ok());
    }

    #[test]
    fn detects_edited_payload() {
        let mut log = sample_log();
        log.records[1].data = json!({ "previous": "0x02", "new": "0xff" });
        assert_eq!(
            log.verify_integrity(),
            Err(LogError::IntegrityViolation { index: 1 })
        );
    }

    #[test]
    fn detects_broken_link() {
        let mut log = sample_log();
        log.records[0].hash[0] ^= 1;
        assert_eq!(
            log.verify_integrity(),
            Err(LogError::IntegrityViolation { index: 0 })
        );
    }

    #[test]
    fn filters_by_emitter_and_topic() {
        let log = sample_log();
        let emitter = Address::from_label("frontend");
        assert_eq!(log.by_topic(emitter, "Upgraded").count(), 1);
        assert_eq!(log.by_topic(Address::ZERO, "Upgraded").count(), 0);
    }
}
