//! Offline action records and sync pass results.

use arise_core::{SyncKind, Timestamp};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Attempts allowed before an action is abandoned.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

/// A server-bound notification waiting for connectivity.
///
/// The id doubles as the idempotency key the server sees as `actionId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfflineAction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SyncKind,
    #[serde(rename = "data")]
    pub payload: serde_json::Value,
    pub timestamp: Timestamp,
    pub retry_count: u32,
    pub max_retries: u32,
}

impl OfflineAction {
    pub fn new(kind: SyncKind, payload: serde_json::Value, now: Timestamp, max_retries: u32) -> Self {
        Self {
            id: action_id(now, &mut rand::thread_rng()),
            kind,
            payload,
            timestamp: now,
            retry_count: 0,
            max_retries,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.retry_count >= self.max_retries
    }
}

/// Builds `action_<millis>_<9 base36 chars>`.
pub fn action_id(now: Timestamp, rng: &mut impl Rng) -> String {
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| char::from(ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())]))
        .collect();
    format!("action_{}_{}", now.as_millis(), suffix)
}

/// An action removed from the queue after exhausting its retries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadLetter {
    pub action: OfflineAction,
    pub reason: String,
    pub abandoned_at: Timestamp,
}

/// Result of one sync pass over the pending queue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// Requests sent during the pass.
    pub attempted: usize,
    pub acknowledged: Vec<String>,
    /// Failed actions kept for another attempt.
    pub retried: Vec<String>,
    pub abandoned: Vec<DeadLetter>,
    /// Queue length after the pass.
    pub remaining: usize,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.retried.is_empty() && self.abandoned.is_empty()
    }
}

/// Storage and queue summary shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfflineStats {
    pub total_snapshots: usize,
    pub pending_actions: usize,
    /// Completion time of the last pass that acknowledged an action.
    pub last_sync: Option<Timestamp>,
    /// Bytes used by the stored queue record.
    pub storage_used: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn ids_carry_millis_and_base36_suffix() {
        let mut rng = StdRng::seed_from_u64(7);
        let id = action_id(Timestamp::from_millis(1_700_000_000_000), &mut rng);

        let suffix = id
            .strip_prefix("action_1700000000000_")
            .expect("millis prefix");
        assert_eq!(suffix.len(), 9);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
        );
    }

    #[test]
    fn wire_shape_matches_server_contract() {
        let action = OfflineAction {
            id: "action_1_abc".into(),
            kind: SyncKind::SkillUnlock,
            payload: serde_json::json!({ "skillId": "algebra" }),
            timestamp: Timestamp::from_millis(1),
            retry_count: 2,
            max_retries: 3,
        };

        let json = serde_json::to_value(&action).unwrap();

        assert_eq!(json["type"], "skill_unlock");
        assert_eq!(json["data"]["skillId"], "algebra");
        assert_eq!(json["retryCount"], 2);
        assert!(!action.is_exhausted());
    }
}
