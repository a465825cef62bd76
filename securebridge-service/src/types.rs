//! Request and response bodies exchanged at the boundary.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyResponse {
    pub public_key: String,
}

/// Successful submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    pub status: String,
    pub record_id: u64,
}

impl SubmitReceipt {
    pub fn success(record_id: u64) -> Self {
        Self {
            status: "success".to_string(),
            record_id,
        }
    }
}

/// Exact-match search request. `national_id` is accepted for older clients.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(alias = "national_id")]
    pub identifier: String,
}

impl std::fmt::Debug for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SearchQuery(<redacted>)")
    }
}

/// Ids of the records whose blind index matched, in ascending order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatches {
    pub count: usize,
    pub matches: Vec<u64>,
}

impl SearchMatches {
    pub fn new(mut ids: Vec<u64>) -> Self {
        ids.sort_unstable();
        Self {
            count: ids.len(),
            matches: ids,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
