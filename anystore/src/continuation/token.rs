use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Typed pagination state that a backend carries between pages.
///
/// Each backend picks its own shape (offset-based, native cursor, page number)
/// and shares the same encode/decode contract through
/// [`ContinuationTokenEncoder`](crate::continuation::ContinuationTokenEncoder).
pub trait ContinuationState: Serialize + DeserializeOwned + Send + Sync {
    /// Returns `false` for a structurally valid payload with impossible values.
    fn is_valid(&self) -> bool {
        true
    }
}

/// Cursor for the offset-based reference scheme.
///
/// `limit` is captured from the first page so the token is self-describing:
/// later pages keep the original page size whatever the caller passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OffsetToken {
    #[serde(rename = "l")]
    limit: usize,
    #[serde(rename = "o")]
    offset: usize,
}

impl OffsetToken {
    pub fn new(limit: usize, offset: usize) -> Self {
        OffsetToken { limit, offset }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The token for the page following this one.
    pub fn next(&self) -> OffsetToken {
        OffsetToken {
            limit: self.limit,
            offset: self.offset.saturating_add(self.limit),
        }
    }
}

impl ContinuationState for OffsetToken {
    fn is_valid(&self) -> bool {
        self.limit > 0
    }
}
