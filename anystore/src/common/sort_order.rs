use serde::{Deserialize, Serialize};

/// Direction of an order-by clause.
///
/// # Variants
/// - `Ascending`: smallest to largest (A to Z, 0 to 9, oldest to newest)
/// - `Descending`: largest to smallest (Z to A, 9 to 0, newest to oldest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    #[inline]
    pub fn is_ascending(&self) -> bool {
        matches!(self, SortOrder::Ascending)
    }
}
