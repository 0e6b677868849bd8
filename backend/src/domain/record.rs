//! Record identities shared by every stored entity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable integer identity assigned by the record store.
///
/// Identities are never reused while a record exists: a store assigns
/// `max(existing) + 1`, or `1` when the collection is empty.
///
/// # Examples
/// ```
/// use inventory::domain::RecordId;
///
/// assert_eq!(RecordId::next_after([]), Some(RecordId::new(1)));
/// assert_eq!(
///     RecordId::next_after([RecordId::new(3), RecordId::new(7)]),
///     Some(RecordId::new(8)),
/// );
/// assert_eq!(RecordId::next_after([RecordId::new(u32::MAX)]), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(u32);

impl RecordId {
    /// Wrap a raw identity.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw integer value.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Identity to assign to the next record created after `existing`.
    ///
    /// Returns `None` once the highest identity is `u32::MAX`.
    pub fn next_after(existing: impl IntoIterator<Item = RecordId>) -> Option<Self> {
        match existing.into_iter().max() {
            Some(highest) => highest.0.checked_add(1).map(Self),
            None => Some(Self(1)),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for RecordId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<RecordId> for u32 {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

/// Implemented by every entity a record store keeps.
pub trait StoredRecord: Clone + Send + Sync + 'static {
    /// Entity name used in error messages and logs.
    const ENTITY: &'static str;

    /// Identity of this record.
    fn id(&self) -> RecordId;
}
