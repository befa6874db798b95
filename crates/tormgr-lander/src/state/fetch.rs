//! Fetch bookkeeping shared by the cached slices

use std::collections::BTreeMap;

/// Fetch-needed gate of one slice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchState {
    pub is_fetching: bool,
    pub did_invalidate: bool,
    pub err: Option<String>,
}

impl Default for FetchState {
    /// Never fetched: stale until the first fetch completes
    fn default() -> Self {
        Self {
            is_fetching: false,
            did_invalidate: true,
            err: None,
        }
    }
}

impl FetchState {
    /// Busy slices never refetch; idle ones only when stale
    pub fn should_fetch(&self) -> bool {
        if self.is_fetching {
            false
        } else {
            self.did_invalidate
        }
    }

    pub fn begin(self) -> Self {
        Self {
            is_fetching: true,
            ..self
        }
    }

    pub fn complete(self, err: Option<String>) -> Self {
        Self {
            is_fetching: false,
            did_invalidate: false,
            err,
        }
    }

    pub fn invalidate(self) -> Self {
        Self {
            did_invalidate: true,
            ..self
        }
    }
}

/// Identifier of one in-flight async operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OpId(pub u64);

/// Operations currently in flight, with a label for display
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsyncState {
    pub pending: BTreeMap<OpId, String>,
}

impl AsyncState {
    pub fn in_progress(&self) -> bool {
        !self.pending.is_empty()
    }
}
