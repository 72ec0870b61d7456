use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid key {0:?}: keys need at least one non-empty segment and no empty segments")]
    InvalidKey(String),

    /// Writing `key` would turn the existing node at `at` from a leaf into a
    /// branch (or the reverse) while the store rejects collisions.
    #[error("key {key:?} collides with existing {existing} at {at:?}")]
    PathConflict {
        key:      String,
        at:       String,
        existing: &'static str,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;
