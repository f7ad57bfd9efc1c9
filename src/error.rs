pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Error {
    /// Returned by `ChainHashMap::at` when no entry has an equal key.
    #[error("key not found")]
    KeyNotFound,

    #[error("invalid load factors: min {min}, max {max} (need 0 <= 2 * min <= max, max finite and positive)")]
    InvalidLoadFactors { min: f64, max: f64 },
}
