use thiserror::Error;

/// Failures surfaced by fallible buffer operations.
///
/// Mutating operations are atomic with respect to these failures: when an
/// operation returns an error, every buffer it touched is still valid and
/// holds exactly the content it held before the call.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The backing storage could not be grown.
    ///
    /// Raised when the allocator declines a reservation or when the requested
    /// size does not fit in `usize`. `requested` is the number of additional
    /// bytes the failed reservation asked for.
    #[error("failed to reserve {requested} additional bytes")]
    Alloc {
        /// Additional bytes the failed reservation asked for.
        requested: usize,
    },

    /// A formatting trait implementation reported failure.
    ///
    /// Only produced when a `Display` (or similar) implementation returns
    /// `core::fmt::Error` of its own accord; running out of memory while
    /// formatting is reported as [`Error::Alloc`] instead.
    #[error("formatting trait implementation failed")]
    Format,
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
