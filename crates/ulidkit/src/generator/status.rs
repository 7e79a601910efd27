use crate::Ulid;

/// Represents the result of attempting to generate a new ULID.
///
/// - [`IdGenStatus::Ready`] indicates a new ID was successfully generated.
/// - [`IdGenStatus::Pending`] means the generator cannot produce an ID that
///   sorts after the last one until the clock advances by `yield_for`
///   milliseconds.
///
/// This allows non-blocking generation loops and clean backoff strategies.
///
/// # Example
///
/// ```
/// use ulidkit::{BasicMonoUlidGenerator, IdGenStatus, SystemClock, ThreadRandom};
///
/// let generator = BasicMonoUlidGenerator::new(SystemClock, ThreadRandom);
/// match generator.next_id() {
///     IdGenStatus::Ready { id } => println!("ID: {id}"),
///     IdGenStatus::Pending { yield_for } => println!("Back off for {yield_for}ms"),
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ULID.
        id: Ulid,
    },
    /// No ID could be generated: either the random field is exhausted for the
    /// current millisecond, or the clock reads earlier than the last ID.
    Pending {
        /// Milliseconds to wait before trying again.
        yield_for: u64,
    },
}

impl IdGenStatus {
    /// Returns the ID if one is ready.
    #[must_use]
    pub const fn ready(self) -> Option<Ulid> {
        match self {
            Self::Ready { id } => Some(id),
            Self::Pending { .. } => None,
        }
    }
}
