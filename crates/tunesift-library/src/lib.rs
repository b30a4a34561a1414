//! Songs and the in-memory library that tunesift queries filter.
//!
//! A [`Song`] is a map of lower-case tag names to newline-joined values and implements
//! [`tunesift_query::RecordAccessor`], so any compiled query can be evaluated against it.
//! A [`Library`] loads songs from a JSON file and filters them sequentially, in
//! cancellable chunks, or on the rayon thread pool.

#![warn(missing_docs)]

mod error;
mod library;
mod song;

pub use error::LibraryError;
pub use library::{FilterStats, Library};
pub use song::Song;
