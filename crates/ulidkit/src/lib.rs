//! Universally Unique Lexicographically Sortable Identifiers.
//!
//! A [`Ulid`] is 128 bits: a 48-bit millisecond timestamp followed by 80
//! random bits, written as 26 Crockford base32 characters that sort in the
//! same order as the timestamps.
//!
//! ```
//! use ulidkit::Ulid;
//!
//! let id = Ulid::new();
//! let text = id.encode();
//! assert_eq!(text.as_str().len(), 26);
//! assert_eq!(Ulid::decode(&text).unwrap(), id);
//! ```
//!
//! For IDs that strictly increase within a millisecond, use
//! [`BasicMonoUlidGenerator`], [`LockMonoUlidGenerator`], or the thread-local
//! `ulid_mono` helper (feature `thread-local`).
#![cfg_attr(docsrs, feature(doc_cfg))]

mod base32;
mod error;
mod generator;
mod id;
mod rand;
#[cfg(feature = "serde")]
mod serde;
mod time;

pub use crate::base32::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::rand::*;
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::time::*;
