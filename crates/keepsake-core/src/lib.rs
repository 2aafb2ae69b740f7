//! # Keepsake Core
//!
//! Pure primitives for keepsake: codecs, record frames, and the identity
//! types that scope a store on disk.
//!
//! This crate contains no I/O. It turns values into bytes and back, and
//! validates the names that later become directory components.
//!
//! ## Key Types
//!
//! - [`Codec`] - Capability interface for turning an entity into bytes
//! - [`JsonCodec`] / [`CborCodec`] - serde-backed codecs
//! - [`Seq`] - Monotonic per-store sequence number
//! - [`UserNamespace`] / [`StoreKind`] - Validated path components
//!
//! ## Record Frames
//!
//! History records are wrapped in a checksummed envelope before they hit the
//! disk. See the [`frame`] module.

pub mod codec;
pub mod error;
pub mod frame;
pub mod types;

pub use codec::{CborCodec, Codec, JsonCodec};
pub use error::{CoreError, Result};
pub use frame::{open, seal, FRAME_MAGIC};
pub use types::{Seq, StoreKind, UserNamespace};
