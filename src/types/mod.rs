//! This module defines the core, strongly-typed data representations used
//! throughout the pindah relocation engine.
//!
//! It includes the canonical `PindahDataType` enum which replaces fragile
//! string-based types with a safe, serializable, and Arrow-compatible enum,
//! plus the row-index primitives shared by every index map.

pub mod pindah_data_type;

// Re-export the main type(s) for easier access.
pub use pindah_data_type::PindahDataType;

/// The signed row-index type used by every scatter map, gather map, and group map.
pub type RowIndex = i32;

/// Reserved gather-map entry meaning "leave this destination row untouched".
///
/// Any negative entry is treated the same way; this is the canonical value the
/// map-inversion kernel fills with.
pub const UNMODIFIED_ROW: RowIndex = -1;
