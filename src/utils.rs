//! This module provides a set of shared, low-level utility functions used
//! throughout the pindah Rust core.
//!
//! Its primary responsibilities include:
//! 1.  Providing safe, validated conversions between raw byte slices and typed slices.
//! 2.  Encapsulating `unsafe` code into well-defined, narrowly-scoped functions
//!     that can be heavily audited.

use std::sync::atomic::{AtomicI32, AtomicU64};

use crate::error::PindahError;

//==================================================================================
// 1. Core Utility Functions
//==================================================================================

/// Safely reinterprets a byte slice as a slice of a primitive element type.
///
/// This function is the gateway for converting the raw byte buffers owned by a
/// `Column` into a workable, typed slice. It performs the length and alignment
/// checks before creating a zero-copy view of the data.
///
/// # Errors
/// Returns a `PindahError::PodCast` if the byte slice length is not a multiple
/// of `size_of::<T>()` or the slice is misaligned for `T`.
pub fn safe_bytes_to_typed_slice<T>(bytes: &[u8]) -> Result<&[T], PindahError>
where
    T: bytemuck::Pod,
{
    bytemuck::try_cast_slice(bytes).map_err(PindahError::from)
}

/// Mutable counterpart of [`safe_bytes_to_typed_slice`].
pub fn safe_bytes_to_typed_slice_mut<T>(bytes: &mut [u8]) -> Result<&mut [T], PindahError>
where
    T: bytemuck::Pod,
{
    bytemuck::try_cast_slice_mut(bytes).map_err(PindahError::from)
}

/// Converts a slice of primitive elements into a `Vec<u8>` in native byte order.
///
/// This function performs a memory copy to create a new, owned byte vector.
pub fn typed_slice_to_bytes<T: bytemuck::Pod>(data: &[T]) -> Vec<u8> {
    bytemuck::cast_slice(data).to_vec()
}

//==================================================================================
// 2. Atomic Slice Views (the only `unsafe` in the crate)
//==================================================================================

/// Views an exclusively-borrowed `i32` slice as atomic slots.
///
/// The map-inversion kernel writes gather-map entries from many threads at
/// once; duplicate destinations collide, and the winner must be an
/// implementation-defined choice rather than undefined behavior. Routing every
/// write through a relaxed atomic store gives exactly that contract.
///
/// # Safety
/// `AtomicI32` has the same size and alignment as `i32`, and the `&mut`
/// receiver guarantees no non-atomic access can alias the slice for the
/// lifetime of the returned view.
pub(crate) fn as_atomic_i32(slice: &mut [i32]) -> &[AtomicI32] {
    unsafe { &*(slice as *mut [i32] as *const [AtomicI32]) }
}

/// Views an exclusively-borrowed `u64` word slice as atomic slots.
///
/// Used by the validity-marking kernel: two rows can share a bitmask word, so
/// concurrent set/clear must be lost-update-free read-modify-writes.
///
/// # Safety
/// Same argument as [`as_atomic_i32`]: identical layout, exclusive borrow.
pub(crate) fn as_atomic_u64(slice: &mut [u64]) -> &[AtomicU64] {
    unsafe { &*(slice as *mut [u64] as *const [AtomicU64]) }
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;

    #[test]
    fn test_safe_bytes_to_typed_slice_success() {
        let original_vec: Vec<i32> = vec![1, -2, 1_000_000];
        let bytes = typed_slice_to_bytes(&original_vec);

        let typed_slice = safe_bytes_to_typed_slice::<i32>(&bytes).unwrap();
        assert_eq!(typed_slice, original_vec.as_slice());
    }

    #[test]
    fn test_safe_bytes_to_typed_slice_mismatch_error() {
        // 5 bytes is not divisible by size_of::<i32>(4) or size_of::<i16>(2).
        let bytes: Vec<u8> = vec![0, 1, 2, 3, 4];

        let result_i32 = safe_bytes_to_typed_slice::<i32>(&bytes);
        assert!(matches!(result_i32, Err(PindahError::PodCast(_))));

        let result_i16 = safe_bytes_to_typed_slice::<i16>(&bytes);
        assert!(matches!(result_i16, Err(PindahError::PodCast(_))));
    }

    #[test]
    fn test_typed_slice_to_bytes_endianness() {
        // Value is 258 = 0x0102 in hex
        let original_vec: Vec<u16> = vec![258];
        let bytes = typed_slice_to_bytes(&original_vec);

        // bytemuck respects native endianness. On most machines (x86, ARM),
        // this will be little-endian, so the least significant byte (0x02) comes first.
        if cfg!(target_endian = "little") {
            assert_eq!(bytes, vec![0x02, 0x01]);
        } else {
            assert_eq!(bytes, vec![0x01, 0x02]);
        }
    }

    #[test]
    fn test_atomic_view_writes_are_visible() {
        let mut slots: Vec<i32> = vec![-1; 4];
        {
            let atomic = as_atomic_i32(&mut slots);
            atomic[2].store(7, Ordering::Relaxed);
        }
        assert_eq!(slots, vec![-1, -1, 7, -1]);
    }
}
