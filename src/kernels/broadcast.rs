//! This module contains the constant-value broadcast kernel used by the
//! scalar scatterer: one value written into every destination row named by a
//! scatter map, without ever materializing an array of repeated values.
//!
//! The kernel writes a single column serially; concurrency lives one level up,
//! where the scalar scatterer runs independent columns on the worker pool at
//! once (their buffers are disjoint). Duplicate map entries are harmless
//! here: every write stores the same value.

use crate::error::PindahError;
use crate::kernels::with_element_type;
use crate::table::{Column, Scalar};
use crate::types::RowIndex;

//==================================================================================
// 1. Public API
//==================================================================================

/// Writes `scalar`'s value into `column` at every row named by `rows`.
///
/// Rows are assumed already bounds-validated by the orchestrator. A null
/// scalar writes nothing; its payload is meaningless, and the matching
/// validity clear is the marking kernel's job, not this one's.
pub fn broadcast_into_column(
    column: &mut Column,
    rows: &[RowIndex],
    scalar: &Scalar,
) -> Result<(), PindahError> {
    if scalar.dtype() != column.dtype() {
        return Err(PindahError::TypeMismatch(format!(
            "broadcast of a {} scalar into a {} column",
            scalar.dtype(),
            column.dtype()
        )));
    }
    if !scalar.is_valid() {
        return Ok(());
    }

    with_element_type!(column.dtype(), T => {
        let value = scalar.typed::<T>()?;
        let data = column.typed_mut::<T>()?;
        for &row in rows {
            data[row as usize] = value;
        }
        Ok(())
    })
}

//==================================================================================
// 2. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PindahDataType;

    #[test]
    fn test_broadcast_writes_named_rows_only() {
        let mut column = Column::from_slice(PindahDataType::Int64, &[1i64, 2, 3]).unwrap();
        let scalar = Scalar::new(PindahDataType::Int64, 9i64).unwrap();

        broadcast_into_column(&mut column, &[2, 0], &scalar).unwrap();
        assert_eq!(column.typed::<i64>().unwrap(), &[9, 2, 9]);
    }

    #[test]
    fn test_null_scalar_leaves_values_untouched() {
        let mut column = Column::from_slice(PindahDataType::Float32, &[1.5f32, 2.5]).unwrap();
        let scalar = Scalar::null(PindahDataType::Float32);

        broadcast_into_column(&mut column, &[0, 1], &scalar).unwrap();
        assert_eq!(column.typed::<f32>().unwrap(), &[1.5, 2.5]);
    }

    #[test]
    fn test_dtype_mismatch_rejected() {
        let mut column = Column::from_slice(PindahDataType::Int32, &[1i32]).unwrap();
        let scalar = Scalar::new(PindahDataType::Int64, 1i64).unwrap();
        assert!(matches!(
            broadcast_into_column(&mut column, &[0], &scalar),
            Err(PindahError::TypeMismatch(_))
        ));
    }
}
