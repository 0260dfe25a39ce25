//! This module contains the reduction collaborator. The partition engine uses
//! `max` to size dense group counts; nothing else in the crate reduces.

use crate::error::PindahError;
use crate::kernels::with_element_type;
use crate::table::{Column, Scalar};

//==================================================================================
// 1. Public API
//==================================================================================

/// The maximum over the column's valid rows, as a scalar.
///
/// An empty or all-null column yields a null scalar. A comparison that fails
/// (float NaN) leaves the current best unchanged.
pub fn max(column: &Column) -> Result<Scalar, PindahError> {
    if column.dtype().is_dictionary() {
        return Err(PindahError::UnsupportedType(
            "max over a dictionary-encoded column".to_string(),
        ));
    }

    with_element_type!(column.dtype(), T => {
        let values = column.typed::<T>()?;
        let mut best: Option<T> = None;
        for (row, &value) in values.iter().enumerate() {
            if !column.is_valid_row(row) {
                continue;
            }
            match best {
                None => best = Some(value),
                Some(current) => {
                    if matches!(
                        value.partial_cmp(&current),
                        Some(std::cmp::Ordering::Greater)
                    ) {
                        best = Some(value);
                    }
                }
            }
        }
        match best {
            Some(value) => Scalar::new(column.dtype(), value),
            None => Ok(Scalar::null(column.dtype())),
        }
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
    fn test_max_skips_null_rows() {
        let column = Column::from_slice_nullable(
            PindahDataType::Int32,
            &[5i32, 99, 7],
            &[true, false, true],
        )
        .unwrap();
        assert_eq!(max(&column).unwrap().typed::<i32>().unwrap(), 7);
    }

    #[test]
    fn test_max_of_empty_column_is_null() {
        let column = Column::from_slice::<i64>(PindahDataType::Int64, &[]).unwrap();
        assert!(!max(&column).unwrap().is_valid());
    }

    #[test]
    fn test_max_of_all_null_column_is_null() {
        let column =
            Column::from_slice_nullable(PindahDataType::Int32, &[1i32, 2], &[false, false])
                .unwrap();
        assert!(!max(&column).unwrap().is_valid());
    }

    #[test]
    fn test_max_over_floats_skips_nan() {
        let column =
            Column::from_slice(PindahDataType::Float64, &[1.0f64, f64::NAN, 3.0]).unwrap();
        assert_eq!(max(&column).unwrap().typed::<f64>().unwrap(), 3.0);
    }
}
