//! This module defines the engine's owning columnar containers.
//!
//! A [`Table`] exclusively owns an ordered sequence of equal-length
//! [`Column`]s. Neither type implements `Clone`: duplication is always an
//! explicit `deep_copy`, and moves transfer ownership. That mirrors the
//! move-only container the engine was designed around and keeps every buffer
//! copy visible at the call site.

pub mod scalar;

pub use scalar::Scalar;

use crate::error::PindahError;
use crate::null_handling::ValidityMask;
use crate::types::PindahDataType;
use crate::utils::{safe_bytes_to_typed_slice, safe_bytes_to_typed_slice_mut, typed_slice_to_bytes};

//==================================================================================
// 1. Column
//==================================================================================

/// A typed, fixed-length buffer of element values plus an optional parallel
/// validity bitmask (one bit per row; bit unset => null).
///
/// A column with no bitmask is non-nullable: every row is implicitly valid.
/// Dictionary-encoded columns (`Dictionary32`) store `i32` keys in `data` and
/// carry their values in a separate, non-nullable `dictionary` column.
#[derive(Debug)]
pub struct Column {
    dtype: PindahDataType,
    data: Vec<u8>,
    validity: Option<ValidityMask>,
    dictionary: Option<Box<Column>>,
}

impl Column {
    /// Constructs a non-dictionary column from a raw byte buffer.
    ///
    /// # Errors
    /// `ShapeMismatch` when the buffer length is not a whole number of
    /// elements, or when a validity mask is present with the wrong bit count.
    /// `UnsupportedType` for `Dictionary32` (use [`Column::new_dictionary`]).
    pub fn new(
        dtype: PindahDataType,
        data: Vec<u8>,
        validity: Option<ValidityMask>,
    ) -> Result<Self, PindahError> {
        if dtype.is_dictionary() {
            return Err(PindahError::UnsupportedType(
                "Dictionary32 columns must be built with Column::new_dictionary".to_string(),
            ));
        }
        Self::build(dtype, data, validity, None)
    }

    /// Constructs a dictionary-encoded column: `i32` keys plus a values column.
    ///
    /// The values column must itself be non-nullable and non-dictionary.
    pub fn new_dictionary(
        keys: Vec<u8>,
        validity: Option<ValidityMask>,
        values: Column,
    ) -> Result<Self, PindahError> {
        if values.dtype.is_dictionary() {
            return Err(PindahError::UnsupportedType(
                "dictionary values cannot themselves be dictionary-encoded".to_string(),
            ));
        }
        if values.is_nullable() {
            return Err(PindahError::TypeMismatch(
                "dictionary values column must be non-nullable".to_string(),
            ));
        }
        Self::build(
            PindahDataType::Dictionary32,
            keys,
            validity,
            Some(Box::new(values)),
        )
    }

    fn build(
        dtype: PindahDataType,
        data: Vec<u8>,
        validity: Option<ValidityMask>,
        dictionary: Option<Box<Column>>,
    ) -> Result<Self, PindahError> {
        let width = dtype.size_bytes();
        if data.len() % width != 0 {
            return Err(PindahError::ShapeMismatch(format!(
                "column buffer of {} bytes is not a whole number of {}-byte elements",
                data.len(),
                width
            )));
        }
        let num_rows = data.len() / width;
        if let Some(mask) = &validity {
            if mask.num_rows() != num_rows {
                return Err(PindahError::ShapeMismatch(format!(
                    "validity mask covers {} rows but column has {}",
                    mask.num_rows(),
                    num_rows
                )));
            }
        }
        Ok(Self {
            dtype,
            data,
            validity,
            dictionary,
        })
    }

    /// Convenience constructor from a typed slice, non-nullable.
    pub fn from_slice<T: bytemuck::Pod>(
        dtype: PindahDataType,
        values: &[T],
    ) -> Result<Self, PindahError> {
        check_element_width::<T>(dtype)?;
        Self::new(dtype, typed_slice_to_bytes(values), None)
    }

    /// Convenience constructor from a typed slice with per-row validity flags.
    pub fn from_slice_nullable<T: bytemuck::Pod>(
        dtype: PindahDataType,
        values: &[T],
        valid: &[bool],
    ) -> Result<Self, PindahError> {
        check_element_width::<T>(dtype)?;
        if valid.len() != values.len() {
            return Err(PindahError::ShapeMismatch(format!(
                "{} validity flags for {} values",
                valid.len(),
                values.len()
            )));
        }
        Self::new(
            dtype,
            typed_slice_to_bytes(values),
            Some(ValidityMask::from_bools(valid)),
        )
    }

    pub fn dtype(&self) -> PindahDataType {
        self.dtype
    }

    pub fn num_rows(&self) -> usize {
        self.data.len() / self.dtype.size_bytes()
    }

    pub fn is_nullable(&self) -> bool {
        self.validity.is_some()
    }

    /// Row validity; `true` for every row of a non-nullable column.
    pub fn is_valid_row(&self, row: usize) -> bool {
        match &self.validity {
            Some(mask) => mask.is_valid(row),
            None => true,
        }
    }

    pub fn validity(&self) -> Option<&ValidityMask> {
        self.validity.as_ref()
    }

    pub fn validity_mut(&mut self) -> Option<&mut ValidityMask> {
        self.validity.as_mut()
    }

    /// Lazy nullability promotion: allocates an all-valid mask if the column
    /// has none, and returns the mask. A column only pays for a bitmask once
    /// a null could actually be written into it.
    pub fn ensure_validity(&mut self) -> &mut ValidityMask {
        let rows = self.num_rows();
        self.validity.get_or_insert_with(|| ValidityMask::all_valid(rows))
    }

    pub fn dictionary(&self) -> Option<&Column> {
        self.dictionary.as_deref()
    }

    /// Replaces the dictionary values column. Only meaningful on `Dictionary32`.
    pub fn set_dictionary(&mut self, values: Column) {
        debug_assert!(self.dtype.is_dictionary());
        self.dictionary = Some(Box::new(values));
    }

    /// Zero-copy typed view of the data buffer.
    pub fn typed<T: bytemuck::Pod>(&self) -> Result<&[T], PindahError> {
        check_element_width::<T>(self.dtype)?;
        safe_bytes_to_typed_slice(&self.data)
    }

    /// Mutable typed view of the data buffer.
    pub fn typed_mut<T: bytemuck::Pod>(&mut self) -> Result<&mut [T], PindahError> {
        check_element_width::<T>(self.dtype)?;
        safe_bytes_to_typed_slice_mut(&mut self.data)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Split borrow: mutable data buffer alongside the (shared) validity mask.
    /// Needed by kernels that rewrite values only for valid rows.
    pub(crate) fn data_and_validity_mut(&mut self) -> (&mut [u8], Option<&ValidityMask>) {
        (&mut self.data, self.validity.as_ref())
    }

    /// Explicit deep copy of buffer, mask, and dictionary.
    pub fn deep_copy(&self) -> Self {
        Self {
            dtype: self.dtype,
            data: self.data.clone(),
            validity: self.validity.as_ref().map(ValidityMask::deep_copy),
            dictionary: self
                .dictionary
                .as_ref()
                .map(|d| Box::new(d.deep_copy())),
        }
    }
}

fn check_element_width<T>(dtype: PindahDataType) -> Result<(), PindahError> {
    if std::mem::size_of::<T>() != dtype.size_bytes() {
        return Err(PindahError::TypeMismatch(format!(
            "{}-byte element view over a {} column",
            std::mem::size_of::<T>(),
            dtype
        )));
    }
    Ok(())
}

//==================================================================================
// 2. Table
//==================================================================================

/// An ordered, fixed-length sequence of equal-length columns.
///
/// Invariant: every column has the same row count, checked at construction.
/// A table with zero columns has zero rows.
#[derive(Debug)]
pub struct Table {
    columns: Vec<Column>,
    num_rows: usize,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self, PindahError> {
        let num_rows = columns.first().map(Column::num_rows).unwrap_or(0);
        for (i, col) in columns.iter().enumerate() {
            if col.num_rows() != num_rows {
                return Err(PindahError::ShapeMismatch(format!(
                    "column {} has {} rows, expected {}",
                    i,
                    col.num_rows(),
                    num_rows
                )));
            }
        }
        Ok(Self { columns, num_rows })
    }

    /// A table with no columns and no rows.
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            num_rows: 0,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn column(&self, i: usize) -> &Column {
        &self.columns[i]
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    /// Explicit deep copy of every column.
    pub fn deep_copy(&self) -> Self {
        Self {
            columns: self.columns.iter().map(Column::deep_copy).collect(),
            num_rows: self.num_rows,
        }
    }
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ragged_columns_are_rejected() {
        let a = Column::from_slice(PindahDataType::Int32, &[1i32, 2, 3]).unwrap();
        let b = Column::from_slice(PindahDataType::Int64, &[1i64]).unwrap();
        assert!(matches!(
            Table::new(vec![a, b]),
            Err(PindahError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_zero_column_table_has_zero_rows() {
        let table = Table::new(Vec::new()).unwrap();
        assert_eq!(table.num_columns(), 0);
        assert_eq!(table.num_rows(), 0);
    }

    #[test]
    fn test_typed_view_rejects_wrong_width() {
        let col = Column::from_slice(PindahDataType::Int32, &[1i32, 2]).unwrap();
        assert!(col.typed::<i64>().is_err());
        assert_eq!(col.typed::<i32>().unwrap(), &[1, 2]);
    }

    #[test]
    fn test_ensure_validity_promotes_all_valid() {
        let mut col = Column::from_slice(PindahDataType::Int16, &[7i16, 8, 9]).unwrap();
        assert!(!col.is_nullable());
        col.ensure_validity();
        assert!(col.is_nullable());
        assert_eq!(col.validity().unwrap().count_valid(), 3);
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let source =
            Column::from_slice_nullable(PindahDataType::Int32, &[1i32, 2], &[true, false]).unwrap();
        let mut copy = source.deep_copy();
        copy.typed_mut::<i32>().unwrap()[0] = 99;
        copy.validity_mut().unwrap().set_valid(1, true);

        assert_eq!(source.typed::<i32>().unwrap(), &[1, 2]);
        assert!(!source.is_valid_row(1));
        assert_eq!(copy.typed::<i32>().unwrap(), &[99, 2]);
    }

    #[test]
    fn test_dictionary_column_shape() {
        let values = Column::from_slice(PindahDataType::Int64, &[100i64, 200]).unwrap();
        let keys: Vec<u8> = bytemuck::cast_slice(&[0i32, 1, 0]).to_vec();
        let col = Column::new_dictionary(keys, None, values).unwrap();
        assert_eq!(col.num_rows(), 3);
        assert_eq!(col.dictionary().unwrap().num_rows(), 2);
    }
}
