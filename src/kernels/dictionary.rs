//! This module contains the dictionary-reconciliation kernel for
//! dictionary-encoded (`Dictionary32`) columns.
//!
//! Scattering keys between two columns is only meaningful when both sides
//! agree on what the keys mean. Reconciliation merges the two value sets into
//! one ascending-sorted dictionary and remaps both key columns onto it, so the
//! downstream gather moves keys within a single encoding.

use hashbrown::HashMap;

use crate::error::PindahError;
use crate::kernels::with_element_type;
use crate::table::Column;
use crate::types::RowIndex;
use crate::utils::safe_bytes_to_typed_slice_mut;

//==================================================================================
// 1. Public API
//==================================================================================

/// Merges the dictionaries of `source` and `target`, remaps `target`'s keys in
/// place, and returns a deep copy of `source` remapped the same way. Both
/// returned/mutated columns carry the merged values column afterwards.
pub fn reconcile_dictionaries(
    source: &Column,
    target: &mut Column,
) -> Result<Column, PindahError> {
    let src_values = source.dictionary().ok_or_else(|| {
        PindahError::InternalError("reconcile called on a non-dictionary source".to_string())
    })?;
    let tgt_values = target.dictionary().ok_or_else(|| {
        PindahError::InternalError("reconcile called on a non-dictionary target".to_string())
    })?;

    let (merged, source_remap, target_remap) = merge_dictionaries(src_values, tgt_values)?;

    let mut remapped_source = source.deep_copy();
    remap_keys(&mut remapped_source, &source_remap)?;
    remapped_source.set_dictionary(merged.deep_copy());

    remap_keys(target, &target_remap)?;
    target.set_dictionary(merged);

    Ok(remapped_source)
}

/// Builds the union of two dictionary value columns, ascending-sorted, plus
/// old-key -> merged-key tables for each side.
pub fn merge_dictionaries(
    source_values: &Column,
    target_values: &Column,
) -> Result<(Column, Vec<RowIndex>, Vec<RowIndex>), PindahError> {
    if source_values.dtype() != target_values.dtype() {
        return Err(PindahError::TypeMismatch(format!(
            "cannot merge {} and {} dictionaries",
            source_values.dtype(),
            target_values.dtype()
        )));
    }

    with_element_type!(source_values.dtype(), T => {
        let src: &[T] = source_values.typed()?;
        let tgt: &[T] = target_values.typed()?;

        let mut merged: Vec<T> = Vec::with_capacity(src.len() + tgt.len());
        merged.extend_from_slice(src);
        merged.extend_from_slice(tgt);
        merged.sort_unstable_by(|a, b| {
            a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal)
        });
        merged.dedup();

        let mut index_of: HashMap<Vec<u8>, RowIndex> = HashMap::with_capacity(merged.len());
        for (idx, value) in merged.iter().enumerate() {
            index_of.insert(bytemuck::bytes_of(value).to_vec(), idx as RowIndex);
        }

        let lookup = |value: &T| -> Result<RowIndex, PindahError> {
            index_of
                .get(bytemuck::bytes_of(value))
                .copied()
                .ok_or_else(|| {
                    PindahError::InternalError(
                        "merged dictionary lost a value".to_string(),
                    )
                })
        };
        let source_remap = src.iter().map(|v| lookup(v)).collect::<Result<Vec<_>, _>>()?;
        let target_remap = tgt.iter().map(|v| lookup(v)).collect::<Result<Vec<_>, _>>()?;

        let merged_column = Column::from_slice(source_values.dtype(), &merged)?;
        Ok((merged_column, source_remap, target_remap))
    })
}

/// Rewrites a dictionary column's keys through `remap`. Null rows keep their
/// (meaningless) key bytes untouched.
pub fn remap_keys(column: &mut Column, remap: &[RowIndex]) -> Result<(), PindahError> {
    let (data, validity) = column.data_and_validity_mut();
    let keys: &mut [i32] = safe_bytes_to_typed_slice_mut(data)?;
    for (row, key) in keys.iter_mut().enumerate() {
        if validity.map_or(true, |mask| mask.is_valid(row)) {
            let old = *key as usize;
            let new = remap.get(old).ok_or_else(|| {
                PindahError::OutOfBounds(format!(
                    "dictionary key {} outside a {}-entry dictionary",
                    old,
                    remap.len()
                ))
            })?;
            *key = *new;
        }
    }
    Ok(())
}

//==================================================================================
// 2. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::null_handling::ValidityMask;
    use crate::types::PindahDataType;

    fn dict_column(keys: &[i32], valid: Option<&[bool]>, values: &[i64]) -> Column {
        let values_col = Column::from_slice(PindahDataType::Int64, values).unwrap();
        Column::new_dictionary(
            bytemuck::cast_slice(keys).to_vec(),
            valid.map(ValidityMask::from_bools),
            values_col,
        )
        .unwrap()
    }

    #[test]
    fn test_merge_produces_sorted_union() {
        let source = dict_column(&[0, 1], None, &[30, 10]);
        let target = dict_column(&[0], None, &[20]);

        let (merged, source_remap, target_remap) =
            merge_dictionaries(source.dictionary().unwrap(), target.dictionary().unwrap())
                .unwrap();

        assert_eq!(merged.typed::<i64>().unwrap(), &[10, 20, 30]);
        // Source values [30, 10] land at merged positions [2, 0].
        assert_eq!(source_remap, vec![2, 0]);
        assert_eq!(target_remap, vec![1]);
    }

    #[test]
    fn test_reconcile_remaps_both_sides() {
        let source = dict_column(&[1, 0], None, &[30, 10]);
        let mut target = dict_column(&[0, 0, 0], Some(&[true, false, true]), &[20]);

        let remapped_source = reconcile_dictionaries(&source, &mut target).unwrap();

        // Shared merged dictionary on both sides.
        assert_eq!(
            remapped_source.dictionary().unwrap().typed::<i64>().unwrap(),
            &[10, 20, 30]
        );
        assert_eq!(
            target.dictionary().unwrap().typed::<i64>().unwrap(),
            &[10, 20, 30]
        );
        // Source rows decoded [10, 30] -> merged keys [0, 2].
        assert_eq!(remapped_source.typed::<i32>().unwrap(), &[0, 2]);
        // Target rows decoded [20, null, 20]; the null row's key is untouched.
        assert_eq!(target.typed::<i32>().unwrap(), &[1, 0, 1]);
    }

    #[test]
    fn test_value_dtype_mismatch_rejected() {
        let a = Column::from_slice(PindahDataType::Int64, &[1i64]).unwrap();
        let b = Column::from_slice(PindahDataType::Int32, &[1i32]).unwrap();
        assert!(matches!(
            merge_dictionaries(&a, &b),
            Err(PindahError::TypeMismatch(_))
        ));
    }
}
