// In: src/bridge/arrow_impl.rs

//! This module is the marshalling layer between the Arrow world and the pure,
//! Arrow-agnostic engine types (`Table`, `Column`).
//!
//! Booleans are the one layout difference worth calling out: Arrow bit-packs
//! them, the engine stores one byte per row, so both directions re-pack.
//! Everything else is a buffer copy plus a validity-bit walk.

use std::sync::Arc;

use arrow::array::{
    make_array, Array, ArrayRef, BooleanArray, BooleanBuilder, DictionaryArray, PrimitiveArray,
    RecordBatch, RecordBatchOptions,
};
use arrow::buffer::NullBuffer;
use arrow::datatypes::{DataType as ArrowDataType, Field, Int32Type, Schema, SchemaRef};

use crate::error::PindahError;
use crate::null_handling::ValidityMask;
use crate::table::{Column, Table};
use crate::types::PindahDataType;

//==================================================================================
// 1. Arrow -> Engine
//==================================================================================

/// Converts an Arrow array into an engine `Column`.
pub fn array_to_column(array: &dyn Array) -> Result<Column, PindahError> {
    let dtype = PindahDataType::from_arrow_type(array.data_type())?;
    let validity = extract_validity(array);

    match dtype {
        PindahDataType::Boolean => {
            let bools = array
                .as_any()
                .downcast_ref::<BooleanArray>()
                .ok_or_else(|| downcast_failure("BooleanArray"))?;
            // Null rows still need a value byte; zero is as good as any.
            let data: Vec<u8> = (0..bools.len())
                .map(|row| if bools.is_valid(row) && bools.value(row) { 1 } else { 0 })
                .collect();
            Column::new(dtype, data, validity)
        }
        PindahDataType::Dictionary32 => {
            let dict = array
                .as_any()
                .downcast_ref::<DictionaryArray<Int32Type>>()
                .ok_or_else(|| downcast_failure("DictionaryArray<Int32Type>"))?;
            let values = array_to_column(dict.values().as_ref())?;
            if values.is_nullable() || values.dtype().is_dictionary() {
                return Err(PindahError::UnsupportedType(
                    "dictionary values must be non-nullable and fixed-width".to_string(),
                ));
            }
            let key_values: &[i32] = dict.keys().values();
            let keys: Vec<u8> = bytemuck::cast_slice(key_values).to_vec();
            Column::new_dictionary(keys, validity, values)
        }
        _ => {
            // All remaining kinds are fixed-width primitives; the values
            // buffer can be sliced byte-for-byte.
            let width = dtype.size_bytes();
            let data = array.to_data();
            let start = data.offset() * width;
            let end = start + data.len() * width;
            let bytes = data.buffers()[0].as_slice()[start..end].to_vec();
            Column::new(dtype, bytes, validity)
        }
    }
}

/// Converts an Arrow `RecordBatch` into an engine `Table`.
pub fn record_batch_to_table(batch: &RecordBatch) -> Result<Table, PindahError> {
    let columns = batch
        .columns()
        .iter()
        .map(|array| array_to_column(array.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    Table::new(columns)
}

fn extract_validity(array: &dyn Array) -> Option<ValidityMask> {
    array.nulls()?;
    let flags: Vec<bool> = (0..array.len()).map(|row| array.is_valid(row)).collect();
    Some(ValidityMask::from_bools(&flags))
}

fn downcast_failure(expected: &str) -> PindahError {
    PindahError::InternalError(format!("Arrow array failed to downcast to {}", expected))
}

//==================================================================================
// 2. Engine -> Arrow
//==================================================================================

/// Converts an engine `Column` back into an Arrow array.
pub fn column_to_array(column: &Column) -> Result<ArrayRef, PindahError> {
    let nulls = build_null_buffer(column);

    match column.dtype() {
        PindahDataType::Boolean => {
            let data = column.data();
            let mut builder = BooleanBuilder::with_capacity(column.num_rows());
            for row in 0..column.num_rows() {
                if column.is_valid_row(row) {
                    builder.append_value(data[row] != 0);
                } else {
                    builder.append_null();
                }
            }
            Ok(Arc::new(builder.finish()))
        }
        PindahDataType::Dictionary32 => {
            let values_col = column.dictionary().ok_or_else(|| {
                PindahError::InternalError("Dictionary32 column without values".to_string())
            })?;
            let values = column_to_array(values_col)?;
            let keys = PrimitiveArray::<Int32Type>::new(
                column.typed::<i32>()?.to_vec().into(),
                nulls,
            );
            let dict = DictionaryArray::<Int32Type>::try_new(keys, values)?;
            Ok(Arc::new(dict))
        }
        dtype => {
            let array_data = arrow::array::ArrayData::builder(dtype.to_arrow_type()?)
                .len(column.num_rows())
                .add_buffer(arrow::buffer::Buffer::from(column.data().to_vec()))
                .nulls(nulls)
                .build()?;
            Ok(make_array(array_data))
        }
    }
}

/// Converts an engine `Table` back into a `RecordBatch` with the given
/// schema's field names. Field nullability is widened where the engine
/// promoted a column's nullability.
pub fn table_to_record_batch(
    table: &Table,
    schema: &SchemaRef,
) -> Result<RecordBatch, PindahError> {
    if table.num_columns() != schema.fields().len() {
        return Err(PindahError::ShapeMismatch(format!(
            "{} columns for a {}-field schema",
            table.num_columns(),
            schema.fields().len()
        )));
    }

    let mut fields = Vec::with_capacity(table.num_columns());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(table.num_columns());
    for (column, field) in table.columns().iter().zip(schema.fields()) {
        let array = column_to_array(column)?;
        fields.push(Field::new(
            field.name(),
            array.data_type().clone(),
            field.is_nullable() || column.is_nullable(),
        ));
        arrays.push(array);
    }

    let options = RecordBatchOptions::new().with_row_count(Some(table.num_rows()));
    RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), arrays, &options)
        .map_err(PindahError::from)
}

fn build_null_buffer(column: &Column) -> Option<NullBuffer> {
    let mask = column.validity()?;
    let flags: Vec<bool> = (0..mask.num_rows()).map(|row| mask.is_valid(row)).collect();
    Some(NullBuffer::from(flags))
}

/// Extracts a plain `i32` index slice from an Arrow array, rejecting anything
/// that is not a null-free `Int32` array. Shared by every map-taking API.
pub fn array_to_index_vec(array: &dyn Array) -> Result<Vec<i32>, PindahError> {
    if array.data_type() != &ArrowDataType::Int32 {
        return Err(PindahError::TypeMismatch(format!(
            "index map must be Int32, got {:?}",
            array.data_type()
        )));
    }
    if array.null_count() > 0 {
        return Err(PindahError::TypeMismatch(
            "index map must not contain nulls".to_string(),
        ));
    }
    let column = array_to_column(array)?;
    Ok(column.typed::<i32>()?.to_vec())
}
