//==================================================================================
// Bridge Tests: Arrow marshalling and the stateless API
//==================================================================================

use std::sync::Arc;

use arrow::array::{
    Array, BooleanArray, DictionaryArray, Int32Array, Int64Array, RecordBatch,
    TimestampMillisecondArray,
};
use arrow::datatypes::{DataType, Field, Int32Type, Schema};

use crate::bridge::arrow_impl::{array_to_column, array_to_index_vec, column_to_array};
use crate::bridge::{groups_to_record_batches, scatter_record_batch, scatter_to_record_batches};
use crate::context::ExecContext;
use crate::error::PindahError;

fn ctx() -> ExecContext {
    ExecContext::default()
}

#[test]
fn test_primitive_array_round_trip_with_nulls() {
    let original = Int32Array::from(vec![Some(10), None, Some(30), Some(40), None]);

    let column = array_to_column(&original).unwrap();
    assert!(column.is_nullable());
    assert_eq!(column.num_rows(), 5);

    let restored = column_to_array(&column).unwrap();
    let restored = restored.as_any().downcast_ref::<Int32Array>().unwrap();
    assert_eq!(restored, &original);
}

#[test]
fn test_sliced_array_copies_the_right_window() {
    let full = Int32Array::from(vec![1, 2, 3, 4, 5, 6]);
    let sliced = full.slice(2, 3);

    let column = array_to_column(&sliced).unwrap();
    assert_eq!(column.typed::<i32>().unwrap(), &[3, 4, 5]);
}

#[test]
fn test_boolean_array_round_trip() {
    let original = BooleanArray::from(vec![Some(true), Some(false), None, Some(true)]);

    let column = array_to_column(&original).unwrap();
    let restored = column_to_array(&column).unwrap();
    let restored = restored.as_any().downcast_ref::<BooleanArray>().unwrap();
    assert_eq!(restored, &original);
}

#[test]
fn test_timestamp_array_round_trip() {
    let original = TimestampMillisecondArray::from(vec![Some(1_000), None, Some(3_000)]);

    let column = array_to_column(&original).unwrap();
    let restored = column_to_array(&column).unwrap();
    let restored = restored
        .as_any()
        .downcast_ref::<TimestampMillisecondArray>()
        .unwrap();
    assert_eq!(restored, &original);
}

#[test]
fn test_dictionary_array_round_trip() {
    let keys = Int32Array::from(vec![Some(0), Some(1), None, Some(0)]);
    let values = Arc::new(Int64Array::from(vec![100i64, 200]));
    let original = DictionaryArray::<Int32Type>::try_new(keys, values).unwrap();

    let column = array_to_column(&original).unwrap();
    assert_eq!(
        column.dictionary().unwrap().typed::<i64>().unwrap(),
        &[100, 200]
    );

    let restored = column_to_array(&column).unwrap();
    let restored = restored
        .as_any()
        .downcast_ref::<DictionaryArray<Int32Type>>()
        .unwrap();
    assert_eq!(restored.keys(), original.keys());
    let restored_values = restored
        .values()
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    assert_eq!(restored_values, &Int64Array::from(vec![100i64, 200]));
}

#[test]
fn test_index_vec_rejects_bad_maps() {
    let wrong_type = Int64Array::from(vec![0i64]);
    assert!(matches!(
        array_to_index_vec(&wrong_type),
        Err(PindahError::TypeMismatch(_))
    ));

    let with_nulls = Int32Array::from(vec![Some(0), None]);
    assert!(matches!(
        array_to_index_vec(&with_nulls),
        Err(PindahError::TypeMismatch(_))
    ));
}

//==================================================================================
// End-to-end through the stateless API
//==================================================================================

fn single_column_batch(name: &str, array: Int32Array, nullable: bool) -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![Field::new(
        name,
        DataType::Int32,
        nullable,
    )]));
    RecordBatch::try_new(schema, vec![Arc::new(array)]).unwrap()
}

#[test]
fn test_scatter_record_batch_end_to_end() {
    let source = single_column_batch("v", Int32Array::from(vec![Some(7), None]), true);
    let target = single_column_batch(
        "v",
        Int32Array::from(vec![Some(1), Some(2), Some(3)]),
        true,
    );
    let map = Int32Array::from(vec![2, 0]);

    let out = scatter_record_batch(&ctx(), &source, &map, &target).unwrap();
    let col = out
        .column(0)
        .as_any()
        .downcast_ref::<Int32Array>()
        .unwrap();
    assert_eq!(
        col,
        &Int32Array::from(vec![None, Some(2), Some(7)])
    );
}

#[test]
fn test_scatter_widens_field_nullability_on_promotion() {
    // Non-nullable target, nullable source: the result schema must admit the
    // nulls that scattering can introduce.
    let source = single_column_batch("v", Int32Array::from(vec![Some(7), None]), true);
    let target = single_column_batch("v", Int32Array::from(vec![1, 2, 3]), false);
    let map = Int32Array::from(vec![0, 1]);

    let out = scatter_record_batch(&ctx(), &source, &map, &target).unwrap();
    assert!(out.schema().field(0).is_nullable());
    let col = out
        .column(0)
        .as_any()
        .downcast_ref::<Int32Array>()
        .unwrap();
    assert_eq!(col, &Int32Array::from(vec![Some(7), None, Some(3)]));
}

#[test]
fn test_groups_to_record_batches_end_to_end() {
    let batch = single_column_batch("v", Int32Array::from(vec![10, 11, 12, 13]), false);
    let groups = Int32Array::from(vec![5, -1, 5, -1]);

    let (batches, ids) = groups_to_record_batches(&ctx(), &batch, &groups).unwrap();
    assert_eq!(batches.len(), 2);

    let ids = ids.as_any().downcast_ref::<Int32Array>().unwrap();
    assert_eq!(ids, &Int32Array::from(vec![-1, 5]));

    let first = batches[0]
        .column(0)
        .as_any()
        .downcast_ref::<Int32Array>()
        .unwrap();
    assert_eq!(first, &Int32Array::from(vec![11, 13]));
}

#[test]
fn test_scatter_to_record_batches_dense_groups() {
    let batch = single_column_batch("v", Int32Array::from(vec![10, 11, 12]), false);
    let groups = Int32Array::from(vec![0, 2, 0]);

    let batches = scatter_to_record_batches(&ctx(), &batch, &groups).unwrap();
    assert_eq!(batches.len(), 3);
    assert_eq!(batches[1].num_rows(), 0);
}
