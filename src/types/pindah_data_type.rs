//! This module defines the canonical, type-safe representation of element types
//! used throughout the pindah relocation engine.

use crate::error::PindahError;
use arrow::datatypes::{DataType as ArrowDataType, TimeUnit};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The canonical, internal representation of a column's element type.
///
/// The kind set is closed on purpose: every kernel dispatches over this enum
/// with an exhaustive match, so adding a variant is a compile-time event, not
/// a runtime surprise.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PindahDataType {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Boolean,
    TimestampSecond,
    TimestampMillisecond,
    TimestampMicrosecond,
    TimestampNanosecond,
    /// Dictionary-encoded column: `i32` keys into a separate values column.
    Dictionary32,
}

impl PindahDataType {
    /// Converts an Arrow `DataType` into a `PindahDataType`.
    pub fn from_arrow_type(arrow_type: &ArrowDataType) -> Result<Self, PindahError> {
        match arrow_type {
            ArrowDataType::Int8 => Ok(Self::Int8),
            ArrowDataType::Int16 => Ok(Self::Int16),
            ArrowDataType::Int32 => Ok(Self::Int32),
            ArrowDataType::Int64 => Ok(Self::Int64),
            ArrowDataType::UInt8 => Ok(Self::UInt8),
            ArrowDataType::UInt16 => Ok(Self::UInt16),
            ArrowDataType::UInt32 => Ok(Self::UInt32),
            ArrowDataType::UInt64 => Ok(Self::UInt64),
            ArrowDataType::Float32 => Ok(Self::Float32),
            ArrowDataType::Float64 => Ok(Self::Float64),
            ArrowDataType::Boolean => Ok(Self::Boolean),
            ArrowDataType::Timestamp(TimeUnit::Second, None) => Ok(Self::TimestampSecond),
            ArrowDataType::Timestamp(TimeUnit::Millisecond, None) => Ok(Self::TimestampMillisecond),
            ArrowDataType::Timestamp(TimeUnit::Microsecond, None) => Ok(Self::TimestampMicrosecond),
            ArrowDataType::Timestamp(TimeUnit::Nanosecond, None) => Ok(Self::TimestampNanosecond),
            ArrowDataType::Dictionary(key, _) if **key == ArrowDataType::Int32 => {
                Ok(Self::Dictionary32)
            }
            dt => Err(PindahError::UnsupportedType(format!(
                "Cannot convert Arrow type {:?} to PindahDataType",
                dt
            ))),
        }
    }

    /// Converts a `PindahDataType` back into an Arrow `DataType`.
    ///
    /// `Dictionary32` needs the value type of its dictionary column, which the
    /// enum alone does not carry; the bridge assembles that variant itself.
    pub fn to_arrow_type(&self) -> Result<ArrowDataType, PindahError> {
        match self {
            Self::Int8 => Ok(ArrowDataType::Int8),
            Self::Int16 => Ok(ArrowDataType::Int16),
            Self::Int32 => Ok(ArrowDataType::Int32),
            Self::Int64 => Ok(ArrowDataType::Int64),
            Self::UInt8 => Ok(ArrowDataType::UInt8),
            Self::UInt16 => Ok(ArrowDataType::UInt16),
            Self::UInt32 => Ok(ArrowDataType::UInt32),
            Self::UInt64 => Ok(ArrowDataType::UInt64),
            Self::Float32 => Ok(ArrowDataType::Float32),
            Self::Float64 => Ok(ArrowDataType::Float64),
            Self::Boolean => Ok(ArrowDataType::Boolean),
            Self::TimestampSecond => Ok(ArrowDataType::Timestamp(TimeUnit::Second, None)),
            Self::TimestampMillisecond => Ok(ArrowDataType::Timestamp(TimeUnit::Millisecond, None)),
            Self::TimestampMicrosecond => Ok(ArrowDataType::Timestamp(TimeUnit::Microsecond, None)),
            Self::TimestampNanosecond => Ok(ArrowDataType::Timestamp(TimeUnit::Nanosecond, None)),
            Self::Dictionary32 => Err(PindahError::InternalError(
                "Dictionary32 requires a values column to reconstruct its Arrow type".to_string(),
            )),
        }
    }

    /// The in-engine storage width of one element, in bytes.
    ///
    /// Booleans are stored one byte per row inside the engine; they are only
    /// bit-packed at the Arrow boundary. Dictionary columns store their `i32`
    /// keys in the data buffer.
    pub fn size_bytes(&self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 | Self::Boolean => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 | Self::Dictionary32 => 4,
            Self::Int64
            | Self::UInt64
            | Self::Float64
            | Self::TimestampSecond
            | Self::TimestampMillisecond
            | Self::TimestampMicrosecond
            | Self::TimestampNanosecond => 8,
        }
    }

    /// Returns `true` for the dictionary-encoded kind.
    pub fn is_dictionary(&self) -> bool {
        matches!(self, Self::Dictionary32)
    }

    /// Returns `true` if the data type is a timestamp.
    pub fn is_timestamp(&self) -> bool {
        matches!(
            self,
            Self::TimestampSecond
                | Self::TimestampMillisecond
                | Self::TimestampMicrosecond
                | Self::TimestampNanosecond
        )
    }
}

/// Provides the canonical string representation for a `PindahDataType`.
impl fmt::Display for PindahDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
