//! This module serves as the home of the pure, stateless relocation kernels
//! and of the element-type dispatcher that bridges the runtime type tag to
//! compile-time generic code.
//!
//! Every kernel is a flat data-parallel loop over rows or map entries; the
//! orchestrators in `scatter` and `partition` are their sole callers.

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Scatter-map -> gather-map inversion (the scatter-as-inverted-gather trick).
pub mod invert;

/// Per-column element copy driven by a gather map.
pub mod gather;

/// Race-safe validity-bit marking for scattered rows.
pub mod mark;

/// Constant-value broadcast into mapped rows.
pub mod broadcast;

/// Boolean-mask row compaction (`select_rows`).
pub mod compact;

/// Column reductions (`max`), used to size dense group counts.
pub mod reduce;

/// Dictionary merge + key remapping for dictionary-encoded columns.
pub mod dictionary;

//==================================================================================
// 2. Element-Type Dispatch
//==================================================================================

/// The bound every generic kernel instantiates against.
///
/// The engine's element kinds are all plain-old-data and totally orderable in
/// practice; `PartialOrd` is enough because reductions resolve incomparable
/// pairs (float NaN) by skipping them.
pub trait ElementValue: bytemuck::Pod + PartialOrd + Send + Sync + 'static {}

impl<T> ElementValue for T where T: bytemuck::Pod + PartialOrd + Send + Sync + 'static {}

/// Dispatches a runtime [`crate::types::PindahDataType`] to a compile-time
/// element type and evaluates `$body` with `$T` bound to it.
///
/// The kind set is closed, so this is an exhaustive match rather than virtual
/// dispatch: Booleans run as `u8` (one byte per row in the engine), all four
/// timestamp kinds as `i64`, and dictionary columns as their `i32` keys.
/// Paths that must reject dictionaries (the scalar scatterer) do so before
/// dispatching.
macro_rules! with_element_type {
    ($dtype:expr, $T:ident => $body:expr) => {{
        use $crate::types::PindahDataType as __Dt;
        match $dtype {
            __Dt::Int8 => {
                type $T = i8;
                $body
            }
            __Dt::Int16 => {
                type $T = i16;
                $body
            }
            __Dt::Int32 => {
                type $T = i32;
                $body
            }
            __Dt::Int64 => {
                type $T = i64;
                $body
            }
            __Dt::UInt8 => {
                type $T = u8;
                $body
            }
            __Dt::UInt16 => {
                type $T = u16;
                $body
            }
            __Dt::UInt32 => {
                type $T = u32;
                $body
            }
            __Dt::UInt64 => {
                type $T = u64;
                $body
            }
            __Dt::Float32 => {
                type $T = f32;
                $body
            }
            __Dt::Float64 => {
                type $T = f64;
                $body
            }
            __Dt::Boolean => {
                type $T = u8;
                $body
            }
            __Dt::TimestampSecond
            | __Dt::TimestampMillisecond
            | __Dt::TimestampMicrosecond
            | __Dt::TimestampNanosecond => {
                type $T = i64;
                $body
            }
            __Dt::Dictionary32 => {
                type $T = i32;
                $body
            }
        }
    }};
}

pub(crate) use with_element_type;
