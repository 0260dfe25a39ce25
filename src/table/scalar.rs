//! A single typed value tagged with a validity flag: one row's worth of data,
//! broadcast to many destinations by the scalar scatterer.

use crate::error::PindahError;
use crate::types::PindahDataType;

/// A single element value plus its validity flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    dtype: PindahDataType,
    value: Vec<u8>,
    is_valid: bool,
}

impl Scalar {
    /// A valid scalar holding `value`.
    ///
    /// # Errors
    /// `TypeMismatch` when `T`'s width differs from the declared dtype's.
    pub fn new<T: bytemuck::Pod>(dtype: PindahDataType, value: T) -> Result<Self, PindahError> {
        if std::mem::size_of::<T>() != dtype.size_bytes() {
            return Err(PindahError::TypeMismatch(format!(
                "{}-byte scalar value declared as {}",
                std::mem::size_of::<T>(),
                dtype
            )));
        }
        Ok(Self {
            dtype,
            value: bytemuck::bytes_of(&value).to_vec(),
            is_valid: true,
        })
    }

    /// An invalid (null) scalar of the given type. The value bytes are zero
    /// and must never be read.
    pub fn null(dtype: PindahDataType) -> Self {
        Self {
            dtype,
            value: vec![0u8; dtype.size_bytes()],
            is_valid: false,
        }
    }

    pub fn dtype(&self) -> PindahDataType {
        self.dtype
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// The typed value. Callers check `is_valid` first; reading a null
    /// scalar's payload is a contract violation this returns an error for.
    pub fn typed<T: bytemuck::Pod>(&self) -> Result<T, PindahError> {
        if !self.is_valid {
            return Err(PindahError::InternalError(
                "read of a null scalar's value".to_string(),
            ));
        }
        if std::mem::size_of::<T>() != self.dtype.size_bytes() {
            return Err(PindahError::TypeMismatch(format!(
                "{}-byte read of a {} scalar",
                std::mem::size_of::<T>(),
                self.dtype
            )));
        }
        bytemuck::try_pod_read_unaligned(&self.value).map_err(PindahError::from)
    }

    /// Raw value bytes, regardless of validity.
    pub fn value_bytes(&self) -> &[u8] {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_round_trip() {
        let s = Scalar::new(PindahDataType::Int64, -42i64).unwrap();
        assert!(s.is_valid());
        assert_eq!(s.typed::<i64>().unwrap(), -42);
    }

    #[test]
    fn test_width_mismatch_rejected() {
        assert!(Scalar::new(PindahDataType::Int64, 1i32).is_err());
    }

    #[test]
    fn test_null_scalar_refuses_reads() {
        let s = Scalar::null(PindahDataType::Float32);
        assert!(!s.is_valid());
        assert!(s.typed::<f32>().is_err());
    }
}
