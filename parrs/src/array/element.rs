use num_complex::Complex;
use parrs_data_type::Endianness;

use super::DataType;

/// A trait representing an array element type.
///
/// Elements are plain old data in the native byte order of the target.
pub trait Element: bytemuck::Pod {
    /// The data type of an array of this element type.
    fn data_type() -> DataType;
}

/// Helper macro to implement `Element` for POD (plain old data) types.
macro_rules! impl_element_pod {
    ($raw_type:ty, $data_type:ident) => {
        impl Element for $raw_type {
            fn data_type() -> DataType {
                parrs_data_type::$data_type().with_endianness(Endianness::native())
            }
        }
    };
}

impl_element_pod!(i8, int8);
impl_element_pod!(i16, int16);
impl_element_pod!(i32, int32);
impl_element_pod!(i64, int64);
impl_element_pod!(u8, uint8);
impl_element_pod!(u16, uint16);
impl_element_pod!(u32, uint32);
impl_element_pod!(u64, uint64);
impl_element_pod!(half::f16, float16);
impl_element_pod!(f32, float32);
impl_element_pod!(f64, float64);
impl_element_pod!(Complex<f32>, complex64);
impl_element_pod!(Complex<f64>, complex128);
