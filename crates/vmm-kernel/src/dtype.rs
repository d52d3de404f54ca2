use std::fmt;

use crate::kernel::MatmulKernel;

/// Supported matrix element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 8-bit signed integer.
    I8,
    /// 16-bit signed integer.
    I16,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
}

impl DType {
    /// Returns the size in bytes of a single element.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            DType::I8 => 1,
            DType::I16 => 2,
            DType::I32 => 4,
            DType::I64 => 8,
        }
    }

    /// Number of elements of this type that fit in a register of `bits` bits.
    ///
    /// - I32 in a 256-bit register: 8 lanes
    /// - I64 in a 256-bit register: 4 lanes
    pub fn lanes_for_bits(&self, bits: usize) -> usize {
        bits / (self.size_in_bytes() * 8)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::I8 => write!(f, "i8"),
            DType::I16 => write!(f, "i16"),
            DType::I32 => write!(f, "i32"),
            DType::I64 => write!(f, "i64"),
        }
    }
}

/// A fixed-width signed integer that can be packed into a [`Lane`](crate::lane::Lane).
///
/// Arithmetic wraps on overflow. Kernels must never widen, so that every
/// kernel agrees with the scalar reference bit-for-bit.
pub trait LaneElement:
    Copy + Default + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    const ZERO: Self;
    const ONE: Self;
    const DTYPE: DType;

    fn wrapping_add(self, rhs: Self) -> Self;

    fn wrapping_mul(self, rhs: Self) -> Self;

    /// Returns an architecture-specific kernel for this element type, if the
    /// running CPU supports one.
    fn native_kernel() -> Option<Box<dyn MatmulKernel<Self>>> {
        None
    }
}

macro_rules! impl_lane_element {
    ($ty:ty, $dtype:expr) => {
        impl LaneElement for $ty {
            const ZERO: Self = 0;
            const ONE: Self = 1;
            const DTYPE: DType = $dtype;

            #[inline(always)]
            fn wrapping_add(self, rhs: Self) -> Self {
                <$ty>::wrapping_add(self, rhs)
            }

            #[inline(always)]
            fn wrapping_mul(self, rhs: Self) -> Self {
                <$ty>::wrapping_mul(self, rhs)
            }
        }
    };
}

impl_lane_element!(i8, DType::I8);
impl_lane_element!(i16, DType::I16);
impl_lane_element!(i64, DType::I64);

impl LaneElement for i32 {
    const ZERO: Self = 0;
    const ONE: Self = 1;
    const DTYPE: DType = DType::I32;

    #[inline(always)]
    fn wrapping_add(self, rhs: Self) -> Self {
        i32::wrapping_add(self, rhs)
    }

    #[inline(always)]
    fn wrapping_mul(self, rhs: Self) -> Self {
        i32::wrapping_mul(self, rhs)
    }

    fn native_kernel() -> Option<Box<dyn MatmulKernel<Self>>> {
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        {
            if let Some(kernel) = crate::avx2::Avx2Kernel::new() {
                return Some(Box::new(kernel));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_in_bytes() {
        assert_eq!(DType::I8.size_in_bytes(), 1);
        assert_eq!(DType::I16.size_in_bytes(), 2);
        assert_eq!(DType::I32.size_in_bytes(), 4);
        assert_eq!(DType::I64.size_in_bytes(), 8);
    }

    #[test]
    fn test_lanes_for_bits() {
        assert_eq!(DType::I32.lanes_for_bits(256), 8);
        assert_eq!(DType::I64.lanes_for_bits(256), 4);
        assert_eq!(DType::I8.lanes_for_bits(512), 64);
    }

    #[test]
    fn test_display() {
        assert_eq!(i16::DTYPE.to_string(), "i16");
        assert_eq!(i32::DTYPE.to_string(), "i32");
    }

    #[test]
    fn test_wrapping_arithmetic() {
        assert_eq!(LaneElement::wrapping_add(i32::MAX, 1), i32::MIN);
        assert_eq!(LaneElement::wrapping_mul(i8::MAX, 2i8), -2);
        assert_eq!(LaneElement::wrapping_mul(i64::MIN, -1i64), i64::MIN);
    }

    #[test]
    fn test_no_native_kernel_for_narrow_types() {
        assert!(i8::native_kernel().is_none());
        assert!(i64::native_kernel().is_none());
    }
}
