// AVX2 kernel for i32 matrices (x86_64 only).
//
// Same block and tail layout as the portable blocked kernel, with W fixed at
// eight 32-bit lanes. Wide loads and stores are only issued on subslices
// that hold at least eight elements; tail blocks go through stack scratch
// arrays.

use std::arch::x86_64::{
    __m256i, _mm256_add_epi32, _mm256_loadu_si256, _mm256_mullo_epi32, _mm256_set1_epi32,
    _mm256_setzero_si256, _mm256_storeu_si256,
};

use crate::kernel::MatmulKernel;

const LANES: usize = 8;

/// i32 kernel built on 256-bit AVX2 registers.
#[derive(Debug, Clone)]
pub struct Avx2Kernel {
    _private: (),
}

impl Avx2Kernel {
    /// Returns `None` if the running CPU does not support AVX2.
    pub fn new() -> Option<Self> {
        if is_x86_feature_detected!("avx2") {
            Some(Avx2Kernel { _private: () })
        } else {
            None
        }
    }
}

impl MatmulKernel<i32> for Avx2Kernel {
    fn name(&self) -> &str {
        "avx2"
    }

    fn lane_width(&self) -> usize {
        LANES
    }

    fn gemm(&self, a: &[i32], b: &[i32], c: &mut [i32], n: usize) {
        // SAFETY: an `Avx2Kernel` only exists after AVX2 was detected.
        unsafe { gemm_avx2(a, b, c, n) }
    }
}

#[target_feature(enable = "avx2")]
unsafe fn gemm_avx2(a: &[i32], b: &[i32], c: &mut [i32], n: usize) {
    for i in 0..n {
        let a_row = &a[i * n..(i + 1) * n];
        let c_row = &mut c[i * n..(i + 1) * n];

        for j in (0..n).step_by(LANES) {
            let width = n - j;
            let mut acc = _mm256_setzero_si256();

            if width >= LANES {
                for (k, &a_ik) in a_row.iter().enumerate() {
                    let b_block = &b[k * n + j..k * n + j + LANES];
                    let a_vec = _mm256_set1_epi32(a_ik);
                    let b_vec = _mm256_loadu_si256(b_block.as_ptr() as *const __m256i);
                    acc = _mm256_add_epi32(acc, _mm256_mullo_epi32(a_vec, b_vec));
                }
                let c_block = &mut c_row[j..j + LANES];
                _mm256_storeu_si256(c_block.as_mut_ptr() as *mut __m256i, acc);
            } else {
                // Only the first `width` slots are ever written, the rest stay zero.
                let mut scratch_b = [0i32; LANES];
                for (k, &a_ik) in a_row.iter().enumerate() {
                    scratch_b[..width].copy_from_slice(&b[k * n + j..(k + 1) * n]);
                    let a_vec = _mm256_set1_epi32(a_ik);
                    let b_vec = _mm256_loadu_si256(scratch_b.as_ptr() as *const __m256i);
                    acc = _mm256_add_epi32(acc, _mm256_mullo_epi32(a_vec, b_vec));
                }
                let mut scratch_c = [0i32; LANES];
                _mm256_storeu_si256(scratch_c.as_mut_ptr() as *mut __m256i, acc);
                c_row[j..].copy_from_slice(&scratch_c[..width]);
            }
        }
    }
}
