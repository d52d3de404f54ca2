use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use vmm_kernel::cpu::DEFAULT_LANE_WIDTH;
use vmm_kernel::{
    select_kernel, BlockedKernel, KernelError, KernelKind, LaneElement, MatmulKernel,
    ScalarKernel, SquareMatrix, UnrolledKernel,
};

const MAX_N: usize = 2 * DEFAULT_LANE_WIDTH + 3;

fn kernels<T: LaneElement>() -> Vec<Box<dyn MatmulKernel<T>>> {
    let mut out: Vec<Box<dyn MatmulKernel<T>>> = vec![
        Box::new(BlockedKernel::<DEFAULT_LANE_WIDTH>::new()),
        Box::new(UnrolledKernel::<DEFAULT_LANE_WIDTH>::new()),
        Box::new(BlockedKernel::<4>::new()),
        Box::new(UnrolledKernel::<16>::new()),
        select_kernel::<T>(KernelKind::Auto).unwrap(),
    ];
    if let Some(native) = T::native_kernel() {
        out.push(native);
    }
    out
}

fn reference<T: LaneElement>(a: &SquareMatrix<T>, b: &SquareMatrix<T>) -> SquareMatrix<T> {
    a.matmul(b, &ScalarKernel::new()).unwrap()
}

/// Mix of small values, negatives and values within a few units of the
/// type's bounds.
fn random_i32(rng: &mut StdRng, n: usize) -> SquareMatrix<i32> {
    let data = (0..n * n)
        .map(|_| match rng.gen_range(0..4) {
            0 => rng.gen_range(-100..100),
            1 => i32::MAX - rng.gen_range(0..4),
            2 => i32::MIN + rng.gen_range(0..4),
            _ => rng.gen(),
        })
        .collect();
    SquareMatrix::new(data, n).unwrap()
}

fn check_all_sizes<T: LaneElement>(mut gen: impl FnMut(usize) -> SquareMatrix<T>) {
    for n in 0..=MAX_N {
        let a = gen(n);
        let b = gen(n);
        let expected = reference(&a, &b);
        for kernel in kernels::<T>() {
            let got = a.matmul(&b, kernel.as_ref()).unwrap();
            assert_eq!(got, expected, "kernel={} n={}", kernel.name(), n);
        }
    }
}

#[test]
fn matches_scalar_for_every_boundary_size_i32() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    check_all_sizes(|n| random_i32(&mut rng, n));
}

#[test]
fn matches_scalar_for_other_widths() {
    let mut rng = StdRng::seed_from_u64(7);
    check_all_sizes::<i8>(|n| {
        SquareMatrix::new((0..n * n).map(|_| rng.gen()).collect(), n).unwrap()
    });
    check_all_sizes::<i16>(|n| {
        SquareMatrix::new((0..n * n).map(|_| rng.gen()).collect(), n).unwrap()
    });
    check_all_sizes::<i64>(|n| {
        SquareMatrix::new((0..n * n).map(|_| rng.gen()).collect(), n).unwrap()
    });
}

#[test]
fn identity_is_neutral() {
    let mut rng = StdRng::seed_from_u64(1);
    for n in 0..=MAX_N {
        let a = random_i32(&mut rng, n);
        let id = SquareMatrix::identity(n);
        for kernel in kernels::<i32>() {
            assert_eq!(a.matmul(&id, kernel.as_ref()).unwrap(), a, "{} n={}", kernel.name(), n);
            assert_eq!(id.matmul(&a, kernel.as_ref()).unwrap(), a, "{} n={}", kernel.name(), n);
        }
    }
}

#[test]
fn zero_annihilates() {
    let mut rng = StdRng::seed_from_u64(2);
    for n in 0..=MAX_N {
        let a = random_i32(&mut rng, n);
        let zero = SquareMatrix::zeros(n);
        for kernel in kernels::<i32>() {
            assert_eq!(a.matmul(&zero, kernel.as_ref()).unwrap(), zero);
            assert_eq!(zero.matmul(&a, kernel.as_ref()).unwrap(), zero);
        }
    }
}

#[test]
fn output_is_fully_overwritten_and_repeatable() {
    let mut rng = StdRng::seed_from_u64(3);
    for n in 0..=MAX_N {
        let a = random_i32(&mut rng, n);
        let b = random_i32(&mut rng, n);
        for kernel in kernels::<i32>() {
            let mut first = SquareMatrix::new(vec![i32::MIN; n * n], n).unwrap();
            let mut second = SquareMatrix::new(vec![42; n * n], n).unwrap();
            kernel.multiply(&a, &b, &mut first).unwrap();
            kernel.multiply(&a, &b, &mut second).unwrap();
            assert_eq!(first, second, "{} n={}", kernel.name(), n);
        }
    }
}

#[test]
fn five_by_five_scenario() {
    let a = SquareMatrix::from_rows(vec![
        vec![1, 2, 3, 4, 5],
        vec![5, 6, 7, 8, 9],
        vec![9, 10, 11, 12, 13],
        vec![13, 14, 15, 16, 17],
        vec![18, 19, 20, 21, 22],
    ])
    .unwrap();
    let b = SquareMatrix::from_rows(vec![
        vec![1, 0, 0, 1, 1],
        vec![0, 1, 1, 0, 0],
        vec![1, 1, 0, 0, 1],
        vec![0, 0, 1, 1, 0],
        vec![1, 0, 1, 1, 0],
    ])
    .unwrap();
    let expected = SquareMatrix::from_rows(vec![
        vec![9, 5, 11, 10, 4],
        vec![21, 13, 23, 22, 12],
        vec![33, 21, 35, 34, 20],
        vec![45, 29, 47, 46, 28],
        vec![60, 39, 62, 61, 38],
    ])
    .unwrap();

    assert_eq!(reference(&a, &b), expected);
    for kernel in kernels::<i32>() {
        assert_eq!(a.matmul(&b, kernel.as_ref()).unwrap(), expected, "{}", kernel.name());
    }
    assert_eq!(vmm_kernel::matmul(&a, &b).unwrap(), expected);
}

#[test]
fn mismatch_is_reported_before_any_write() {
    let a = SquareMatrix::<i32>::identity(5);
    let b = SquareMatrix::<i32>::identity(4);
    for kernel in kernels::<i32>() {
        let mut c = SquareMatrix::new(vec![-3; 25], 5).unwrap();
        let err = kernel.multiply(&a, &b, &mut c).unwrap_err();
        assert_eq!(err, KernelError::DimensionMismatch { a: 5, b: 4, c: 5 });
        assert_eq!(c.as_slice(), &[-3; 25]);
    }
}

#[test]
fn slice_entry_point_validates_lengths() {
    let kernel = BlockedKernel::<DEFAULT_LANE_WIDTH>::new();
    let a = vec![1i32; 9];
    let b = vec![1i32; 8];
    let mut c = vec![0i32; 9];
    let err = kernel.multiply_slices(&a, &b, &mut c, 3).unwrap_err();
    assert_eq!(
        err,
        KernelError::LengthMismatch {
            n: 3,
            expected: 9,
            got: 8
        }
    );
    assert_eq!(c, vec![0; 9]);

    let b = vec![1i32; 9];
    kernel.multiply_slices(&a, &b, &mut c, 3).unwrap();
    assert_eq!(c, vec![3; 9]);

    // n = 0 with empty buffers is a no-op.
    let empty: [i32; 0] = [];
    kernel.multiply_slices(&empty, &empty, &mut [], 0).unwrap();
}
