#![no_main]

use libfuzzer_sys::fuzz_target;

use axmat_core::{add, multiply, Matrix, Scalar};
use axmat_memory::Arena;

fuzz_target!(|data: &[u8]| {
    if data.len() < 6 {
        return;
    }
    // Shape and slice ranges from the first six bytes, capped small
    let rows = usize::from(data[0] % 12);
    let cols = usize::from(data[1] % 12);
    let (r0, r1) = (usize::from(data[2] % 14), usize::from(data[3] % 14));
    let (c0, c1) = (usize::from(data[4] % 14), usize::from(data[5] % 14));

    let arena = Arena::new(256).unwrap();
    let values = &data[6..];
    let Ok(mut m) = Matrix::from_fn(rows, cols, Some(&arena), |i, j| {
        let byte = values.get(i * cols + j).copied().unwrap_or(0);
        Scalar::from(byte)
    }) else {
        return;
    };

    let valid = r0 <= r1 && r1 <= rows && c0 <= c1 && c1 <= cols;
    match m.slice(r0..r1, c0..c1) {
        Ok(mut s) => {
            assert!(valid);
            assert_eq!(s.shape(), (r1 - r0, c1 - c0));
            s.fill(-1.0);
        }
        Err(_) => {
            assert!(!valid);
            return;
        }
    }

    // Writes through the slice land exactly inside the region
    for i in 0..rows {
        for j in 0..cols {
            let inside = (r0..r1).contains(&i) && (c0..c1).contains(&j);
            assert_eq!(m[(i, j)] < 0.0, inside);
        }
    }

    let view = m.slice_view(r0..r1, c0..c1).unwrap();
    let sum = add(view, view, Some(&arena)).unwrap();
    assert_eq!(sum.shape(), view.shape());
    let square = multiply(view, view, None);
    assert_eq!(square.is_ok(), view.rows() == view.cols());
});
