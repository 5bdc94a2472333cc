//! Verification helpers
//!
//! Norms, residuals and factor unpacking used to judge whether a
//! factorization or solve is correct. These allocate and are meant for tests,
//! benchmarks and the demo driver rather than for the solve path itself.

use crate::traits::RealField;
use ndarray::{Array1, Array2, ArrayBase, Data, Ix1, Ix2};

/// Compute `y = A·x`.
pub fn matrix_times_vector<T, S, V>(a: &ArrayBase<S, Ix2>, x: &ArrayBase<V, Ix1>) -> Array1<T>
where
    T: RealField,
    S: Data<Elem = T>,
    V: Data<Elem = T>,
{
    assert_eq!(a.ncols(), x.len(), "matrix columns must match vector length");
    a.dot(x)
}

/// Euclidean distance ‖x − y‖₂ between two vectors.
pub fn norm_dist<T, S, V>(x: &ArrayBase<S, Ix1>, y: &ArrayBase<V, Ix1>) -> T
where
    T: RealField,
    S: Data<Elem = T>,
    V: Data<Elem = T>,
{
    assert_eq!(x.len(), y.len(), "vector lengths must match");
    x.iter()
        .zip(y.iter())
        .map(|(&a, &b)| (a - b) * (a - b))
        .fold(T::zero(), |acc, v| acc + v)
        .sqrt()
}

/// Euclidean norm ‖x‖₂.
pub fn vector_norm<T, S>(x: &ArrayBase<S, Ix1>) -> T
where
    T: RealField,
    S: Data<Elem = T>,
{
    x.iter().fold(T::zero(), |acc, &v| acc + v * v).sqrt()
}

/// Frobenius distance ‖A − B‖_F between two matrices.
pub fn frobenius_norm_dist<T, S, V>(a: &ArrayBase<S, Ix2>, b: &ArrayBase<V, Ix2>) -> T
where
    T: RealField,
    S: Data<Elem = T>,
    V: Data<Elem = T>,
{
    assert_eq!(a.dim(), b.dim(), "matrix shapes must match");
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x - y) * (x - y))
        .fold(T::zero(), |acc, v| acc + v)
        .sqrt()
}

/// Frobenius norm ‖A‖_F.
pub fn frobenius_norm<T, S>(a: &ArrayBase<S, Ix2>) -> T
where
    T: RealField,
    S: Data<Elem = T>,
{
    a.iter().fold(T::zero(), |acc, &v| acc + v * v).sqrt()
}

/// Residual ‖A·x − b‖₂ of a computed solution.
pub fn residual_norm<T, S, V, W>(
    a: &ArrayBase<S, Ix2>,
    x: &ArrayBase<V, Ix1>,
    b: &ArrayBase<W, Ix1>,
) -> T
where
    T: RealField,
    S: Data<Elem = T>,
    V: Data<Elem = T>,
    W: Data<Elem = T>,
{
    norm_dist(&matrix_times_vector(a, x), b)
}

/// Split packed factors into explicit L (unit diagonal) and U.
pub fn unpack<T, S>(packed: &ArrayBase<S, Ix2>) -> (Array2<T>, Array2<T>)
where
    T: RealField,
    S: Data<Elem = T>,
{
    let (rows, cols) = packed.dim();
    let lower = Array2::from_shape_fn((rows, cols), |(i, j)| match i.cmp(&j) {
        std::cmp::Ordering::Greater => packed[[i, j]],
        std::cmp::Ordering::Equal => T::one(),
        std::cmp::Ordering::Less => T::zero(),
    });
    let upper = Array2::from_shape_fn((rows, cols), |(i, j)| {
        if i <= j { packed[[i, j]] } else { T::zero() }
    });
    (lower, upper)
}

/// Rows of `a` reordered by `perm`: row `i` of the result is row `perm[i]` of `a`.
pub fn permute_rows<T, S>(a: &ArrayBase<S, Ix2>, perm: &[usize]) -> Array2<T>
where
    T: RealField,
    S: Data<Elem = T>,
{
    assert_eq!(a.nrows(), perm.len(), "permutation length must match rows");
    Array2::from_shape_fn(a.dim(), |(i, j)| a[[perm[i], j]])
}

/// Frobenius distance ‖P·A − L·U‖_F for a packed PLU result.
pub fn plu_residual<T, S, P>(a: &ArrayBase<S, Ix2>, packed: &ArrayBase<P, Ix2>, perm: &[usize]) -> T
where
    T: RealField,
    S: Data<Elem = T>,
    P: Data<Elem = T>,
{
    let (lower, upper) = unpack(packed);
    frobenius_norm_dist(&permute_rows(a, perm), &lower.dot(&upper))
}

/// `true` if `perm` contains every index in `[0, perm.len())` exactly once.
pub fn is_permutation(perm: &[usize]) -> bool {
    let mut seen = vec![false; perm.len()];
    for &p in perm {
        if p >= perm.len() || seen[p] {
            return false;
        }
        seen[p] = true;
    }
    true
}

/// `true` if every entry is finite (no NaN or infinity leaked out).
pub fn all_finite<T, S, D>(a: &ArrayBase<S, D>) -> bool
where
    T: RealField,
    S: Data<Elem = T>,
    D: ndarray::Dimension,
{
    a.iter().all(|v| v.is_finite())
}

/// Residual relative to the data scale, `‖A·x − b‖ / (‖A‖_F·‖x‖ + ‖b‖)`.
///
/// Returns zero for an all-zero system.
pub fn relative_residual<T, S, V, W>(
    a: &ArrayBase<S, Ix2>,
    x: &ArrayBase<V, Ix1>,
    b: &ArrayBase<W, Ix1>,
) -> T
where
    T: RealField,
    S: Data<Elem = T>,
    V: Data<Elem = T>,
    W: Data<Elem = T>,
{
    let scale = frobenius_norm(a) * vector_norm(x) + vector_norm(b);
    if scale.is_zero() {
        return T::zero();
    }
    residual_norm(a, x, b) / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_matrix_times_vector() {
        let a = array![[1.0_f64, 2.0], [3.0, 4.0]];
        let x = array![1.0_f64, -1.0];
        assert_eq!(matrix_times_vector(&a, &x), array![-1.0, -1.0]);
    }

    #[test]
    fn test_norm_dist() {
        let x = array![3.0_f64, 0.0];
        let y = array![0.0_f64, 4.0];
        assert_relative_eq!(norm_dist(&x, &y), 5.0);
    }

    #[test]
    fn test_frobenius_norm_dist() {
        let a = array![[1.0_f64, 2.0], [3.0, 4.0]];
        let b = array![[1.0_f64, 2.0], [3.0, 6.0]];
        assert_relative_eq!(frobenius_norm_dist(&a, &b), 2.0);
        assert_relative_eq!(frobenius_norm_dist(&a, &a), 0.0);
    }

    #[test]
    fn test_unpack() {
        let packed = array![[4.0_f64, 3.0], [0.5, -0.5]];
        let (l, u) = unpack(&packed);
        assert_eq!(l, array![[1.0, 0.0], [0.5, 1.0]]);
        assert_eq!(u, array![[4.0, 3.0], [0.0, -0.5]]);
    }

    #[test]
    fn test_permute_rows() {
        let a = array![[1.0_f64, 1.0], [2.0, 2.0], [3.0, 3.0]];
        let pa = permute_rows(&a, &[2, 0, 1]);
        assert_eq!(pa, array![[3.0, 3.0], [1.0, 1.0], [2.0, 2.0]]);
    }

    #[test]
    fn test_is_permutation() {
        assert!(is_permutation(&[1, 2, 0]));
        assert!(!is_permutation(&[1, 1, 0]));
        assert!(!is_permutation(&[0, 3]));
    }

    #[test]
    fn test_relative_residual_zero_system() {
        let a = Array2::<f64>::zeros((2, 2));
        let x = Array1::<f64>::zeros(2);
        assert_eq!(relative_residual(&a, &x, &x), 0.0);
    }
}
