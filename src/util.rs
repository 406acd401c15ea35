//! Scalar and vector arithmetic shared by the IPA and range-proof layers.
//!
//! Grounded on the `util::` call sites in the teacher's `range_proof.rs`/
//! `range_proof/mod.rs` (`exp_iter`, `inner_product`) and on the explicit
//! vector algebra in `original_source/bulletproofs/bp.go`/`util.go`
//! (`VectorSub`, `VectorMul`, `VectorAdd`, `ScalarProduct`, `powerOf`).
//! All arithmetic is mod the Ristretto group order by construction of
//! `curve25519_dalek::scalar::Scalar`.

use curve25519_dalek::scalar::Scalar;

use crate::errors::Error;

/// An iterator of the powers of `x`: `1, x, x^2, x^3, ...`.
#[derive(Clone)]
pub struct ScalarExp {
    x: Scalar,
    next_exp_x: Scalar,
}

impl Iterator for ScalarExp {
    type Item = Scalar;
    fn next(&mut self) -> Option<Scalar> {
        let exp_x = self.next_exp_x;
        self.next_exp_x *= self.x;
        Some(exp_x)
    }
}

/// Returns an iterator over `x^0, x^1, x^2, ...` (spec.md's `powerOf`).
pub fn exp_iter(x: Scalar) -> ScalarExp {
    ScalarExp {
        x,
        next_exp_x: Scalar::ONE,
    }
}

/// `1 + x + x^2 + ... + x^{n-1}`.
pub fn sum_of_powers(x: &Scalar, n: usize) -> Scalar {
    exp_iter(*x).take(n).fold(Scalar::ZERO, |acc, x_i| acc + x_i)
}

fn check_len(a: usize, b: usize) -> Result<(), Error> {
    if a == b {
        Ok(())
    } else {
        Err(Error::ShapeMismatch {
            expected: a,
            actual: b,
        })
    }
}

/// `<a, b> = sum_i a_i * b_i`.
pub fn inner_product(a: &[Scalar], b: &[Scalar]) -> Result<Scalar, Error> {
    check_len(a.len(), b.len())?;
    Ok(a.iter().zip(b.iter()).map(|(ai, bi)| ai * bi).sum())
}

/// Element-wise `a + b`.
pub fn add_vec(a: &[Scalar], b: &[Scalar]) -> Result<Vec<Scalar>, Error> {
    check_len(a.len(), b.len())?;
    Ok(a.iter().zip(b.iter()).map(|(ai, bi)| ai + bi).collect())
}

/// Element-wise `a - b`.
pub fn sub_vec(a: &[Scalar], b: &[Scalar]) -> Result<Vec<Scalar>, Error> {
    check_len(a.len(), b.len())?;
    Ok(a.iter().zip(b.iter()).map(|(ai, bi)| ai - bi).collect())
}

/// Hadamard (element-wise) product `a ∘ b`.
pub fn hadamard(a: &[Scalar], b: &[Scalar]) -> Result<Vec<Scalar>, Error> {
    check_len(a.len(), b.len())?;
    Ok(a.iter().zip(b.iter()).map(|(ai, bi)| ai * bi).collect())
}

/// `s * a` for every element of `a`.
pub fn vec_scalar_mul(a: &[Scalar], s: &Scalar) -> Vec<Scalar> {
    a.iter().map(|ai| ai * s).collect()
}

/// Reads the first 32 bytes of `data` into a fixed-size array.
///
/// Panics if `data` is shorter than 32 bytes; callers are expected to have
/// already checked the overall slice length (mirrors `read32` in the
/// teacher's `range_proof/mod.rs`, used only from length-checked contexts).
pub fn read32(data: &[u8]) -> [u8; 32] {
    let mut buf = [0u8; 32];
    buf.copy_from_slice(&data[..32]);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exp_iter_powers() {
        let two = Scalar::from(2u64);
        let powers: Vec<Scalar> = exp_iter(two).take(5).collect();
        assert_eq!(powers[0], Scalar::ONE);
        assert_eq!(powers[1], two);
        assert_eq!(powers[2], Scalar::from(4u64));
        assert_eq!(powers[3], Scalar::from(8u64));
        assert_eq!(powers[4], Scalar::from(16u64));
    }

    #[test]
    fn inner_product_matches_hand_computation() {
        let a = vec![Scalar::from(1u64), Scalar::from(2u64), Scalar::from(3u64)];
        let b = vec![Scalar::from(4u64), Scalar::from(5u64), Scalar::from(6u64)];
        // 1*4 + 2*5 + 3*6 = 32
        assert_eq!(inner_product(&a, &b).unwrap(), Scalar::from(32u64));
    }

    #[test]
    fn inner_product_rejects_length_mismatch() {
        let a = vec![Scalar::ONE];
        let b = vec![Scalar::ONE, Scalar::ONE];
        assert_eq!(
            inner_product(&a, &b).unwrap_err(),
            Error::ShapeMismatch {
                expected: 1,
                actual: 2
            }
        );
    }

    #[test]
    fn hadamard_is_elementwise() {
        let a = vec![Scalar::from(2u64), Scalar::from(3u64)];
        let b = vec![Scalar::from(5u64), Scalar::from(7u64)];
        let h = hadamard(&a, &b).unwrap();
        assert_eq!(h, vec![Scalar::from(10u64), Scalar::from(21u64)]);
    }

    #[test]
    fn sum_of_powers_matches_geometric_series() {
        let y = Scalar::from(3u64);
        let n = 6;
        let expected: Scalar = exp_iter(y).take(n).sum();
        assert_eq!(sum_of_powers(&y, n), expected);
    }
}
