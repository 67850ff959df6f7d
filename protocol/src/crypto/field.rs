//! # Field Arithmetic over GF(2^255 - 19)
//!
//! Elements are stored as five unsigned 51-bit limbs, least significant
//! first. Products are accumulated in `u128` and folded back using
//! `2^255 = 19 (mod p)`.
//!
//! ## Limb bounds
//!
//! Every public operation returns *weakly reduced* limbs (each below
//! `2^52`). Multiplication relies on that bound for its carry arithmetic,
//! so anything producing a `FieldElement` must end in [`FieldElement::reduce`]
//! or a multiplication.
//!
//! Canonical bytes are only produced by [`FieldElement::to_bytes`], which
//! performs the full reduction modulo p.

use std::ops::{Add, Mul, Neg, Sub};

const LOW_51_BIT_MASK: u64 = (1u64 << 51) - 1;

/// An element of the prime field used by the edwards25519 curve.
#[derive(Clone, Copy)]
pub struct FieldElement(pub(crate) [u64; 5]);

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

impl FieldElement {
    pub const ZERO: FieldElement = FieldElement([0, 0, 0, 0, 0]);

    pub const ONE: FieldElement = FieldElement([1, 0, 0, 0, 0]);

    /// The curve constant `d = -121665 / 121666`.
    pub const EDWARDS_D: FieldElement = FieldElement([
        929955233495203,
        466365720129213,
        1662059464998953,
        2033849074728123,
        1442794654840575,
    ]);

    /// `2 * d`, used by the extended-coordinate addition formula.
    pub const EDWARDS_D2: FieldElement = FieldElement([
        1859910466990425,
        932731440258426,
        1072319116312658,
        1815898335770999,
        633789495995903,
    ]);

    /// A square root of -1, `2^((p - 1) / 4)`.
    pub const SQRT_M1: FieldElement = FieldElement([
        1718705420411056,
        234908883556509,
        2233514472574048,
        2117202627021982,
        765476049583133,
    ]);
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

impl FieldElement {
    /// Loads a little-endian 32-byte value. Bit 255 is ignored, so the
    /// result may represent a value in `[p, 2^255)`; callers that need
    /// canonical input must compare against [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8; 32]) -> FieldElement {
        let load8 = |start: usize| -> u64 {
            let mut word = [0u8; 8];
            word.copy_from_slice(&bytes[start..start + 8]);
            u64::from_le_bytes(word)
        };

        FieldElement([
            load8(0) & LOW_51_BIT_MASK,
            (load8(6) >> 3) & LOW_51_BIT_MASK,
            (load8(12) >> 6) & LOW_51_BIT_MASK,
            (load8(19) >> 1) & LOW_51_BIT_MASK,
            (load8(24) >> 12) & LOW_51_BIT_MASK,
        ])
    }

    /// Serializes the fully reduced value as 32 little-endian bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut limbs = Self::reduce(self.0).0;

        // q is 1 exactly when the weakly reduced value is >= p.
        let mut q = (limbs[0] + 19) >> 51;
        q = (limbs[1] + q) >> 51;
        q = (limbs[2] + q) >> 51;
        q = (limbs[3] + q) >> 51;
        q = (limbs[4] + q) >> 51;

        limbs[0] += 19 * q;

        limbs[1] += limbs[0] >> 51;
        limbs[0] &= LOW_51_BIT_MASK;
        limbs[2] += limbs[1] >> 51;
        limbs[1] &= LOW_51_BIT_MASK;
        limbs[3] += limbs[2] >> 51;
        limbs[2] &= LOW_51_BIT_MASK;
        limbs[4] += limbs[3] >> 51;
        limbs[3] &= LOW_51_BIT_MASK;
        // The carry out of the top limb is the 2^255 that cancels with -19q.
        limbs[4] &= LOW_51_BIT_MASK;

        let mut out = [0u8; 32];
        let mut acc: u128 = 0;
        let mut acc_bits = 0u32;
        let mut index = 0usize;
        for limb in limbs {
            acc |= (limb as u128) << acc_bits;
            acc_bits += 51;
            while acc_bits >= 8 && index < 32 {
                out[index] = acc as u8;
                acc >>= 8;
                acc_bits -= 8;
                index += 1;
            }
        }
        if index < 32 {
            out[index] = acc as u8;
        }
        out
    }

    /// Returns `true` when the canonical encoding is odd. This is the
    /// "sign" of x carried in bit 255 of a compressed point.
    pub fn is_negative(&self) -> bool {
        self.to_bytes()[0] & 1 == 1
    }

    pub fn is_zero(&self) -> bool {
        self.ct_eq(&FieldElement::ZERO)
    }

    /// Constant-time equality on canonical encodings.
    pub fn ct_eq(&self, other: &FieldElement) -> bool {
        ct_bytes_eq(&self.to_bytes(), &other.to_bytes())
    }

    /// Returns `a` when `choice` is false and `b` when it is true, without
    /// branching on `choice`.
    pub fn select(a: &FieldElement, b: &FieldElement, choice: bool) -> FieldElement {
        let mask = (choice as u64).wrapping_neg();
        let mut out = [0u64; 5];
        for (i, limb) in out.iter_mut().enumerate() {
            *limb = a.0[i] ^ (mask & (a.0[i] ^ b.0[i]));
        }
        FieldElement(out)
    }
}

/// Compares two byte strings in time that depends only on their length.
pub(crate) fn ct_bytes_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let diff = a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y));
    diff == 0
}

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

impl FieldElement {
    /// Propagates carries so every limb is below `2^51 + 2^13`.
    fn reduce(mut limbs: [u64; 5]) -> FieldElement {
        let c0 = limbs[0] >> 51;
        let c1 = limbs[1] >> 51;
        let c2 = limbs[2] >> 51;
        let c3 = limbs[3] >> 51;
        let c4 = limbs[4] >> 51;

        limbs[0] &= LOW_51_BIT_MASK;
        limbs[1] &= LOW_51_BIT_MASK;
        limbs[2] &= LOW_51_BIT_MASK;
        limbs[3] &= LOW_51_BIT_MASK;
        limbs[4] &= LOW_51_BIT_MASK;

        limbs[0] += c4 * 19;
        limbs[1] += c0;
        limbs[2] += c1;
        limbs[3] += c2;
        limbs[4] += c3;

        FieldElement(limbs)
    }

    pub fn square(&self) -> FieldElement {
        self * self
    }

    /// Computes `self^(2^k)` by repeated squaring, `k >= 1`.
    pub fn pow2k(&self, k: u32) -> FieldElement {
        let mut out = self.square();
        for _ in 1..k {
            out = out.square();
        }
        out
    }

    /// Returns `(self^(2^250 - 1), self^11)`, the shared prefix of the
    /// inversion and square-root exponent chains.
    fn pow22501(&self) -> (FieldElement, FieldElement) {
        let t0 = self.square();
        let t1 = t0.pow2k(2);
        let t2 = self * &t1;
        let t3 = &t0 * &t2;
        let t4 = t3.square();
        let t5 = &t2 * &t4;
        let t6 = t5.pow2k(5);
        let t7 = &t6 * &t5;
        let t8 = t7.pow2k(10);
        let t9 = &t8 * &t7;
        let t10 = t9.pow2k(20);
        let t11 = &t10 * &t9;
        let t12 = t11.pow2k(10);
        let t13 = &t12 * &t7;
        let t14 = t13.pow2k(50);
        let t15 = &t14 * &t13;
        let t16 = t15.pow2k(100);
        let t17 = &t16 * &t15;
        let t18 = t17.pow2k(50);
        let t19 = &t18 * &t13;
        (t19, t3)
    }

    /// Multiplicative inverse via Fermat: `self^(p - 2)`. The inverse of
    /// zero is zero.
    pub fn invert(&self) -> FieldElement {
        let (t19, t3) = self.pow22501();
        let t20 = t19.pow2k(5);
        &t20 * &t3
    }

    /// `self^((p - 5) / 8)`.
    fn pow_p58(&self) -> FieldElement {
        let (t19, _) = self.pow22501();
        let t20 = t19.pow2k(2);
        self * &t20
    }

    /// Computes `sqrt(u / v)`.
    ///
    /// Returns `(true, r)` with `r^2 * v == u` when `u / v` is a square
    /// (and `(true, 0)` when `u` is zero), otherwise `(false, _)`. The
    /// returned root is never negative.
    pub fn sqrt_ratio(u: &FieldElement, v: &FieldElement) -> (bool, FieldElement) {
        let v3 = &v.square() * v;
        let v7 = &v3.square() * v;
        let mut r = &(u * &v3) * &(u * &v7).pow_p58();
        let check = v * &r.square();

        let neg_u = -u;
        let correct_sign = check.ct_eq(u);
        let flipped_sign = check.ct_eq(&neg_u);
        let flipped_sign_i = check.ct_eq(&(&neg_u * &FieldElement::SQRT_M1));

        let r_prime = &FieldElement::SQRT_M1 * &r;
        r = FieldElement::select(&r, &r_prime, flipped_sign | flipped_sign_i);

        let r_neg = -&r;
        r = FieldElement::select(&r, &r_neg, r.is_negative());

        (correct_sign | flipped_sign, r)
    }

    /// Square root of `self`, if one exists.
    pub fn sqrt(&self) -> Option<FieldElement> {
        let (is_square, root) = FieldElement::sqrt_ratio(self, &FieldElement::ONE);
        is_square.then_some(root)
    }
}

impl<'a, 'b> Add<&'b FieldElement> for &'a FieldElement {
    type Output = FieldElement;

    fn add(self, rhs: &'b FieldElement) -> FieldElement {
        let mut out = [0u64; 5];
        for (i, limb) in out.iter_mut().enumerate() {
            *limb = self.0[i] + rhs.0[i];
        }
        FieldElement::reduce(out)
    }
}

impl<'a, 'b> Sub<&'b FieldElement> for &'a FieldElement {
    type Output = FieldElement;

    fn sub(self, rhs: &'b FieldElement) -> FieldElement {
        // Add 16p before subtracting so no limb underflows.
        FieldElement::reduce([
            (self.0[0] + 36028797018963664) - rhs.0[0],
            (self.0[1] + 36028797018963952) - rhs.0[1],
            (self.0[2] + 36028797018963952) - rhs.0[2],
            (self.0[3] + 36028797018963952) - rhs.0[3],
            (self.0[4] + 36028797018963952) - rhs.0[4],
        ])
    }
}

impl<'a, 'b> Mul<&'b FieldElement> for &'a FieldElement {
    type Output = FieldElement;

    fn mul(self, rhs: &'b FieldElement) -> FieldElement {
        #[inline(always)]
        fn m(x: u64, y: u64) -> u128 {
            (x as u128) * (y as u128)
        }

        let a = &self.0;
        let b = &rhs.0;

        let b1_19 = b[1] * 19;
        let b2_19 = b[2] * 19;
        let b3_19 = b[3] * 19;
        let b4_19 = b[4] * 19;

        let c0 = m(a[0], b[0]) + m(a[4], b1_19) + m(a[3], b2_19) + m(a[2], b3_19) + m(a[1], b4_19);
        let mut c1 =
            m(a[1], b[0]) + m(a[0], b[1]) + m(a[4], b2_19) + m(a[3], b3_19) + m(a[2], b4_19);
        let mut c2 =
            m(a[2], b[0]) + m(a[1], b[1]) + m(a[0], b[2]) + m(a[4], b3_19) + m(a[3], b4_19);
        let mut c3 =
            m(a[3], b[0]) + m(a[2], b[1]) + m(a[1], b[2]) + m(a[0], b[3]) + m(a[4], b4_19);
        let mut c4 =
            m(a[4], b[0]) + m(a[3], b[1]) + m(a[2], b[2]) + m(a[1], b[3]) + m(a[0], b[4]);

        let mask = LOW_51_BIT_MASK as u128;
        let mut out = [0u64; 5];

        c1 += c0 >> 51;
        out[0] = (c0 & mask) as u64;
        c2 += c1 >> 51;
        out[1] = (c1 & mask) as u64;
        c3 += c2 >> 51;
        out[2] = (c2 & mask) as u64;
        c4 += c3 >> 51;
        out[3] = (c3 & mask) as u64;
        let carry = (c4 >> 51) as u64;
        out[4] = (c4 & mask) as u64;

        out[0] += carry * 19;
        out[1] += out[0] >> 51;
        out[0] &= LOW_51_BIT_MASK;

        FieldElement(out)
    }
}

impl<'a> Neg for &'a FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        &FieldElement::ZERO - self
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other)
    }
}

impl Eq for FieldElement {}

impl std::fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FieldElement({})", hex::encode(self.to_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fe(n: u64) -> FieldElement {
        FieldElement([n, 0, 0, 0, 0])
    }

    /// p - 1 in little-endian bytes.
    const P_MINUS_ONE: [u8; 32] = [
        0xec, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0x7f,
    ];

    #[test]
    fn test_bytes_roundtrip_canonical() {
        let mut bytes = [0u8; 32];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = (i as u8).wrapping_mul(37).wrapping_add(11);
        }
        bytes[31] &= 0x3f;
        assert_eq!(FieldElement::from_bytes(&bytes).to_bytes(), bytes);
    }

    #[test]
    fn test_p_reduces_to_zero() {
        let mut p = P_MINUS_ONE;
        p[0] = 0xed;
        assert!(FieldElement::from_bytes(&p).is_zero());
    }

    #[test]
    fn test_minus_one_wraps() {
        let minus_one = -&FieldElement::ONE;
        assert_eq!(minus_one.to_bytes(), P_MINUS_ONE);
        assert!((&minus_one + &FieldElement::ONE).is_zero());
    }

    #[test]
    fn test_small_arithmetic() {
        assert_eq!(&fe(6) * &fe(7), fe(42));
        assert_eq!(&fe(50) - &fe(8), fe(42));
        assert_eq!(&fe(40) + &fe(2), fe(42));
        assert_eq!(fe(9).pow2k(1), fe(81));
    }

    #[test]
    fn test_invert() {
        let x = FieldElement::from_bytes(&[0x5a; 32]);
        assert_eq!(&x * &x.invert(), FieldElement::ONE);
        assert!(FieldElement::ZERO.invert().is_zero());
    }

    #[test]
    fn test_sqrt_m1_squares_to_minus_one() {
        assert_eq!(FieldElement::SQRT_M1.square(), -&FieldElement::ONE);
    }

    #[test]
    fn test_d2_is_twice_d() {
        assert_eq!(
            &FieldElement::EDWARDS_D + &FieldElement::EDWARDS_D,
            FieldElement::EDWARDS_D2
        );
    }

    #[test]
    fn test_sqrt_of_square() {
        let x = FieldElement::from_bytes(&[0x17; 32]);
        let root = x.square().sqrt().expect("a square has a root");
        assert_eq!(root.square(), x.square());
        assert!(!root.is_negative());
    }

    #[test]
    fn test_sqrt_of_non_square() {
        // 2 is not a square modulo p (p = 5 mod 8).
        assert!(fe(2).sqrt().is_none());
    }

    #[test]
    fn test_sqrt_ratio() {
        let u = fe(4);
        let v = fe(9);
        let (ok, r) = FieldElement::sqrt_ratio(&u, &v);
        assert!(ok);
        assert_eq!(&r.square() * &v, u);
    }

    #[test]
    fn test_select() {
        let a = fe(1);
        let b = fe(2);
        assert_eq!(FieldElement::select(&a, &b, false), a);
        assert_eq!(FieldElement::select(&a, &b, true), b);
    }
}
