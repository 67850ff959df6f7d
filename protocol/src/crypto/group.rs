//! # Group Elements on edwards25519
//!
//! Points on the twisted Edwards curve `-x^2 + y^2 = 1 + d x^2 y^2` in
//! extended coordinates `(X : Y : Z : T)` with `x = X/Z`, `y = Y/Z` and
//! `T = XY/Z`.
//!
//! Addition uses the complete `add-2008-hwcd-3` formula and doubling uses
//! `dbl-2008-hwcd`, both from Hisil, Wong, Carter and Dawson. Because the
//! addition is complete, no input (identity, doubling, negation) needs a
//! special case.
//!
//! ## Compressed form
//!
//! A point is encoded as the 32-byte little-endian `y` coordinate with the
//! parity of `x` stored in bit 255. [`GroupElement::decode`] rejects
//! anything that is not the canonical encoding of a curve point.
//!
//! ## Scalar multiplication
//!
//! [`GroupElement::mul`] walks all 256 bits of the scalar and performs one
//! doubling and one addition per bit, selecting the result with a mask.
//! The sequence of field operations is the same for every scalar.

use std::ops::{Add, Neg, Sub};

use super::error::CryptoError;
use super::field::{ct_bytes_eq, FieldElement};

/// A point on edwards25519 in extended coordinates.
#[derive(Clone, Copy)]
pub struct GroupElement {
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
    t: FieldElement,
}

/// Compressed encoding of a point.
pub type EncodedPoint = [u8; 32];

impl GroupElement {
    /// The neutral element `(0, 1)`.
    pub const IDENTITY: GroupElement = GroupElement {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
        z: FieldElement::ONE,
        t: FieldElement::ZERO,
    };

    /// The standard base point B, with `y = 4/5` and positive `x`.
    pub const BASE: GroupElement = GroupElement {
        x: FieldElement([
            1738742601995546,
            1146398526822698,
            2070867633025821,
            562264141797630,
            587772402128613,
        ]),
        y: FieldElement([
            1801439850948184,
            1351079888211148,
            450359962737049,
            900719925474099,
            1801439850948198,
        ]),
        z: FieldElement::ONE,
        t: FieldElement([
            1841354044333475,
            16398895984059,
            755974180946558,
            900171276175154,
            1821297809914039,
        ]),
    };

    // -----------------------------------------------------------------------
    // Encoding
    // -----------------------------------------------------------------------

    /// Compresses the point into its canonical 32-byte form.
    pub fn encode(&self) -> EncodedPoint {
        let z_inv = self.z.invert();
        let x = &self.x * &z_inv;
        let y = &self.y * &z_inv;
        let mut out = y.to_bytes();
        out[31] ^= (x.is_negative() as u8) << 7;
        out
    }

    /// Decompresses a point.
    ///
    /// # Errors
    ///
    /// [`CryptoError::InvalidPointEncoding`] when `y` is not reduced modulo
    /// p, when no `x` satisfies the curve equation, or when the encoding
    /// asks for the negative of `x = 0`.
    pub fn decode(bytes: &EncodedPoint) -> Result<GroupElement, CryptoError> {
        let sign = bytes[31] >> 7;
        let mut y_bytes = *bytes;
        y_bytes[31] &= 0x7f;

        let y = FieldElement::from_bytes(&y_bytes);
        if !ct_bytes_eq(&y.to_bytes(), &y_bytes) {
            return Err(CryptoError::InvalidPointEncoding);
        }

        let yy = y.square();
        let u = &yy - &FieldElement::ONE;
        let v = &(&yy * &FieldElement::EDWARDS_D) + &FieldElement::ONE;
        let (is_valid, mut x) = FieldElement::sqrt_ratio(&u, &v);
        if !is_valid {
            return Err(CryptoError::InvalidPointEncoding);
        }
        if x.is_zero() && sign == 1 {
            return Err(CryptoError::InvalidPointEncoding);
        }

        // sqrt_ratio returns the non-negative root.
        let x_neg = -&x;
        x = FieldElement::select(&x, &x_neg, sign == 1);

        let t = &x * &y;
        Ok(GroupElement {
            x,
            y,
            z: FieldElement::ONE,
            t,
        })
    }

    /// Checks the projective curve equation and the `T` invariant.
    pub fn is_on_curve(&self) -> bool {
        let xx = self.x.square();
        let yy = self.y.square();
        let zz = self.z.square();
        let tt = self.t.square();

        // (-X^2 + Y^2) Z^2 == Z^4 + d X^2 Y^2, with X^2 Y^2 = T^2 Z^2.
        let lhs = &(&yy - &xx) * &zz;
        let rhs = &zz.square() + &(&(&FieldElement::EDWARDS_D * &tt) * &zz);
        let t_ok = (&self.x * &self.y) == (&self.t * &self.z);
        lhs == rhs && t_ok
    }

    // -----------------------------------------------------------------------
    // Group law
    // -----------------------------------------------------------------------

    /// Point doubling.
    pub fn double(&self) -> GroupElement {
        let a = self.x.square();
        let b = self.y.square();
        let zz = self.z.square();
        let c = &zz + &zz;
        let d = -&a;
        let e = &(&(&self.x + &self.y).square() - &a) - &b;
        let g = &d + &b;
        let f = &g - &c;
        let h = &d - &b;

        GroupElement {
            x: &e * &f,
            y: &g * &h,
            z: &f * &g,
            t: &e * &h,
        }
    }

    /// Returns `a` when `choice` is false and `b` otherwise.
    fn select(a: &GroupElement, b: &GroupElement, choice: bool) -> GroupElement {
        GroupElement {
            x: FieldElement::select(&a.x, &b.x, choice),
            y: FieldElement::select(&a.y, &b.y, choice),
            z: FieldElement::select(&a.z, &b.z, choice),
            t: FieldElement::select(&a.t, &b.t, choice),
        }
    }

    /// Multiplies the point by a 256-bit little-endian scalar.
    ///
    /// The scalar is used as an integer, not reduced modulo the group
    /// order.
    pub fn mul(&self, scalar: &[u8; 32]) -> GroupElement {
        let mut acc = GroupElement::IDENTITY;
        for i in (0..256).rev() {
            let bit = (scalar[i >> 3] >> (i & 7)) & 1 == 1;
            acc = acc.double();
            let sum = &acc + self;
            acc = GroupElement::select(&acc, &sum, bit);
        }
        acc
    }

    /// `scalar * B`.
    pub fn mul_base(scalar: &[u8; 32]) -> GroupElement {
        GroupElement::BASE.mul(scalar)
    }

    /// Multiplies by the cofactor 8.
    pub fn mul_by_cofactor(&self) -> GroupElement {
        self.double().double().double()
    }

    /// Returns `true` for points of order dividing 8.
    pub fn is_small_order(&self) -> bool {
        self.mul_by_cofactor() == GroupElement::IDENTITY
    }
}

impl<'a, 'b> Add<&'b GroupElement> for &'a GroupElement {
    type Output = GroupElement;

    fn add(self, rhs: &'b GroupElement) -> GroupElement {
        let a = &(&self.y - &self.x) * &(&rhs.y - &rhs.x);
        let b = &(&self.y + &self.x) * &(&rhs.y + &rhs.x);
        let c = &(&self.t * &FieldElement::EDWARDS_D2) * &rhs.t;
        let zz = &self.z * &rhs.z;
        let d = &zz + &zz;
        let e = &b - &a;
        let f = &d - &c;
        let g = &d + &c;
        let h = &b + &a;

        GroupElement {
            x: &e * &f,
            y: &g * &h,
            z: &f * &g,
            t: &e * &h,
        }
    }
}

impl<'a> Neg for &'a GroupElement {
    type Output = GroupElement;

    fn neg(self) -> GroupElement {
        GroupElement {
            x: -&self.x,
            y: self.y,
            z: self.z,
            t: -&self.t,
        }
    }
}

impl<'a, 'b> Sub<&'b GroupElement> for &'a GroupElement {
    type Output = GroupElement;

    fn sub(self, rhs: &'b GroupElement) -> GroupElement {
        self + &(-rhs)
    }
}

impl PartialEq for GroupElement {
    /// Projective equality: `X1 Z2 == X2 Z1` and `Y1 Z2 == Y2 Z1`.
    fn eq(&self, other: &Self) -> bool {
        (&self.x * &other.z) == (&other.x * &self.z) && (&self.y * &other.z) == (&other.y * &self.z)
    }
}

impl Eq for GroupElement {}

impl std::fmt::Debug for GroupElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GroupElement({})", hex::encode(self.encode()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve25519_dalek::constants::ED25519_BASEPOINT_POINT;
    use curve25519_dalek::edwards::CompressedEdwardsY;
    use curve25519_dalek::scalar::Scalar;

    const BASE_ENCODED: &str = "5866666666666666666666666666666666666666666666666666666666666666";

    fn scalar_bytes(seed: u8) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (i, b) in out.iter_mut().enumerate() {
            *b = seed.wrapping_mul(31).wrapping_add(i as u8 * 7);
        }
        out
    }

    #[test]
    fn test_base_point_encoding() {
        assert_eq!(hex::encode(GroupElement::BASE.encode()), BASE_ENCODED);
        assert!(GroupElement::BASE.is_on_curve());
    }

    #[test]
    fn test_base_point_decodes() {
        let bytes: [u8; 32] = hex::decode(BASE_ENCODED).unwrap().try_into().unwrap();
        let point = GroupElement::decode(&bytes).unwrap();
        assert_eq!(point, GroupElement::BASE);
    }

    #[test]
    fn test_identity_encoding() {
        let mut expected = [0u8; 32];
        expected[0] = 1;
        assert_eq!(GroupElement::IDENTITY.encode(), expected);
        assert_eq!(GroupElement::decode(&expected).unwrap(), GroupElement::IDENTITY);
    }

    #[test]
    fn test_add_and_double_agree() {
        let b = GroupElement::BASE;
        assert_eq!(&b + &b, b.double());
        let four = b.double().double();
        assert_eq!(&(&b + &b) + &(&b + &b), four);
        assert!(four.is_on_curve());
    }

    #[test]
    fn test_curve_check_on_projective_coordinates() {
        let b = GroupElement::BASE;
        let lambda = FieldElement([7, 0, 0, 0, 0]);
        let scaled = GroupElement {
            x: &b.x * &lambda,
            y: &b.y * &lambda,
            z: &b.z * &lambda,
            t: &b.t * &lambda,
        };
        assert!(scaled.is_on_curve());
        assert_eq!(scaled, b);

        let swapped = GroupElement { x: b.y, y: b.x, ..b };
        assert!(!swapped.is_on_curve());
        let bad_t = GroupElement { t: FieldElement::ONE, ..b };
        assert!(!bad_t.is_on_curve());
    }

    #[test]
    fn test_neg_and_sub() {
        let b = GroupElement::BASE;
        assert_eq!(&b - &b, GroupElement::IDENTITY);
        assert_eq!(&b + &(-&b), GroupElement::IDENTITY);
        assert_eq!(&b.double() - &b, b);
    }

    #[test]
    fn test_mul_small_scalars() {
        let mut three = [0u8; 32];
        three[0] = 3;
        let expected = &GroupElement::BASE.double() + &GroupElement::BASE;
        assert_eq!(GroupElement::mul_base(&three), expected);
        assert_eq!(GroupElement::mul_base(&[0u8; 32]), GroupElement::IDENTITY);
    }

    #[test]
    fn test_mul_base_matches_dalek() {
        for seed in 0..8u8 {
            let mut bytes = scalar_bytes(seed);
            bytes[31] &= 0x0f;
            let ours = GroupElement::mul_base(&bytes).encode();
            let theirs = (ED25519_BASEPOINT_POINT * Scalar::from_bytes_mod_order(bytes))
                .compress()
                .to_bytes();
            assert_eq!(ours, theirs, "seed {seed}");
        }
    }

    #[test]
    fn test_mul_arbitrary_point_matches_dalek() {
        let point_scalar = Scalar::from_bytes_mod_order(scalar_bytes(99));
        let dalek_point = ED25519_BASEPOINT_POINT * point_scalar;
        let ours_point = GroupElement::decode(&dalek_point.compress().to_bytes()).unwrap();

        let mut k = scalar_bytes(5);
        k[31] &= 0x0f;
        let ours = ours_point.mul(&k).encode();
        let theirs = (dalek_point * Scalar::from_bytes_mod_order(k))
            .compress()
            .to_bytes();
        assert_eq!(ours, theirs);
    }

    #[test]
    fn test_decode_roundtrip_matches_dalek() {
        for seed in 0..8u8 {
            let point = ED25519_BASEPOINT_POINT * Scalar::from_bytes_mod_order(scalar_bytes(seed));
            let encoded = point.compress().to_bytes();
            let decoded = GroupElement::decode(&encoded).unwrap();
            assert!(decoded.is_on_curve());
            assert_eq!(decoded.encode(), encoded);
            assert!(CompressedEdwardsY(encoded).decompress().is_some());
        }
    }

    #[test]
    fn test_decode_rejects_non_canonical_y() {
        // y = p (reduces to 0) is not a canonical encoding.
        let mut bytes = [0xffu8; 32];
        bytes[0] = 0xed;
        bytes[31] = 0x7f;
        assert_eq!(
            GroupElement::decode(&bytes),
            Err(CryptoError::InvalidPointEncoding)
        );
    }

    #[test]
    fn test_decode_rejects_off_curve() {
        // y = 2 gives u/v = 3 / (4d + 1), which is not a square.
        let mut bytes = [0u8; 32];
        bytes[0] = 2;
        assert_eq!(
            GroupElement::decode(&bytes),
            Err(CryptoError::InvalidPointEncoding)
        );
    }

    #[test]
    fn test_decode_rejects_negative_zero() {
        let mut bytes = [0u8; 32];
        bytes[0] = 1;
        bytes[31] = 0x80;
        assert_eq!(
            GroupElement::decode(&bytes),
            Err(CryptoError::InvalidPointEncoding)
        );
    }

    #[test]
    fn test_small_order() {
        assert!(GroupElement::IDENTITY.is_small_order());
        assert!(!GroupElement::BASE.is_small_order());
    }
}
