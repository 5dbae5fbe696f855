//! Arithmetic modulo the BLS12-381 group order `r`.
//!
//! Scalars cross this module as 32-byte big-endian arrays, the form blst
//! accepts. Key derivation only needs reduction of a digest (read unsigned or
//! as two's complement) and addition of reduced scalars.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Signed;

/// The order `r` of the BLS12-381 G1/G2 subgroups, big-endian.
pub(crate) const GROUP_ORDER: [u8; 32] = [
    0x73, 0xed, 0xa7, 0x53, 0x29, 0x9d, 0x7d, 0x48, 0x33, 0x39, 0xd8, 0x08, 0x09, 0xa1, 0xd8, 0x05,
    0x53, 0xbd, 0xa4, 0x02, 0xff, 0xfe, 0x5b, 0xfe, 0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x01,
];

fn group_order() -> BigUint {
    BigUint::from_bytes_be(&GROUP_ORDER)
}

/// Left-pad a value below `r` to 32 big-endian bytes.
fn to_scalar_bytes(value: &BigUint) -> [u8; 32] {
    let bytes = value.to_bytes_be();
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    out
}

/// `be mod r`, reading `be` as an unsigned integer.
pub(crate) fn reduce_unsigned(be: &[u8; 32]) -> [u8; 32] {
    to_scalar_bytes(&(BigUint::from_bytes_be(be) % group_order()))
}

/// `be mod r`, reading `be` as a two's-complement signed integer. The result
/// is the non-negative representative.
pub(crate) fn reduce_signed(be: &[u8; 32]) -> [u8; 32] {
    let r = BigInt::from_biguint(Sign::Plus, group_order());
    let mut value = BigInt::from_signed_bytes_be(be) % &r;
    if value.is_negative() {
        value += &r;
    }
    // Non-negative after the fix-up above.
    to_scalar_bytes(value.magnitude())
}

/// `(a + b) mod r`.
pub(crate) fn add_mod_order(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let sum = BigUint::from_bytes_be(a) + BigUint::from_bytes_be(b);
    to_scalar_bytes(&(sum % group_order()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(value: &BigUint) -> [u8; 32] {
        to_scalar_bytes(value)
    }

    #[test]
    fn small_values_are_unchanged() {
        let mut be = [0u8; 32];
        be[31] = 42;
        assert_eq!(reduce_unsigned(&be), be);
        assert_eq!(reduce_signed(&be), be);
    }

    #[test]
    fn order_reduces_to_zero_and_order_plus_one_to_one() {
        assert_eq!(reduce_unsigned(&GROUP_ORDER), [0u8; 32]);
        let plus_one = scalar(&(group_order() + 1u32));
        let mut one = [0u8; 32];
        one[31] = 1;
        assert_eq!(reduce_unsigned(&plus_one), one);
    }

    #[test]
    fn all_ones_is_minus_one_when_signed() {
        let r_minus_one = scalar(&(group_order() - 1u32));
        assert_eq!(reduce_signed(&[0xff; 32]), r_minus_one);
    }

    #[test]
    fn all_ones_unsigned_matches_big_integer_remainder() {
        let max = BigUint::from_bytes_be(&[0xff; 32]);
        assert_eq!(reduce_unsigned(&[0xff; 32]), scalar(&(max % group_order())));
    }

    #[test]
    fn signed_and_unsigned_differ_by_two_pow_256_for_negative_input() {
        let mut be = [0u8; 32];
        be[0] = 0x80;
        be[31] = 0x07;
        let unsigned = BigUint::from_bytes_be(&reduce_unsigned(&be));
        let signed = BigUint::from_bytes_be(&reduce_signed(&be));
        let two_pow_256 = BigUint::from(1u32) << 256;
        assert_eq!((signed + two_pow_256) % group_order(), unsigned);
    }

    #[test]
    fn addition_wraps_at_order() {
        let r_minus_one = scalar(&(group_order() - 1u32));
        let mut two = [0u8; 32];
        two[31] = 2;
        let mut one = [0u8; 32];
        one[31] = 1;
        assert_eq!(add_mod_order(&r_minus_one, &two), one);
        assert_eq!(add_mod_order(&[0u8; 32], &two), two);
    }
}
