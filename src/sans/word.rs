//! Fixed-width integers wider than the native primitives.
//!
//! Values are stored as four 64-bit limbs, most significant first, so the
//! derived orderings agree with numeric order for [`U256`].

use core::fmt;

use zerocopy::byteorder::big_endian::U64;

/// An unsigned 256-bit integer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct U256([u64; 4]);

/// Largest power of ten fitting a limb.
const CHUNK: u64 = 10_000_000_000_000_000_000;

/// Decimal digits of `2^256 - 1`.
const MAX_DIGITS: usize = 78;

impl U256 {
    pub const ZERO: Self = Self([0; 4]);
    pub const ONE: Self = Self([0, 0, 0, 1]);
    pub const MAX: Self = Self([u64::MAX; 4]);

    /// Read a big-endian word.
    pub fn from_be_bytes(r: [u8; 32]) -> Self {
        let limbs: [U64; 4] = zerocopy::transmute!(r);
        Self(limbs.map(|l| l.get()))
    }

    /// Write a big-endian word.
    pub fn to_be_bytes(self) -> [u8; 32] {
        let limbs = self.0.map(U64::new);
        zerocopy::transmute!(limbs)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0; 4]
    }

    /// Whether bit 255 is set.
    pub fn high_bit(&self) -> bool {
        self.0[0] >> 63 == 1
    }

    /// Two's-complement negation modulo `2^256`.
    pub fn wrapping_neg(self) -> Self {
        let mut limbs = self.0.map(|l| !l);
        for limb in limbs.iter_mut().rev() {
            let (sum, carry) = limb.overflowing_add(1);
            *limb = sum;
            if !carry {
                break;
            }
        }
        Self(limbs)
    }

    /// Divide by a single limb, returning the quotient and remainder.
    fn div_rem_limb(self, d: u64) -> (Self, u64) {
        let d = d as u128;
        let mut rem = 0u128;
        let mut quotient = [0; 4];

        for (q, limb) in quotient.iter_mut().zip(self.0) {
            let acc = (rem << 64) | limb as u128;
            *q = (acc / d) as u64;
            rem = acc % d;
        }

        (Self(quotient), rem as u64)
    }

    /// Render base-10 digits into the tail of a buffer.
    fn digits(self, buf: &mut [u8; MAX_DIGITS]) -> &str {
        let mut i = buf.len();
        let mut v = self;

        loop {
            let (q, mut r) = v.div_rem_limb(CHUNK);
            v = q;
            let leading = v.is_zero();

            // Inner chunks are zero-padded to 19 digits; the leading one is not.
            for _ in 0..19 {
                i -= 1;
                buf[i] = b'0' + (r % 10) as u8;
                r /= 10;
                if leading && r == 0 {
                    break;
                }
            }

            if leading {
                break;
            }
        }

        // Only ASCII digits were written.
        core::str::from_utf8(&buf[i..]).unwrap_or_default()
    }
}

impl From<u128> for U256 {
    fn from(v: u128) -> Self {
        Self([0, 0, (v >> 64) as u64, v as u64])
    }
}

impl From<u64> for U256 {
    fn from(v: u64) -> Self {
        Self([0, 0, 0, v])
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0; MAX_DIGITS];
        f.pad_integral(true, "", self.digits(&mut buf))
    }
}

/// A signed 256-bit integer in two's-complement form.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct I256(U256);

impl I256 {
    pub const ZERO: Self = Self(U256::ZERO);
    pub const MINUS_ONE: Self = Self(U256::MAX);
    pub const MAX: Self = Self(U256([u64::MAX >> 1, u64::MAX, u64::MAX, u64::MAX]));
    pub const MIN: Self = Self(U256([1 << 63, 0, 0, 0]));

    /// Read a big-endian two's-complement word.
    pub fn from_be_bytes(r: [u8; 32]) -> Self {
        Self(U256::from_be_bytes(r))
    }

    /// Write a big-endian two's-complement word.
    pub fn to_be_bytes(self) -> [u8; 32] {
        self.0.to_be_bytes()
    }

    pub fn is_negative(&self) -> bool {
        self.0.high_bit()
    }

    /// The magnitude of this value. Exact for [`I256::MIN`], whose magnitude
    /// is `2^255`.
    pub fn unsigned_abs(self) -> U256 {
        if self.is_negative() {
            self.0.wrapping_neg()
        } else {
            self.0
        }
    }
}

impl From<i128> for I256 {
    fn from(v: i128) -> Self {
        let fill = if v < 0 { u64::MAX } else { 0 };
        Self(U256([fill, fill, (v >> 64) as u64, v as u64]))
    }
}

impl fmt::Display for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0; MAX_DIGITS];
        let digits = self.unsigned_abs().digits(&mut buf);
        f.pad_integral(!self.is_negative(), "", digits)
    }
}

/// A 20-byte account address.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        self.0.iter().try_for_each(|b| write!(f, "{b:02x}"))
    }
}

#[cfg(test)]
mod tests {
    use std::string::ToString;

    use super::*;

    #[test]
    fn renders_unsigned_extremes() {
        assert_eq!(U256::ZERO.to_string(), "0");
        assert_eq!(U256::ONE.to_string(), "1");
        assert_eq!(
            U256::MAX.to_string(),
            "115792089237316195423570985008687907853269984665640564039457584007913129639935"
        );
    }

    #[test]
    fn renders_across_chunk_boundaries() {
        assert_eq!(U256::from(CHUNK).to_string(), "10000000000000000000");
        assert_eq!(U256::from(CHUNK - 1).to_string(), "9999999999999999999");
        assert_eq!(
            U256::from(u128::MAX).to_string(),
            "340282366920938463463374607431768211455"
        );
    }

    #[test]
    fn renders_signed_extremes() {
        assert_eq!(I256::ZERO.to_string(), "0");
        assert_eq!(I256::MINUS_ONE.to_string(), "-1");
        assert_eq!(
            I256::MAX.to_string(),
            "57896044618658097711785492504343953926634992332820282019728792003956564819967"
        );
        assert_eq!(
            I256::MIN.to_string(),
            "-57896044618658097711785492504343953926634992332820282019728792003956564819968"
        );
    }

    #[test]
    fn sign_extends_narrow_values() {
        assert_eq!(I256::from(-1i128), I256::MINUS_ONE);
        assert_eq!(I256::from(i128::MIN).to_string(), i128::MIN.to_string());
        assert_eq!(I256::from(i128::MAX).to_string(), i128::MAX.to_string());
    }

    #[test]
    fn byte_order_is_big_endian() {
        let mut r = [0; 32];
        r[31] = 0x2a;
        r[0] = 0x01;
        let v = U256::from_be_bytes(r);
        assert!(!v.high_bit());
        assert_eq!(v.to_be_bytes(), r);
        assert!(v > U256::from(u128::MAX));
    }

    #[test]
    fn respects_width_and_alignment() {
        assert_eq!(std::format!("{:>5}", U256::from(42u64)), "   42");
        assert_eq!(std::format!("{:<4}|", I256::from(-7i128)), "-7  |");
    }

    #[test]
    fn address_is_lowercase_hex() {
        let mut r = [0; 20];
        r[0] = 0xAB;
        r[19] = 0x01;
        assert_eq!(
            Address(r).to_string(),
            "0xab00000000000000000000000000000000000001"
        );
    }
}
