use std::fmt;

use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use crate::Number;

/// Integer conversion refuses to materialise `10^n` beyond this exponent.
const MAX_EXPONENT: i64 = 4_096;

/// Arbitrary-precision decimal: `unscaled * 10^-scale`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decimal {
    pub unscaled: BigInt,
    pub scale: i64,
}

impl Decimal {
    pub fn new(unscaled: impl Into<BigInt>, scale: i64) -> Self {
        Self {
            unscaled: unscaled.into(),
            scale,
        }
    }

    /// Drops trailing fractional zeros, so `4.20` and `4.2` compare equal.
    pub fn normalized(&self) -> Self {
        if self.scale <= 0 || self.unscaled.is_zero() {
            let scale = if self.unscaled.is_zero() { 0 } else { self.scale };
            return Self::new(self.unscaled.clone(), scale);
        }

        // Strip on the decimal text; one BigInt division per zero is quadratic.
        let digits = self.unscaled.abs().to_string();
        let zeros = digits.bytes().rev().take_while(|b| *b == b'0').count();
        let strip = zeros.min(usize::try_from(self.scale).unwrap_or(usize::MAX));
        if strip == 0 {
            return self.clone();
        }
        let kept = &digits[..digits.len() - strip];
        let mut unscaled = kept.parse::<BigInt>().unwrap_or_default();
        if self.unscaled.is_negative() {
            unscaled = -unscaled;
        }
        Self::new(unscaled, self.scale - strip as i64)
    }

    /// Returns the integer value when no fractional part would be lost.
    pub fn to_bigint(&self) -> Option<BigInt> {
        let normalized = self.normalized();
        if normalized.scale > 0 {
            return None;
        }
        let exponent = normalized.scale.unsigned_abs();
        if exponent > MAX_EXPONENT as u64 {
            return None;
        }
        Some(normalized.unscaled * BigInt::from(10u8).pow(exponent as u32))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale <= 0 {
            write!(f, "{}", self.unscaled)?;
            for _ in 0..self.scale.unsigned_abs() {
                f.write_str("0")?;
            }
            return Ok(());
        }

        let digits = self.unscaled.abs().to_string();
        let scale = self.scale as usize;
        let sign = if self.unscaled.is_negative() { "-" } else { "" };
        if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            write!(f, "{sign}{int}.{frac}")
        } else {
            write!(f, "{sign}0.{}{digits}", "0".repeat(scale - digits.len()))
        }
    }
}

impl Number {
    /// Parses the literal (`[-+]digits[.digits][e[-+]digits]`) exactly,
    /// keeping its scale.
    pub fn to_decimal(&self) -> Option<Decimal> {
        parse_decimal(self.as_str().trim(), false)
    }

    /// Exact integer value, if the literal denotes one (`42`, `42.0`, `4.2e1`).
    pub fn to_bigint(&self) -> Option<BigInt> {
        parse_decimal(self.as_str().trim(), true)?.to_bigint()
    }

    /// Lossy floating-point reading of the literal.
    pub fn to_f64(&self) -> Option<f64> {
        self.as_str().trim().parse::<f64>().ok()
    }
}

/// With `trim_fraction`, trailing fractional zeros are dropped before the
/// digits are parsed, which leaves the value unchanged.
fn parse_decimal(literal: &str, trim_fraction: bool) -> Option<Decimal> {
    let (mantissa, exponent) = match literal.find(['e', 'E']) {
        Some(idx) => (&literal[..idx], literal[idx + 1..].parse::<i64>().ok()?),
        None => (literal, 0),
    };

    let (negative, unsigned) = match mantissa.as_bytes().first()? {
        b'-' => (true, &mantissa[1..]),
        b'+' => (false, &mantissa[1..]),
        _ => (false, mantissa),
    };
    let (int, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if int.is_empty() && frac.is_empty() {
        return None;
    }
    if !int.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let frac = if trim_fraction {
        frac.trim_end_matches('0')
    } else {
        frac
    };

    let digits = format!("{int}{frac}");
    let mut unscaled = if digits.is_empty() {
        BigInt::zero()
    } else {
        digits.parse::<BigInt>().ok()?
    };
    if negative {
        unscaled = -unscaled;
    }
    Some(Decimal {
        unscaled,
        scale: (frac.len() as i64).checked_sub(exponent)?,
    })
}

#[cfg(test)]
mod tests {
    use num_bigint::BigInt;

    use crate::{Decimal, Number};

    fn number(literal: &str) -> Number {
        Number::from_literal(literal)
    }

    #[test]
    fn exact_integers_in_several_spellings() {
        for literal in ["42", "42.0", "4.2e1", "420E-1", "+42"] {
            assert_eq!(
                number(literal).to_bigint(),
                Some(BigInt::from(42)),
                "literal {literal}"
            );
        }
    }

    #[test]
    fn fractional_values_are_not_integers() {
        assert_eq!(number("42.5").to_bigint(), None);
        assert_eq!(number("1e-3").to_bigint(), None);
    }

    #[test]
    fn integers_beyond_64_bits_survive() {
        let big = number("123456789012345678901234567890")
            .to_bigint()
            .expect("must be an integer");
        assert_eq!(big.to_string(), "123456789012345678901234567890");
    }

    #[test]
    fn malformed_literals_are_rejected() {
        for literal in ["", "-", ".", "1.2.3", "abc", "1e", "0x10"] {
            assert_eq!(number(literal).to_decimal(), None, "literal {literal}");
        }
    }

    #[test]
    fn decimal_display_and_normalization() {
        let value = number("-0.0450").to_decimal().expect("must parse");
        assert_eq!(value.to_string(), "-0.0450");
        assert_eq!(value.normalized(), Decimal::new(-45, 3));
        assert_eq!(Decimal::new(12, -2).to_string(), "1200");
    }

    #[test]
    fn long_zero_fraction_is_an_integer() {
        let literal = format!("1.{}", "0".repeat(50_000));
        assert_eq!(number(&literal).to_bigint(), Some(BigInt::from(1)));

        let wide = Decimal::new(BigInt::from(7) * BigInt::from(10u8).pow(50_000), 50_000);
        assert_eq!(wide.normalized(), Decimal::new(7, 0));
        assert_eq!(Decimal::new(-1200, 1).normalized(), Decimal::new(-120, 0));
    }

    #[test]
    fn large_exponents_stay_decimal() {
        let value = number("1e5000").to_decimal().expect("must parse");
        assert_eq!(value, Decimal::new(1, -5000));
        assert_eq!(number("1e5000").to_bigint(), None);
        assert_eq!(number("1e-5000").to_decimal(), Some(Decimal::new(1, 5000)));
        assert_eq!(number("1e-9223372036854775808").to_decimal(), None);
    }

    #[test]
    fn float_reading_is_lossy() {
        assert_eq!(number("0.1").to_f64(), Some(0.1));
        assert_eq!(number("nope").to_f64(), None);
    }
}
