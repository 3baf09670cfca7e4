use std::fmt;
use std::ops::{Mul, MulAssign, Neg};

/// Prefactor attached to an operator string: a power of `i`.
///
/// The discriminant counts quarter turns, so the group law is addition mod 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum SequenceSignType {
    #[default]
    Positive = 0,
    Imaginary = 1,
    Negative = 2,
    NegativeImaginary = 3,
}

impl SequenceSignType {
    #[inline]
    const fn from_quarter_turns(turns: u8) -> Self {
        match turns & 3 {
            0 => SequenceSignType::Positive,
            1 => SequenceSignType::Imaginary,
            2 => SequenceSignType::Negative,
            _ => SequenceSignType::NegativeImaginary,
        }
    }

    /// Number of quarter turns (0..4) this sign represents.
    #[inline]
    pub const fn quarter_turns(self) -> u8 {
        self as u8
    }

    /// `+1` or `-1`, depending on the flag.
    #[inline]
    pub const fn from_negated(negated: bool) -> Self {
        if negated {
            SequenceSignType::Negative
        } else {
            SequenceSignType::Positive
        }
    }

    /// Group multiplication.
    #[inline]
    pub const fn multiply(self, rhs: Self) -> Self {
        Self::from_quarter_turns(self as u8 + rhs as u8)
    }

    /// Complex conjugation: swaps `i` and `-i`, fixes `±1`.
    #[inline]
    pub const fn conjugate(self) -> Self {
        Self::from_quarter_turns(4 - self as u8)
    }

    /// Multiplication by `-1`.
    #[inline]
    pub const fn negate(self) -> Self {
        Self::from_quarter_turns(self as u8 + 2)
    }

    /// The factor `s` such that `lhs · X = rhs · Y` implies `X = s · Y`.
    ///
    /// Equal to `conjugate(lhs) · rhs`, since every sign is a unit.
    #[inline]
    pub const fn difference(lhs: Self, rhs: Self) -> Self {
        lhs.conjugate().multiply(rhs)
    }

    #[inline]
    pub const fn is_negative(self) -> bool {
        matches!(
            self,
            SequenceSignType::Negative | SequenceSignType::NegativeImaginary
        )
    }

    #[inline]
    pub const fn is_imaginary(self) -> bool {
        matches!(
            self,
            SequenceSignType::Imaginary | SequenceSignType::NegativeImaginary
        )
    }

    /// Textual prefix used when printing a signed sequence.
    pub const fn prefix(self) -> &'static str {
        match self {
            SequenceSignType::Positive => "",
            SequenceSignType::Imaginary => "i",
            SequenceSignType::Negative => "-",
            SequenceSignType::NegativeImaginary => "-i",
        }
    }
}

impl Mul for SequenceSignType {
    type Output = SequenceSignType;

    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply(rhs)
    }
}

impl MulAssign for SequenceSignType {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = self.multiply(rhs);
    }
}

impl Neg for SequenceSignType {
    type Output = SequenceSignType;

    #[inline]
    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl fmt::Display for SequenceSignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SequenceSignType::Positive => "+1",
            SequenceSignType::Imaginary => "+i",
            SequenceSignType::Negative => "-1",
            SequenceSignType::NegativeImaginary => "-i",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::SequenceSignType::*;
    use super::*;

    const ALL: [SequenceSignType; 4] = [Positive, Imaginary, Negative, NegativeImaginary];

    #[test]
    fn multiplication_follows_powers_of_i() {
        assert_eq!(Imaginary * Imaginary, Negative);
        assert_eq!(Imaginary * NegativeImaginary, Positive);
        assert_eq!(Negative * Negative, Positive);
        assert_eq!(NegativeImaginary * Negative, Imaginary);
        for s in ALL {
            assert_eq!(Positive * s, s, "Positive must be the identity");
        }
    }

    #[test]
    fn conjugation_swaps_imaginary_units() {
        assert_eq!(Positive.conjugate(), Positive);
        assert_eq!(Negative.conjugate(), Negative);
        assert_eq!(Imaginary.conjugate(), NegativeImaginary);
        assert_eq!(NegativeImaginary.conjugate(), Imaginary);
    }

    #[test]
    fn conjugate_is_inverse() {
        for s in ALL {
            assert_eq!(s * s.conjugate(), Positive);
        }
    }

    #[test]
    fn negation() {
        assert_eq!(-Positive, Negative);
        assert_eq!(-Negative, Positive);
        assert_eq!(-Imaginary, NegativeImaginary);
        assert_eq!(-NegativeImaginary, Imaginary);
    }

    #[test]
    fn difference_recovers_relative_factor() {
        for lhs in ALL {
            for rhs in ALL {
                let d = SequenceSignType::difference(lhs, rhs);
                assert_eq!(lhs * d, rhs, "lhs * difference(lhs, rhs) == rhs");
            }
        }
    }

    #[test]
    fn predicates_and_prefixes() {
        assert!(Negative.is_negative());
        assert!(NegativeImaginary.is_negative());
        assert!(!Imaginary.is_negative());
        assert!(Imaginary.is_imaginary());
        assert!(!Negative.is_imaginary());
        assert_eq!(SequenceSignType::from_negated(true), Negative);
        assert_eq!(SequenceSignType::from_negated(false), Positive);
        assert_eq!(NegativeImaginary.prefix(), "-i");
        assert_eq!(Positive.prefix(), "");
    }
}
