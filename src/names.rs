use crate::error::{AlgebraError, AlgebraResult};
use crate::precontext::ConjugateMode;
use crate::sequence::{HashedSequence, OperName, SequenceStorage};
use lasso::{Key, Rodeo, Spur};

/// Interned operator names. The `n`-th interned name is operator `n`.
///
/// Guarantees:
/// - Every name maps to exactly one operator and back
/// - Names are never re-numbered once interned
#[derive(Debug)]
pub struct OperatorNames {
    rodeo: Rodeo,
    /// Every name is one character, so strings may be written without separators.
    compact: bool,
}

impl OperatorNames {
    pub fn new<I, S>(names: I) -> AlgebraResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rodeo = Rodeo::default();
        for name in names {
            let name = name.as_ref();
            if rodeo.contains(name) {
                return Err(AlgebraError::DuplicateOperatorName(name.to_string()));
            }
            rodeo.get_or_intern(name);
        }
        if rodeo.is_empty() {
            return Err(AlgebraError::NoOperators);
        }
        let compact = rodeo.strings().all(|name| name.chars().count() == 1);
        Ok(Self { rodeo, compact })
    }

    /// Names for a full alphabet: each raw name plus, unless self-adjoint, a
    /// starred conjugate laid out as `mode` requires.
    pub fn with_conjugates<S: AsRef<str>>(raw_names: &[S], mode: ConjugateMode) -> AlgebraResult<Self> {
        let raw = raw_names.iter().map(|name| name.as_ref().to_string());
        let starred = |name: &S| format!("{}*", name.as_ref());
        match mode {
            ConjugateMode::SelfAdjoint => Self::new(raw),
            ConjugateMode::Bunched => Self::new(raw.chain(raw_names.iter().map(starred))),
            ConjugateMode::Interleaved => Self::new(
                raw_names
                    .iter()
                    .flat_map(|name| [name.as_ref().to_string(), starred(name)]),
            ),
        }
    }

    /// `X1, X2, ..., Xn`.
    pub fn numbered(count: usize) -> AlgebraResult<Self> {
        Self::new((1..=count).map(|i| format!("X{}", i)))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }

    pub fn name(&self, op: OperName) -> Option<&str> {
        let key = Spur::try_from_usize(usize::try_from(op).ok()?)?;
        self.rodeo.try_resolve(&key)
    }

    pub fn operator(&self, name: &str) -> AlgebraResult<OperName> {
        self.rodeo
            .get(name)
            .map(|key| key.into_usize() as OperName)
            .ok_or_else(|| AlgebraError::UnknownOperatorName(name.to_string()))
    }

    /// Parse a product of named operators.
    ///
    /// Names are separated by whitespace or `;`. When every name is a single
    /// character the separators may be omitted (`"ABA"`). `"1"` and the empty
    /// string denote the identity.
    pub fn parse(&self, text: &str) -> AlgebraResult<SequenceStorage> {
        let text = text.trim();
        if text.is_empty() || text == "1" {
            return Ok(SequenceStorage::new());
        }
        let separated = text.contains(|c: char| c.is_whitespace() || c == ';');
        if separated {
            return text
                .split(|c: char| c.is_whitespace() || c == ';')
                .filter(|token| !token.is_empty())
                .map(|token| self.operator(token))
                .collect();
        }
        if self.compact {
            let mut buf = [0u8; 4];
            return text
                .chars()
                .map(|c| self.operator(c.encode_utf8(&mut buf)))
                .collect();
        }
        Ok(SequenceStorage::from_elem(self.operator(text)?, 1))
    }

    /// Render a sequence with operator names, e.g. `-iAB` or `X2;X1`.
    pub fn format(&self, seq: &HashedSequence) -> String {
        if seq.is_zero() {
            return "0".to_string();
        }
        let mut out = String::from(seq.sign().prefix());
        if seq.is_empty() {
            out.push('1');
            return out;
        }
        for (i, &op) in seq.iter().enumerate() {
            if i > 0 && !self.compact {
                out.push(';');
            }
            match self.name(op) {
                Some(name) => out.push_str(name),
                None => out.push_str(&format!("#{}", op)),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::ShortlexHasher;
    use crate::sign::SequenceSignType;

    #[test]
    fn names_number_operators_in_order() {
        let names = OperatorNames::new(["A", "B", "C"]).unwrap();
        assert_eq!(names.len(), 3);
        assert_eq!(names.operator("A"), Ok(0));
        assert_eq!(names.operator("C"), Ok(2));
        assert_eq!(names.name(1), Some("B"));
        assert_eq!(names.name(3), None);
        assert_eq!(names.name(-1), None);
    }

    #[test]
    fn duplicates_and_empty_rejected() {
        assert_eq!(
            OperatorNames::new(["A", "A"]).unwrap_err(),
            AlgebraError::DuplicateOperatorName("A".to_string())
        );
        assert_eq!(
            OperatorNames::new(Vec::<String>::new()).unwrap_err(),
            AlgebraError::NoOperators
        );
    }

    #[test]
    fn conjugate_layouts() {
        let bunched = OperatorNames::with_conjugates(&["X", "Y"], ConjugateMode::Bunched).unwrap();
        assert_eq!(bunched.name(2), Some("X*"));
        assert_eq!(bunched.name(3), Some("Y*"));

        let inter = OperatorNames::with_conjugates(&["X", "Y"], ConjugateMode::Interleaved).unwrap();
        assert_eq!(inter.name(1), Some("X*"));
        assert_eq!(inter.name(2), Some("Y"));

        let numbered = OperatorNames::numbered(3).unwrap();
        assert_eq!(numbered.name(2), Some("X3"));
    }

    #[test]
    fn parse_compact_and_separated() {
        let names = OperatorNames::new(["A", "B"]).unwrap();
        assert_eq!(names.parse("ABA").unwrap().as_slice(), &[0, 1, 0]);
        assert_eq!(names.parse("A B;A").unwrap().as_slice(), &[0, 1, 0]);
        assert!(names.parse("1").unwrap().is_empty());
        assert!(names.parse("  ").unwrap().is_empty());
        assert_eq!(
            names.parse("AQ"),
            Err(AlgebraError::UnknownOperatorName("Q".to_string()))
        );

        let long = OperatorNames::numbered(12).unwrap();
        assert_eq!(long.parse("X12").unwrap().as_slice(), &[11]);
        assert_eq!(long.parse("X1;X12").unwrap().as_slice(), &[0, 11]);
    }

    #[test]
    fn format_uses_names_and_signs() {
        let hasher = ShortlexHasher::new(2);
        let names = OperatorNames::new(["A", "B"]).unwrap();
        let ab = HashedSequence::from_slice(&[0, 1], &hasher, SequenceSignType::Negative);
        assert_eq!(names.format(&ab), "-AB");
        assert_eq!(names.format(&HashedSequence::identity(&hasher)), "1");
        assert_eq!(names.format(&HashedSequence::zero()), "0");

        let long = OperatorNames::numbered(2).unwrap();
        let seq = HashedSequence::from_slice(&[1, 0], &hasher, SequenceSignType::Imaginary);
        assert_eq!(long.format(&seq), "iX2;X1");
    }
}
