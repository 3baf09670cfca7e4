//! Deduplication of canonical sequences into numbered symbols.
//!
//! Every symbol stands for a sequence and its conjugate. The table hands out
//! dense ids, and separately dense indices for the real and imaginary parts
//! that do not vanish, so that a moment `<X>` can be written as
//! `real[r] + i·imag[s]`.

use crate::context::Context;
use crate::operator_sequence::OperatorSequence;
use crate::sequence::HashedSequence;
use crate::sign::SequenceSignType;
use hashbrown::HashMap;
use rustc_hash::FxHasher;
use std::fmt;
use std::hash::BuildHasherDefault;

#[cfg(feature = "tracing")]
use crate::trace::trace;

type SymbolMap = HashMap<u64, SymbolLookup, BuildHasherDefault<FxHasher>>;

/// Where a hash points in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolLookup {
    pub id: usize,
    /// The hash is that of the symbol's conjugate, not the symbol itself.
    pub conjugated: bool,
}

/// A sequence written in terms of a symbol: `sign · symbol` or
/// `sign · symbol*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolExpression {
    pub id: usize,
    pub sign: SequenceSignType,
    pub conjugated: bool,
}

/// One entry of a [`SymbolTable`].
#[derive(Debug, Clone)]
pub struct UniqueSequence<'c> {
    id: usize,
    sequence: OperatorSequence<'c>,
    conjugate: OperatorSequence<'c>,
    hermitian: bool,
    antihermitian: bool,
    real_index: Option<usize>,
    img_index: Option<usize>,
}

impl<'c> UniqueSequence<'c> {
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// The representative, always with a positive sign.
    #[inline]
    pub fn sequence(&self) -> &OperatorSequence<'c> {
        &self.sequence
    }

    #[inline]
    pub fn conjugate(&self) -> &OperatorSequence<'c> {
        &self.conjugate
    }

    #[inline]
    pub fn hash(&self) -> u64 {
        self.sequence.hash()
    }

    #[inline]
    pub fn conjugate_hash(&self) -> u64 {
        self.conjugate.hash()
    }

    #[inline]
    pub fn is_hermitian(&self) -> bool {
        self.hermitian
    }

    #[inline]
    pub fn is_antihermitian(&self) -> bool {
        self.antihermitian
    }

    /// Index among the symbols with a non-vanishing real part.
    #[inline]
    pub fn real_index(&self) -> Option<usize> {
        self.real_index
    }

    /// Index among the symbols with a non-vanishing imaginary part.
    #[inline]
    pub fn img_index(&self) -> Option<usize> {
        self.img_index
    }
}

impl fmt::Display for UniqueSequence<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}: {}", self.id, self.sequence)?;
        if self.hermitian && self.antihermitian {
            f.write_str(" (zero)")
        } else if self.hermitian {
            f.write_str(" (hermitian)")
        } else if self.antihermitian {
            f.write_str(" (anti-hermitian)")
        } else {
            write!(f, " (conjugate {})", self.conjugate)
        }
    }
}

/// Symbols for the canonical sequences of one [`Context`].
///
/// Id 0 is zero and id 1 is the identity; both exist from construction.
pub struct SymbolTable<'c> {
    context: &'c dyn Context,
    symbols: Vec<UniqueSequence<'c>>,
    hash_table: SymbolMap,
    real_symbols: Vec<usize>,
    imaginary_symbols: Vec<usize>,
}

impl<'c> SymbolTable<'c> {
    pub const ZERO: usize = 0;
    pub const IDENTITY: usize = 1;

    pub fn new(context: &'c dyn Context) -> Self {
        let zero = OperatorSequence::zero(context);
        let identity = OperatorSequence::identity(context);
        let mut hash_table = SymbolMap::default();
        hash_table.insert(
            zero.hash(),
            SymbolLookup {
                id: Self::ZERO,
                conjugated: false,
            },
        );
        hash_table.entry(identity.hash()).or_insert(SymbolLookup {
            id: Self::IDENTITY,
            conjugated: false,
        });

        let symbols = vec![
            UniqueSequence {
                id: Self::ZERO,
                sequence: zero.clone(),
                conjugate: zero,
                hermitian: true,
                antihermitian: true,
                real_index: None,
                img_index: None,
            },
            UniqueSequence {
                id: Self::IDENTITY,
                sequence: identity.clone(),
                conjugate: identity,
                hermitian: true,
                antihermitian: false,
                real_index: Some(0),
                img_index: None,
            },
        ];

        Self {
            context,
            symbols,
            hash_table,
            real_symbols: vec![Self::IDENTITY],
            imaginary_symbols: Vec::new(),
        }
    }

    #[inline]
    pub fn context(&self) -> &'c dyn Context {
        self.context
    }

    /// Id of the symbol for `seq`, creating it if needed. The sign of `seq`
    /// is ignored.
    pub fn merge_in(&mut self, seq: &OperatorSequence<'c>) -> usize {
        if let Some(lookup) = self.hash_table.get(&seq.hash()) {
            return lookup.id;
        }

        let sequence = seq.with_positive_sign();
        let conjugate = sequence.conjugate();
        let self_conjugate = conjugate.hash() == sequence.hash();
        let relative = SequenceSignType::difference(sequence.sign(), conjugate.sign());
        let hermitian = self_conjugate && relative == SequenceSignType::Positive;
        let antihermitian = self_conjugate && relative == SequenceSignType::Negative;

        let (real_zero, imaginary_zero) = self.context.is_sequence_null(&sequence);
        let real_zero = real_zero || antihermitian;
        let imaginary_zero = imaginary_zero || hermitian;

        let id = self.symbols.len();
        let real_index = (!real_zero).then(|| {
            self.real_symbols.push(id);
            self.real_symbols.len() - 1
        });
        let img_index = (!imaginary_zero).then(|| {
            self.imaginary_symbols.push(id);
            self.imaginary_symbols.len() - 1
        });

        self.hash_table.insert(
            sequence.hash(),
            SymbolLookup {
                id,
                conjugated: false,
            },
        );
        if !self_conjugate {
            self.hash_table.insert(
                conjugate.hash(),
                SymbolLookup {
                    id,
                    conjugated: true,
                },
            );
        }

        #[cfg(feature = "tracing")]
        trace!(
            id,
            sequence = %sequence,
            hermitian,
            antihermitian,
            "symbol_created"
        );

        self.symbols.push(UniqueSequence {
            id,
            sequence,
            conjugate,
            hermitian,
            antihermitian,
            real_index,
            img_index,
        });
        id
    }

    /// Merge every sequence, returning their ids in order.
    pub fn merge_in_all<'s, I>(&mut self, sequences: I) -> Vec<usize>
    where
        I: IntoIterator<Item = &'s OperatorSequence<'c>>,
        'c: 's,
    {
        sequences.into_iter().map(|seq| self.merge_in(seq)).collect()
    }

    pub fn lookup(&self, hash: u64) -> Option<SymbolLookup> {
        self.hash_table.get(&hash).copied()
    }

    /// The entry `seq` or its conjugate belongs to.
    pub fn find(&self, seq: &HashedSequence) -> Option<&UniqueSequence<'c>> {
        self.lookup(seq.hash()).map(|lookup| &self.symbols[lookup.id])
    }

    /// Express `seq` in terms of an existing symbol.
    pub fn to_symbol(&self, seq: &HashedSequence) -> Option<SymbolExpression> {
        let lookup = self.lookup(seq.hash())?;
        let entry = &self.symbols[lookup.id];
        let sign = if lookup.conjugated {
            // seq = s·Y and X* = c·Y, so seq = s·c*·X*.
            seq.sign() * entry.conjugate.sign().conjugate()
        } else {
            seq.sign()
        };
        Some(SymbolExpression {
            id: lookup.id,
            sign,
            conjugated: lookup.conjugated,
        })
    }

    pub fn get(&self, id: usize) -> Option<&UniqueSequence<'c>> {
        self.symbols.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UniqueSequence<'c>> + '_ {
        self.symbols.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false: zero and the identity are present from construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Ids of symbols with a non-vanishing real part, by real index.
    #[inline]
    pub fn real_symbols(&self) -> &[usize] {
        &self.real_symbols
    }

    /// Ids of symbols with a non-vanishing imaginary part, by imaginary index.
    #[inline]
    pub fn imaginary_symbols(&self) -> &[usize] {
        &self.imaginary_symbols
    }

    #[inline]
    pub fn real_symbol_count(&self) -> usize {
        self.real_symbols.len()
    }

    #[inline]
    pub fn imaginary_symbol_count(&self) -> usize {
        self.imaginary_symbols.len()
    }
}

impl<'c, 't> IntoIterator for &'t SymbolTable<'c> {
    type Item = &'t UniqueSequence<'c>;
    type IntoIter = std::slice::Iter<'t, UniqueSequence<'c>>;

    fn into_iter(self) -> Self::IntoIter {
        self.symbols.iter()
    }
}

impl fmt::Display for SymbolTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Symbol table with {} symbols ({} real, {} imaginary):",
            self.symbols.len(),
            self.real_symbols.len(),
            self.imaginary_symbols.len()
        )?;
        for symbol in &self.symbols {
            writeln!(f, "  {}", symbol)?;
        }
        Ok(())
    }
}

impl fmt::Debug for SymbolTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolTable")
            .field("symbols", &self.symbols)
            .field("real_symbols", &self.real_symbols)
            .field("imaginary_symbols", &self.imaginary_symbols)
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/symbol_table.rs"]
mod tests;
