use crate::sequence::OperName;
use thiserror::Error;

/// Errors raised while validating operator algebras and their inputs.
///
/// Invariant violations inside the rewriting engine are debug assertions;
/// this type only covers input that a caller can reasonably get wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlgebraError {
    #[error("an algebra needs at least one operator")]
    NoOperators,

    #[error("{count} operators requested, at most {max} are supported")]
    TooManyOperators { count: usize, max: usize },

    #[error("operator {op} is out of range for an algebra with {num_operators} operators")]
    OperatorOutOfRange { op: OperName, num_operators: usize },

    #[error("sequence of length {length} exceeds the longest hashable string ({max})")]
    SequenceTooLong { length: usize, max: usize },

    #[error("unknown operator name '{0}'")]
    UnknownOperatorName(String),

    #[error("operator name '{0}' is declared more than once")]
    DuplicateOperatorName(String),

    #[error("expected {expected} operator names, got {found}")]
    NameCountMismatch { expected: usize, found: usize },
}

pub type AlgebraResult<T> = Result<T, AlgebraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let err = AlgebraError::OperatorOutOfRange {
            op: 7,
            num_operators: 3,
        };
        assert_eq!(
            err.to_string(),
            "operator 7 is out of range for an algebra with 3 operators"
        );

        let err = AlgebraError::UnknownOperatorName("Q".to_string());
        assert!(err.to_string().contains("'Q'"));
    }
}
