pub mod context;
pub mod error;
pub mod hasher;
pub mod logger;
pub mod metrics;
pub mod names;
pub mod operator_sequence;
pub mod precontext;
pub mod rule;
pub mod rulebook;
pub mod sequence;
pub mod sign;
pub mod substring;
pub mod symbol_table;
pub mod trace;

#[cfg(test)]
pub(crate) mod test_utils;
