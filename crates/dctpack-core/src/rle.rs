//! Run-length symbolization of AC coefficients.

use std::fmt;

use crate::block::AC_LEN;
use crate::error::DecodeError;
use crate::value::{category, Value};

/// Longest zero run a single symbol can carry.
pub const MAX_RUN: u8 = 15;

/// An AC symbol: how many zeros precede a coefficient and how many bits the
/// coefficient needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
    pub run: u8,
    pub category: u8,
}

impl Symbol {
    /// All remaining AC coefficients of the block are zero.
    pub const END_OF_BLOCK: Symbol = Symbol { run: 0, category: 0 };

    /// Sixteen zeros in a row.
    pub const ZERO_RUN: Symbol = Symbol {
        run: MAX_RUN,
        category: 0,
    };

    pub fn new(run: u8, category: u8) -> Self {
        Symbol { run, category }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.run, self.category)
    }
}

/// Convert the AC coefficients of one block into (symbol, value) pairs.
///
/// The result always ends with exactly one [`Symbol::END_OF_BLOCK`] and holds
/// at most 64 pairs.
pub fn run_length_encode(ac: &[i32]) -> Vec<(Symbol, Value)> {
    let last_nonzero = ac.iter().rposition(|&c| c != 0);
    let mut pairs = Vec::new();
    let mut run = 0u8;

    for (i, &coefficient) in ac.iter().enumerate() {
        if last_nonzero.map_or(true, |last| i > last) {
            break;
        }

        if coefficient == 0 && run < MAX_RUN {
            run += 1;
        } else {
            pairs.push((
                Symbol::new(run, category(coefficient)),
                Value::encode(coefficient),
            ));
            run = 0;
        }
    }

    pairs.push((Symbol::END_OF_BLOCK, Value::EMPTY));
    pairs
}

/// Expand (symbol, coefficient) pairs back into the 63 AC coefficients.
///
/// The pairs must end with [`Symbol::END_OF_BLOCK`]; everything after it is
/// ignored.
pub fn run_length_decode(pairs: &[(Symbol, i32)]) -> Result<[i32; AC_LEN], DecodeError> {
    let mut ac = [0; AC_LEN];
    let mut position = 0usize;

    for &(symbol, coefficient) in pairs {
        if symbol == Symbol::END_OF_BLOCK {
            return Ok(ac);
        }

        position += symbol.run as usize;
        if position >= AC_LEN {
            return Err(DecodeError::AcOverrun);
        }
        ac[position] = coefficient;
        position += 1;
    }

    Err(DecodeError::AcOverrun)
}
