//! Quotient/remainder pairs: the classical reference and decoded samples.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ArithError, ArithResult};
use crate::layout::DividerLayout;

/// Classical integer division, rejecting a zero divisor.
pub fn expected_division(dividend: u64, divisor: u64) -> ArithResult<(u64, u64)> {
    if divisor == 0 {
        return Err(ArithError::DivisionByZero);
    }
    Ok((dividend / divisor, dividend % divisor))
}

/// A quotient and remainder of an `n`-bit division.
///
/// Renders as `Q <n bits> R <n + 1 bits>`, e.g. `Q 010 R 0001` for 5 / 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DivisionOutcome {
    /// Operand width `n`.
    pub width: usize,
    /// The quotient.
    pub quotient: u64,
    /// The remainder.
    pub remainder: u64,
}

impl DivisionOutcome {
    /// The outcome the circuit must reproduce for `dividend / divisor`.
    pub fn expected(width: usize, dividend: u64, divisor: u64) -> ArithResult<Self> {
        if width == 0 || width > crate::MAX_WIDTH {
            return Err(ArithError::InvalidWidth(width));
        }
        for value in [dividend, divisor] {
            if value >> width != 0 {
                return Err(ArithError::OperandOutOfRange { value, width });
            }
        }
        let (quotient, remainder) = expected_division(dividend, divisor)?;
        Ok(Self {
            width,
            quotient,
            remainder,
        })
    }

    /// Decode a sampled bit string: `n` quotient bits then `n + 1` remainder
    /// bits, both most significant first.
    pub fn decode(layout: &DividerLayout, bitstring: &str) -> ArithResult<Self> {
        let width = layout.width();
        let malformed = || ArithError::MalformedSample {
            sample: bitstring.to_string(),
            expected: layout.num_clbits(),
        };

        if bitstring.len() != layout.num_clbits()
            || !bitstring.bytes().all(|c| matches!(c, b'0' | b'1'))
        {
            return Err(malformed());
        }
        let (quotient, remainder) = bitstring.split_at(width);
        Ok(Self {
            width,
            quotient: u64::from_str_radix(quotient, 2).map_err(|_| malformed())?,
            remainder: u64::from_str_radix(remainder, 2).map_err(|_| malformed())?,
        })
    }

    /// The quotient as `n` binary digits.
    pub fn quotient_bits(&self) -> String {
        format!("{:0w$b}", self.quotient, w = self.width)
    }

    /// The remainder as `n + 1` binary digits.
    pub fn remainder_bits(&self) -> String {
        format!("{:0w$b}", self.remainder, w = self.width + 1)
    }
}

impl fmt::Display for DivisionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q {} R {}", self.quotient_bits(), self.remainder_bits())
    }
}
