//! Cycle counts and the error codes that share their value space.
//!
//! A cycle value is a plain `u32`. Everything above [`START_ERROR_RANGE`] is
//! reserved for named error codes, so a single number can carry either a cost
//! or the reason no cost exists. All arithmetic in the engine goes through
//! [`cost_adder`] and [`dpu_schedule`] so errors are never summed into a
//! plausible-looking count.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Cycle count or error code.
pub type CycleCount = u32;

const MAX_V: CycleCount = CycleCount::MAX;

/// Special valid value.
pub const NO_ERROR: CycleCount = 0;
/// Does not fit into CMX memory.
pub const ERROR_INPUT_TOO_BIG: CycleCount = MAX_V;
pub const ERROR_INVALID_INPUT_CONFIGURATION: CycleCount = MAX_V - 1;
pub const ERROR_INVALID_INPUT_DEVICE: CycleCount = MAX_V - 2;
pub const ERROR_INVALID_INPUT_OPERATION: CycleCount = MAX_V - 3;
/// A provider produced a negative or absurdly large value.
pub const ERROR_INVALID_OUTPUT_RANGE: CycleCount = MAX_V - 4;
/// One of the tiles could not be covered by an admissible intra-tile split.
pub const ERROR_TILE_OUTPUT: CycleCount = MAX_V - 5;
pub const ERROR_TILE_SPLIT_ZERO_CYC_OUTPUT: CycleCount = MAX_V - 6;
pub const ERROR_TILE_SPLIT_EXCEPTION: CycleCount = MAX_V - 7;
/// Unsplit layer has invalid content, or the strategy does not apply to it.
pub const ERROR_INVALID_LAYER_CONFIGURATION: CycleCount = MAX_V - 8;
pub const ERROR_SHAVE_OPERATOR_MISSING: CycleCount = MAX_V - 9;
pub const ERROR_CUMULATED_CYCLES_TOO_LARGE: CycleCount = MAX_V - 10;
pub const ERROR_INVALID_CONVERSION_TO_CYCLES: CycleCount = MAX_V - 11;
/// Caller passed a degenerate parameter (zero tiles, zero processors).
pub const ERROR_INVALID_INPUT_PARAMETERS: CycleCount = MAX_V - 12;
pub const ERROR_SHAVE_PARAMS: CycleCount = MAX_V - 13;
pub const ERROR_SHAVE_INVALID_INPUT: CycleCount = MAX_V - 14;

/// Last legal cycle value. Error codes live strictly above it.
pub const START_ERROR_RANGE: CycleCount = MAX_V - 1000;

/// True if `v` falls in the reserved error band (named code or not).
///
/// `START_ERROR_RANGE` itself is a legal cycle count.
pub const fn is_error_code(v: CycleCount) -> bool {
    v > START_ERROR_RANGE
}

/// Symbolic name of a cycle value, for logs and CLI output.
pub fn to_error_text(v: CycleCount) -> &'static str {
    match v {
        NO_ERROR => "NO_ERROR",
        ERROR_INPUT_TOO_BIG => "ERROR_INPUT_TOO_BIG",
        ERROR_INVALID_INPUT_CONFIGURATION => "ERROR_INVALID_INPUT_CONFIGURATION",
        ERROR_INVALID_INPUT_DEVICE => "ERROR_INVALID_INPUT_DEVICE",
        ERROR_INVALID_INPUT_OPERATION => "ERROR_INVALID_INPUT_OPERATION",
        ERROR_INVALID_OUTPUT_RANGE => "ERROR_INVALID_OUTPUT_RANGE",
        ERROR_TILE_OUTPUT => "ERROR_TILE_OUTPUT",
        ERROR_TILE_SPLIT_ZERO_CYC_OUTPUT => "ERROR_TILE_SPLIT_ZERO_CYC_OUTPUT",
        ERROR_TILE_SPLIT_EXCEPTION => "ERROR_TILE_SPLIT_EXCEPTION",
        ERROR_INVALID_LAYER_CONFIGURATION => "ERROR_INVALID_LAYER_CONFIGURATION",
        ERROR_SHAVE_OPERATOR_MISSING => "ERROR_SHAVE_OPERATOR_MISSING",
        ERROR_CUMULATED_CYCLES_TOO_LARGE => "ERROR_CUMULATED_CYCLES_TOO_LARGE",
        ERROR_INVALID_CONVERSION_TO_CYCLES => "ERROR_INVALID_CONVERSION_TO_CYCLES",
        ERROR_INVALID_INPUT_PARAMETERS => "ERROR_INVALID_INPUT_PARAMETERS",
        ERROR_SHAVE_PARAMS => "ERROR_SHAVE_PARAMS",
        ERROR_SHAVE_INVALID_INPUT => "ERROR_SHAVE_INVALID_INPUT",
        v if is_error_code(v) => "UNKNOWN_ERROR_CODE",
        _ => "NOT_AN_ERROR",
    }
}

/// Saturating addition for sequential costs.
///
/// The first error operand is propagated unchanged. A legal sum may reach
/// `START_ERROR_RANGE` exactly; anything above becomes
/// [`ERROR_CUMULATED_CYCLES_TOO_LARGE`].
pub const fn cost_adder(a: CycleCount, b: CycleCount) -> CycleCount {
    if is_error_code(a) {
        return a;
    }
    if is_error_code(b) {
        return b;
    }
    let sum = a as u64 + b as u64;
    if sum <= START_ERROR_RANGE as u64 {
        sum as CycleCount
    } else {
        ERROR_CUMULATED_CYCLES_TOO_LARGE
    }
}

/// Fold a sequence of costs with [`cost_adder`].
pub fn cost_sum<I: IntoIterator<Item = CycleCount>>(costs: I) -> CycleCount {
    costs.into_iter().fold(NO_ERROR, cost_adder)
}

/// Conversion of raw numeric estimates into the cycle domain.
///
/// Negative, non-finite or too-large values, and values that would land in
/// the error band, become [`ERROR_INVALID_CONVERSION_TO_CYCLES`]. Floats are
/// rounded to the nearest integer, ties away from zero.
pub trait ToCycles {
    fn to_cycles(self) -> CycleCount;
}

/// Free-function form of [`ToCycles::to_cycles`].
pub fn to_cycles<T: ToCycles>(v: T) -> CycleCount {
    v.to_cycles()
}

fn checked_from_u64(v: u64) -> CycleCount {
    if v <= START_ERROR_RANGE as u64 {
        v as CycleCount
    } else {
        ERROR_INVALID_CONVERSION_TO_CYCLES
    }
}

macro_rules! impl_to_cycles_int {
    ($($t:ty),*) => {$(
        impl ToCycles for $t {
            fn to_cycles(self) -> CycleCount {
                match u64::try_from(self) {
                    Ok(v) => checked_from_u64(v),
                    Err(_) => ERROR_INVALID_CONVERSION_TO_CYCLES,
                }
            }
        }
    )*};
}

impl_to_cycles_int!(u8, u16, u64, u128, usize, i8, i16, i32, i64, i128, isize);

// Already a cycle value: errors are preserved as they are.
impl ToCycles for u32 {
    fn to_cycles(self) -> CycleCount {
        self
    }
}

impl ToCycles for f64 {
    fn to_cycles(self) -> CycleCount {
        if !self.is_finite() || self < 0.0 {
            return ERROR_INVALID_CONVERSION_TO_CYCLES;
        }
        let rounded = self.round();
        if rounded > START_ERROR_RANGE as f64 {
            return ERROR_INVALID_CONVERSION_TO_CYCLES;
        }
        rounded as CycleCount
    }
}

impl ToCycles for f32 {
    fn to_cycles(self) -> CycleCount {
        f64::from(self).to_cycles()
    }
}

/// Greedy list schedule of `costs` over `n_processors` identical engines.
///
/// Each item goes to the least loaded processor and costs `cost + overhead`.
/// The result is the load of the busiest processor. Any error in the input is
/// returned as is, without partial sums.
pub fn dpu_schedule(n_processors: usize, costs: &[CycleCount], overhead: CycleCount) -> CycleCount {
    if let Some(&err) = costs.iter().find(|&&c| is_error_code(c)) {
        return err;
    }
    if is_error_code(overhead) {
        return overhead;
    }
    if n_processors == 0 {
        return ERROR_INVALID_INPUT_PARAMETERS;
    }

    // Processors beyond the number of items never receive work.
    let lanes = n_processors.min(costs.len()).max(1);
    let mut heap: BinaryHeap<Reverse<u64>> = (0..lanes).map(|_| Reverse(0u64)).collect();
    for &c in costs {
        let Reverse(load) = heap.pop().unwrap_or(Reverse(0));
        heap.push(Reverse(load + u64::from(c) + u64::from(overhead)));
    }

    let busiest = heap.into_iter().map(|Reverse(t)| t).max().unwrap_or(0);
    if busiest <= START_ERROR_RANGE as u64 {
        busiest as CycleCount
    } else {
        ERROR_CUMULATED_CYCLES_TOO_LARGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_adder_basic_cases() {
        let half = CycleCount::MAX / 2;
        let cases: &[(CycleCount, CycleCount, CycleCount)] = &[
            (0, 0, 0),
            (1, 0, 1),
            (0, 1, 1),
            (1, 1, 2),
            (half, half - 1, ERROR_CUMULATED_CYCLES_TOO_LARGE),
            (ERROR_CUMULATED_CYCLES_TOO_LARGE, 1, ERROR_CUMULATED_CYCLES_TOO_LARGE),
            (ERROR_CUMULATED_CYCLES_TOO_LARGE, 1000, ERROR_CUMULATED_CYCLES_TOO_LARGE),
            (ERROR_INVALID_LAYER_CONFIGURATION, 10, ERROR_INVALID_LAYER_CONFIGURATION),
            (10, ERROR_INVALID_INPUT_DEVICE, ERROR_INVALID_INPUT_DEVICE),
            (1, START_ERROR_RANGE, ERROR_CUMULATED_CYCLES_TOO_LARGE),
            (1, START_ERROR_RANGE - 1, START_ERROR_RANGE),
            (1, START_ERROR_RANGE - 2, START_ERROR_RANGE - 1),
            (CycleCount::MAX, CycleCount::MAX, CycleCount::MAX),
            (CycleCount::MAX, 0, CycleCount::MAX),
        ];
        for &(a, b, expected) in cases {
            assert_eq!(cost_adder(a, b), expected, "cost_adder({a}, {b})");
        }
    }

    #[test]
    fn test_cost_adder_first_error_wins() {
        assert_eq!(
            cost_adder(ERROR_TILE_OUTPUT, ERROR_INPUT_TOO_BIG),
            ERROR_TILE_OUTPUT
        );
        assert_eq!(
            cost_adder(ERROR_INPUT_TOO_BIG, ERROR_TILE_OUTPUT),
            ERROR_INPUT_TOO_BIG
        );
    }

    #[test]
    fn test_cost_adder_associative_and_commutative() {
        let values = [0, 1, 7, 1_000, 65_535, START_ERROR_RANGE / 3, START_ERROR_RANGE / 2];
        for &a in &values {
            for &b in &values {
                assert_eq!(cost_adder(a, b), cost_adder(b, a));
                for &c in &values {
                    assert_eq!(
                        cost_adder(cost_adder(a, b), c),
                        cost_adder(a, cost_adder(b, c)),
                        "({a} + {b}) + {c}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_error_boundary_is_exact() {
        assert!(!is_error_code(0));
        assert!(!is_error_code(START_ERROR_RANGE - 1));
        assert!(!is_error_code(START_ERROR_RANGE));
        assert!(is_error_code(START_ERROR_RANGE + 1));
        assert!(is_error_code(CycleCount::MAX));
    }

    #[test]
    fn test_error_text() {
        assert_eq!(to_error_text(ERROR_TILE_OUTPUT), "ERROR_TILE_OUTPUT");
        assert_eq!(to_error_text(NO_ERROR), "NO_ERROR");
        assert_eq!(to_error_text(START_ERROR_RANGE + 1), "UNKNOWN_ERROR_CODE");
        assert_eq!(to_error_text(42), "NOT_AN_ERROR");
    }

    #[test]
    fn test_to_cycles_integers() {
        assert_eq!(to_cycles(1000i64), 1000);
        assert_eq!(to_cycles(-1i64), ERROR_INVALID_CONVERSION_TO_CYCLES);
        assert_eq!(to_cycles(-100i8), ERROR_INVALID_CONVERSION_TO_CYCLES);
        assert_eq!(to_cycles(100i8), 100);
        assert_eq!(to_cycles(200u8), 200);
        assert_eq!(to_cycles(65_000u16), 65_000);
        assert_eq!(to_cycles(2_000_000_000i32), 2_000_000_000);
        assert_eq!(to_cycles(4_000_000_000i64), 4_000_000_000);
        assert_eq!(to_cycles(40_000_000_000u64), ERROR_INVALID_CONVERSION_TO_CYCLES);
        assert_eq!(
            to_cycles(u64::from(CycleCount::MAX) + 1),
            ERROR_INVALID_CONVERSION_TO_CYCLES
        );
        // lands in the error band
        assert_eq!(
            to_cycles(i64::from(ERROR_TILE_OUTPUT)),
            ERROR_INVALID_CONVERSION_TO_CYCLES
        );
    }

    #[test]
    fn test_to_cycles_floats_round_half_away() {
        assert_eq!(to_cycles(1000.4f64), 1000);
        assert_eq!(to_cycles(1000.5f64), 1001);
        assert_eq!(to_cycles(100_000.1f32), 100_000);
        assert_eq!(to_cycles(-1.1f64), ERROR_INVALID_CONVERSION_TO_CYCLES);
        assert_eq!(to_cycles(-0.4f64), ERROR_INVALID_CONVERSION_TO_CYCLES);
        assert_eq!(to_cycles(5_000_000_000.2f64), ERROR_INVALID_CONVERSION_TO_CYCLES);
        assert_eq!(to_cycles(f64::NAN), ERROR_INVALID_CONVERSION_TO_CYCLES);
        assert_eq!(
            to_cycles(f64::from(ERROR_TILE_OUTPUT) + 0.1),
            ERROR_INVALID_CONVERSION_TO_CYCLES
        );
    }

    #[test]
    fn test_to_cycles_cycle_type_is_identity() {
        assert_eq!(to_cycles(1000u32), 1000);
        assert_eq!(to_cycles(ERROR_TILE_OUTPUT), ERROR_TILE_OUTPUT);
    }

    #[test]
    fn test_dpu_schedule_reference_cases() {
        let costs = [10_000, 20_000, 15_000];
        assert_eq!(dpu_schedule(1, &costs, 100), 10_000 + 20_000 + 15_000 + 300);
        assert_eq!(dpu_schedule(2, &costs, 100), 10_000 + 100 + 15_000 + 100);

        let costs = [10_000, 20_000, 15_000, 45_000, 30_000, 10_000, 2_000, 23_500, 37_200];
        assert_eq!(
            dpu_schedule(4, &costs, 1_000),
            15_000 + 1_000 + 10_000 + 1_000 + 37_200 + 1_000
        );
    }

    #[test]
    fn test_dpu_schedule_errors() {
        assert_eq!(
            dpu_schedule(1, &[ERROR_INVALID_INPUT_DEVICE], 1),
            ERROR_INVALID_INPUT_DEVICE
        );
        assert_eq!(
            dpu_schedule(3, &[5, ERROR_TILE_OUTPUT, ERROR_INPUT_TOO_BIG], 0),
            ERROR_TILE_OUTPUT
        );
        assert_eq!(dpu_schedule(0, &[5], 0), ERROR_INVALID_INPUT_PARAMETERS);
        assert_eq!(dpu_schedule(4, &[], 10), 0);
        assert_eq!(
            dpu_schedule(1, &[START_ERROR_RANGE, 1], 0),
            ERROR_CUMULATED_CYCLES_TOO_LARGE
        );
    }

    #[test]
    fn test_cost_sum() {
        assert_eq!(cost_sum([1, 2, 3]), 6);
        assert_eq!(cost_sum([1, ERROR_TILE_OUTPUT, 3]), ERROR_TILE_OUTPUT);
        assert_eq!(cost_sum(std::iter::empty()), 0);
    }
}
