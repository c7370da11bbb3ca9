//! Cycle-domain arithmetic: error band, saturation and scheduling.

use tilecost_core::cycles::{
    cost_adder, cost_sum, dpu_schedule, is_error_code, to_cycles, to_error_text,
    ERROR_CUMULATED_CYCLES_TOO_LARGE, ERROR_INPUT_TOO_BIG, ERROR_INVALID_CONVERSION_TO_CYCLES,
    ERROR_INVALID_INPUT_PARAMETERS, ERROR_TILE_OUTPUT, START_ERROR_RANGE,
};
use tilecost_core::CycleCount;

const SAMPLES: [CycleCount; 6] = [0, 1, 17, 4096, 1_000_000, START_ERROR_RANGE / 3];

#[test]
fn test_error_band_boundary() {
    assert!(!is_error_code(START_ERROR_RANGE));
    assert!(is_error_code(START_ERROR_RANGE + 1));
    assert!(is_error_code(CycleCount::MAX));
    assert!(!is_error_code(0));
}

#[test]
fn test_cost_adder_commutative_and_associative() {
    for &a in &SAMPLES {
        for &b in &SAMPLES {
            assert_eq!(cost_adder(a, b), cost_adder(b, a), "{a} + {b}");
            for &c in &SAMPLES {
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
fn test_cost_adder_returns_first_error() {
    assert_eq!(cost_adder(ERROR_TILE_OUTPUT, ERROR_INPUT_TOO_BIG), ERROR_TILE_OUTPUT);
    assert_eq!(cost_adder(5, ERROR_INPUT_TOO_BIG), ERROR_INPUT_TOO_BIG);
    assert_eq!(cost_adder(ERROR_TILE_OUTPUT, 5), ERROR_TILE_OUTPUT);
    assert_eq!(cost_sum([1, 2, ERROR_TILE_OUTPUT, ERROR_INPUT_TOO_BIG]), ERROR_TILE_OUTPUT);
}

#[test]
fn test_cost_adder_saturates_at_band() {
    assert_eq!(cost_adder(START_ERROR_RANGE, 0), START_ERROR_RANGE);
    assert_eq!(cost_adder(START_ERROR_RANGE - 10, 10), START_ERROR_RANGE);
    assert_eq!(cost_adder(START_ERROR_RANGE, 1), ERROR_CUMULATED_CYCLES_TOO_LARGE);
    assert_eq!(cost_sum([START_ERROR_RANGE / 2; 3]), ERROR_CUMULATED_CYCLES_TOO_LARGE);
}

#[test]
fn test_dpu_schedule_reference_schedules() {
    let costs = [100, 200, 300];
    assert_eq!(dpu_schedule(1, &costs, 0), 600);
    // 100 -> p0, 200 -> p1, 300 -> p0
    assert_eq!(dpu_schedule(2, &costs, 0), 400);
    assert_eq!(dpu_schedule(4, &costs, 0), 300);
    assert_eq!(dpu_schedule(2, &costs, 10), 420);
    assert_eq!(dpu_schedule(3, &[], 0), 0);
}

#[test]
fn test_dpu_schedule_errors() {
    assert_eq!(dpu_schedule(0, &[1, 2], 0), ERROR_INVALID_INPUT_PARAMETERS);
    assert_eq!(dpu_schedule(0, &[1, ERROR_TILE_OUTPUT], 0), ERROR_TILE_OUTPUT);
    assert_eq!(
        dpu_schedule(1, &[START_ERROR_RANGE, START_ERROR_RANGE], 0),
        ERROR_CUMULATED_CYCLES_TOO_LARGE
    );
}

#[test]
fn test_to_cycles_conversions() {
    assert_eq!(to_cycles(2.4f64), 2);
    assert_eq!(to_cycles(2.5f64), 3);
    assert_eq!(to_cycles(0.0f32), 0);
    assert_eq!(to_cycles(-1.0f64), ERROR_INVALID_CONVERSION_TO_CYCLES);
    assert_eq!(to_cycles(f64::NAN), ERROR_INVALID_CONVERSION_TO_CYCLES);
    assert_eq!(to_cycles(-3i32), ERROR_INVALID_CONVERSION_TO_CYCLES);
    assert_eq!(to_cycles(u64::from(START_ERROR_RANGE)), START_ERROR_RANGE);
    assert_eq!(
        to_cycles(u64::from(START_ERROR_RANGE) + 1),
        ERROR_INVALID_CONVERSION_TO_CYCLES
    );
    assert_eq!(to_cycles(ERROR_TILE_OUTPUT), ERROR_TILE_OUTPUT);
}

#[test]
fn test_error_names() {
    assert_eq!(to_error_text(ERROR_TILE_OUTPUT), "ERROR_TILE_OUTPUT");
    assert_eq!(to_error_text(42), "NOT_AN_ERROR");
}
