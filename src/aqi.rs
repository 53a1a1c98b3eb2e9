//! ==============================================================================
//! aqi.rs - unified air quality index calculator
//! ==============================================================================
//!
//! purpose:
//!     turns raw pollutant concentrations into one integer severity score.
//!     pm2.5 and pm10 are mapped through breakpoint tables, voc and nox
//!     indices are already index-like and are used as-is. the worst
//!     pollutant wins.
//!
//! relationships:
//!     - used by: store.rs (every ingested reading gets its aqi here)
//!
//! ==============================================================================

/// one breakpoint bracket: concentrations in `[c_lo, c_hi]` map linearly onto
/// `[i_lo, i_hi]`. upper bounds are inclusive.
#[derive(Debug, Clone, Copy)]
struct Bracket {
    c_lo: f64,
    c_hi: f64,
    i_lo: f64,
    i_hi: f64,
}

const fn bracket(c_lo: f64, c_hi: f64, i_lo: f64, i_hi: f64) -> Bracket {
    Bracket { c_lo, c_hi, i_lo, i_hi }
}

/// index reported for any concentration above the last bracket
pub const SATURATED_AQI: i32 = 500;

/// pm2.5 breakpoints (µg/m³)
const PM25_BRACKETS: [Bracket; 5] = [
    bracket(0.0, 10.0, 0.0, 50.0),
    bracket(10.1, 25.0, 51.0, 100.0),
    bracket(25.1, 50.0, 101.0, 150.0),
    bracket(50.1, 75.0, 151.0, 200.0),
    bracket(75.1, 150.0, 201.0, 300.0),
];

/// pm10 breakpoints (µg/m³)
const PM10_BRACKETS: [Bracket; 5] = [
    bracket(0.0, 20.0, 0.0, 50.0),
    bracket(20.1, 50.0, 51.0, 100.0),
    bracket(50.1, 80.0, 101.0, 150.0),
    bracket(80.1, 110.0, 151.0, 200.0),
    bracket(110.1, 200.0, 201.0, 300.0),
];

/// map a concentration through a breakpoint table.
///
/// the first bracket whose inclusive upper bound holds `x` is used, so a value
/// in the gap between two brackets (e.g. 10.05 for pm2.5) interpolates against
/// the next bracket's floor and truncates back down.
fn sub_index(x: f64, table: &[Bracket]) -> i32 {
    if x <= 0.0 {
        return 0;
    }

    match table.iter().find(|b| x <= b.c_hi) {
        Some(b) => {
            (b.i_lo + (x - b.c_lo) * (b.i_hi - b.i_lo) / (b.c_hi - b.c_lo)) as i32
        }
        None => SATURATED_AQI,
    }
}

/// pm2.5 sub-index
pub fn pm25_index(pm25: f64) -> i32 {
    sub_index(pm25, &PM25_BRACKETS)
}

/// pm10 sub-index
pub fn pm10_index(pm10: f64) -> i32 {
    sub_index(pm10, &PM10_BRACKETS)
}

/// Compute the unified AQI: the maximum of the pm2.5, pm10, voc and nox
/// sub-indices. voc and nox are truncated toward zero and taken verbatim.
pub fn compute_aqi(pm25: f64, pm10: f64, voc: f64, nox: f64) -> i32 {
    [pm25_index(pm25), pm10_index(pm10), voc as i32, nox as i32]
        .into_iter()
        .max()
        .unwrap_or(0)
}

// ==============================================================================
// tests
// ==============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pm25_bracket_edges() {
        let cases = [
            (10.0, 50),
            (10.1, 51),
            (25.0, 100),
            (25.1, 101),
            (50.0, 150),
            (50.1, 151),
            (75.0, 200),
            (75.1, 201),
            (150.0, 300),
            (150.1, 500),
        ];
        for (pm25, expected) in cases {
            assert_eq!(pm25_index(pm25), expected, "pm2.5 = {}", pm25);
        }
    }

    #[test]
    fn test_pm10_bracket_edges() {
        let cases = [
            (20.0, 50),
            (20.1, 51),
            (50.0, 100),
            (50.1, 101),
            (80.0, 150),
            (110.0, 200),
            (200.0, 300),
            (200.1, 500),
        ];
        for (pm10, expected) in cases {
            assert_eq!(pm10_index(pm10), expected, "pm10 = {}", pm10);
        }
    }

    #[test]
    fn test_zero_maps_to_zero() {
        assert_eq!(pm25_index(0.0), 0);
        assert_eq!(pm10_index(0.0), 0);
        assert_eq!(compute_aqi(0.0, 0.0, 0.0, 0.0), 0);
    }

    #[test]
    fn test_interpolation_truncates() {
        // 5.0 sits halfway through the first bracket
        assert_eq!(pm25_index(5.0), 25);
        // 7.3 -> 36.5 -> 36
        assert_eq!(pm25_index(7.3), 36);
        // 35.0 in pm10 bracket 2 -> 75.4...
        assert_eq!(pm10_index(35.0), 75);
        // one-decimal inputs as nodes send them
        assert_eq!(pm25_index(1.4), 7);
        assert_eq!(pm25_index(2.8), 14);
        assert_eq!(pm25_index(5.6), 28);
    }

    #[test]
    fn test_worst_pollutant_dominates() {
        assert_eq!(compute_aqi(5.0, 8.0, 0.0, 0.0), 25);
        assert_eq!(compute_aqi(5.0, 8.0, 120.9, 0.0), 120);
        assert_eq!(compute_aqi(5.0, 8.0, 10.0, 310.2), 310);
        assert_eq!(compute_aqi(5.0, 250.0, 10.0, 0.0), SATURATED_AQI);
    }

    /// sweep each bracket in 0.1 steps and check the index never drops
    fn assert_monotonic_per_bracket(table: &[Bracket], index: fn(f64) -> i32) {
        for b in table {
            let steps = ((b.c_hi - b.c_lo) * 10.0).round() as i32;
            let mut last = index(b.c_lo);
            for k in 0..=steps {
                let x = (b.c_lo + k as f64 * 0.1).min(b.c_hi);
                let current = index(x);
                assert!(current >= last, "index dropped at {} (bracket {:?})", x, b);
                last = current;
            }
        }
    }

    #[test]
    fn test_monotonic_within_every_bracket() {
        assert_monotonic_per_bracket(&PM25_BRACKETS, pm25_index);
        assert_monotonic_per_bracket(&PM10_BRACKETS, pm10_index);
    }

    #[test]
    fn test_monotonic_in_voc_and_nox() {
        let mut last_voc = compute_aqi(5.0, 8.0, 0.0, 0.0);
        let mut last_nox = last_voc;
        for k in 0..=1000 {
            let v = k as f64 * 0.5;
            let by_voc = compute_aqi(5.0, 8.0, v, 0.0);
            let by_nox = compute_aqi(5.0, 8.0, 0.0, v);
            assert!(by_voc >= last_voc, "aqi dropped at voc = {}", v);
            assert!(by_nox >= last_nox, "aqi dropped at nox = {}", v);
            last_voc = by_voc;
            last_nox = by_nox;
        }
    }
}
