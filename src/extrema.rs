//! # Local High/Low Detection
//!
//! Marks each record whose height equals the maximum (high) or minimum (low)
//! of a centered rolling window over the height column.
//!
//! The comparison is exact float equality, so a flat run that shares the
//! window extremum is flagged as several highs (or lows) at once. Windows are
//! clamped at both ends of the series: the first and last `window / 2` records
//! see fewer neighbours and can be flagged where a full window would not flag
//! them. Both quirks are kept as-is since they change which markers appear.

/// Window width used for chart annotations (2 records either side).
pub const EXTREMA_WINDOW: usize = 5;

/// Indices of local highs and lows, each in ascending order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Extrema {
    pub highs: Vec<usize>,
    pub lows: Vec<usize>,
}

/// Classify every value against its centered window of width `window`.
///
/// The window around index `i` spans `window / 2` values before and
/// `window - 1 - window / 2` after, clipped to the slice. A value can be both
/// a high and a low when its whole window is flat. NaN never matches.
///
/// # Example
/// ```
/// use tide_chart_lib::extrema::rolling_extrema;
///
/// let found = rolling_extrema(&[1.0, 3.0, 3.0, 3.0, 1.0], 5);
/// assert_eq!(found.highs, vec![1, 2, 3]);
/// assert_eq!(found.lows, vec![0, 4]);
/// ```
pub fn rolling_extrema(values: &[f64], window: usize) -> Extrema {
    let mut found = Extrema::default();
    if window == 0 {
        return found;
    }

    let before = window / 2;
    let after = window - 1 - before;

    for (i, &value) in values.iter().enumerate() {
        let start = i.saturating_sub(before);
        let end = (i + after + 1).min(values.len());
        let neighbourhood = &values[start..end];

        let max = neighbourhood.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = neighbourhood.iter().copied().fold(f64::INFINITY, f64::min);

        if value == max {
            found.highs.push(i);
        }
        if value == min {
            found.lows.push(i);
        }
    }

    found
}
