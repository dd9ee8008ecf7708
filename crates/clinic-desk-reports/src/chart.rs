//! Chart series and pie segment layout.

use serde::{Deserialize, Serialize};

/// Segment colors, assigned cyclically by position.
pub const PALETTE: [&str; 7] = [
    "#4EAACB", "#FF1E1E", "#54FB3E", "#FFA500", "#800080", "#FFB6C1", "#8A2BE2",
];

/// A named value in a chart series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartDatum {
    pub name: String,
    pub value: f64,
}

impl ChartDatum {
    pub fn new(name: String, value: f64) -> Self {
        Self { name, value }
    }
}

/// A pie slice expressed as a percentage range of the whole.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PieSegment {
    pub name: String,
    pub value: f64,
    pub start_percent: f64,
    pub end_percent: f64,
    pub color: String,
}

/// Sum of a series.
pub fn total(data: &[ChartDatum]) -> f64 {
    data.iter().map(|d| d.value).sum()
}

/// Color for the segment at `index`.
pub fn color_for(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Lay a series out as consecutive pie segments.
///
/// An empty or zero-total series yields zero-width segments.
pub fn pie_segments(data: &[ChartDatum]) -> Vec<PieSegment> {
    let sum = total(data);
    let mut cumulative = 0.0;

    data.iter()
        .enumerate()
        .map(|(index, datum)| {
            let start = percent(cumulative, sum);
            cumulative += datum.value;
            let end = percent(cumulative, sum);
            PieSegment {
                name: datum.name.clone(),
                value: datum.value,
                start_percent: start,
                end_percent: end,
                color: color_for(index).to_string(),
            }
        })
        .collect()
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_segments_cover_whole() {
        let data = vec![
            ChartDatum::new("A".into(), 1.0),
            ChartDatum::new("B".into(), 3.0),
        ];
        let segments = pie_segments(&data);

        assert_eq!(segments[0].start_percent, 0.0);
        assert_eq!(segments[0].end_percent, 25.0);
        assert_eq!(segments[1].start_percent, 25.0);
        assert_eq!(segments[1].end_percent, 100.0);
        assert_eq!(segments[1].color, PALETTE[1]);
    }

    #[test]
    fn test_palette_wraps() {
        assert_eq!(color_for(7), PALETTE[0]);
        assert_eq!(color_for(9), PALETTE[2]);
    }

    #[test]
    fn test_zero_total() {
        let data = vec![ChartDatum::new("A".into(), 0.0)];
        let segments = pie_segments(&data);
        assert_eq!(segments[0].start_percent, 0.0);
        assert_eq!(segments[0].end_percent, 0.0);
    }

    proptest! {
        #[test]
        fn segments_are_contiguous(values in proptest::collection::vec(1u32..1000, 1..20)) {
            let data: Vec<ChartDatum> = values
                .iter()
                .enumerate()
                .map(|(i, v)| ChartDatum::new(format!("s{}", i), *v as f64))
                .collect();
            let segments = pie_segments(&data);

            for pair in segments.windows(2) {
                prop_assert!((pair[0].end_percent - pair[1].start_percent).abs() < 1e-9);
            }
            let last = segments.last().unwrap();
            prop_assert!((last.end_percent - 100.0).abs() < 1e-6);
        }
    }
}
