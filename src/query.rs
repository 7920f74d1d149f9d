use std::ops::Range;

/// Half-open span of data record indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordRange {
    pub start: usize,
    pub end: usize,
}

impl RecordRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Maps a time window in seconds to the data records that cover it.
///
/// `start = floor(offset / record_duration)` and
/// `end = start + ceil(duration / record_duration)`, each clamped to
/// `[0, records_count]` only after both are computed, so a window that
/// begins before the recording keeps its true end. Negative or `NaN` spans
/// count as zero records.
///
/// ```rust
/// use edfdecode::query::compute_range;
///
/// let range = compute_range(2.5, 3.0, 1.0, 10);
/// assert_eq!((range.start, range.end), (2, 5));
///
/// let past_end = compute_range(42.0, 5.0, 1.0, 10);
/// assert!(past_end.is_empty());
///
/// let before_start = compute_range(-3.0, 5.0, 1.0, 10);
/// assert_eq!((before_start.start, before_start.end), (0, 2));
/// ```
pub fn compute_range(
    time_offset: f64,
    duration: f64,
    record_duration: f64,
    records_count: usize,
) -> RecordRange {
    let raw_start = (time_offset / record_duration).floor();
    let span = (duration / record_duration).ceil();
    let span = if span > 0.0 { span } else { 0.0 };

    RecordRange {
        start: clamp_index(raw_start, records_count),
        end: clamp_index(raw_start + span, records_count),
    }
}

fn clamp_index(value: f64, records_count: usize) -> usize {
    if value.is_nan() || value <= 0.0 {
        0
    } else if value >= records_count as f64 {
        records_count
    } else {
        value as usize
    }
}

/// Concatenates the blocks of `records` selected by `range`.
pub fn extract(records: &[Vec<f64>], range: RecordRange) -> Vec<f64> {
    let end = range.end.min(records.len());
    let start = range.start.min(end);
    records[start..end].iter().flatten().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_range() {
        assert_eq!(compute_range(0.0, 1.0, 1.0, 10), RecordRange { start: 0, end: 1 });
        assert_eq!(compute_range(0.5, 0.5, 1.0, 10), RecordRange { start: 0, end: 1 });
        assert_eq!(compute_range(3.0, 2.1, 1.0, 10), RecordRange { start: 3, end: 6 });
        assert_eq!(compute_range(4.0, 2.0, 2.0, 10), RecordRange { start: 2, end: 3 });
        assert_eq!(compute_range(0.0, 0.0, 1.0, 10), RecordRange { start: 0, end: 0 });
    }

    #[test]
    fn test_compute_range_clamps() {
        assert_eq!(compute_range(8.0, 100.0, 1.0, 10), RecordRange { start: 8, end: 10 });
        assert_eq!(compute_range(20.0, 5.0, 1.0, 10), RecordRange { start: 10, end: 10 });
        assert_eq!(compute_range(-3.0, 5.0, 1.0, 10), RecordRange { start: 0, end: 2 });
        assert_eq!(compute_range(-0.5, 1.0, 1.0, 10), RecordRange { start: 0, end: 0 });
        assert_eq!(compute_range(-10.0, 2.0, 1.0, 10), RecordRange { start: 0, end: 0 });
        assert_eq!(compute_range(2.0, -1.0, 1.0, 10), RecordRange { start: 2, end: 2 });
        assert_eq!(compute_range(1.0, 1.0, f64::NAN, 10), RecordRange { start: 0, end: 0 });
        assert_eq!(compute_range(1.0, 1.0, 0.0, 10), RecordRange { start: 10, end: 10 });
        assert_eq!(compute_range(1.0, 1.0, 1.0, 0), RecordRange { start: 0, end: 0 });
    }

    #[test]
    fn test_compute_range_is_monotonic() {
        let count = 25;
        let mut previous = compute_range(-6.0, 3.0, 0.75, count);
        for step in 1..250 {
            let offset = step as f64 * 0.13 - 6.0;
            let range = compute_range(offset, 3.0, 0.75, count);
            assert!(range.start >= previous.start);
            assert!(range.end >= previous.end);
            assert!(range.start <= range.end && range.end <= count);
            previous = range;
        }

        let mut previous = compute_range(4.0, 0.0, 0.75, count);
        for step in 1..200 {
            let range = compute_range(4.0, step as f64 * 0.11, 0.75, count);
            assert!(range.end >= previous.end);
            assert!(range.end <= count);
            previous = range;
        }
    }

    #[test]
    fn test_extract() {
        let records = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];

        let all = extract(&records, RecordRange { start: 0, end: 3 });
        assert_eq!(all, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let middle = extract(&records, RecordRange { start: 1, end: 2 });
        assert_eq!(middle, vec![3.0, 4.0]);

        assert!(extract(&records, RecordRange { start: 2, end: 2 }).is_empty());
        assert!(extract(&[], RecordRange { start: 0, end: 4 }).is_empty());
    }
}
