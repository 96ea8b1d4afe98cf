/// Half-open row interval `[start, end)` handed to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionRange {
    pub start: usize,
    pub end: usize,
}

impl PartitionRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Split `row_count` rows into ordered, disjoint ranges covering `[0, row_count)`.
///
/// `min(worker_count, row_count)` equal-sized ranges are produced, followed by one
/// extra range for the remainder when the rows do not divide evenly. Every range is
/// non-empty. Zero rows yields no ranges.
pub fn partition(row_count: usize, worker_count: usize) -> Vec<PartitionRange> {
    if row_count == 0 {
        return Vec::new();
    }

    let workers = worker_count.clamp(1, row_count);
    let (q, r) = (row_count / workers, row_count % workers);

    let mut ranges: Vec<PartitionRange> = (0..workers)
        .map(|i| PartitionRange::new(i * q, (i + 1) * q))
        .collect();
    if r > 0 {
        ranges.push(PartitionRange::new(q * workers, row_count));
    }
    ranges
}
