use std::ops::Range;

/// Splits `0..n` into at most `workers` contiguous, disjoint, non-empty
/// ranges. Sizes differ by at most one; the first `n % workers` ranges take
/// the extra index.
pub fn partition(n: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1).min(n);
    if workers == 0 {
        return Vec::new();
    }
    let base = n / workers;
    let extra = n % workers;
    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0;
    for w in 0..workers {
        let len = base + usize::from(w < extra);
        ranges.push(start..start + len);
        start += len;
    }
    ranges
}

/// Cuts `slots` along `ranges`, yielding one mutable sub-slice per range.
/// `ranges` must be contiguous from zero and cover `slots` exactly.
pub(crate) fn split_by_ranges<'a, T>(
    mut slots: &'a mut [T],
    ranges: &[Range<usize>],
) -> Vec<&'a mut [T]> {
    let mut out = Vec::with_capacity(ranges.len());
    for range in ranges {
        let (head, tail) = std::mem::take(&mut slots).split_at_mut(range.len());
        out.push(head);
        slots = tail;
    }
    out
}
