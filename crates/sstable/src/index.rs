//! The in-memory sparse index: a sorted `[(key, file_offset)]` sample of a
//! segment's DATA section, used to bound a lookup's linear scan.

/// A sorted sample of `(key, file_offset)` pairs, one per `1-in-x` entries of
/// a segment plus always the first and last entry.
#[derive(Debug, Clone, Default)]
pub struct SparseIndex {
    samples: Vec<(Vec<u8>, u64)>,
}

impl SparseIndex {
    /// Builds a sparse index from the full, ordered list of `(key, offset)`
    /// pairs in a segment, sampling every `stride`-th entry plus the first
    /// and last.
    ///
    /// `stride` is clamped to `1` (sample every entry) if given as `0`.
    pub fn sample(entries: &[(Vec<u8>, u64)], stride: usize) -> Self {
        let stride = stride.max(1);
        let mut samples = Vec::new();
        for (i, (key, offset)) in entries.iter().enumerate() {
            if i % stride == 0 {
                samples.push((key.clone(), *offset));
            }
        }
        if let Some(last) = entries.last() {
            if samples.last().map(|(k, _)| k) != Some(&last.0) {
                samples.push(last.clone());
            }
        }
        Self { samples }
    }

    /// Returns the index of the greatest sampled key `<= key`, or `None` if
    /// `key` is less than every sampled key (the key cannot be in the
    /// segment).
    #[must_use]
    pub fn floor(&self, key: &[u8]) -> Option<usize> {
        match self.samples.binary_search_by(|(k, _)| k.as_slice().cmp(key)) {
            Ok(i) => Some(i),
            Err(0) => None,
            Err(i) => Some(i - 1),
        }
    }

    /// The file offset of the sample at `idx`.
    #[must_use]
    pub fn offset_at(&self, idx: usize) -> u64 {
        self.samples[idx].1
    }

    /// The file offset of the sample immediately after `idx`, if any. A scan
    /// started at `offset_at(idx)` must stop before this offset.
    #[must_use]
    pub fn next_offset(&self, idx: usize) -> Option<u64> {
        self.samples.get(idx + 1).map(|(_, o)| *o)
    }

    /// Number of sampled keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// `true` if the index has no samples (an empty segment).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
