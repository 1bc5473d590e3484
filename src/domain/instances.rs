//! Per-instance bar attributes and the binder that turns magnitudes into
//! bar heights.

use bytemuck::{Pod, Zeroable};
use std::ops::Range;

use super::errors::{RenderError, RenderResult};

/// Smallest bar height, so an all-zero sample still draws visible bars.
pub const MIN_BAR_HEIGHT: f32 = 0.05;
/// Height range above [`MIN_BAR_HEIGHT`]; the tallest bar reaches 0.95.
pub const BAR_HEIGHT_SPAN: f32 = 0.9;

/// World-space offset and per-axis scale of one drawn instance.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRecord {
    pub offset: [f32; 3],
    pub scale: [f32; 3],
}

impl InstanceRecord {
    /// The untransformed mesh.
    pub const IDENTITY: Self = Self { offset: [0.0; 3], scale: [1.0; 3] };
}

/// CPU mirror of the GPU instance buffer.
///
/// Writes land here and mark a dirty span; the renderer drains that span with
/// one buffer upload, so any number of writes between frames cost a single
/// transfer. The record count is fixed at creation.
#[derive(Debug, Clone)]
pub struct InstanceStaging {
    records: Vec<InstanceRecord>,
    dirty: Option<Range<usize>>,
}

impl InstanceStaging {
    /// Staging for `records`, fully dirty so the first flush uploads everything.
    pub fn new(records: Vec<InstanceRecord>) -> Self {
        let dirty = (!records.is_empty()).then(|| 0..records.len());
        Self { records, dirty }
    }

    /// `count` bars spaced evenly along `x`, centred on the origin, each with a
    /// square `footprint` and the minimum height.
    pub fn bar_row(count: usize, spacing: f32, footprint: f32) -> Self {
        let center = (count as f32 - 1.0) / 2.0;
        let records = (0..count)
            .map(|i| InstanceRecord {
                offset: [(i as f32 - center) * spacing, 0.0, 0.0],
                scale: [footprint, MIN_BAR_HEIGHT, footprint],
            })
            .collect();
        Self::new(records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[InstanceRecord] {
        &self.records
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_some()
    }

    /// Overwrites one record in place. Out-of-range indices are ignored.
    pub fn write(&mut self, index: usize, offset: [f32; 3], scale: [f32; 3]) {
        if let Some(record) = self.records.get_mut(index) {
            *record = InstanceRecord { offset, scale };
            self.mark_dirty(index..index + 1);
        }
    }

    /// Replaces every bar height at once. `heights.len()` must equal `len()`.
    fn write_heights(&mut self, heights: &[f32]) {
        for (record, &height) in self.records.iter_mut().zip(heights) {
            record.scale[1] = height;
        }
        self.mark_dirty(0..self.records.len());
    }

    fn mark_dirty(&mut self, range: Range<usize>) {
        self.dirty = Some(match self.dirty.take() {
            Some(current) => current.start.min(range.start)..current.end.max(range.end),
            None => range,
        });
    }

    /// Drains the dirty span, returning its first index and the records to upload.
    pub fn take_dirty(&mut self) -> Option<(usize, &[InstanceRecord])> {
        let range = self.dirty.take()?;
        Some((range.start, &self.records[range]))
    }
}

/// Maps a magnitude sequence onto bar heights.
#[derive(Debug, Clone, Copy)]
pub struct InstanceDataBinder {
    bar_count: usize,
}

impl InstanceDataBinder {
    pub fn new(bar_count: usize) -> Self {
        Self { bar_count }
    }

    pub fn bar_count(&self) -> usize {
        self.bar_count
    }

    /// Normalised heights for `magnitudes` without touching any buffer.
    ///
    /// Each value is divided by `max(magnitudes ∪ {1})` and mapped into
    /// `[MIN_BAR_HEIGHT, MIN_BAR_HEIGHT + BAR_HEIGHT_SPAN]`. Negative or NaN
    /// inputs count as zero.
    pub fn heights(&self, magnitudes: &[f64]) -> RenderResult<Vec<f32>> {
        if magnitudes.len() != self.bar_count {
            return Err(RenderError::ShapeMismatch {
                expected: self.bar_count,
                actual: magnitudes.len(),
            });
        }

        let max_value = magnitudes.iter().copied().filter(|m| m.is_finite()).fold(1.0, f64::max);
        Ok(magnitudes
            .iter()
            .map(|&m| {
                let normalized = if m.is_finite() { (m / max_value).clamp(0.0, 1.0) } else { 0.0 };
                MIN_BAR_HEIGHT + normalized as f32 * BAR_HEIGHT_SPAN
            })
            .collect())
    }

    /// Rewrites every bar height in `staging` as one batched update.
    ///
    /// On `ShapeMismatch` the staging buffer is left untouched.
    pub fn bind(&self, staging: &mut InstanceStaging, magnitudes: &[f64]) -> RenderResult<()> {
        if staging.len() != self.bar_count {
            return Err(RenderError::ShapeMismatch {
                expected: self.bar_count,
                actual: staging.len(),
            });
        }
        let heights = self.heights(magnitudes)?;
        staging.write_heights(&heights);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_row_is_centred() {
        let staging = InstanceStaging::bar_row(3, 0.5, 0.2);
        let xs: Vec<f32> = staging.records().iter().map(|r| r.offset[0]).collect();
        assert_eq!(xs, vec![-0.5, 0.0, 0.5]);
    }

    #[test]
    fn writes_coalesce_into_one_span() {
        let mut staging = InstanceStaging::bar_row(8, 1.0, 0.5);
        staging.take_dirty();
        staging.write(2, [0.0; 3], [1.0; 3]);
        staging.write(5, [0.0; 3], [1.0; 3]);
        let (start, records) = staging.take_dirty().unwrap();
        assert_eq!(start, 2);
        assert_eq!(records.len(), 4);
        assert!(staging.take_dirty().is_none());
    }

    #[test]
    fn out_of_range_write_is_ignored() {
        let mut staging = InstanceStaging::bar_row(2, 1.0, 0.5);
        staging.take_dirty();
        staging.write(9, [0.0; 3], [1.0; 3]);
        assert!(!staging.is_dirty());
    }
}
