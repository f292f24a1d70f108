//! List virtualization.
//!
//! Computes which items of a long, already-ordered collection need to be
//! rendered for the current scroll position, and where each one sits.
//! Offsets come from cumulative sizes: measured where known, estimated
//! otherwise. Everything is recomputed from scratch on each scroll, resize
//! or measurement so nothing drifts.

use std::collections::HashMap;
use std::ops::Range;

use crate::config::VirtualizationConfig;

/// One item to render, positioned absolutely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualItem {
    pub index: usize,
    pub start: f64,
    pub size: f64,
}

impl VirtualItem {
    pub fn end(&self) -> f64 {
        self.start + self.size
    }
}

/// Window over an ordered collection of `count` items.
#[derive(Debug, Clone)]
pub struct ListWindow {
    count: usize,
    estimate_size: f64,
    overscan: usize,
    measured: HashMap<usize, f64>,
    scroll_offset: f64,
    viewport: f64,
    /// `offsets[i]` is where item `i` starts; `offsets[count]` is the total.
    offsets: Vec<f64>,
    range: Range<usize>,
}

impl ListWindow {
    pub fn new(count: usize, estimate_size: f64) -> Self {
        let mut window = Self {
            count,
            estimate_size: estimate_size.max(0.0),
            overscan: 0,
            measured: HashMap::new(),
            scroll_offset: 0.0,
            viewport: 0.0,
            offsets: Vec::new(),
            range: 0..0,
        };
        window.recompute();
        window
    }

    pub fn from_config(count: usize, config: &VirtualizationConfig) -> Self {
        Self::new(count, config.estimate_size).with_overscan(config.overscan)
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self.recompute();
        self
    }

    pub fn with_viewport(mut self, viewport: f64) -> Self {
        self.viewport = viewport.max(0.0);
        self.recompute();
        self
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn overscan(&self) -> usize {
        self.overscan
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    pub fn viewport(&self) -> f64 {
        self.viewport
    }

    /// Collection length changed (load more, refresh).
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
        self.measured.retain(|&index, _| index < count);
        self.recompute();
    }

    /// Record the real rendered size of an item.
    pub fn measure(&mut self, index: usize, size: f64) {
        if index >= self.count {
            return;
        }
        self.measured.insert(index, size.max(0.0));
        self.recompute();
    }

    pub fn resize(&mut self, viewport: f64) {
        self.viewport = viewport.max(0.0);
        self.recompute();
    }

    /// Scroll to an absolute offset, clamped to the scrollable extent.
    pub fn scroll_to(&mut self, offset: f64) {
        let max = (self.total_size() - self.viewport).max(0.0);
        self.scroll_offset = if offset.is_finite() {
            offset.clamp(0.0, max)
        } else {
            0.0
        };
        self.recompute();
    }

    /// Scroll so that `index` is at the top of the viewport.
    pub fn scroll_to_index(&mut self, index: usize) {
        let index = index.min(self.count);
        let offset = self.offset_of(index);
        self.scroll_to(offset);
    }

    pub fn size_of(&self, index: usize) -> f64 {
        self.measured
            .get(&index)
            .copied()
            .unwrap_or(self.estimate_size)
    }

    /// Start offset of `index`; `offset_of(len())` is the total size.
    pub fn offset_of(&self, index: usize) -> f64 {
        self.offsets[index.min(self.count)]
    }

    /// Sum of every item's size.
    pub fn total_size(&self) -> f64 {
        self.offsets[self.count]
    }

    /// Indices to render, overscan included.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    pub fn items(&self) -> Vec<VirtualItem> {
        self.range
            .clone()
            .map(|index| VirtualItem {
                index,
                start: self.offsets[index],
                size: self.offsets[index + 1] - self.offsets[index],
            })
            .collect()
    }

    fn recompute(&mut self) {
        self.offsets.clear();
        self.offsets.reserve(self.count + 1);
        let mut total = 0.0;
        self.offsets.push(total);
        for index in 0..self.count {
            total += self.size_of(index);
            self.offsets.push(total);
        }

        let max_scroll = (total - self.viewport).max(0.0);
        if self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
        }

        self.range = self.compute_range();
    }

    fn compute_range(&self) -> Range<usize> {
        if self.count == 0 {
            return 0..0;
        }

        let margin = self.overscan as f64 * self.estimate_size;
        let low = self.scroll_offset - margin;
        let high = self.scroll_offset + self.viewport + margin;

        // First item whose end lies past `low`.
        let first = self.offsets[1..].partition_point(|&end| end <= low);
        // One past the last item starting at or before `high`.
        let last = self.offsets[..self.count].partition_point(|&start| start <= high);

        let end = last.min(self.count);
        first.min(end)..end
    }
}

/// Plain rendering below the threshold, windowed rendering at or above it.
#[derive(Debug, Clone)]
pub enum ListLayout {
    Plain { count: usize },
    Virtual(ListWindow),
}

impl ListLayout {
    pub fn plan(count: usize, config: &VirtualizationConfig) -> Self {
        if count >= config.threshold {
            ListLayout::Virtual(ListWindow::from_config(count, config))
        } else {
            ListLayout::Plain { count }
        }
    }

    pub fn is_virtual(&self) -> bool {
        matches!(self, ListLayout::Virtual(_))
    }

    /// Indices to render right now.
    pub fn visible_range(&self) -> Range<usize> {
        match self {
            ListLayout::Plain { count } => 0..*count,
            ListLayout::Virtual(window) => window.range(),
        }
    }

    pub fn window_mut(&mut self) -> Option<&mut ListWindow> {
        match self {
            ListLayout::Plain { .. } => None,
            ListLayout::Virtual(window) => Some(window),
        }
    }
}
