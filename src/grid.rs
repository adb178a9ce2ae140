//! Grid of magnified label previews with a slideshow.
//!
//! Each cell shows one image's labels (saved and predicted) one at a time
//! through its own [`Magnifier`]. On every slideshow interval the cells that
//! are not hovered advance to their next label; hovering a cell pauses it.

use std::time::Duration;

use image::RgbaImage;
use web_time::Instant;

use crate::error::RenderError;
use crate::magnifier::{Magnified, Magnifier};
use crate::model::Label;

/// Default time between slideshow steps.
pub const DEFAULT_SLIDESHOW_INTERVAL: Duration = Duration::from_millis(2000);

/// One image in the grid.
#[derive(Debug, Clone)]
pub struct GridCell {
    key: String,
    labels: Vec<Label>,
    active: usize,
    hovered: bool,
    magnifier: Magnifier,
}

impl GridCell {
    /// Create a cell showing `saved` followed by `predicted`.
    pub fn new(key: impl Into<String>, saved: &[Label], predicted: &[Label], padding: f32) -> Self {
        let mut cell = Self {
            key: key.into(),
            labels: Vec::new(),
            active: 0,
            hovered: false,
            magnifier: Magnifier::new(padding),
        };
        cell.set_labels(saved, predicted);
        cell
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn active_index(&self) -> Option<usize> {
        (!self.labels.is_empty()).then_some(self.active)
    }

    pub fn active_label(&self) -> Option<&Label> {
        self.labels.get(self.active)
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    pub fn magnifier(&self) -> &Magnifier {
        &self.magnifier
    }

    pub fn magnifier_mut(&mut self) -> &mut Magnifier {
        &mut self.magnifier
    }

    /// Replace the labels, keeping the active index when it is still valid.
    pub fn set_labels(&mut self, saved: &[Label], predicted: &[Label]) {
        self.labels = saved.iter().chain(predicted).copied().collect();
        if self.active >= self.labels.len() {
            self.active = 0;
        }
        self.magnifier.set_label(self.active_index());
    }

    /// Show a specific label directly.
    pub fn set_active(&mut self, index: usize) {
        if index < self.labels.len() {
            self.active = index;
            self.magnifier.set_label(Some(index));
        }
    }

    /// Step to the next label, wrapping.
    pub fn next(&mut self) {
        if !self.labels.is_empty() {
            self.set_active((self.active + 1) % self.labels.len());
        }
    }

    /// Step to the previous label, wrapping.
    pub fn prev(&mut self) {
        let len = self.labels.len();
        if len > 0 {
            self.set_active((self.active + len - 1) % len);
        }
    }

    /// Render the active label, or `None` if there is no label or image.
    pub fn render(&self, image: Option<&RgbaImage>) -> Result<Option<Magnified>, RenderError> {
        self.magnifier.render(image, &self.labels)
    }
}

/// All cells plus the slideshow clock.
#[derive(Debug, Clone)]
pub struct GridView {
    cells: Vec<GridCell>,
    interval: Duration,
    last_step: Option<Instant>,
    padding: f32,
}

impl GridView {
    pub fn new(interval: Duration, padding: f32) -> Self {
        Self {
            cells: Vec::new(),
            interval,
            last_step: None,
            padding,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn cell_mut(&mut self, index: usize) -> Option<&mut GridCell> {
        self.cells.get_mut(index)
    }

    /// Add a cell for an image; returns its index.
    pub fn add(&mut self, key: impl Into<String>, saved: &[Label], predicted: &[Label]) -> usize {
        self.cells
            .push(GridCell::new(key, saved, predicted, self.padding));
        self.cells.len() - 1
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.last_step = None;
    }

    /// Apply one padding value to every cell.
    pub fn set_padding(&mut self, padding: f32) {
        self.padding = padding;
        for cell in &mut self.cells {
            cell.magnifier.set_padding(padding);
        }
    }

    /// Mark which cell the pointer is over (at most one).
    pub fn set_hover(&mut self, index: Option<usize>) {
        for (i, cell) in self.cells.iter_mut().enumerate() {
            cell.hovered = Some(i) == index;
        }
    }

    /// Advance the slideshow if the interval elapsed.
    ///
    /// The first call only starts the clock. Returns the number of cells
    /// that moved to another label.
    pub fn tick(&mut self, now: Instant) -> usize {
        let Some(last) = self.last_step else {
            self.last_step = Some(now);
            return 0;
        };
        if now.saturating_duration_since(last) < self.interval {
            return 0;
        }
        self.last_step = Some(now);

        let mut advanced = 0;
        for cell in self.cells.iter_mut().filter(|c| !c.hovered) {
            let before = cell.active;
            cell.next();
            if cell.active != before {
                advanced += 1;
            }
        }
        log::trace!("Slideshow step: {} cells advanced", advanced);
        advanced
    }
}

impl Default for GridView {
    fn default() -> Self {
        Self::new(DEFAULT_SLIDESHOW_INTERVAL, crate::magnifier::DEFAULT_PADDING)
    }
}
