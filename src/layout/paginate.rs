use crate::backend::DrawingBackend;
use crate::error::Error;

use super::chrome::Chrome;
use super::float::{Column, FloatRegion, FloatTracker};
use super::geometry::PageGeometry;

/// Owns the cursor: current page number, vertical position and active float.
pub(crate) struct Paginator<'a> {
    geometry: PageGeometry,
    chrome: &'a Chrome,
    page: u32,
    y: f32,
    floats: FloatTracker,
}

impl<'a> Paginator<'a> {
    /// Opens page 1 and draws its header and footer.
    pub(crate) fn start(
        geometry: PageGeometry,
        chrome: &'a Chrome,
        backend: &mut impl DrawingBackend,
    ) -> Result<Self, Error> {
        let pager = Self {
            geometry,
            chrome,
            page: 1,
            y: geometry.content_start_y(),
            floats: FloatTracker::new(),
        };
        backend.new_page(pager.page)?;
        chrome.emit(pager.page, &geometry, backend)?;
        Ok(pager)
    }

    pub(crate) fn page(&self) -> u32 {
        self.page
    }

    pub(crate) fn y(&self) -> f32 {
        self.y
    }

    pub(crate) fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub(crate) fn advance(&mut self, dy: f32) {
        self.y += dy;
    }

    /// Nothing has been placed below the header yet.
    fn at_page_top(&self) -> bool {
        self.y <= self.geometry.content_start_y()
    }

    /// Breaks to a new page when `required` would push the cursor past the
    /// bottom of the content area. A fresh page never breaks again, so a unit
    /// taller than a whole page is placed once and overflows.
    pub(crate) fn check_new_page(
        &mut self,
        required: f32,
        backend: &mut impl DrawingBackend,
    ) -> Result<bool, Error> {
        if self.y + required <= self.geometry.content_max_y() || self.at_page_top() {
            return Ok(false);
        }
        self.break_page(backend)?;
        Ok(true)
    }

    fn break_page(&mut self, backend: &mut impl DrawingBackend) -> Result<(), Error> {
        self.page += 1;
        self.y = self.geometry.content_start_y();
        self.floats.clear();
        log::debug!("Page break -> page {}", self.page);
        backend.new_page(self.page)?;
        self.chrome.emit(self.page, &self.geometry, backend)
    }

    /// Full-width column, ignoring floats.
    pub(crate) fn full_column(&self) -> Column {
        Column {
            x: self.geometry.margin(),
            width: self.geometry.usable_width(),
        }
    }

    /// Column at the current cursor, narrowed by an active float.
    pub(crate) fn column(&mut self) -> Column {
        self.floats.effective_column(
            self.y,
            self.geometry.margin(),
            self.geometry.usable_width(),
        )
    }

    pub(crate) fn place_float(&mut self, region: FloatRegion) {
        self.floats.place(region);
    }

    pub(crate) fn clear_float(&mut self) {
        self.floats.clear();
    }
}
