use crate::backend::DrawingBackend;
use crate::error::Error;
use crate::metrics::{FontState, LineBreaker, wrap};
use crate::model::{
    ContentNode, DrawInstruction, FloatMode, FontWeight, HeadingLevel, ImageAttrs, NodeKind,
    PhysicalImage, TextAlign,
};
use crate::resource::ImageResolver;

use super::float::{Column, FloatRegion, FloatSide};
use super::geometry::PX_TO_MM;
use super::paginate::Paginator;
use super::{Diagnostic, ImageRole};

/// Font in effect before any element sets one.
const INITIAL_FONT: FontState = FontState::new(16.0, FontWeight::Normal);
const BODY_FONT: FontState = FontState::new(11.0, FontWeight::Normal);

/// Space a single body line must fit in before it is placed.
const LINE_FIT: f32 = 7.0;
const PARAGRAPH_PITCH: f32 = 6.0;
const PARAGRAPH_GAP: f32 = 3.0;
const TEXT_PITCH: f32 = 7.0;

const LIST_INDENT: f32 = 10.0;
const LIST_MARKER_OFFSET: f32 = 2.0;
const LIST_PITCH: f32 = 6.0;
const LIST_GAP: f32 = 3.0;
const BULLET: &str = "\u{2022}";

const IMAGE_GAP: f32 = 5.0;
const DEFAULT_IMAGE_MARGIN: f32 = 2.0;
const FLOAT_MAX_WIDTH_RATIO: f32 = 0.5;

struct HeadingStyle {
    font: FontState,
    /// Checked once for the whole block.
    fit: f32,
    pitch: f32,
    before: f32,
    after: f32,
}

impl HeadingStyle {
    fn for_level(level: HeadingLevel) -> Self {
        match level {
            HeadingLevel::H1 => Self {
                font: FontState::new(20.0, FontWeight::Bold),
                fit: 12.0,
                pitch: 10.0,
                before: 0.0,
                after: 5.0,
            },
            HeadingLevel::H2 => Self {
                font: FontState::new(16.0, FontWeight::Bold),
                fit: 10.0,
                pitch: 8.0,
                before: 3.0,
                after: 3.0,
            },
            HeadingLevel::H3 => Self {
                font: FontState::new(14.0, FontWeight::Bold),
                fit: 8.0,
                pitch: 7.0,
                before: 2.0,
                after: 2.0,
            },
        }
    }
}

/// Displayed size and margins of an inline image, in millimetres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ImagePlacement {
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) margin_left: f32,
    pub(crate) margin_right: f32,
    pub(crate) margin_bottom: f32,
}

impl ImagePlacement {
    /// Node attributes win over the decoded image's own size; a single given
    /// dimension keeps the image's aspect ratio.
    pub(crate) fn new(attrs: &ImageAttrs, image: &PhysicalImage, usable_width: f32) -> Self {
        let iw = image.width_px as f32;
        let ih = image.height_px as f32;
        let (w_px, h_px) = match (
            attrs.width.filter(|w| *w > 0.0),
            attrs.height.filter(|h| *h > 0.0),
        ) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, w * ih / iw),
            (None, Some(h)) => (h * iw / ih, h),
            (None, None) => (iw, ih),
        };

        let mut width = w_px * PX_TO_MM;
        let mut height = h_px * PX_TO_MM;
        let max_width = match attrs.float_mode {
            FloatMode::None => usable_width,
            FloatMode::Left | FloatMode::Right => usable_width * FLOAT_MAX_WIDTH_RATIO,
        };
        if width > max_width {
            height *= max_width / width;
            width = max_width;
        }

        Self {
            width,
            height,
            margin_left: margin_mm(attrs.margin_left),
            margin_right: margin_mm(attrs.margin_right),
            margin_bottom: margin_mm(attrs.margin_bottom),
        }
    }
}

/// Absent, zero or negative margins fall back to the default.
fn margin_mm(px: Option<f32>) -> f32 {
    px.map(|m| m * PX_TO_MM)
        .filter(|m| *m > 0.0)
        .unwrap_or(DEFAULT_IMAGE_MARGIN)
}

/// Walks the content tree in document order and lays out every node.
pub(crate) struct Walker<'a, B, R> {
    pager: Paginator<'a>,
    backend: &'a mut B,
    resolver: &'a R,
    font: FontState,
    diagnostics: Vec<Diagnostic>,
}

impl<'a, B: DrawingBackend, R: ImageResolver> Walker<'a, B, R> {
    pub(crate) fn new(pager: Paginator<'a>, backend: &'a mut B, resolver: &'a R) -> Self {
        Self {
            pager,
            backend,
            resolver,
            font: INITIAL_FONT,
            diagnostics: Vec::new(),
        }
    }

    /// Final page number and the diagnostics collected along the way.
    pub(crate) fn finish(self) -> (u32, Vec<Diagnostic>) {
        (self.pager.page(), self.diagnostics)
    }

    /// Pre-order, depth-first. Containers push their children onto the
    /// work-list; every other kind is laid out by its handler.
    pub(crate) async fn walk(&mut self, root: &ContentNode) -> Result<(), Error> {
        let mut pending = vec![root];
        while let Some(node) = pending.pop() {
            match &node.kind {
                NodeKind::Container => pending.extend(node.children.iter().rev()),
                NodeKind::Text => self.plain_text(node)?,
                NodeKind::Heading { level } => self.heading(*level, node)?,
                NodeKind::Paragraph => self.paragraph(node)?,
                NodeKind::List { ordered } => self.list(*ordered, node)?,
                NodeKind::Image(attrs) => self.image(attrs).await?,
            }
        }
        Ok(())
    }

    fn column_for(&mut self, kind: &NodeKind) -> Column {
        if kind.reflows_around_floats() {
            self.pager.column()
        } else {
            self.pager.full_column()
        }
    }

    fn draw_text(&mut self, text: String, x: f32, y: f32, font: FontState) -> Result<(), Error> {
        if text.is_empty() {
            return Ok(());
        }
        self.backend.draw(DrawInstruction::Text {
            text,
            x,
            y,
            font_size: font.size,
            weight: font.weight,
            align: TextAlign::Left,
        })
    }

    /// Lays out `text` line by line. The column is looked up again for every
    /// line, after the page-fit check, so text widens as soon as a float ends
    /// and never inherits a float from the previous page.
    fn flow_text(
        &mut self,
        text: &str,
        kind: &NodeKind,
        font: FontState,
        pitch: f32,
    ) -> Result<(), Error> {
        let mut breaker = LineBreaker::new(text);
        let mut first = true;
        while first || !breaker.is_empty() {
            first = false;
            self.pager.check_new_page(LINE_FIT, &mut *self.backend)?;
            let column = self.column_for(kind);
            if let Some(line) = breaker.next_line(column.width, font) {
                let y = self.pager.y();
                self.draw_text(line, column.x, y, font)?;
            }
            self.pager.advance(pitch);
        }
        Ok(())
    }

    fn plain_text(&mut self, node: &ContentNode) -> Result<(), Error> {
        let text = node.text_content();
        if text.is_empty() {
            return Ok(());
        }
        let font = self.font;
        self.flow_text(&text, &node.kind, font, TEXT_PITCH)
    }

    fn paragraph(&mut self, node: &ContentNode) -> Result<(), Error> {
        self.font = BODY_FONT;
        self.flow_text(&node.text_content(), &node.kind, BODY_FONT, PARAGRAPH_PITCH)?;
        self.pager.advance(PARAGRAPH_GAP);
        Ok(())
    }

    fn heading(&mut self, level: HeadingLevel, node: &ContentNode) -> Result<(), Error> {
        let style = HeadingStyle::for_level(level);
        self.pager.check_new_page(style.fit, &mut *self.backend)?;
        self.pager.advance(style.before);
        self.font = style.font;

        let column = self.column_for(&node.kind);
        for line in wrap(&node.text_content(), column.width, style.font) {
            let y = self.pager.y();
            self.draw_text(line, column.x, y, style.font)?;
            self.pager.advance(style.pitch);
        }
        self.pager.advance(style.after);
        Ok(())
    }

    fn list(&mut self, ordered: bool, node: &ContentNode) -> Result<(), Error> {
        self.font = BODY_FONT;
        let column = self.column_for(&node.kind);
        let text_x = column.x + LIST_INDENT;
        let text_width = column.width - LIST_INDENT;

        for (index, item) in node.children.iter().enumerate() {
            let marker = if ordered {
                format!("{}.", index + 1)
            } else {
                BULLET.to_string()
            };
            let lines = wrap(&item.text_content(), text_width, BODY_FONT);
            for (line_idx, line) in lines.into_iter().enumerate() {
                self.pager.check_new_page(LINE_FIT, &mut *self.backend)?;
                let y = self.pager.y();
                if line_idx == 0 {
                    self.draw_text(marker.clone(), column.x + LIST_MARKER_OFFSET, y, BODY_FONT)?;
                }
                self.draw_text(line, text_x, y, BODY_FONT)?;
                self.pager.advance(LIST_PITCH);
            }
        }
        self.pager.advance(LIST_GAP);
        Ok(())
    }

    async fn image(&mut self, attrs: &ImageAttrs) -> Result<(), Error> {
        if attrs.source.trim().is_empty() {
            log::debug!("Image without a source skipped");
            return Ok(());
        }

        let image = match self.resolver.resolve(&attrs.source).await {
            Ok(image) => image,
            Err(e) => {
                self.report(&attrs.source, e.to_string());
                return Ok(());
            }
        };

        let geometry = *self.pager.geometry();
        let placement = ImagePlacement::new(attrs, &image, geometry.usable_width());
        if !(placement.width > 0.0 && placement.height > 0.0) {
            self.report(&attrs.source, "image has no visible size".to_string());
            return Ok(());
        }

        self.pager.check_new_page(placement.height, &mut *self.backend)?;
        let y = self.pager.y();
        if y + placement.height > geometry.content_max_y() {
            log::warn!(
                "Image {} ({:.1}mm tall) overflows page {}",
                attrs.source,
                placement.height,
                self.pager.page()
            );
        }

        let (x, float) = match attrs.float_mode {
            FloatMode::Left => (
                geometry.margin(),
                Some(FloatRegion {
                    side: FloatSide::Left,
                    width: placement.width + placement.margin_right,
                    end_y: y + placement.height + placement.margin_bottom,
                }),
            ),
            FloatMode::Right => (
                geometry.page_width() - geometry.margin() - placement.width,
                Some(FloatRegion {
                    side: FloatSide::Right,
                    width: placement.width + placement.margin_left,
                    end_y: y + placement.height + placement.margin_bottom,
                }),
            ),
            FloatMode::None => (
                geometry.margin() + (geometry.usable_width() - placement.width) / 2.0,
                None,
            ),
        };

        self.backend.draw(DrawInstruction::Image {
            image,
            x,
            y,
            width: placement.width,
            height: placement.height,
        })?;

        match float {
            // Floats leave the cursor where it is; following text flows beside them.
            Some(region) => self.pager.place_float(region),
            None => {
                self.pager.advance(placement.height + IMAGE_GAP);
                self.pager.clear_float();
            }
        }
        Ok(())
    }

    fn report(&mut self, source: &str, message: String) {
        log::warn!("Skipping image {source}: {message}");
        self.diagnostics.push(Diagnostic {
            role: ImageRole::Inline,
            source: source.to_string(),
            page: Some(self.pager.page()),
            message,
        });
    }
}
