use std::sync::Arc;

use crate::backend::DrawingBackend;
use crate::error::Error;
use crate::model::{DrawInstruction, FontWeight, PhysicalImage, TextAlign};

use super::geometry::{PX_TO_MM, PageGeometry};
use super::visibility::Visibility;

const HEADER_LOGO_SIZE: f32 = 20.0;
const HEADER_LOGO_Y: f32 = 5.0;
const HEADER_TITLE_GAP: f32 = 5.0;
const HEADER_TITLE_Y_BESIDE_LOGO: f32 = 13.0;
const HEADER_TITLE_Y_CENTERED: f32 = 10.0;
const HEADER_FONT_SIZE: f32 = 12.0;
const RULE_WIDTH: f32 = 0.5;

const FOOTER_PADDING: f32 = 3.0;
const FOOTER_LABEL_FROM_BOTTOM: f32 = 10.0;
const FOOTER_FONT_SIZE: f32 = 10.0;

/// Header and footer bands, drawn on every page their policy allows.
pub(crate) struct Chrome {
    pub(crate) header_text: String,
    pub(crate) header_logo: Option<Arc<PhysicalImage>>,
    pub(crate) footer_logo: Option<Arc<PhysicalImage>>,
    pub(crate) header_visibility: Visibility,
    pub(crate) footer_visibility: Visibility,
}

impl Chrome {
    pub(crate) fn emit(
        &self,
        page: u32,
        geometry: &PageGeometry,
        backend: &mut impl DrawingBackend,
    ) -> Result<(), Error> {
        if self.header_visibility.should_show(page) {
            self.emit_header(geometry, backend)?;
        }
        if self.footer_visibility.should_show(page) {
            self.emit_footer(page, geometry, backend)?;
        }
        Ok(())
    }

    fn emit_header(
        &self,
        geometry: &PageGeometry,
        backend: &mut impl DrawingBackend,
    ) -> Result<(), Error> {
        let margin = geometry.margin();
        let (x, y, align) = match &self.header_logo {
            Some(logo) => {
                backend.draw(DrawInstruction::Image {
                    image: Arc::clone(logo),
                    x: margin,
                    y: HEADER_LOGO_Y,
                    width: HEADER_LOGO_SIZE,
                    height: HEADER_LOGO_SIZE,
                })?;
                (
                    margin + HEADER_LOGO_SIZE + HEADER_TITLE_GAP,
                    HEADER_TITLE_Y_BESIDE_LOGO,
                    TextAlign::Left,
                )
            }
            None => (
                geometry.page_width() / 2.0,
                HEADER_TITLE_Y_CENTERED,
                TextAlign::Center,
            ),
        };

        if !self.header_text.is_empty() {
            backend.draw(DrawInstruction::Text {
                text: self.header_text.clone(),
                x,
                y,
                font_size: HEADER_FONT_SIZE,
                weight: FontWeight::Bold,
                align,
            })?;
        }

        backend.draw(DrawInstruction::Line {
            x1: margin,
            y: geometry.header_height(),
            x2: geometry.page_width() - margin,
            line_width: RULE_WIDTH,
        })
    }

    fn emit_footer(
        &self,
        page: u32,
        geometry: &PageGeometry,
        backend: &mut impl DrawingBackend,
    ) -> Result<(), Error> {
        let footer_top = geometry.footer_start_y();

        let fitted = self
            .footer_logo
            .as_ref()
            .map(|logo| (logo, fit_footer_logo(logo.width_px, logo.height_px, geometry)))
            .filter(|(_, (width, height))| *width > 0.0 && *height > 0.0);

        let label_y = match fitted {
            Some((logo, (width, height))) => {
                backend.draw(DrawInstruction::Image {
                    image: Arc::clone(logo),
                    x: geometry.margin(),
                    y: footer_top + FOOTER_PADDING,
                    width,
                    height,
                })?;
                footer_top + FOOTER_PADDING + height + FOOTER_PADDING
            }
            None => {
                if self.footer_logo.is_some() {
                    log::debug!(
                        "Footer band of {:.1}mm too short for its logo, page {page}",
                        geometry.footer_height()
                    );
                }
                geometry.page_height() - FOOTER_LABEL_FROM_BOTTOM
            }
        };

        backend.draw(DrawInstruction::Text {
            text: format!("Page {page}"),
            x: geometry.page_width() - geometry.margin(),
            y: label_y.clamp(0.0, geometry.page_height()),
            font_size: FOOTER_FONT_SIZE,
            weight: FontWeight::Normal,
            align: TextAlign::Right,
        })
    }
}

/// Display size in millimetres of a footer logo: the largest scale no greater
/// than 1 that fits both the usable width and the padded footer height.
pub fn fit_footer_logo(width_px: u32, height_px: u32, geometry: &PageGeometry) -> (f32, f32) {
    let width = width_px as f32 * PX_TO_MM;
    let height = height_px as f32 * PX_TO_MM;
    if width <= 0.0 || height <= 0.0 {
        return (0.0, 0.0);
    }

    let max_width = geometry.usable_width();
    let max_height = (geometry.footer_height() - 2.0 * FOOTER_PADDING).max(0.0);
    let scale = (max_width / width).min(max_height / height).min(1.0);
    (width * scale, height * scale)
}
