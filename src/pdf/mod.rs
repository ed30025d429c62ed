use std::sync::Arc;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str};

use crate::backend::DrawingBackend;
use crate::error::Error;
use crate::layout::PageGeometry;
use crate::metrics::{FontState, PT_PER_MM, to_winansi_bytes};
use crate::model::{DrawInstruction, FontWeight, PhysicalImage, TextAlign};

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

/// Draws the instruction stream into PDF content streams. Millimetres with a
/// top-left origin are converted to points with PDF's bottom-left origin.
pub struct PdfBackend {
    geometry: PageGeometry,
    pages: Vec<Content>,
    images: Vec<(Arc<PhysicalImage>, String)>,
}

impl PdfBackend {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: Vec::new(),
            images: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn x_pt(&self, x: f32) -> f32 {
        x * PT_PER_MM
    }

    fn y_pt(&self, y: f32) -> f32 {
        (self.geometry.page_height() - y) * PT_PER_MM
    }

    /// XObject name for `image`, registering it on first use. Bitmaps with
    /// identical pixels share one XObject even when decoded separately.
    fn image_name(&mut self, image: &Arc<PhysicalImage>) -> String {
        if let Some((_, name)) = self
            .images
            .iter()
            .find(|(i, _)| Arc::ptr_eq(i, image) || **i == **image)
        {
            return name.clone();
        }
        let name = format!("Im{}", self.images.len() + 1);
        self.images.push((Arc::clone(image), name.clone()));
        name
    }

    fn current(&mut self) -> Result<&mut Content, Error> {
        self.pages
            .last_mut()
            .ok_or_else(|| Error::Pdf("instruction drawn before the first page".into()))
    }

    /// Assemble the document. Fails if no page was ever started.
    pub fn finish(self) -> Result<Vec<u8>, Error> {
        let t0 = std::time::Instant::now();
        if self.pages.is_empty() {
            return Err(Error::Pdf("document has no pages".into()));
        }

        let mut pdf = Pdf::new();
        let mut next_id = 1i32;
        let mut alloc = || {
            let r = Ref::new(next_id);
            next_id += 1;
            r
        };

        let catalog_id = alloc();
        let pages_id = alloc();

        let mut font_refs: Vec<(&str, Ref)> = Vec::new();
        for (pdf_name, base_font) in [(REGULAR_FONT, "Helvetica"), (BOLD_FONT, "Helvetica-Bold")] {
            let font_ref = alloc();
            pdf.type1_font(font_ref)
                .base_font(Name(base_font.as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
            font_refs.push((pdf_name, font_ref));
        }

        let mut image_xobjects: Vec<(String, Ref)> = Vec::new();
        for (image, name) in &self.images {
            let xobj_ref = alloc();
            embed_image(&mut pdf, xobj_ref, image, &mut alloc);
            image_xobjects.push((name.clone(), xobj_ref));
        }

        let n = self.pages.len();
        let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
        let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

        for (i, c) in self.pages.into_iter().enumerate() {
            let raw = c.finish();
            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
            pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
        }

        pdf.catalog(catalog_id).pages(pages_id);
        pdf.pages(pages_id)
            .kids(page_ids.iter().copied())
            .count(n as i32);

        let media_box = Rect::new(
            0.0,
            0.0,
            self.geometry.page_width() * PT_PER_MM,
            self.geometry.page_height() * PT_PER_MM,
        );
        for i in 0..n {
            let mut page = pdf.page(page_ids[i]);
            page.media_box(media_box)
                .parent(pages_id)
                .contents(content_ids[i]);
            let mut resources = page.resources();
            {
                let mut fonts = resources.fonts();
                for (name, font_ref) in &font_refs {
                    fonts.pair(Name(name.as_bytes()), *font_ref);
                }
            }
            if !image_xobjects.is_empty() {
                let mut xobjects = resources.x_objects();
                for (name, xobj_ref) in &image_xobjects {
                    xobjects.pair(Name(name.as_bytes()), *xobj_ref);
                }
            }
        }

        let bytes = pdf.finish();
        log::debug!(
            "PDF assembly: pages={}, images={}, {} bytes in {:.1}ms",
            n,
            image_xobjects.len(),
            bytes.len(),
            t0.elapsed().as_secs_f64() * 1000.0,
        );
        Ok(bytes)
    }
}

/// RGB XObject with a separate alpha SMask when any pixel is translucent.
fn embed_image(
    pdf: &mut Pdf,
    xobj_ref: Ref,
    image: &PhysicalImage,
    alloc: &mut dyn FnMut() -> Ref,
) {
    let (w, h) = (image.width_px as i32, image.height_px as i32);
    let rgb_data: Vec<u8> = image
        .rgba
        .chunks_exact(4)
        .flat_map(|p| [p[0], p[1], p[2]])
        .collect();
    let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);

    let smask_ref = if image.has_alpha() {
        let alpha_data: Vec<u8> = image.rgba.chunks_exact(4).map(|p| p[3]).collect();
        let compressed_alpha = miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6);
        let mask_ref = alloc();
        let mut mask = pdf.image_xobject(mask_ref, &compressed_alpha);
        mask.filter(Filter::FlateDecode);
        mask.width(w);
        mask.height(h);
        mask.color_space().device_gray();
        mask.bits_per_component(8);
        Some(mask_ref)
    } else {
        None
    };

    let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
    xobj.filter(Filter::FlateDecode);
    xobj.width(w);
    xobj.height(h);
    xobj.color_space().device_rgb();
    xobj.bits_per_component(8);
    if let Some(mask_ref) = smask_ref {
        xobj.s_mask(mask_ref);
    }
}

impl DrawingBackend for PdfBackend {
    fn new_page(&mut self, number: u32) -> Result<(), Error> {
        log::debug!("PDF page {number}");
        self.pages.push(Content::new());
        Ok(())
    }

    fn draw(&mut self, instruction: DrawInstruction) -> Result<(), Error> {
        match instruction {
            DrawInstruction::Text {
                text,
                x,
                y,
                font_size,
                weight,
                align,
            } => {
                let bytes = to_winansi_bytes(&text);
                if bytes.is_empty() {
                    return Ok(());
                }
                let width = FontState::new(font_size, weight).text_width(&text);
                let left = match align {
                    TextAlign::Left => x,
                    TextAlign::Center => x - width / 2.0,
                    TextAlign::Right => x - width,
                };
                let font = match weight {
                    FontWeight::Normal => REGULAR_FONT,
                    FontWeight::Bold => BOLD_FONT,
                };
                let (px, py) = (self.x_pt(left), self.y_pt(y));
                let content = self.current()?;
                content.begin_text();
                content.set_font(Name(font.as_bytes()), font_size);
                content.next_line(px, py);
                content.show(Str(&bytes));
                content.end_text();
            }
            DrawInstruction::Image {
                image,
                x,
                y,
                width,
                height,
            } => {
                let name = self.image_name(&image);
                let (px, py) = (self.x_pt(x), self.y_pt(y + height));
                let (w, h) = (width * PT_PER_MM, height * PT_PER_MM);
                let content = self.current()?;
                content.save_state();
                content.transform([w, 0.0, 0.0, h, px, py]);
                content.x_object(Name(name.as_bytes()));
                content.restore_state();
            }
            DrawInstruction::Line {
                x1,
                y,
                x2,
                line_width,
            } => {
                let (ax, bx, py) = (self.x_pt(x1), self.x_pt(x2), self.y_pt(y));
                let content = self.current()?;
                content.save_state();
                content.set_line_width(line_width * PT_PER_MM);
                content.move_to(ax, py);
                content.line_to(bx, py);
                content.stroke();
                content.restore_state();
            }
        }
        Ok(())
    }
}
