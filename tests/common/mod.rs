#![allow(dead_code)]

use std::io::Cursor;
use std::path::PathBuf;

use folio_pdf::{
    ContentNode, DrawInstruction, ImageResolver, MemoryImageResolver, Options, Page,
    PhysicalImage, Recorder, Report,
};

pub const MARGIN: f32 = 15.0;
pub const CONTENT_START_Y: f32 = 40.0;
pub const CONTENT_MAX_Y: f32 = 252.0;
pub const BODY_SIZE: f32 = 11.0;
pub const HEADER_SIZE: f32 = 12.0;
pub const FOOTER_SIZE: f32 = 10.0;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Lay out with the in-memory recorder.
pub fn layout<R: ImageResolver>(
    root: &ContentNode,
    options: &Options,
    resolver: &R,
) -> (Vec<Page>, Report) {
    init_logging();
    let mut recorder = Recorder::new();
    let report = pollster::block_on(folio_pdf::generate(root, options, resolver, &mut recorder))
        .expect("layout succeeds");
    (recorder.into_pages(), report)
}

pub fn layout_default(root: &ContentNode) -> (Vec<Page>, Report) {
    layout(root, &Options::default(), &MemoryImageResolver::new())
}

pub fn bitmap(width_px: u32, height_px: u32) -> PhysicalImage {
    PhysicalImage {
        width_px,
        height_px,
        rgba: vec![200; (width_px * height_px * 4) as usize],
    }
}

pub fn png_bytes(width_px: u32, height_px: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width_px, height_px, image::Rgba([10, 120, 200, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

pub fn png_data_uri(width_px: u32, height_px: u32) -> String {
    use base64::Engine;
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png_bytes(width_px, height_px))
    )
}

/// `count` copies of `word` separated by spaces.
pub fn words(word: &str, count: usize) -> String {
    vec![word; count].join(" ")
}

/// Unique scratch directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("folio-pdf-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

pub struct TextRun<'a> {
    pub text: &'a str,
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

pub fn texts(page: &Page) -> Vec<TextRun<'_>> {
    page.instructions
        .iter()
        .filter_map(|i| match i {
            DrawInstruction::Text {
                text, x, y, font_size, ..
            } => Some(TextRun {
                text: text.as_str(),
                x: *x,
                y: *y,
                size: *font_size,
            }),
            _ => None,
        })
        .collect()
}

/// Paragraph and list text (11pt).
pub fn body_texts(page: &Page) -> Vec<TextRun<'_>> {
    texts(page)
        .into_iter()
        .filter(|t| t.size == BODY_SIZE)
        .collect()
}

pub fn images(page: &Page) -> Vec<(f32, f32, f32, f32)> {
    page.instructions
        .iter()
        .filter_map(|i| match i {
            DrawInstruction::Image {
                x, y, width, height, ..
            } => Some((*x, *y, *width, *height)),
            _ => None,
        })
        .collect()
}

pub fn lines(page: &Page) -> usize {
    page.instructions
        .iter()
        .filter(|i| matches!(i, DrawInstruction::Line { .. }))
        .count()
}

pub fn has_header(page: &Page) -> bool {
    texts(page).iter().any(|t| t.size == HEADER_SIZE) || lines(page) > 0
}

pub fn has_footer(page: &Page) -> bool {
    texts(page)
        .iter()
        .any(|t| t.size == FOOTER_SIZE && t.text.starts_with("Page "))
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}
