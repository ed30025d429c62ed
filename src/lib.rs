mod backend;
mod config;
mod error;
pub mod layout;
mod metrics;
mod model;
mod pdf;
mod resource;

pub use backend::{DrawingBackend, Page, Recorder};
pub use config::{DEFAULT_HEADER_TEXT, LogoSource, Options};
pub use error::{Error, ResourceError};
pub use layout::{
    Diagnostic, ImageRole, PX_TO_MM, PageGeometry, Report, Visibility, fit_footer_logo, generate,
};
pub use metrics::FontState;
pub use model::{
    ContentNode, DrawInstruction, FloatMode, FontWeight, HeadingLevel, ImageAttrs, NodeKind,
    PhysicalImage, TextAlign,
};
pub use pdf::PdfBackend;
pub use resource::{
    FileImageResolver, ImageResolver, MemoryImageResolver, decode_image_bytes, decode_image_data,
};

use std::time::Instant;

/// Parse a content tree from its JSON form.
pub fn load_content(json: &str) -> Result<ContentNode, Error> {
    Ok(serde_json::from_str(json)?)
}

/// Lay out `root` and encode it as PDF bytes.
pub fn render_pdf<R: ImageResolver>(
    root: &ContentNode,
    options: &Options,
    resolver: &R,
) -> Result<(Vec<u8>, Report), Error> {
    let t0 = Instant::now();

    let mut backend = PdfBackend::new(options.geometry);
    let report = pollster::block_on(generate(root, options, resolver, &mut backend))?;
    let t_layout = t0.elapsed();

    let bytes = backend.finish()?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: layout={:.1}ms, encode={:.1}ms, total={:.1}ms ({} pages, {} bytes)",
        t_layout.as_secs_f64() * 1000.0,
        (t_total - t_layout).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        report.page_count,
        bytes.len(),
    );

    Ok((bytes, report))
}

/// Render to PDF and write it to `options.filename`.
pub fn save_pdf<R: ImageResolver>(
    root: &ContentNode,
    options: &Options,
    resolver: &R,
) -> Result<Report, Error> {
    let t0 = Instant::now();
    let (bytes, report) = render_pdf(root, options, resolver)?;
    let t_render = t0.elapsed();

    std::fs::write(&options.filename, &bytes).map_err(Error::Io)?;

    log::info!(
        "Wrote {} in {:.1}ms (render={:.1}ms)",
        options.filename.display(),
        t0.elapsed().as_secs_f64() * 1000.0,
        t_render.as_secs_f64() * 1000.0,
    );
    Ok(report)
}
