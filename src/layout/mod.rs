//! Layout and pagination: turns a content tree into per-page draw
//! instructions.

mod chrome;
mod float;
mod geometry;
mod paginate;
mod visibility;
mod walker;

use std::sync::Arc;
use std::time::Instant;

use crate::backend::DrawingBackend;
use crate::config::{LogoSource, Options};
use crate::error::Error;
use crate::model::{ContentNode, PhysicalImage};
use crate::resource::{ImageResolver, decode_image_data};

use chrome::Chrome;
use paginate::Paginator;
use walker::Walker;

pub use chrome::fit_footer_logo;
pub use float::{Column, FloatRegion, FloatSide, FloatTracker};
pub use geometry::{PX_TO_MM, PageGeometry};
pub use visibility::Visibility;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageRole {
    HeaderLogo,
    FooterLogo,
    Inline,
}

/// An image the engine had to leave out. Generation still succeeded.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub role: ImageRole,
    pub source: String,
    /// Page being laid out when the image was dropped; `None` for logos,
    /// which are resolved before the first page.
    pub page: Option<u32>,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub page_count: u32,
    pub diagnostics: Vec<Diagnostic>,
}

async fn load_logo<R: ImageResolver>(
    source: Option<LogoSource<'_>>,
    role: ImageRole,
    resolver: &R,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Arc<PhysicalImage>> {
    let source = source?;
    let loaded = match source {
        LogoSource::Data(data) => decode_image_data(data).map(Arc::new),
        LogoSource::Reference(reference) => resolver.resolve(reference).await,
    };
    match loaded {
        Ok(image) => Some(image),
        Err(e) => {
            log::warn!("Failed to load {role:?} {}: {e}", source.describe());
            diagnostics.push(Diagnostic {
                role,
                source: source.describe(),
                page: None,
                message: e.to_string(),
            });
            None
        }
    }
}

/// Lay out `root` onto `backend`, one page at a time.
///
/// Logos are resolved first, then page 1 is opened with its header and
/// footer, then the tree is walked in document order. Image failures are
/// recorded in the returned [`Report`]; backend failures abort generation.
pub async fn generate<R: ImageResolver, B: DrawingBackend>(
    root: &ContentNode,
    options: &Options,
    resolver: &R,
    backend: &mut B,
) -> Result<Report, Error> {
    let t0 = Instant::now();
    let mut diagnostics = Vec::new();

    let header_logo = load_logo(
        options.header_logo(),
        ImageRole::HeaderLogo,
        resolver,
        &mut diagnostics,
    )
    .await;
    let footer_logo = load_logo(
        options.footer_logo(),
        ImageRole::FooterLogo,
        resolver,
        &mut diagnostics,
    )
    .await;
    let t_logos = t0.elapsed();

    let chrome = Chrome {
        header_text: options.header_text.clone(),
        header_logo,
        footer_logo,
        header_visibility: options.header_visibility.clone(),
        footer_visibility: options.footer_visibility.clone(),
    };

    let pager = Paginator::start(options.geometry, &chrome, &mut *backend)?;
    let mut walker = Walker::new(pager, backend, resolver);
    walker.walk(root).await?;
    let (page_count, skipped) = walker.finish();
    diagnostics.extend(skipped);

    log::info!(
        "Layout: logos={:.1}ms, walk={:.1}ms, pages={}, diagnostics={}",
        t_logos.as_secs_f64() * 1000.0,
        (t0.elapsed() - t_logos).as_secs_f64() * 1000.0,
        page_count,
        diagnostics.len(),
    );

    Ok(Report {
        page_count,
        diagnostics,
    })
}
