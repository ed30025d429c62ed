use std::path::PathBuf;

use serde::Deserialize;

use crate::error::Error;
use crate::layout::{PageGeometry, Visibility};

pub const DEFAULT_HEADER_TEXT: &str = "Company Name - Report";

/// Everything the caller can configure about a generated document.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Output path, only used by [`crate::save_pdf`].
    pub filename: PathBuf,
    pub logo_reference: Option<String>,
    /// Base64 or `data:` URI; wins over `logo_reference`.
    pub logo_data: Option<String>,
    pub header_text: String,
    pub footer_logo_reference: Option<String>,
    pub footer_logo_data: Option<String>,
    pub header_visibility: Visibility,
    pub footer_visibility: Visibility,
    pub geometry: PageGeometry,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            filename: PathBuf::from("report.pdf"),
            logo_reference: None,
            logo_data: None,
            header_text: DEFAULT_HEADER_TEXT.to_string(),
            footer_logo_reference: None,
            footer_logo_data: None,
            header_visibility: Visibility::All,
            footer_visibility: Visibility::All,
            geometry: PageGeometry::default(),
        }
    }
}

/// Where a logo's pixels come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogoSource<'a> {
    Data(&'a str),
    Reference(&'a str),
}

impl<'a> LogoSource<'a> {
    fn pick(data: &'a Option<String>, reference: &'a Option<String>) -> Option<Self> {
        data.as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(LogoSource::Data)
            .or_else(|| {
                reference
                    .as_deref()
                    .filter(|r| !r.trim().is_empty())
                    .map(LogoSource::Reference)
            })
    }

    /// Short label for diagnostics; inline data is not echoed back.
    pub fn describe(&self) -> String {
        match self {
            LogoSource::Data(_) => "<inline data>".to_string(),
            LogoSource::Reference(r) => r.to_string(),
        }
    }
}

impl Options {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn header_logo(&self) -> Option<LogoSource<'_>> {
        LogoSource::pick(&self.logo_data, &self.logo_reference)
    }

    pub fn footer_logo(&self) -> Option<LogoSource<'_>> {
        LogoSource::pick(&self.footer_logo_data, &self.footer_logo_reference)
    }
}
