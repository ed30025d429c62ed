use serde::Deserialize;

use crate::error::Error;

/// Millimetres per CSS pixel (96 dpi).
pub const PX_TO_MM: f32 = 0.264583;

/// Page size and bands, in millimetres. Always valid once constructed.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "RawGeometry")]
pub struct PageGeometry {
    page_width: f32,
    page_height: f32,
    margin: f32,
    header_height: f32,
    footer_height: f32,
}

#[derive(Deserialize)]
#[serde(default)]
struct RawGeometry {
    page_width: f32,
    page_height: f32,
    margin: f32,
    header_height: f32,
    footer_height: f32,
}

impl Default for RawGeometry {
    fn default() -> Self {
        let a4 = PageGeometry::default();
        Self {
            page_width: a4.page_width,
            page_height: a4.page_height,
            margin: a4.margin,
            header_height: a4.header_height,
            footer_height: a4.footer_height,
        }
    }
}

impl TryFrom<RawGeometry> for PageGeometry {
    type Error = Error;

    fn try_from(raw: RawGeometry) -> Result<Self, Error> {
        PageGeometry::new(
            raw.page_width,
            raw.page_height,
            raw.margin,
            raw.header_height,
            raw.footer_height,
        )
    }
}

impl Default for PageGeometry {
    /// A4 portrait, 15mm margin, 25mm header band, 30mm footer band.
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin: 15.0,
            header_height: 25.0,
            footer_height: 30.0,
        }
    }
}

impl PageGeometry {
    pub fn new(
        page_width: f32,
        page_height: f32,
        margin: f32,
        header_height: f32,
        footer_height: f32,
    ) -> Result<Self, Error> {
        let fields = [
            ("page width", page_width),
            ("page height", page_height),
            ("margin", margin),
            ("header height", header_height),
            ("footer height", footer_height),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        let geometry = Self {
            page_width,
            page_height,
            margin,
            header_height,
            footer_height,
        };
        if geometry.usable_width() <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "margins of {margin}mm leave no usable width on a {page_width}mm page"
            )));
        }
        if geometry.content_max_y() <= geometry.content_start_y() {
            return Err(Error::InvalidConfig(format!(
                "header ({header_height}mm) and footer ({footer_height}mm) bands overlap on a {page_height}mm page"
            )));
        }
        Ok(geometry)
    }

    pub fn page_width(&self) -> f32 {
        self.page_width
    }

    pub fn page_height(&self) -> f32 {
        self.page_height
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn header_height(&self) -> f32 {
        self.header_height
    }

    pub fn footer_height(&self) -> f32 {
        self.footer_height
    }

    pub fn usable_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    pub fn content_start_y(&self) -> f32 {
        self.header_height + self.margin
    }

    pub fn content_max_y(&self) -> f32 {
        self.page_height - self.footer_height - self.margin
    }

    pub fn footer_start_y(&self) -> f32 {
        self.page_height - self.footer_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_content_rectangle() {
        let g = PageGeometry::default();
        assert_eq!(g.usable_width(), 180.0);
        assert_eq!(g.content_start_y(), 40.0);
        assert_eq!(g.content_max_y(), 252.0);
    }

    #[test]
    fn overlapping_bands_are_rejected() {
        let err = PageGeometry::new(210.0, 100.0, 15.0, 40.0, 40.0).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn negative_margin_is_rejected() {
        assert!(PageGeometry::new(210.0, 297.0, -1.0, 25.0, 30.0).is_err());
    }

    #[test]
    fn margins_wider_than_page_are_rejected() {
        assert!(PageGeometry::new(20.0, 297.0, 10.0, 25.0, 30.0).is_err());
    }
}
