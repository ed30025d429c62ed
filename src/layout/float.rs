#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloatSide {
    Left,
    Right,
}

/// Horizontal band reserved by a floating image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatRegion {
    pub side: FloatSide,
    /// Image width plus the margin on the text-facing side.
    pub width: f32,
    /// Cursor position at which the region stops narrowing text.
    pub end_y: f32,
}

/// The text column available at some vertical position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Column {
    pub x: f32,
    pub width: f32,
}

/// Single-slot float register. A second float replaces the first.
#[derive(Debug, Default)]
pub struct FloatTracker {
    active: Option<FloatRegion>,
}

impl FloatTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&FloatRegion> {
        self.active.as_ref()
    }

    /// Returns the region that was overwritten, if any.
    pub fn place(&mut self, region: FloatRegion) -> Option<FloatRegion> {
        let previous = self.active.replace(region);
        if let Some(prev) = previous {
            log::debug!(
                "Float {:?} (end_y={:.1}) replaced by {:?} (end_y={:.1})",
                prev.side,
                prev.end_y,
                region.side,
                region.end_y
            );
        }
        previous
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Column for a line at `y` within the full column starting at `left` with
    /// `full_width`. Clears the region once `y` reaches its end.
    pub fn effective_column(&mut self, y: f32, left: f32, full_width: f32) -> Column {
        let full = Column {
            x: left,
            width: full_width,
        };
        match self.active {
            Some(region) if y < region.end_y => match region.side {
                FloatSide::Left => Column {
                    x: left + region.width,
                    width: full_width - region.width,
                },
                FloatSide::Right => Column {
                    x: left,
                    width: full_width - region.width,
                },
            },
            Some(_) => {
                self.active = None;
                full
            }
            None => full,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_float_shifts_and_narrows() {
        let mut floats = FloatTracker::new();
        floats.place(FloatRegion {
            side: FloatSide::Left,
            width: 50.0,
            end_y: 100.0,
        });
        assert_eq!(
            floats.effective_column(60.0, 15.0, 180.0),
            Column { x: 65.0, width: 130.0 }
        );
    }

    #[test]
    fn right_float_only_narrows() {
        let mut floats = FloatTracker::new();
        floats.place(FloatRegion {
            side: FloatSide::Right,
            width: 40.0,
            end_y: 100.0,
        });
        assert_eq!(
            floats.effective_column(60.0, 15.0, 180.0),
            Column { x: 15.0, width: 140.0 }
        );
    }

    #[test]
    fn region_clears_once_passed() {
        let mut floats = FloatTracker::new();
        floats.place(FloatRegion {
            side: FloatSide::Left,
            width: 50.0,
            end_y: 100.0,
        });
        assert_eq!(floats.effective_column(100.0, 15.0, 180.0).x, 15.0);
        assert!(floats.active().is_none());
    }

    #[test]
    fn second_float_overwrites_first() {
        let mut floats = FloatTracker::new();
        let first = FloatRegion {
            side: FloatSide::Left,
            width: 50.0,
            end_y: 100.0,
        };
        floats.place(first);
        let replaced = floats.place(FloatRegion {
            side: FloatSide::Right,
            width: 30.0,
            end_y: 80.0,
        });
        assert_eq!(replaced, Some(first));
        assert_eq!(floats.active().map(|r| r.side), Some(FloatSide::Right));
    }
}
