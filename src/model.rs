use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u8")]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl TryFrom<u8> for HeadingLevel {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(HeadingLevel::H1),
            2 => Ok(HeadingLevel::H2),
            3 => Ok(HeadingLevel::H3),
            other => Err(format!("heading level must be 1, 2 or 3, got {other}")),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatMode {
    #[default]
    None,
    Left,
    Right,
}

/// Attributes of an image node. Sizes and margins are CSS pixels.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ImageAttrs {
    pub source: String,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default, rename = "float")]
    pub float_mode: FloatMode,
    #[serde(default)]
    pub margin_left: Option<f32>,
    #[serde(default)]
    pub margin_right: Option<f32>,
    #[serde(default)]
    pub margin_bottom: Option<f32>,
}

impl ImageAttrs {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn float(mut self, mode: FloatMode) -> Self {
        self.float_mode = mode;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NodeKind {
    /// Bare text outside any recognised element.
    Text,
    Heading { level: HeadingLevel },
    Paragraph,
    List {
        #[serde(default)]
        ordered: bool,
    },
    Image(ImageAttrs),
    Container,
}

impl NodeKind {
    /// Whether text of this kind narrows its column around an active float.
    /// Headings and lists always use the full width.
    pub fn reflows_around_floats(&self) -> bool {
        matches!(self, NodeKind::Text | NodeKind::Paragraph)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ContentNode {
    pub kind: NodeKind,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub children: Vec<ContentNode>,
}

impl ContentNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            text: String::new(),
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Text).with_text(text)
    }

    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        Self::new(NodeKind::Heading { level }).with_text(text)
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Paragraph).with_text(text)
    }

    /// One child per item; each item's text is the child's text content.
    pub fn list<I, S>(ordered: bool, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(NodeKind::List { ordered })
            .with_children(items.into_iter().map(ContentNode::text).collect())
    }

    pub fn image(attrs: ImageAttrs) -> Self {
        Self::new(NodeKind::Image(attrs))
    }

    pub fn container(children: Vec<ContentNode>) -> Self {
        Self::new(NodeKind::Container).with_children(children)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_children(mut self, children: Vec<ContentNode>) -> Self {
        self.children = children;
        self
    }

    /// Own text followed by all descendant text, whitespace collapsed.
    pub fn text_content(&self) -> String {
        let mut raw = String::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if !node.text.is_empty() {
                raw.push_str(&node.text);
                raw.push(' ');
            }
            stack.extend(node.children.iter().rev());
        }
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// A decoded bitmap, RGBA8, row-major.
#[derive(Clone, PartialEq)]
pub struct PhysicalImage {
    pub width_px: u32,
    pub height_px: u32,
    pub rgba: Vec<u8>,
}

impl fmt::Debug for PhysicalImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicalImage")
            .field("width_px", &self.width_px)
            .field("height_px", &self.height_px)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

impl PhysicalImage {
    pub fn has_alpha(&self) -> bool {
        self.rgba.chunks_exact(4).any(|p| p[3] < 255)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// One positioned output primitive, in millimetres from the top-left corner
/// of the page. Text `y` is the baseline; image `y` is the top edge.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawInstruction {
    Text {
        text: String,
        x: f32,
        y: f32,
        font_size: f32,
        weight: FontWeight,
        align: TextAlign,
    },
    Image {
        image: Arc<PhysicalImage>,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Line {
        x1: f32,
        y: f32,
        x2: f32,
        line_width: f32,
    },
}

impl DrawInstruction {
    pub fn y(&self) -> f32 {
        match self {
            DrawInstruction::Text { y, .. }
            | DrawInstruction::Image { y, .. }
            | DrawInstruction::Line { y, .. } => *y,
        }
    }
}
