use crate::coords::Surface;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Standard 3.5in x 2in card at 300 dpi.
pub const DEFAULT_WIDTH: f64 = 1050.0;
pub const DEFAULT_HEIGHT: f64 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    Project,
    Global,
}

/// Placement of a node on the design surface.
///
/// Units depend on the owning template: percentages of the surface when the
/// template is relative, pixels otherwise. Rotation is always in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
}

impl Geometry {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation: 0.0,
        }
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn is_finite(&self) -> bool {
        [self.x, self.y, self.width, self.height, self.rotation]
            .iter()
            .all(|v| v.is_finite())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: u16,
    pub color: String,
    pub align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Inter".to_string(),
            font_size: 16.0,
            font_weight: 400,
            color: "#000000".to_string(),
            align: TextAlign::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    #[default]
    Cover,
    Contain,
    Fill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rect,
    Ellipse,
    Line,
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeKind::Rect => write!(f, "rect"),
            ShapeKind::Ellipse => write!(f, "ellipse"),
            ShapeKind::Line => write!(f, "line"),
        }
    }
}

fn default_opacity() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    pub geometry: Geometry,
    pub content: String,
    #[serde(default)]
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageNode {
    pub geometry: Geometry,
    pub src: String,
    #[serde(default)]
    pub fit: ImageFit,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeNode {
    pub geometry: Geometry,
    #[serde(default)]
    pub shape: ShapeKind,
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default)]
    pub stroke: Option<String>,
    #[serde(default)]
    pub stroke_width: f64,
    #[serde(default)]
    pub corner_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoNode {
    pub geometry: Geometry,
    pub src: String,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub grayscale: bool,
}

/// A single visual element on the card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Text(TextNode),
    Image(ImageNode),
    Shape(ShapeNode),
    Logo(LogoNode),
}

impl Node {
    pub fn text(geometry: Geometry, content: impl Into<String>) -> Self {
        Node::Text(TextNode {
            geometry,
            content: content.into(),
            style: TextStyle::default(),
        })
    }

    pub fn image(geometry: Geometry, src: impl Into<String>) -> Self {
        Node::Image(ImageNode {
            geometry,
            src: src.into(),
            fit: ImageFit::default(),
            opacity: default_opacity(),
        })
    }

    pub fn shape(geometry: Geometry, shape: ShapeKind) -> Self {
        Node::Shape(ShapeNode {
            geometry,
            shape,
            fill: None,
            stroke: None,
            stroke_width: 0.0,
            corner_radius: 0.0,
        })
    }

    pub fn logo(geometry: Geometry, src: impl Into<String>) -> Self {
        Node::Logo(LogoNode {
            geometry,
            src: src.into(),
            opacity: default_opacity(),
            grayscale: false,
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::Text(_) => "text",
            Node::Image(_) => "image",
            Node::Shape(_) => "shape",
            Node::Logo(_) => "logo",
        }
    }

    pub fn geometry(&self) -> &Geometry {
        match self {
            Node::Text(n) => &n.geometry,
            Node::Image(n) => &n.geometry,
            Node::Shape(n) => &n.geometry,
            Node::Logo(n) => &n.geometry,
        }
    }

    pub fn geometry_mut(&mut self) -> &mut Geometry {
        match self {
            Node::Text(n) => &mut n.geometry,
            Node::Image(n) => &mut n.geometry,
            Node::Shape(n) => &mut n.geometry,
            Node::Logo(n) => &mut n.geometry,
        }
    }

    /// Short human-readable description used in listings.
    pub fn label(&self) -> String {
        match self {
            Node::Text(n) => format!("\"{}\"", n.content),
            Node::Image(n) => n.src.clone(),
            Node::Shape(n) => n.shape.to_string(),
            Node::Logo(n) => n.src.clone(),
        }
    }
}

/// Ordered node list. Order is paint order: later nodes draw on top.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}

impl From<Vec<Node>> for Document {
    fn from(nodes: Vec<Node>) -> Self {
        Self::from_nodes(nodes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub width: f64,
    pub height: f64,
    // Geometry is percent-of-surface rather than pixels
    #[serde(default)]
    pub relative: bool,
}

impl Metadata {
    pub fn new(name: String, width: f64, height: f64, relative: bool) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            created_at: now,
            updated_at: now,
            width,
            height,
            relative,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub metadata: Metadata,
    #[serde(default)]
    pub document: Document,
}

impl Template {
    pub fn new(name: String, width: f64, height: f64, relative: bool) -> Self {
        Self {
            metadata: Metadata::new(name, width, height, relative),
            document: Document::new(),
        }
    }

    pub fn surface(&self) -> Surface {
        Surface::from_metadata(&self.metadata)
    }
}
