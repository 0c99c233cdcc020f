//! Scene-graph nodes and sizing helpers

use std::fmt;

use wheel_math::Vec2;

/// Width and height in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The larger of width and height
    pub fn max_dimension(&self) -> f32 {
        self.width.max(self.height)
    }
}

/// Errors from node helpers
#[derive(Debug, Clone, PartialEq)]
pub enum NodeError {
    /// The node's content is smaller than one pixel in its largest dimension
    DegenerateContentSize { max_pixels: f32 },
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeError::DegenerateContentSize { max_pixels } => write!(
                f,
                "Node content must be at least 1 pixel, largest dimension is {}",
                max_pixels
            ),
        }
    }
}

impl std::error::Error for NodeError {}

/// A positioned element of the scene graph
///
/// Positions are in world meters; the content size is in pixels and
/// becomes on-screen size through `scale`.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub name: String,
    pub position: Vec2,
    /// Rotation in radians, counter-clockwise
    pub rotation: f32,
    scale: f32,
    content_size: Size,
    pub visible: bool,
    pub tag: i32,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: 1.0,
            content_size: Size::ZERO,
            visible: true,
            tag: 0,
        }
    }
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_content_size(mut self, size: Size) -> Self {
        self.content_size = size;
        self
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_tag(mut self, tag: i32) -> Self {
        self.tag = tag;
        self
    }

    pub fn content_size(&self) -> Size {
        self.content_size
    }

    pub fn set_content_size(&mut self, size: Size) {
        self.content_size = size;
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    /// Largest on-screen dimension in pixels
    pub fn scaled_max_pixels(&self) -> f32 {
        self.content_size.max_dimension() * self.scale
    }
}

/// Scale `node` so its content spans `entity_size_meters` on screen
///
/// The uniform scale is `entity_size_meters * ptm_ratio / max(width, height)`,
/// where `ptm_ratio` is pixels per meter. Content smaller than one pixel is
/// rejected and the node is left untouched.
pub fn adjust_node_scale(
    node: &mut Node,
    entity_size_meters: f32,
    ptm_ratio: f32,
) -> Result<f32, NodeError> {
    let max_pixels = node.content_size().max_dimension();
    if !(max_pixels >= 1.0) {
        return Err(NodeError::DegenerateContentSize { max_pixels });
    }
    let scale = entity_size_meters * ptm_ratio / max_pixels;
    node.set_scale(scale);
    Ok(scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_defaults() {
        let node = Node::new("ball");
        assert_eq!(node.name, "ball");
        assert_eq!(node.scale(), 1.0);
        assert!(node.visible);
        assert_eq!(node.content_size(), Size::ZERO);
    }

    #[test]
    fn test_adjust_node_scale() {
        let mut node = Node::new("ball").with_content_size(Size::new(64.0, 32.0));
        let scale = adjust_node_scale(&mut node, 0.2, 48.0).unwrap();

        // 0.2 m * 48 px/m / 64 px
        assert!((scale - 0.15).abs() < 0.0001);
        assert_eq!(node.scale(), scale);
        assert!((node.scaled_max_pixels() - 9.6).abs() < 0.0001);
    }

    #[test]
    fn test_adjust_node_scale_uses_larger_dimension() {
        let mut node = Node::new("tall").with_content_size(Size::new(10.0, 100.0));
        let scale = adjust_node_scale(&mut node, 1.0, 100.0).unwrap();
        assert_eq!(scale, 1.0);
    }

    #[test]
    fn test_adjust_node_scale_accepts_exactly_one_pixel() {
        let mut node = Node::new("dot").with_content_size(Size::new(1.0, 0.5));
        assert_eq!(adjust_node_scale(&mut node, 2.0, 10.0), Ok(20.0));
    }

    #[test]
    fn test_adjust_node_scale_rejects_sub_pixel_content() {
        let mut node = Node::new("empty").with_content_size(Size::new(0.5, 0.9));
        let err = adjust_node_scale(&mut node, 1.0, 32.0).unwrap_err();
        assert_eq!(err, NodeError::DegenerateContentSize { max_pixels: 0.9 });
        // Scale unchanged
        assert_eq!(node.scale(), 1.0);
    }

    #[test]
    fn test_adjust_node_scale_rejects_nan_content() {
        let mut node = Node::new("bad").with_content_size(Size::new(f32::NAN, f32::NAN));
        assert!(adjust_node_scale(&mut node, 1.0, 32.0).is_err());
    }
}
