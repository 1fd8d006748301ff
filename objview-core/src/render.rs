//! Rendering capability and styling consumed by scene drawers
use crate::mesh::Scene;
use crate::projection::ProjectionMode;
use serde::{Deserialize, Serialize};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VertexStyle {
    Square,
    #[default]
    Circle,
    Invisible,
}

impl VertexStyle {
    /// Next style in display order, wrapping around
    pub fn next(self) -> Self {
        match self {
            VertexStyle::Square => VertexStyle::Circle,
            VertexStyle::Circle => VertexStyle::Invisible,
            VertexStyle::Invisible => VertexStyle::Square,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeStyle {
    #[default]
    Solid,
    Dotted,
}

impl EdgeStyle {
    pub fn toggled(self) -> Self {
        match self {
            EdgeStyle::Solid => EdgeStyle::Dotted,
            EdgeStyle::Dotted => EdgeStyle::Solid,
        }
    }
}

/// How a scene should look
///
/// Missing fields fall back to their defaults when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    pub background: Color,
    pub edge_color: Color,
    pub vertex_color: Color,
    pub edge_width: f64,
    pub vertex_size: f64,
    pub vertex_style: VertexStyle,
    pub edge_style: EdgeStyle,
    pub projection: ProjectionMode,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
            edge_color: Color::WHITE,
            vertex_color: Color::RED,
            edge_width: 1.0,
            vertex_size: 1.0,
            vertex_style: VertexStyle::default(),
            edge_style: EdgeStyle::default(),
            projection: ProjectionMode::default(),
        }
    }
}

/// Anything that can draw a scene
pub trait SceneDrawer {
    fn draw_scene(&mut self, scene: &Scene, style: &RenderStyle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_style_cycle() {
        let style = VertexStyle::default();
        assert_eq!(style, VertexStyle::Circle);
        assert_eq!(style.next().next().next(), style);
    }

    #[test]
    fn test_default_style() {
        let style = RenderStyle::default();
        assert_eq!(style.edge_color, Color::WHITE);
        assert_eq!(style.vertex_color, Color::RED);
        assert_eq!(style.edge_style.toggled(), EdgeStyle::Dotted);
    }
}
