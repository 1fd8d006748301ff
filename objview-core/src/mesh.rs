//! Mesh entities: vertices, edges, figures and the scene that owns them
use crate::error::ParseError;
use crate::geometry::{BoundingBox, Point3};

/// A scene vertex
///
/// A vertex is identified by its index in the owning scene's vertex table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Vertex {
    position: Point3,
}

impl Vertex {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Point3::new(x, y, z),
        }
    }

    pub fn position(&self) -> Point3 {
        self.position
    }

    pub fn set_position(&mut self, position: Point3) {
        self.position = position;
    }
}

impl From<Point3> for Vertex {
    fn from(position: Point3) -> Self {
        Self { position }
    }
}

/// A segment between two vertices of the same scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
}

impl Edge {
    pub fn new(a: usize, b: usize) -> Self {
        Self { a, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureKind {
    /// Closed loop, from a face record
    Polygon,
    /// Open chain, from a line record
    Polyline,
}

/// One polygon or polyline, referencing vertices of the scene by index
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub kind: FigureKind,
    pub group: Option<String>,
    pub indices: Vec<usize>,
}

impl Figure {
    pub fn polygon(indices: Vec<usize>) -> Self {
        Self {
            kind: FigureKind::Polygon,
            group: None,
            indices,
        }
    }

    pub fn polyline(indices: Vec<usize>) -> Self {
        Self {
            kind: FigureKind::Polyline,
            group: None,
            indices,
        }
    }

    pub fn with_group(mut self, group: Option<String>) -> Self {
        self.group = group;
        self
    }

    /// Edges between consecutive vertices, closing the loop for polygons
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        let closing = match self.kind {
            FigureKind::Polygon if self.indices.len() > 2 => {
                Some(Edge::new(self.indices[self.indices.len() - 1], self.indices[0]))
            }
            _ => None,
        };
        self.indices
            .windows(2)
            .map(|w| Edge::new(w[0], w[1]))
            .chain(closing)
    }

    pub fn edge_count(&self) -> usize {
        match self.kind {
            FigureKind::Polygon if self.indices.len() > 2 => self.indices.len(),
            _ => self.indices.len().saturating_sub(1),
        }
    }
}

/// Read-only summary of a loaded scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneInfo {
    pub vertex_count: usize,
    pub figure_count: usize,
    pub edge_count: usize,
    pub bounds: Option<BoundingBox>,
}

/// The vertex table and the figures built on it
///
/// Every index held by a figure is within bounds of the vertex table.
#[derive(Debug, Default, PartialEq)]
pub struct Scene {
    vertices: Vec<Vertex>,
    figures: Vec<Figure>,
}

impl Clone for Scene {
    fn clone(&self) -> Self {
        Self {
            vertices: self.vertices.clone(),
            figures: self.figures.clone(),
        }
    }

    /// Reuses the existing vertex and figure buffers
    fn clone_from(&mut self, source: &Self) {
        self.vertices.clone_from(&source.vertices);
        self.figures.clone_from(&source.figures);
    }
}

impl Scene {
    /// Build a scene, rejecting figures that reference missing vertices
    ///
    /// Scenes not produced from text report line 0 in the error.
    pub fn new(vertices: Vec<Vertex>, figures: Vec<Figure>) -> Result<Self, ParseError> {
        let len = vertices.len();
        if let Some(index) = figures
            .iter()
            .flat_map(|f| f.indices.iter())
            .find(|&&i| i >= len)
        {
            return Err(ParseError::InvalidReference {
                line: 0,
                index: *index as i64,
            });
        }
        Ok(Self { vertices, figures })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Mutable access to positions; the table itself cannot grow or shrink
    pub fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }

    pub fn figures(&self) -> &[Figure] {
        &self.figures
    }

    pub fn positions(&self) -> impl Iterator<Item = Point3> + '_ {
        self.vertices.iter().map(Vertex::position)
    }

    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.figures.iter().flat_map(|f| f.edges())
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.positions())
    }

    pub fn info(&self) -> SceneInfo {
        SceneInfo {
            vertex_count: self.vertices.len(),
            figure_count: self.figures.len(),
            edge_count: self.figures.iter().map(Figure::edge_count).sum(),
            bounds: self.bounding_box(),
        }
    }

    /// A cube centered on the origin, sharing its 8 corners between 6 faces
    pub fn cube(size: f64) -> Self {
        let half = size / 2.0;
        let vertices = vec![
            Vertex::new(-half, -half, -half),
            Vertex::new(half, -half, -half),
            Vertex::new(half, half, -half),
            Vertex::new(-half, half, -half),
            Vertex::new(-half, -half, half),
            Vertex::new(half, -half, half),
            Vertex::new(half, half, half),
            Vertex::new(-half, half, half),
        ];
        let figures = [
            [4, 5, 6, 7], // front
            [0, 3, 2, 1], // back
            [3, 7, 6, 2], // top
            [0, 1, 5, 4], // bottom
            [1, 2, 6, 5], // right
            [0, 4, 7, 3], // left
        ]
        .into_iter()
        .map(|face| Figure::polygon(face.to_vec()).with_group(Some("cube".to_string())))
        .collect();

        Self { vertices, figures }
    }
}
