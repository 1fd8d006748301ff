//! objview core library - scene model, OBJ loading and interactive transforms
//!
//! Parsed geometry is normalized once into a canonical volume around the
//! origin and then moved, rotated and scaled by re-deriving every vertex from
//! that normalized baseline. The [`Facade`] ties the pieces together for a
//! front end.

pub mod error;
pub mod facade;
pub mod geometry;
pub mod interaction;
pub mod mesh;
pub mod normalize;
pub mod obj;
pub mod projection;
pub mod reader;
pub mod render;
pub mod transform;

// Re-export commonly used types
pub use error::{ParseError, ViewerError};
pub use facade::{Facade, FacadeState, SceneObserver};
pub use geometry::{BoundingBox, Point3};
pub use interaction::InteractionState;
pub use mesh::{Edge, Figure, FigureKind, Scene, SceneInfo, Vertex};
pub use normalize::{normalize, CenteringMode, Normalization, NormalizationParameters};
pub use projection::{Camera, ProjectionMode};
pub use reader::{FileReader, FsReader};
pub use render::{Color, EdgeStyle, RenderStyle, SceneDrawer, VertexStyle};
pub use transform::{RotationState, Transform, TransformEngine, TransformState};
