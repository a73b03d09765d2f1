/// prim3d Core Library - procedural solids and scene math
///
/// This library provides the stateless core of the demo: procedural
/// geometry for the primitive solids, camera and model transforms, the
/// lighting model and the per-frame draw parameters shared by the
/// terminal and web front-ends.

pub mod geometry;
pub mod lighting;
pub mod projection;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use geometry::{ConeOptions, Geometry};
pub use lighting::Lighting;
pub use projection::Camera;
pub use scene::{draw_parameters, DrawParameters, MeshInstance, Scene, SceneConfig, ShapeSelection};
pub use transform::{RotationState, Transform};
