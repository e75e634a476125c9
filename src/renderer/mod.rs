//! Rendering module
//!
//! The CPU side (`scene`, `ribbon`, `shapes`) builds a `Frame` of textured
//! vertex batches from the simulation state; `pipeline` draws it with wgpu.

pub mod pipeline;
pub mod ribbon;
pub mod scene;
pub mod shapes;
pub mod texture;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{DrawBatch, Frame, RenderView, render_frame};
pub use texture::{TextureAsset, TextureCache};
pub use vertex::Vertex;
