//! WebGPU rendering module
//!
//! Shapes are tessellated on the CPU in canvas pixels; the GPU draws the
//! background image and then the triangles.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
