//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    use crate::sim::BallColor;

    pub const LINE: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const BALL_RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const BALL_BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
    /// Shown until the background image has been uploaded (RGBA8)
    pub const BACKGROUND_PLACEHOLDER: [u8; 4] = [236, 240, 244, 255];

    pub fn ball(color: BallColor) -> [f32; 4] {
        match color {
            BallColor::Red => BALL_RED,
            BallColor::Blue => BALL_BLUE,
        }
    }
}
