use std::cell::Cell;
use std::rc::Rc;

use anyhow::{Result, bail};
use cgmath::Matrix4;

use crate::rendering::{MatrixUniform, RenderBackend};
use crate::world::mesh::Vertex;

#[derive(Clone, Debug, PartialEq)]
pub enum RecordedCall {
    UseProgram,
    SetMatrix(MatrixUniform, Matrix4<f32>),
    Upload { buffer_id: usize, vertex_count: usize },
    Draw { buffer_id: usize, vertex_count: u32 },
}

#[derive(Debug)]
pub struct RecordedBuffer {
    pub id: usize,
    pub contents: Vec<Vertex>,
    live: Rc<Cell<usize>>,
}

impl Drop for RecordedBuffer {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

/// Backend that keeps every call for inspection instead of talking to a GPU.
#[derive(Default)]
pub struct RecordingBackend {
    pub calls: Vec<RecordedCall>,
    /// Number of buffers that can still be created, unlimited if `None`
    pub allocation_budget: Option<usize>,
    pub fail_upload: bool,
    next_id: usize,
    live_buffers: Rc<Cell<usize>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_buffers(&self) -> usize {
        self.live_buffers.get()
    }

    /// Shared handle to the live buffer count, readable after the backend is gone
    pub fn live_buffer_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.live_buffers)
    }

    pub fn draws(&self) -> Vec<(usize, u32)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RecordedCall::Draw { buffer_id, vertex_count } => Some((*buffer_id, *vertex_count)),
                _ => None,
            })
            .collect()
    }

    pub fn model_matrices(&self) -> Vec<Matrix4<f32>> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RecordedCall::SetMatrix(MatrixUniform::Model, matrix) => Some(*matrix),
                _ => None,
            })
            .collect()
    }
}

impl RenderBackend for RecordingBackend {
    type VertexBuffer = RecordedBuffer;

    fn create_vertex_buffer(&mut self) -> Result<RecordedBuffer> {
        match &mut self.allocation_budget {
            Some(0) => bail!("Out of vertex buffers"),
            Some(remaining) => *remaining -= 1,
            None => {}
        }

        let id = self.next_id;
        self.next_id += 1;
        self.live_buffers.set(self.live_buffers.get() + 1);

        Ok(RecordedBuffer {
            id,
            contents: Vec::new(),
            live: Rc::clone(&self.live_buffers),
        })
    }

    fn upload_vertices(&mut self, buffer: &mut RecordedBuffer, vertices: &[Vertex]) -> Result<()> {
        if self.fail_upload {
            bail!("Out of memory while uploading {} vertices", vertices.len());
        }

        buffer.contents = vertices.to_vec();
        self.calls.push(RecordedCall::Upload {
            buffer_id: buffer.id,
            vertex_count: vertices.len(),
        });

        Ok(())
    }

    fn use_program(&mut self) {
        self.calls.push(RecordedCall::UseProgram);
    }

    fn set_matrix(&mut self, uniform: MatrixUniform, matrix: Matrix4<f32>) {
        self.calls.push(RecordedCall::SetMatrix(uniform, matrix));
    }

    fn draw_triangles(&mut self, buffer: &RecordedBuffer, vertex_count: u32) {
        self.calls.push(RecordedCall::Draw {
            buffer_id: buffer.id,
            vertex_count,
        });
    }
}
