use std::sync::Arc;

use landscape_gpu::{
    BindingSlot, DepthStencilDescriptor, IndexFormat, LIGHT_STRIDE, RenderEncoder, ShaderStage,
    Submesh,
};

use crate::pipeline::{WgpuPipeline, uniform_block_size};

/// CPU staging for one slot's uploads within a frame.
///
/// Every upload lands at an offset aligned for binding, so a single GPU
/// buffer per slot can serve every draw through dynamic offsets.
#[derive(Debug, Clone, Default)]
pub(crate) struct Arena {
    bytes: Vec<u8>,
    alignment: usize,
}

impl Arena {
    pub(crate) fn new(alignment: usize) -> Self {
        Self {
            bytes: Vec::new(),
            alignment: alignment.max(1),
        }
    }

    /// Append `data` as a block of exactly `size` bytes, truncating or
    /// zero-padding. Returns the block's offset.
    pub(crate) fn push(&mut self, data: &[u8], size: usize) -> u64 {
        let offset = self.bytes.len().next_multiple_of(self.alignment);
        self.bytes.resize(offset, 0);
        let copied = data.len().min(size);
        self.bytes.extend_from_slice(&data[..copied]);
        self.bytes.resize(offset + size, 0);
        offset as u64
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// A recorded call, replayed into a render pass at present time.
#[derive(Debug)]
pub(crate) enum Op {
    SetPipeline(Arc<wgpu::RenderPipeline>),
    /// Bind a uniform slot at a dynamic offset into its arena.
    BindUniform { slot: BindingSlot, offset: u32 },
    /// Bind a byte range of the light arena.
    BindLights { offset: u64, size: u64 },
    SetVertexBuffer {
        index: u32,
        buffer: Arc<wgpu::Buffer>,
    },
    DrawIndexed {
        buffer: Arc<wgpu::Buffer>,
        format: IndexFormat,
        offset: u64,
        count: u32,
    },
}

/// Everything recorded for one frame, independent of the acquired target.
#[derive(Debug)]
pub(crate) struct Recording {
    pub(crate) ops: Vec<Op>,
    /// Indexed by `BindingSlot::group`.
    arenas: [Arena; 4],
    depth_state: Option<DepthStencilDescriptor>,
    pipeline_depth: Option<DepthStencilDescriptor>,
}

impl Recording {
    pub(crate) fn new(uniform_alignment: usize, storage_alignment: usize) -> Self {
        let arena = |slot: BindingSlot| match uniform_block_size(slot) {
            Some(_) => Arena::new(uniform_alignment),
            None => Arena::new(storage_alignment),
        };
        let mut arenas: [Arena; 4] = Default::default();
        for slot in BindingSlot::ALL {
            arenas[slot.group() as usize] = arena(slot);
        }
        Self {
            ops: Vec::new(),
            arenas,
            depth_state: None,
            pipeline_depth: None,
        }
    }

    pub(crate) fn arena(&self, slot: BindingSlot) -> &Arena {
        &self.arenas[slot.group() as usize]
    }

    fn upload(&mut self, slot: BindingSlot, stage: ShaderStage, bytes: &[u8]) {
        if slot.stage() != stage {
            tracing::warn!("{slot:?} uploaded for the {stage:?} stage; it is bound to {:?}", slot.stage());
        }
        let arena = &mut self.arenas[slot.group() as usize];
        match uniform_block_size(slot) {
            Some(size) => {
                if bytes.len() as u64 > size {
                    tracing::warn!("{slot:?} upload of {} bytes truncated to {size}", bytes.len());
                }
                let offset = arena.push(bytes, size as usize);
                self.ops.push(Op::BindUniform {
                    slot,
                    offset: offset as u32,
                });
            }
            None => {
                // A storage binding cannot be empty; zero lights still bind one
                // zeroed record and the shader reads none of it.
                let size = bytes.len().max(LIGHT_STRIDE);
                let offset = arena.push(bytes, size);
                self.ops.push(Op::BindLights {
                    offset,
                    size: size as u64,
                });
            }
        }
    }

    fn check_depth(&self) {
        if let (Some(state), Some(baked)) = (self.depth_state, self.pipeline_depth) {
            if state != baked {
                tracing::warn!(
                    "depth state {state:?} differs from {baked:?} baked into the pipeline; the pipeline's applies"
                );
            }
        }
    }
}

/// Command recorder for one acquired surface texture.
pub struct WgpuEncoder {
    pub(crate) frame: wgpu::SurfaceTexture,
    pub(crate) recording: Recording,
}

impl RenderEncoder for WgpuEncoder {
    type Buffer = Arc<wgpu::Buffer>;
    type Pipeline = WgpuPipeline;
    type DepthStencilState = DepthStencilDescriptor;

    fn set_depth_stencil_state(&mut self, state: &DepthStencilDescriptor) {
        self.recording.depth_state = Some(*state);
        self.recording.check_depth();
    }

    fn set_pipeline(&mut self, pipeline: &WgpuPipeline) {
        self.recording.pipeline_depth = Some(*pipeline.depth_stencil());
        self.recording.check_depth();
        self.recording
            .ops
            .push(Op::SetPipeline(Arc::clone(pipeline.raw())));
    }

    fn set_vertex_bytes(&mut self, slot: BindingSlot, bytes: &[u8]) {
        self.recording.upload(slot, ShaderStage::Vertex, bytes);
    }

    fn set_fragment_bytes(&mut self, slot: BindingSlot, bytes: &[u8]) {
        self.recording.upload(slot, ShaderStage::Fragment, bytes);
    }

    fn set_vertex_buffer(&mut self, index: u32, buffer: &Arc<wgpu::Buffer>) {
        self.recording.ops.push(Op::SetVertexBuffer {
            index,
            buffer: Arc::clone(buffer),
        });
    }

    fn draw_indexed(&mut self, submesh: &Submesh<Arc<wgpu::Buffer>>) {
        self.recording.ops.push(Op::DrawIndexed {
            buffer: Arc::clone(&submesh.index_buffer),
            format: submesh.index_format,
            offset: submesh.index_offset,
            count: submesh.index_count,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_aligns_every_block() {
        let mut arena = Arena::new(256);
        assert_eq!(arena.push(&[1; 112], 112), 0);
        assert_eq!(arena.push(&[2; 112], 112), 256);
        assert_eq!(arena.bytes().len(), 256 + 112);
        assert_eq!(arena.bytes()[112], 0);
        assert_eq!(arena.bytes()[256], 2);
    }

    #[test]
    fn arena_pads_and_truncates_to_block_size() {
        let mut arena = Arena::new(4);
        arena.push(&[7; 4], 16);
        assert_eq!(arena.bytes(), &[7, 7, 7, 7, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

        let mut arena = Arena::new(4);
        arena.push(&[9; 20], 16);
        assert_eq!(arena.bytes().len(), 16);
    }

    #[test]
    fn uniform_uploads_become_dynamic_offsets() {
        let mut recording = Recording::new(256, 64);
        recording.upload(BindingSlot::ObjectTransform, ShaderStage::Vertex, &[0; 112]);
        recording.upload(BindingSlot::ObjectTransform, ShaderStage::Vertex, &[0; 112]);
        recording.upload(BindingSlot::Params, ShaderStage::Fragment, &[0; 16]);

        let offsets: Vec<(BindingSlot, u32)> = recording
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::BindUniform { slot, offset } => Some((*slot, *offset)),
                _ => None,
            })
            .collect();
        assert_eq!(
            offsets,
            vec![
                (BindingSlot::ObjectTransform, 0),
                (BindingSlot::ObjectTransform, 256),
                (BindingSlot::Params, 0),
            ]
        );
        assert_eq!(recording.arena(BindingSlot::Params).bytes().len(), 16);
    }

    #[test]
    fn empty_light_list_still_binds_one_record() {
        let mut recording = Recording::new(256, 64);
        recording.upload(BindingSlot::Lights, ShaderStage::Fragment, &[]);
        assert!(matches!(
            recording.ops[0],
            Op::BindLights {
                offset: 0,
                size
            } if size == LIGHT_STRIDE as u64
        ));

        recording.upload(BindingSlot::Lights, ShaderStage::Fragment, &[1; LIGHT_STRIDE * 3]);
        assert!(matches!(
            recording.ops[1],
            Op::BindLights { offset: 128, size } if size == 3 * LIGHT_STRIDE as u64
        ));
    }
}
