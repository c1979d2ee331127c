use std::num::NonZeroU64;
use std::sync::Arc;

use landscape_gpu::{
    BindingSlot, DepthStencilDescriptor, FrameUniforms, GpuError, LIGHT_STRIDE, ModelTransform,
    Params, PipelineDescriptor, ShaderStage,
};

use crate::format;
use crate::shaders;

/// A compiled render pipeline plus the depth state baked into it.
#[derive(Debug, Clone)]
pub struct WgpuPipeline {
    raw: Arc<wgpu::RenderPipeline>,
    depth_stencil: DepthStencilDescriptor,
}

impl WgpuPipeline {
    pub fn depth_stencil(&self) -> &DepthStencilDescriptor {
        &self.depth_stencil
    }

    pub(crate) fn raw(&self) -> &Arc<wgpu::RenderPipeline> {
        &self.raw
    }
}

/// Bytes a uniform slot is bound with, `None` for the light array.
pub(crate) fn uniform_block_size(slot: BindingSlot) -> Option<u64> {
    match slot {
        BindingSlot::ObjectTransform => Some(std::mem::size_of::<ModelTransform>() as u64),
        BindingSlot::FrameUniforms => Some(std::mem::size_of::<FrameUniforms>() as u64),
        BindingSlot::Params => Some(std::mem::size_of::<Params>() as u64),
        BindingSlot::Lights => None,
    }
}

fn visibility(stage: ShaderStage) -> wgpu::ShaderStages {
    match stage {
        ShaderStage::Vertex => wgpu::ShaderStages::VERTEX,
        ShaderStage::Fragment => wgpu::ShaderStages::FRAGMENT,
    }
}

fn layout_entry(slot: BindingSlot) -> wgpu::BindGroupLayoutEntry {
    let ty = match uniform_block_size(slot) {
        Some(size) => wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: true,
            min_binding_size: NonZeroU64::new(size),
        },
        None => wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only: true },
            has_dynamic_offset: false,
            min_binding_size: NonZeroU64::new(LIGHT_STRIDE as u64),
        },
    };
    wgpu::BindGroupLayoutEntry {
        binding: slot.index(),
        visibility: visibility(slot.stage()),
        ty,
        count: None,
    }
}

/// One bind group layout per binding slot, stored by group index, plus the
/// pipeline layout built from them.
#[derive(Debug)]
pub(crate) struct SlotLayouts {
    layouts: Vec<wgpu::BindGroupLayout>,
    pipeline_layout: wgpu::PipelineLayout,
}

impl SlotLayouts {
    pub(crate) fn new(device: &wgpu::Device) -> Self {
        let mut slots = BindingSlot::ALL.to_vec();
        slots.sort_by_key(|s| s.group());
        let layouts: Vec<wgpu::BindGroupLayout> = slots
            .into_iter()
            .map(|slot| {
                device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some(format!("{slot:?}_layout").as_str()),
                    entries: &[layout_entry(slot)],
                })
            })
            .collect();

        let refs: Vec<&wgpu::BindGroupLayout> = layouts.iter().collect();
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pipeline_layout"),
            bind_group_layouts: &refs,
            push_constant_ranges: &[],
        });

        Self {
            layouts,
            pipeline_layout,
        }
    }

    /// Groups are `0..4`, one per slot.
    pub(crate) fn get(&self, slot: BindingSlot) -> &wgpu::BindGroupLayout {
        &self.layouts[slot.group() as usize]
    }
}

/// Compile the scene shader and build a pipeline for `desc`.
///
/// wgpu reports validation failures through error scopes rather than return
/// values, so creation runs inside one and a captured error becomes
/// [`GpuError::PipelineBuild`].
pub(crate) fn build_pipeline(
    device: &wgpu::Device,
    layouts: &SlotLayouts,
    desc: &PipelineDescriptor,
) -> Result<WgpuPipeline, GpuError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("scene_shader"),
        source: wgpu::ShaderSource::Wgsl(shaders::SCENE_SHADER.into()),
    });
    let attributes = format::vertex_attributes(&desc.vertex_layout);

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label.as_str()),
        layout: Some(&layouts.pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some(desc.vertex_entry.as_str()),
            compilation_options: Default::default(),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: desc.vertex_layout.stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &attributes,
            }],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some(desc.fragment_entry.as_str()),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: format::texture_format(desc.color_format),
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: format::texture_format(desc.depth_format),
            depth_write_enabled: desc.depth_stencil.depth_write_enabled,
            depth_compare: format::compare_function(desc.depth_stencil.compare),
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    });

    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        return Err(GpuError::PipelineBuild(format!("{}: {err}", desc.label)));
    }

    tracing::info!("built pipeline {:?}", desc.label);
    Ok(WgpuPipeline {
        raw: Arc::new(pipeline),
        depth_stencil: desc.depth_stencil,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_slots_use_dynamic_offsets() {
        for slot in [
            BindingSlot::ObjectTransform,
            BindingSlot::FrameUniforms,
            BindingSlot::Params,
        ] {
            let entry = layout_entry(slot);
            assert_eq!(entry.binding, slot.index());
            assert!(matches!(
                entry.ty,
                wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    ..
                }
            ));
        }
    }

    #[test]
    fn lights_are_a_read_only_storage_array() {
        let entry = layout_entry(BindingSlot::Lights);
        assert_eq!(entry.visibility, wgpu::ShaderStages::FRAGMENT);
        assert!(matches!(
            entry.ty,
            wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: true },
                has_dynamic_offset: false,
                ..
            }
        ));
    }

    #[test]
    fn block_sizes() {
        assert_eq!(uniform_block_size(BindingSlot::ObjectTransform), Some(112));
        assert_eq!(uniform_block_size(BindingSlot::FrameUniforms), Some(128));
        assert_eq!(uniform_block_size(BindingSlot::Params), Some(16));
        assert_eq!(uniform_block_size(BindingSlot::Lights), None);
    }
}
