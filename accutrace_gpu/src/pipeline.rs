use itertools::Itertools;

use crate::{debug, shader::make_shader_module, GpuContext, GpuError};

#[derive(Debug)]
pub struct GraphicsPipeline {
    pub bind_group_layouts: Vec<wgpu::BindGroupLayout>,
    pub layout:             wgpu::PipelineLayout,
    pub pipeline:           wgpu::RenderPipeline,
}

#[derive(Clone, Debug)]
pub struct GraphicsPipelineCreateInfo<'a> {
    pub label:                  &'a str,
    pub shader_source:          &'a str,
    pub vertex_entry_point:     &'a str,
    pub fragment_entry_point:   &'a str,
    pub color_attachment_infos: Vec<ColorAttachmentInfo>,
    pub vertex_buffer_layouts:  Vec<wgpu::VertexBufferLayout<'a>>,
    pub rasterisation_state:    RasterisationStateInfo,
    pub bind_group_infos:       Vec<BindGroupCreateInfo>,
}

#[derive(Copy, Clone, Debug)]
pub struct RasterisationStateInfo {
    pub cull_mode:  Option<wgpu::Face>,
    pub front_face: wgpu::FrontFace,
}

/// Bindings of one group, numbered in order from zero.
#[derive(Clone, Debug)]
pub struct BindGroupCreateInfo {
    pub binding_infos: Vec<BindingCreateInfo>,
}

#[derive(Copy, Clone, Debug)]
pub struct BindingCreateInfo {
    pub binding_type: wgpu::BindingType,
    pub visibility:   wgpu::ShaderStages,
}

#[derive(Copy, Clone, Debug)]
pub struct ColorAttachmentInfo {
    pub format:           wgpu::TextureFormat,
    pub color_write_mask: wgpu::ColorWrites,
    pub blend:            Option<wgpu::BlendState>,
}

impl BindingCreateInfo {
    pub fn uniform_buffer(visibility: wgpu::ShaderStages) -> Self {
        Self {
            binding_type: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            visibility,
        }
    }

    pub fn read_only_storage_buffer(visibility: wgpu::ShaderStages) -> Self {
        Self {
            binding_type: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: true },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            visibility,
        }
    }

    /// A texture read with `textureLoad`, so no sampler and no filtering.
    pub fn unfilterable_texture(visibility: wgpu::ShaderStages) -> Self {
        Self {
            binding_type: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: false },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            visibility,
        }
    }
}

impl GraphicsPipeline {
    pub fn new(ctx: &GpuContext, create_info: GraphicsPipelineCreateInfo) -> Result<Self, GpuError> {
        let device = &ctx.device;

        let bind_group_layouts = create_info
            .bind_group_infos
            .iter()
            .enumerate()
            .map(|(group, group_info)| {
                let entries = group_info
                    .binding_infos
                    .iter()
                    .enumerate()
                    .map(|(binding, binding_info)| wgpu::BindGroupLayoutEntry {
                        binding: binding as u32,
                        visibility: binding_info.visibility,
                        ty: binding_info.binding_type,
                        count: None,
                    })
                    .collect_vec();
                device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some(&format!("{} group {}", create_info.label, group)),
                    entries: &entries,
                })
            })
            .collect_vec();

        let shader = make_shader_module(device, create_info.label, create_info.shader_source)?;

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(create_info.label),
            bind_group_layouts: &bind_group_layouts.iter().collect_vec(),
            push_constant_ranges: &[],
        });

        let targets = create_info
            .color_attachment_infos
            .iter()
            .map(|info| {
                Some(wgpu::ColorTargetState {
                    format: info.format,
                    blend: info.blend,
                    write_mask: info.color_write_mask,
                })
            })
            .collect_vec();

        let pipeline = debug::validated(device, create_info.label, || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(create_info.label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some(create_info.vertex_entry_point),
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    buffers: &create_info.vertex_buffer_layouts,
                },
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: create_info.rasterisation_state.front_face,
                    cull_mode: create_info.rasterisation_state.cull_mode,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(create_info.fragment_entry_point),
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    targets: &targets,
                }),
                multiview: None,
                cache: None,
            })
        })?;

        Ok(Self {
            bind_group_layouts,
            layout,
            pipeline,
        })
    }
}
