use crate::{
    accumulation::{AccumulationTargets, BufferIndices, ACCUMULATION_FORMAT},
    camera::TraceUniforms,
    render_surface::{RenderSurface, Vertex},
    shaders::{DISPLAY_SHADER, FRAGMENT_ENTRY_POINT, TRACE_SHADER, VERTEX_ENTRY_POINT},
};
use accutrace_gpu::{
    contexts::{GpuContext, PipelineContext},
    pipeline::{
        BindGroupCreateInfo, BindingCreateInfo, ColorAttachmentInfo, GraphicsPipeline,
        GraphicsPipelineCreateInfo, RasterisationStateInfo,
    },
    AllocatedBuffer, GpuError,
};

const QUAD_RASTERISATION: RasterisationStateInfo = RasterisationStateInfo {
    cull_mode:  None,
    front_face: wgpu::FrontFace::Cw,
};

/// Path-traces one frame into the write target while sampling the read
/// target. Group 0 holds the uniforms and the previous frame, group 1 the
/// scene blocks.
#[derive(Debug)]
pub struct TracePass {
    pipeline:          GraphicsPipeline,
    /// One per read index.
    frame_bind_groups: [wgpu::BindGroup; 2],
}

impl TracePass {
    pub fn new(
        ctx: &GpuContext,
        uniform_buffer: &AllocatedBuffer<TraceUniforms>,
        targets: &AccumulationTargets,
    ) -> Result<Self, GpuError> {
        let fragment = wgpu::ShaderStages::FRAGMENT;
        let pipeline = GraphicsPipeline::new(ctx, GraphicsPipelineCreateInfo {
            label:                  "Trace",
            shader_source:          TRACE_SHADER,
            vertex_entry_point:     VERTEX_ENTRY_POINT,
            fragment_entry_point:   FRAGMENT_ENTRY_POINT,
            color_attachment_infos: vec![ColorAttachmentInfo {
                format:           ACCUMULATION_FORMAT,
                color_write_mask: wgpu::ColorWrites::ALL,
                blend:            None,
            }],
            vertex_buffer_layouts:  vec![Vertex::buffer_layout()],
            rasterisation_state:    QUAD_RASTERISATION,
            bind_group_infos:       vec![
                BindGroupCreateInfo {
                    binding_infos: vec![
                        BindingCreateInfo::uniform_buffer(fragment),
                        BindingCreateInfo::unfilterable_texture(fragment),
                    ],
                },
                BindGroupCreateInfo {
                    binding_infos: vec![
                        BindingCreateInfo::read_only_storage_buffer(fragment),
                        BindingCreateInfo::read_only_storage_buffer(fragment),
                        BindingCreateInfo::read_only_storage_buffer(fragment),
                    ],
                },
            ],
        })?;
        let frame_bind_groups = Self::make_frame_bind_groups(ctx, &pipeline, uniform_buffer, targets);

        Ok(Self {
            pipeline,
            frame_bind_groups,
        })
    }

    pub fn scene_layout(&self) -> &wgpu::BindGroupLayout {
        &self.pipeline.bind_group_layouts[1]
    }

    /// Rebinds the previous-frame textures after the targets were recreated.
    pub fn rebind_targets(
        &mut self,
        ctx: &GpuContext,
        uniform_buffer: &AllocatedBuffer<TraceUniforms>,
        targets: &AccumulationTargets,
    ) {
        self.frame_bind_groups = Self::make_frame_bind_groups(ctx, &self.pipeline, uniform_buffer, targets);
    }

    pub fn record(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        targets: &AccumulationTargets,
        indices: BufferIndices,
        scene_bind_group: &wgpu::BindGroup,
        surface: &RenderSurface,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label:                    Some("Trace pass"),
            color_attachments:        &[Some(wgpu::RenderPassColorAttachment {
                view:           &targets.write(indices).view,
                depth_slice:    None,
                resolve_target: None,
                ops:            wgpu::Operations {
                    load:  wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes:         None,
            occlusion_query_set:      None,
        });
        pass.set_pipeline(&self.pipeline.pipeline);
        pass.set_bind_group(0, &self.frame_bind_groups[indices.read], &[]);
        pass.set_bind_group(1, scene_bind_group, &[]);
        surface.draw(&mut pass);
    }

    fn make_frame_bind_groups(
        ctx: &GpuContext,
        pipeline: &GraphicsPipeline,
        uniform_buffer: &AllocatedBuffer<TraceUniforms>,
        targets: &AccumulationTargets,
    ) -> [wgpu::BindGroup; 2] {
        [0, 1].map(|read| {
            ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label:   Some(&format!("Trace frame reading {}", read)),
                layout:  &pipeline.bind_group_layouts[0],
                entries: &[
                    wgpu::BindGroupEntry {
                        binding:  0,
                        resource: uniform_buffer.buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding:  1,
                        resource: wgpu::BindingResource::TextureView(&targets.image(read).view),
                    },
                ],
            })
        })
    }
}

/// Draws the freshly written accumulation target to the presentation surface.
#[derive(Debug)]
pub struct PresentPass {
    pipeline:    GraphicsPipeline,
    /// One per write index.
    bind_groups: [wgpu::BindGroup; 2],
}

impl PresentPass {
    pub fn new(
        ctx: &GpuContext,
        pipeline_ctx: PipelineContext,
        targets: &AccumulationTargets,
    ) -> Result<Self, GpuError> {
        let pipeline = GraphicsPipeline::new(ctx, GraphicsPipelineCreateInfo {
            label:                  "Present",
            shader_source:          DISPLAY_SHADER,
            vertex_entry_point:     VERTEX_ENTRY_POINT,
            fragment_entry_point:   FRAGMENT_ENTRY_POINT,
            color_attachment_infos: vec![ColorAttachmentInfo {
                format:           pipeline_ctx.surface_format,
                color_write_mask: wgpu::ColorWrites::ALL,
                blend:            None,
            }],
            vertex_buffer_layouts:  vec![Vertex::buffer_layout()],
            rasterisation_state:    QUAD_RASTERISATION,
            bind_group_infos:       vec![BindGroupCreateInfo {
                binding_infos: vec![BindingCreateInfo::unfilterable_texture(wgpu::ShaderStages::FRAGMENT)],
            }],
        })?;
        let bind_groups = Self::make_bind_groups(ctx, &pipeline, targets);

        Ok(Self { pipeline, bind_groups })
    }

    pub fn rebind_targets(&mut self, ctx: &GpuContext, targets: &AccumulationTargets) {
        self.bind_groups = Self::make_bind_groups(ctx, &self.pipeline, targets);
    }

    pub fn record(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        indices: BufferIndices,
        surface: &RenderSurface,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label:                    Some("Present pass"),
            color_attachments:        &[Some(wgpu::RenderPassColorAttachment {
                view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load:  wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes:         None,
            occlusion_query_set:      None,
        });
        pass.set_pipeline(&self.pipeline.pipeline);
        pass.set_bind_group(0, &self.bind_groups[indices.write], &[]);
        surface.draw(&mut pass);
    }

    fn make_bind_groups(
        ctx: &GpuContext,
        pipeline: &GraphicsPipeline,
        targets: &AccumulationTargets,
    ) -> [wgpu::BindGroup; 2] {
        [0, 1].map(|write| {
            ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label:   Some(&format!("Present frame {}", write)),
                layout:  &pipeline.bind_group_layouts[0],
                entries: &[wgpu::BindGroupEntry {
                    binding:  0,
                    resource: wgpu::BindingResource::TextureView(&targets.image(write).view),
                }],
            })
        })
    }
}
