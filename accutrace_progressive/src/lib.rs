use crate::{
    accumulation::{AccumulationTargets, BufferIndices},
    camera::TraceUniforms,
    passes::{PresentPass, TracePass},
    render_surface::RenderSurface,
    scene::{SceneBuffers, SceneRecords},
    session::FramePipeline,
};
use accutrace_gpu::{
    contexts::{GpuContext, PipelineContext, RenderContext},
    AllocatedBuffer, GpuError,
};
use accutrace_scene::{Scene, SceneCounts};

pub mod accumulation;
pub mod camera;
pub mod passes;
pub mod render_surface;
pub mod scene;
pub mod session;
pub mod shaders;

#[derive(Debug)]
pub struct ProgressiveRayTracer {
    uniform_buffer:   AllocatedBuffer<TraceUniforms>,
    scene_buffers:    SceneBuffers,
    scene_bind_group: wgpu::BindGroup,
    targets:          AccumulationTargets,
    surface:          RenderSurface,
    trace_pass:       TracePass,
    present_pass:     PresentPass,
}

impl ProgressiveRayTracer {
    pub fn new(
        ctx: &GpuContext,
        pipeline_ctx: PipelineContext,
        size: [u32; 2],
        scene: &Scene,
    ) -> Result<Self, GpuError> {
        let uniform_buffer = TraceUniforms::default().create_buffer(ctx);
        let targets = AccumulationTargets::new(ctx, size);
        let surface = RenderSurface::new(ctx);
        let trace_pass = TracePass::new(ctx, &uniform_buffer, &targets)?;
        let present_pass = PresentPass::new(ctx, pipeline_ctx, &targets)?;

        let scene_buffers = SceneBuffers::create_buffers(ctx, &SceneRecords::from_scene(scene));
        let scene_bind_group = scene_buffers.bind_group(ctx, trace_pass.scene_layout());

        log::info!(
            "Tracer ready at {}x{} with {:?}",
            targets.size()[0],
            targets.size()[1],
            scene_buffers.counts
        );

        Ok(Self {
            uniform_buffer,
            scene_buffers,
            scene_bind_group,
            targets,
            surface,
            trace_pass,
            present_pass,
        })
    }

    /// Uploads a new scene. The new buffers and bind group are complete
    /// before the old ones are dropped, so no frame sees a partial scene.
    pub fn replace_scene(&mut self, ctx: &GpuContext, scene: &Scene) -> SceneCounts {
        let scene_buffers = SceneBuffers::create_buffers(ctx, &SceneRecords::from_scene(scene));
        let scene_bind_group = scene_buffers.bind_group(ctx, self.trace_pass.scene_layout());
        self.scene_buffers = scene_buffers;
        self.scene_bind_group = scene_bind_group;
        log::info!("Scene replaced: {:?}", self.scene_buffers.counts);
        self.scene_buffers.counts
    }

    /// Recreates both accumulation targets. Their previous contents are lost.
    pub fn resize(&mut self, ctx: &GpuContext, size: [u32; 2]) {
        self.targets = AccumulationTargets::new(ctx, size);
        self.trace_pass.rebind_targets(ctx, &self.uniform_buffer, &self.targets);
        self.present_pass.rebind_targets(ctx, &self.targets);
        log::debug!("Accumulation targets resized to {}x{}", size[0], size[1]);
    }

    pub fn size(&self) -> [u32; 2] {
        self.targets.size()
    }

    pub fn counts(&self) -> SceneCounts {
        self.scene_buffers.counts
    }

    /// A pipeline that records one tick's passes into `render_ctx`.
    pub fn recorder<'a>(&'a self, ctx: &'a GpuContext, render_ctx: RenderContext<'a>) -> FrameRecorder<'a> {
        FrameRecorder {
            tracer: self,
            ctx,
            render_ctx,
        }
    }

    /// Reads one accumulation target back as linear RGBA radiance, rows top first.
    pub fn read_radiance(&self, ctx: &GpuContext, index: usize) -> Result<Vec<f32>, GpuError> {
        let bytes = self.targets.image(index).copy_to_host(ctx)?;
        Ok(bytes
            .chunks_exact(4)
            .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
            .collect())
    }
}

pub struct FrameRecorder<'a> {
    tracer:     &'a ProgressiveRayTracer,
    ctx:        &'a GpuContext,
    render_ctx: RenderContext<'a>,
}

impl FramePipeline for FrameRecorder<'_> {
    fn trace(&mut self, indices: BufferIndices, uniforms: &TraceUniforms) {
        let tracer = self.tracer;
        if let Err(error) = tracer.uniform_buffer.set_data(self.ctx, &[*uniforms]) {
            log::error!("{}", error);
        }
        tracer.trace_pass.record(
            self.render_ctx.encoder,
            &tracer.targets,
            indices,
            &tracer.scene_bind_group,
            &tracer.surface,
        );
    }

    fn present(&mut self, indices: BufferIndices) {
        let tracer = self.tracer;
        tracer
            .present_pass
            .record(self.render_ctx.encoder, self.render_ctx.target, indices, &tracer.surface);
    }
}
