use crate::{
    input::Action,
    screenshot::{CaptureRegion, CaptureSequence, RadianceFrame, RowOrder},
    settings::Settings,
};
use accutrace_gpu::{
    contexts::{GpuContext, PipelineContext, RenderContext},
    debug::install_error_logger,
};
use accutrace_progressive::{
    session::{FrameClock, RenderSession},
    ProgressiveRayTracer,
};
use accutrace_scene::{
    camera::Camera,
    example_scenes::{self, SCENE_NAMES},
    MovementInput, Scene,
};
use anyhow::Context;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use winit::{dpi::PhysicalSize, window::Window};

pub mod input;
pub mod screenshot;
pub mod settings;

pub struct App {
    window:         Arc<Window>,
    surface:        wgpu::Surface<'static>,
    config:         wgpu::SurfaceConfiguration,
    gpu:            GpuContext,
    tracer:         ProgressiveRayTracer,
    session:        RenderSession,
    clock:          FrameClock,
    capture:        CaptureSequence,
    capture_region: Option<CaptureRegion>,
    assets_dir:     PathBuf,
    scene_index:    usize,
}

impl App {
    pub fn new(window: Arc<Window>, settings: &Settings, camera: Camera, scene: Scene) -> anyhow::Result<Self> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window.clone())
            .context("Cannot create window surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference:       wgpu::PowerPreference::HighPerformance,
            compatible_surface:     Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("Cannot find a GPU adapter for this surface")?;
        let adapter_info = adapter.get_info();
        log::info!("Using {} ({:?})", adapter_info.name, adapter_info.backend);

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("accutrace device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            ..Default::default()
        }))
        .context("Cannot create GPU device")?;
        install_error_logger(&device);

        let capabilities = surface.get_capabilities(&adapter);
        let format = capabilities
            .formats
            .iter()
            .copied()
            .find(|format| format.is_srgb())
            .or_else(|| capabilities.formats.first().copied())
            .context("Surface reports no usable formats")?;
        let present_mode = if !settings.vsync && capabilities.present_modes.contains(&wgpu::PresentMode::Mailbox) {
            wgpu::PresentMode::Mailbox
        } else {
            wgpu::PresentMode::Fifo
        };
        let size = window.inner_size();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            desired_maximum_frame_latency: 2,
            alpha_mode: capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
        };
        surface.configure(&device, &config);
        log::info!("Surface {:?} {:?} at {}x{}", format, present_mode, config.width, config.height);

        let gpu = GpuContext::new(device, queue);
        let extent = [config.width, config.height];
        let tracer = ProgressiveRayTracer::new(&gpu, PipelineContext { surface_format: format }, extent, &scene)
            .context("Cannot build the render pipelines")?;
        let session = RenderSession::new(
            camera,
            settings.camera.into(),
            settings.sampling.into(),
            extent,
            tracer.counts(),
        );

        Ok(Self {
            window,
            surface,
            config,
            gpu,
            tracer,
            session,
            clock: FrameClock::default(),
            capture: CaptureSequence::new(settings.capture.checkpoints.clone(), settings.capture.dir.clone()),
            capture_region: settings.capture.region,
            assets_dir: settings.assets_dir.clone(),
            scene_index: SCENE_NAMES.iter().position(|name| *name == settings.scene).unwrap_or(0),
        })
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.gpu.device, &self.config);
        self.tracer.resize(&self.gpu, [size.width, size.height]);
        self.session.resize([size.width, size.height]);
    }

    /// Runs one tick and presents it, then handles the one-shot actions
    /// against the frame just rendered. Returns `false` without ticking or
    /// touching `actions` when no surface texture is available.
    pub fn render(&mut self, movement: &MovementInput, actions: &[Action]) -> anyhow::Result<bool> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.gpu.device, &self.config);
                return Ok(false);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out waiting for the next surface texture");
                return Ok(false);
            }
            Err(error) => return Err(error).context("Cannot acquire the next surface texture"),
        };
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let dt = self.clock.tick();

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("Frame") });
        let report = {
            let mut recorder = self.tracer.recorder(
                &self.gpu,
                RenderContext {
                    encoder: &mut encoder,
                    target:  &view,
                },
            );
            self.session.tick(movement, dt, &mut recorder)
        };
        self.gpu.queue.submit(Some(encoder.finish()));
        self.window.pre_present_notify();
        frame.present();

        let samples = report.frame.wrapping_add(1);
        for action in actions {
            match action {
                Action::Screenshot => {
                    let path = self.capture.screenshot_path(samples);
                    self.save_frame(report.indices.write, &path);
                }
                Action::ToggleCapture => {
                    self.capture.toggle();
                }
                Action::DumpCamera => log::info!("Camera: {}", self.session.camera()),
                Action::NextScene => self.next_scene(),
                _ => {}
            }
        }
        if let Some(checkpoint) = self.capture.due_checkpoint(&report) {
            let path = self.capture.path_for(checkpoint);
            self.save_frame(report.indices.write, &path);
        }
        Ok(true)
    }

    /// Swaps in another scene. Accumulation restarts from the new camera.
    pub fn load_scene(&mut self, camera: Camera, scene: &Scene) {
        let counts = self.tracer.replace_scene(&self.gpu, scene);
        self.session.set_scene_counts(counts);
        self.session.set_camera(camera);
    }

    fn next_scene(&mut self) {
        let index = (self.scene_index + 1) % SCENE_NAMES.len();
        let name = SCENE_NAMES[index];
        match example_scenes::by_name(name, &self.assets_dir) {
            Ok((camera, scene)) => {
                self.load_scene(camera, &scene);
                self.scene_index = index;
                log::info!("Switched to scene '{}'", name);
            }
            Err(error) => log::error!("Cannot load scene '{}': {}", name, error),
        }
    }

    fn save_frame(&self, index: usize, path: &Path) {
        let saved = self.tracer.read_radiance(&self.gpu, index).map_err(anyhow::Error::from).and_then(|pixels| {
            RadianceFrame {
                pixels:    &pixels,
                size:      self.tracer.size(),
                row_order: RowOrder::TopDown,
            }
            .save_png(self.capture_region, path)
        });
        if let Err(error) = saved {
            log::error!("Cannot save {}: {:#}", path.display(), error);
        }
    }
}
