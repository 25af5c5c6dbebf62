use accutrace_progressive::session::TickReport;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Order of rows in a pixel buffer handed to the sink.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RowOrder {
    /// First row is the bottom of the image.
    BottomUp,
    /// First row is the top of the image.
    TopDown,
}

/// A rectangle of the output image, origin at its top-left corner.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct CaptureRegion {
    pub x:      u32,
    pub y:      u32,
    pub width:  u32,
    pub height: u32,
}

/// Accumulated linear radiance, four floats per pixel.
#[derive(Copy, Clone, Debug)]
pub struct RadianceFrame<'a> {
    pub pixels:    &'a [f32],
    pub size:      [u32; 2],
    pub row_order: RowOrder,
}

/// Clamps to [0, 1] like the display program, then applies the sRGB curve.
pub fn radiance_to_srgb8(value: f32) -> u8 {
    let linear = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    let encoded = if linear <= 0.003_130_8 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0).round() as u8
}

impl RadianceFrame<'_> {
    /// RGB bytes of `region` (or the whole frame), rows top first.
    pub fn to_rgb_image(&self, region: Option<CaptureRegion>) -> anyhow::Result<image::RgbImage> {
        let [width, height] = self.size;
        let expected = width as usize * height as usize * 4;
        anyhow::ensure!(
            self.pixels.len() == expected,
            "frame holds {} floats, expected {} for {}x{}",
            self.pixels.len(),
            expected,
            width,
            height
        );

        let region = region.unwrap_or(CaptureRegion {
            x: 0,
            y: 0,
            width,
            height,
        });
        anyhow::ensure!(
            region.width > 0
                && region.height > 0
                && region.x.saturating_add(region.width) <= width
                && region.y.saturating_add(region.height) <= height,
            "capture region {:?} does not fit a {}x{} frame",
            region,
            width,
            height
        );

        Ok(image::RgbImage::from_fn(region.width, region.height, |x, y| {
            let top_row = region.y + y;
            let source_row = match self.row_order {
                RowOrder::TopDown => top_row,
                RowOrder::BottomUp => height - 1 - top_row,
            };
            let offset = (source_row as usize * width as usize + (region.x + x) as usize) * 4;
            let texel = &self.pixels[offset..offset + 3];
            image::Rgb([
                radiance_to_srgb8(texel[0]),
                radiance_to_srgb8(texel[1]),
                radiance_to_srgb8(texel[2]),
            ])
        }))
    }

    pub fn save_png<P: AsRef<Path>>(&self, region: Option<CaptureRegion>, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).with_context(|| format!("Cannot create {}", dir.display()))?;
        }
        self.to_rgb_image(region)?
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("Cannot write {}", path.display()))?;
        log::info!("Saved {}", path.display());
        Ok(())
    }
}

/// Saves a frame each time a still camera's sample count reaches a checkpoint
/// while active.
#[derive(Clone, Debug)]
pub struct CaptureSequence {
    active:      bool,
    checkpoints: Vec<u32>,
    dir:         PathBuf,
    run:         u32,
}

impl CaptureSequence {
    pub fn new(mut checkpoints: Vec<u32>, dir: PathBuf) -> Self {
        checkpoints.sort_unstable();
        checkpoints.dedup();
        Self {
            active: false,
            checkpoints,
            dir,
            run: 0,
        }
    }

    pub fn toggle(&mut self) -> bool {
        self.active = !self.active;
        if self.active {
            self.run += 1;
        }
        log::info!(
            "Capture sequence {} {}",
            self.run,
            if self.active { "started" } else { "stopped" }
        );
        self.active
    }

    /// The checkpoint the tick just reached, if it should be saved. Moving
    /// ticks restart at one sample every time and never count.
    pub fn due_checkpoint(&self, report: &TickReport) -> Option<u32> {
        let samples = report.frame.wrapping_add(1);
        (self.active && !report.moved && self.checkpoints.binary_search(&samples).is_ok()).then_some(samples)
    }

    pub fn path_for(&self, samples: u32) -> PathBuf {
        self.dir.join(format!("capture_{:03}_{:06}.png", self.run, samples))
    }

    pub fn screenshot_path(&self, samples: u32) -> PathBuf {
        let stamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        self.dir.join(format!("screenshot_{}_{:06}.png", stamp, samples))
    }
}
