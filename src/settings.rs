use crate::screenshot::CaptureRegion;
use accutrace_progressive::camera::SamplingSettings;
use accutrace_scene::{
    camera::{MOVE_SPEED, ROTATE_SPEED},
    CameraController, StillnessPolicy,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub width:      u32,
    pub height:     u32,
    pub scene:      String,
    pub assets_dir: PathBuf,
    pub vsync:      bool,
    pub sampling:   SamplingConfig,
    pub camera:     CameraConfig,
    pub capture:    CaptureConfig,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub max_bounces:              i32,
    pub max_bounces_reflection:   i32,
    pub max_bounces_transmission: i32,
    pub samples_per_pixel:        i32,
}

#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraConfig {
    pub move_speed:   f32,
    /// Degrees per second.
    pub rotate_speed: f32,
    pub stillness:    StillnessPolicy,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub dir:         PathBuf,
    /// Sample counts at which a running capture sequence saves a frame.
    pub checkpoints: Vec<u32>,
    pub region:      Option<CaptureRegion>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width:      1280,
            height:     720,
            scene:      "model".to_owned(),
            assets_dir: PathBuf::from("assets"),
            vsync:      false,
            sampling:   SamplingConfig::default(),
            camera:     CameraConfig::default(),
            capture:    CaptureConfig::default(),
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        let sampling = SamplingSettings::default();
        Self {
            max_bounces:              sampling.max_bounces,
            max_bounces_reflection:   sampling.max_bounces_reflection,
            max_bounces_transmission: sampling.max_bounces_transmission,
            samples_per_pixel:        sampling.samples_per_pixel,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            move_speed:   MOVE_SPEED,
            rotate_speed: ROTATE_SPEED,
            stillness:    StillnessPolicy::default(),
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            dir:         PathBuf::from("captures"),
            checkpoints: vec![1, 16, 64, 256, 1024],
            region:      None,
        }
    }
}

impl From<SamplingConfig> for SamplingSettings {
    fn from(config: SamplingConfig) -> Self {
        Self {
            max_bounces:              config.max_bounces,
            max_bounces_reflection:   config.max_bounces_reflection,
            max_bounces_transmission: config.max_bounces_transmission,
            samples_per_pixel:        config.samples_per_pixel,
        }
    }
}

impl From<CameraConfig> for CameraController {
    fn from(config: CameraConfig) -> Self {
        Self {
            move_speed:   config.move_speed,
            rotate_speed: config.rotate_speed,
            stillness:    config.stillness,
        }
    }
}

/// Command line overrides. Anything left unset keeps the settings file value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CliArgs {
    pub help:    bool,
    pub config:  Option<PathBuf>,
    pub scene:   Option<String>,
    pub width:   Option<u32>,
    pub height:  Option<u32>,
    pub spp:     Option<i32>,
    pub bounces: Option<i32>,
    pub assets:  Option<PathBuf>,
}

pub const HELP: &str = "\
accutrace

USAGE:
  accutrace [OPTIONS]

OPTIONS:
  --scene <NAME>       model, spheres or box
  --config <FILE>      JSON settings file
  --width <PIXELS>     window width
  --height <PIXELS>    window height
  --spp <N>            samples per pixel per frame
  --bounces <N>        diffuse bounce limit
  --assets <DIR>       directory holding mesh files
  -h, --help           print this message
";

impl CliArgs {
    pub fn parse(mut args: pico_args::Arguments) -> anyhow::Result<Self> {
        let parsed = Self {
            help:    args.contains(["-h", "--help"]),
            config:  args.opt_value_from_str("--config")?,
            scene:   args.opt_value_from_str("--scene")?,
            width:   args.opt_value_from_str("--width")?,
            height:  args.opt_value_from_str("--height")?,
            spp:     args.opt_value_from_str("--spp")?,
            bounces: args.opt_value_from_str("--bounces")?,
            assets:  args.opt_value_from_str("--assets")?,
        };
        let remaining = args.finish();
        if !remaining.is_empty() {
            anyhow::bail!("unexpected arguments: {:?}", remaining);
        }
        Ok(parsed)
    }
}

impl Settings {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read settings file {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("Cannot parse settings file {}", path.display()))
    }

    /// Settings file named by `--config` (or defaults), then flag overrides.
    pub fn from_args(args: &CliArgs) -> anyhow::Result<Self> {
        let mut settings = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        settings.apply_args(args);
        Ok(settings)
    }

    pub fn apply_args(&mut self, args: &CliArgs) {
        if let Some(scene) = &args.scene {
            self.scene = scene.clone();
        }
        if let Some(width) = args.width {
            self.width = width;
        }
        if let Some(height) = args.height {
            self.height = height;
        }
        if let Some(spp) = args.spp {
            self.sampling.samples_per_pixel = spp;
        }
        if let Some(bounces) = args.bounces {
            self.sampling.max_bounces = bounces;
        }
        if let Some(assets) = &args.assets {
            self.assets_dir = assets.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    fn args(list: &[&str]) -> pico_args::Arguments {
        pico_args::Arguments::from_vec(list.iter().map(OsString::from).collect())
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let settings: Settings = serde_json::from_str(
            r#"{
                "width": 640,
                "sampling": { "samples_per_pixel": 8 },
                "camera": { "stillness": "any_key_held" },
                "capture": { "checkpoints": [10, 100], "region": { "x": 0, "y": 0, "width": 32, "height": 16 } }
            }"#,
        )
        .unwrap();
        assert_eq!(settings.width, 640);
        assert_eq!(settings.height, 720);
        assert_eq!(settings.scene, "model");
        assert_eq!(settings.sampling.samples_per_pixel, 8);
        assert_eq!(settings.sampling.max_bounces, 4);
        assert_eq!(settings.camera.stillness, StillnessPolicy::AnyKeyHeld);
        assert_eq!(settings.camera.move_speed, MOVE_SPEED);
        assert_eq!(settings.capture.checkpoints, vec![10, 100]);
        assert_eq!(settings.capture.dir, PathBuf::from("captures"));
        assert_eq!(settings.capture.region.map(|r| r.width), Some(32));
    }

    #[test]
    fn empty_json_is_all_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(SamplingSettings::from(settings.sampling), SamplingSettings::default());
    }

    #[test]
    fn flags_override_settings() {
        let cli = CliArgs::parse(args(&["--scene", "box", "--spp", "1", "--width", "320", "--assets", "meshes"]))
            .unwrap();
        let mut settings = Settings::default();
        settings.apply_args(&cli);
        assert_eq!(settings.scene, "box");
        assert_eq!(settings.sampling.samples_per_pixel, 1);
        assert_eq!(settings.width, 320);
        assert_eq!(settings.height, 720);
        assert_eq!(settings.assets_dir, PathBuf::from("meshes"));
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(CliArgs::parse(args(&["--frobnicate"])).is_err());
        assert!(CliArgs::parse(args(&["--width", "wide"])).is_err());
    }

    #[test]
    fn missing_settings_file_is_an_error() {
        let cli = CliArgs {
            config: Some(PathBuf::from("does/not/exist.json")),
            ..Default::default()
        };
        assert!(Settings::from_args(&cli).is_err());
    }
}
