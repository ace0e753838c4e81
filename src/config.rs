//! Command-line configuration.
//!
//! `-h` is the height flag, so clap's short help flag is disabled and help
//! is only available as `--help`.

use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser, ValueEnum};

use crate::error::ShaderError;
use crate::gpu::PassConfig;
use crate::palette::PaletteKind;
use crate::scene::{ColorCycling, CubePlasma, FieldPlasma, Scene, ShaderPlasma};
use crate::shader::ShaderProgram;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "plasma",
    version,
    about = "Real-time plasma demos",
    disable_help_flag = true
)]
pub struct Args {
    /// Buffer width in pixels
    #[arg(short = 'w', long, value_parser = parse_width)]
    pub width: Option<u32>,

    /// Buffer height in pixels
    #[arg(short = 'h', long, value_parser = parse_height)]
    pub height: Option<u32>,

    /// Integer upscale factor for the window
    #[arg(short = 's', long, value_parser = parse_scale)]
    pub scale: Option<u32>,

    /// Borderless fullscreen
    #[arg(short = 'f', long, default_value_t = false)]
    pub fullscreen: bool,

    /// Perturb the plasma with the mouse (rgb variant)
    #[arg(short = 'i', long, default_value_t = false)]
    pub interactive: bool,

    #[arg(long, value_enum, default_value_t = Variant::Rgb)]
    pub variant: Variant,

    /// Palette of the color-cycling variant
    #[arg(long, value_enum, default_value_t = PaletteKind::RedBlue)]
    pub palette: PaletteKind,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    /// Three-term plasma, red channel held high
    Classic,
    /// RGB plasma with phase-shifted channels
    Rgb,
    /// Static field with a cycling palette
    ColorCycling,
    /// RGB plasma in a fragment shader
    Shader,
    /// Plasma-textured rotating cube
    Cube,
}

impl Variant {
    /// Default `(width, height, scale)`.
    pub fn defaults(self) -> (u32, u32, u32) {
        match self {
            Variant::Classic => (320, 240, 1),
            Variant::Rgb => (128, 128, 4),
            Variant::ColorCycling => (640, 480, 1),
            Variant::Shader | Variant::Cube => (640, 480, 1),
        }
    }

    /// Whether the variant renders on the GPU and follows window resizes.
    pub fn is_shader(self) -> bool {
        matches!(self, Variant::Shader | Variant::Cube)
    }

    pub fn title(self) -> &'static str {
        match self {
            Variant::Classic => "Plasma",
            Variant::Rgb => "RGB Plasma",
            Variant::ColorCycling => "Color Cycling Plasma",
            Variant::Shader => "GL RGB Plasma",
            Variant::Cube => "3D Plasma",
        }
    }
}

fn parse_dimension(name: &str, s: &str) -> Result<u32, String> {
    match s.trim().parse::<u32>().unwrap_or(0) {
        0 => Err(format!("invalid value for {}: {}", name, s)),
        value => Ok(value),
    }
}

fn parse_width(s: &str) -> Result<u32, String> {
    parse_dimension("width", s)
}

fn parse_height(s: &str) -> Result<u32, String> {
    parse_dimension("height", s)
}

fn parse_scale(s: &str) -> Result<u32, String> {
    parse_dimension("scale", s)
}

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct PlasmaConfig {
    pub variant: Variant,
    pub width: u32,
    pub height: u32,
    pub scale: u32,
    pub fullscreen: bool,
    pub interactive: bool,
    pub palette: PaletteKind,
}

impl TryFrom<Args> for PlasmaConfig {
    type Error = clap::Error;

    /// Fill in variant defaults. Fails when the scaled window size does not
    /// fit in a `u32`.
    fn try_from(args: Args) -> Result<Self, clap::Error> {
        let (width, height, scale) = args.variant.defaults();
        let config = Self {
            variant: args.variant,
            width: args.width.unwrap_or(width),
            height: args.height.unwrap_or(height),
            scale: args.scale.unwrap_or(scale),
            fullscreen: args.fullscreen,
            interactive: args.interactive,
            palette: args.palette,
        };
        if config.checked_window_size().is_none() {
            return Err(Args::command().error(
                ErrorKind::ValueValidation,
                format!(
                    "invalid value for scale: {} ({}x{} scaled overflows the window size)",
                    config.scale, config.width, config.height
                ),
            ));
        }
        Ok(config)
    }
}

impl PlasmaConfig {
    pub fn new(variant: Variant) -> Self {
        let (width, height, scale) = variant.defaults();
        Self {
            variant,
            width,
            height,
            scale,
            fullscreen: false,
            interactive: false,
            palette: PaletteKind::default(),
        }
    }

    /// Window size in physical pixels, `None` on overflow.
    pub fn checked_window_size(&self) -> Option<(u32, u32)> {
        Some((self.width.checked_mul(self.scale)?, self.height.checked_mul(self.scale)?))
    }

    /// Window size in physical pixels. Saturates for configs that were not
    /// built from [`Args`].
    pub fn window_size(&self) -> (u32, u32) {
        (
            self.width.saturating_mul(self.scale),
            self.height.saturating_mul(self.scale),
        )
    }

    /// Whether the pointer drives the field.
    pub fn is_interactive(&self) -> bool {
        self.interactive && self.variant == Variant::Rgb
    }

    /// Build the scene for this variant. Static tables are computed here.
    ///
    /// `surface_size` is the window's actual inner size, which the shader
    /// variants use for resolution and aspect.
    pub fn build_scene(&self, surface_size: (u32, u32)) -> Box<dyn Scene> {
        let (w, h) = (self.width as usize, self.height as usize);
        let (window_w, window_h) = surface_size;

        match self.variant {
            Variant::Classic => Box::new(FieldPlasma::classic(w, h)),
            Variant::Rgb if self.is_interactive() => Box::new(FieldPlasma::interactive(w, h)),
            Variant::Rgb => Box::new(FieldPlasma::rgb(w, h)),
            Variant::ColorCycling => Box::new(ColorCycling::new(w, h, self.palette)),
            Variant::Shader => Box::new(ShaderPlasma::new(window_w, window_h)),
            Variant::Cube => Box::new(CubePlasma::new(window_w, window_h)),
        }
    }

    /// Describe the GPU pass. Loads shader sources for the shader variants.
    pub fn pass_config(&self) -> Result<PassConfig, ShaderError> {
        Ok(match self.variant {
            Variant::Shader => PassConfig::Plasma(ShaderProgram::Plasma.load()?),
            Variant::Cube => PassConfig::Cube(ShaderProgram::Cube.load()?),
            _ => PassConfig::Pixels {
                width: self.width,
                height: self.height,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Frame;
    use crate::time::VirtualClock;

    fn parse(args: &[&str]) -> Result<PlasmaConfig, clap::Error> {
        Args::try_parse_from(std::iter::once("plasma").chain(args.iter().copied())).and_then(PlasmaConfig::try_from)
    }

    #[test]
    fn test_defaults_follow_variant() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.variant, Variant::Rgb);
        assert_eq!((config.width, config.height, config.scale), (128, 128, 4));
        assert_eq!(config.window_size(), (512, 512));

        let config = parse(&["--variant", "classic"]).unwrap();
        assert_eq!((config.width, config.height, config.scale), (320, 240, 1));
    }

    #[test]
    fn test_short_flags() {
        let config = parse(&["-w", "64", "-h", "32", "-s", "2", "-f", "-i"]).unwrap();
        assert_eq!((config.width, config.height, config.scale), (64, 32, 2));
        assert!(config.fullscreen);
        assert!(config.is_interactive());
    }

    #[test]
    fn test_zero_and_garbage_rejected() {
        for bad in ["0", "abc", "12px"] {
            let err = parse(&["-w", bad]).unwrap_err();
            assert!(err.to_string().contains("invalid value for width"), "{}", err);
        }
        let err = parse(&["-h", "0"]).unwrap_err();
        assert!(err.to_string().contains("invalid value for height"));
        let err = parse(&["-s", "x"]).unwrap_err();
        assert!(err.to_string().contains("invalid value for scale"));
    }

    #[test]
    fn test_palette_names() {
        let config = parse(&["--variant", "color-cycling", "--palette", "hsv-hue-lightness"]).unwrap();
        assert_eq!(config.palette, PaletteKind::HsvHueLightness);
        assert!(parse(&["--palette", "plaid"]).is_err());
    }

    #[test]
    fn test_interactive_only_for_rgb() {
        let config = parse(&["--variant", "classic", "-i"]).unwrap();
        assert!(!config.is_interactive());
        assert_eq!(config.build_scene(config.window_size()).name(), "classic");
    }

    #[test]
    fn test_scene_per_variant() {
        let names: Vec<&str> = [
            Variant::Classic,
            Variant::Rgb,
            Variant::ColorCycling,
            Variant::Shader,
            Variant::Cube,
        ]
        .into_iter()
        .map(|v| {
            let config = PlasmaConfig::new(v);
            config.build_scene(config.window_size()).name()
        })
        .collect();
        assert_eq!(names, ["classic", "rgb", "color-cycling", "shader", "cube"]);
    }

    #[test]
    fn test_scaled_size_overflow_rejected() {
        let err = parse(&["-w", "100000", "-s", "100000"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert!(err.to_string().contains("invalid value for scale"), "{}", err);

        // largest size that still fits
        let config = parse(&["-w", "65536", "-h", "1", "-s", "65535"]).unwrap();
        assert_eq!(config.checked_window_size(), Some((65536 * 65535, 65535)));

        let mut config = PlasmaConfig::new(Variant::Classic);
        config.scale = u32::MAX;
        assert_eq!(config.checked_window_size(), None);
        assert_eq!(config.window_size(), (u32::MAX, u32::MAX));
    }

    #[test]
    fn test_shader_scene_uses_surface_size() {
        let config = parse(&["--variant", "shader", "-f"]).unwrap();
        let mut scene = config.build_scene((1920, 1080));
        match scene.draw(&VirtualClock::new(1.0 / 60.0)) {
            Frame::Plasma(uniforms) => assert_eq!(uniforms.resolution, [1920.0, 1080.0]),
            _ => panic!("shader scene drew a non-plasma frame"),
        }
    }

    #[test]
    fn test_software_pass_uses_buffer_size() {
        let config = parse(&["-w", "10", "-h", "20", "-s", "3"]).unwrap();
        match config.pass_config().unwrap() {
            PassConfig::Pixels { width, height } => assert_eq!((width, height), (10, 20)),
            other => panic!("unexpected pass {:?}", other),
        }
    }
}
