//! The demo scenes.
//!
//! A scene owns whatever state its variant needs (pixel buffer, static
//! field, palette, camera) and turns the virtual clock into a [`Frame`]
//! once per step. Scenes never touch the GPU; the presenter does.

use std::f64::consts::PI;

use glam::{DVec2, Mat4, Vec3};

use crate::color::Rgba;
use crate::field::{static_field, FieldKind, PLASMA_SCALE};
use crate::grid::{FieldBuffer, PixelBuffer};
use crate::input::Event;
use crate::palette::{palette_shift, Palette, PaletteKind, DEFAULT_SHIFT_DIVISOR};
use crate::shader::{CubeUniforms, PlasmaUniforms};
use crate::time::VirtualClock;

/// Vertical field of view of the cube camera, in radians.
pub const CUBE_FOV_Y: f32 = 0.785398;
pub const CUBE_NEAR: f32 = 1.0;
pub const CUBE_FAR: f32 = 10.0;

/// Cursor position before the first pointer motion.
pub const DEFAULT_CURSOR: DVec2 = DVec2::new(-0.5, -0.5);

/// What one step of a scene produced.
#[derive(Debug, Clone, Copy)]
pub enum Frame<'a> {
    /// A software-rendered pixel buffer to upload and stretch.
    Pixels(&'a PixelBuffer),
    /// Uniforms for the fullscreen plasma shader.
    Plasma(PlasmaUniforms),
    /// Uniforms for the rotating cube.
    Cube(CubeUniforms),
}

/// A demo variant driven by the render loop.
pub trait Scene {
    fn name(&self) -> &'static str;

    /// React to a non-quit event. Called before the clock advances.
    fn handle_event(&mut self, _event: &Event) {}

    /// Produce the frame for the current virtual time.
    fn draw(&mut self, time: &VirtualClock) -> Frame<'_>;
}

/// Per-pixel plasma rendered on the CPU.
#[derive(Debug)]
pub struct FieldPlasma {
    kind: FieldKind,
    pixels: PixelBuffer,
}

impl FieldPlasma {
    pub fn new(kind: FieldKind, width: usize, height: usize) -> Self {
        Self {
            kind,
            pixels: PixelBuffer::new(width, height, Rgba::BLACK),
        }
    }

    pub fn classic(width: usize, height: usize) -> Self {
        Self::new(FieldKind::Classic, width, height)
    }

    pub fn rgb(width: usize, height: usize) -> Self {
        Self::new(FieldKind::Rgb, width, height)
    }

    pub fn interactive(width: usize, height: usize) -> Self {
        Self::new(
            FieldKind::Interactive {
                cursor: DEFAULT_CURSOR,
            },
            width,
            height,
        )
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    /// Recompute every pixel for time `t` in seconds.
    pub fn render(&mut self, t: f64) {
        let (w, h) = (self.pixels.width(), self.pixels.height());
        let kind = self.kind;
        self.pixels.fill_with(|x, y| kind.color(x, y, w, h, t));
    }
}

impl Scene for FieldPlasma {
    fn name(&self) -> &'static str {
        match self.kind {
            FieldKind::Classic => "classic",
            FieldKind::Rgb => "rgb",
            FieldKind::Interactive { .. } => "rgb-interactive",
        }
    }

    fn handle_event(&mut self, event: &Event) {
        if let (FieldKind::Interactive { cursor }, Event::PointerMoved(pos)) = (&mut self.kind, event) {
            // last sample wins
            *cursor = *pos - DVec2::splat(0.5);
        }
    }

    fn draw(&mut self, time: &VirtualClock) -> Frame<'_> {
        self.render(time.elapsed_secs());
        Frame::Pixels(&self.pixels)
    }
}

/// Static field plus a rotating palette.
///
/// The field is computed once; each frame only the palette offset moves.
#[derive(Debug)]
pub struct ColorCycling {
    field: FieldBuffer,
    palette: Palette,
    shift_divisor: f64,
    pixels: PixelBuffer,
}

impl ColorCycling {
    pub fn new(width: usize, height: usize, palette: PaletteKind) -> Self {
        let field = FieldBuffer::from_fn(width, height, |x, y| static_field(x, y, width, height));
        log::info!("built {}x{} static field, {:?} palette", width, height, palette);

        Self {
            field,
            palette: Palette::build(palette),
            shift_divisor: DEFAULT_SHIFT_DIVISOR,
            pixels: PixelBuffer::new(width, height, Rgba::BLACK),
        }
    }

    /// Milliseconds per palette step.
    pub fn with_shift_divisor(mut self, divisor: f64) -> Self {
        self.shift_divisor = divisor;
        self
    }

    pub fn field(&self) -> &FieldBuffer {
        &self.field
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn render(&mut self, elapsed_ms: f64) {
        let shift = palette_shift(elapsed_ms, self.shift_divisor);
        let palette = &self.palette;
        for (pixel, &value) in self.pixels.as_mut_slice().iter_mut().zip(self.field.as_slice()) {
            *pixel = palette.lookup(value, shift);
        }
    }
}

impl Scene for ColorCycling {
    fn name(&self) -> &'static str {
        "color-cycling"
    }

    fn draw(&mut self, time: &VirtualClock) -> Frame<'_> {
        self.render(time.elapsed_ms());
        Frame::Pixels(&self.pixels)
    }
}

/// RGB plasma evaluated by a fragment shader.
#[derive(Debug, Clone)]
pub struct ShaderPlasma {
    resolution: [f32; 2],
}

impl ShaderPlasma {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            resolution: [width as f32, height as f32],
        }
    }

    pub fn uniforms(&self, t: f64) -> PlasmaUniforms {
        PlasmaUniforms {
            resolution: self.resolution,
            time: t as f32,
            scale: PLASMA_SCALE as f32,
        }
    }
}

impl Scene for ShaderPlasma {
    fn name(&self) -> &'static str {
        "shader"
    }

    fn handle_event(&mut self, event: &Event) {
        if let Event::Resized { width, height } = *event {
            self.resolution = [width as f32, height as f32];
        }
    }

    fn draw(&mut self, time: &VirtualClock) -> Frame<'_> {
        Frame::Plasma(self.uniforms(time.elapsed_secs()))
    }
}

/// Rotating cube with a plasma surface.
#[derive(Debug, Clone)]
pub struct CubePlasma {
    projection: Mat4,
}

impl CubePlasma {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            projection: cube_projection(width, height),
        }
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn uniforms(&self, t: f64) -> CubeUniforms {
        let eye = cube_camera(t);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);

        CubeUniforms {
            model: cube_model(t).to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            projection: self.projection.to_cols_array_2d(),
            view_position: eye.to_array(),
            time: t as f32,
            scale: PLASMA_SCALE as f32,
            _padding: [0.0; 3],
        }
    }
}

impl Scene for CubePlasma {
    fn name(&self) -> &'static str {
        "cube"
    }

    fn handle_event(&mut self, event: &Event) {
        if let Event::Resized { width, height } = *event {
            self.projection = cube_projection(width, height);
        }
    }

    fn draw(&mut self, time: &VirtualClock) -> Frame<'_> {
        Frame::Cube(self.uniforms(time.elapsed_secs()))
    }
}

/// Camera position: on the z axis, bobbing between 2.0 and 4.5.
pub fn cube_camera(t: f64) -> Vec3 {
    let bob = (t * PI / 4.0).sin() + (t * 0.5 * PI / 4.0).cos() + (t * 0.2 * PI / 6.0).sin();
    Vec3::new(0.0, 0.0, 1.5 + bob.max(0.5) as f32)
}

/// Model rotation, Z then X then Y, at half speed.
pub fn cube_model(t: f64) -> Mat4 {
    let t = t * 0.5;
    let z = (t * PI / 2.0).sin() + (t * PI / 6.0).sin();
    let x = (t * PI / 2.0).cos();
    let y = (t * PI / 4.0).sin() + (t * PI / 2.0).cos();

    Mat4::from_rotation_z(z as f32) * Mat4::from_rotation_x(x as f32) * Mat4::from_rotation_y(y as f32)
}

pub fn cube_projection(width: u32, height: u32) -> Mat4 {
    let aspect = width.max(1) as f32 / height.max(1) as f32;
    Mat4::perspective_rh(CUBE_FOV_Y, aspect, CUBE_NEAR, CUBE_FAR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::plasma_space;

    #[test]
    fn test_field_plasma_fills_every_pixel() {
        let mut scene = FieldPlasma::rgb(8, 6);
        let mut time = VirtualClock::new(1.0 / 60.0);
        time.advance();
        match scene.draw(&time) {
            Frame::Pixels(pixels) => {
                assert_eq!((pixels.width(), pixels.height()), (8, 6));
                assert!(pixels.as_slice().iter().all(|p| p.a == 255));
            }
            other => panic!("expected pixels, got {:?}", other),
        }
    }

    #[test]
    fn test_cursor_only_moves_interactive_field() {
        let mut plain = FieldPlasma::rgb(4, 4);
        plain.handle_event(&Event::PointerMoved(DVec2::new(1.0, 1.0)));
        assert_eq!(plain.kind(), FieldKind::Rgb);

        let mut interactive = FieldPlasma::interactive(4, 4);
        assert_eq!(interactive.kind(), FieldKind::Interactive { cursor: DEFAULT_CURSOR });

        interactive.handle_event(&Event::PointerMoved(DVec2::new(0.25, 1.0)));
        interactive.handle_event(&Event::PointerMoved(DVec2::new(0.75, 0.5)));
        assert_eq!(
            interactive.kind(),
            FieldKind::Interactive {
                cursor: DVec2::new(0.25, 0.0)
            }
        );
    }

    #[test]
    fn test_cursor_spans_half_unit_around_origin() {
        let mut scene = FieldPlasma::interactive(4, 4);
        for (pointer, cursor) in [
            (DVec2::ZERO, DVec2::splat(-0.5)),
            (DVec2::ONE, DVec2::splat(0.5)),
            (DVec2::splat(0.5), DVec2::ZERO),
        ] {
            scene.handle_event(&Event::PointerMoved(pointer));
            assert_eq!(scene.kind(), FieldKind::Interactive { cursor });
        }
        // pixels live on a different scale
        assert_eq!(plasma_space(0.0, 4), -PLASMA_SCALE);
    }

    #[test]
    fn test_color_cycling_tracks_palette_shift() {
        let mut scene = ColorCycling::new(16, 8, PaletteKind::Rainbow);

        scene.render(0.0);
        let first: Vec<Rgba> = scene.pixels().as_slice().to_vec();
        for (pixel, &value) in first.iter().zip(scene.field().as_slice()) {
            assert_eq!(*pixel, scene.palette().lookup(value, 0));
        }

        // 64 ms at the default divisor is two palette steps
        scene.render(64.0);
        let (x, y) = (3, 5);
        let value = scene.field()[(x, y)];
        assert_eq!(scene.pixels()[(x, y)], scene.palette().lookup(value, 2));
    }

    #[test]
    fn test_color_cycling_field_is_static() {
        let mut scene = ColorCycling::new(10, 10, PaletteKind::RedBlue);
        let before = scene.field().clone();
        let mut time = VirtualClock::new(0.5);
        for _ in 0..4 {
            time.advance();
            scene.draw(&time);
        }
        assert_eq!(scene.field(), &before);
    }

    #[test]
    fn test_shader_plasma_follows_resize() {
        let mut scene = ShaderPlasma::new(640, 480);
        scene.handle_event(&Event::Resized { width: 800, height: 600 });
        let uniforms = scene.uniforms(2.0);
        assert_eq!(uniforms.resolution, [800.0, 600.0]);
        assert_eq!(uniforms.time, 2.0);
        assert_eq!(uniforms.scale, 20.0);
    }

    #[test]
    fn test_cube_camera_never_closer_than_two() {
        for i in 0..1000 {
            let z = cube_camera(i as f64 * 0.05).z;
            assert!((2.0..=4.5).contains(&z), "z = {}", z);
        }
        assert!((cube_camera(0.0).z - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_cube_model_is_rotation() {
        let model = cube_model(3.7);
        assert!((model.determinant() - 1.0).abs() < 1e-5);
        // at t = 0 only the X and Y angles are nonzero, both 1 rad
        let expected = Mat4::from_rotation_x(1.0) * Mat4::from_rotation_y(1.0);
        assert!(cube_model(0.0).abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn test_cube_resize_changes_aspect() {
        let mut scene = CubePlasma::new(640, 480);
        let before = scene.projection();
        scene.handle_event(&Event::Resized { width: 480, height: 480 });
        assert_ne!(before, scene.projection());
        assert_eq!(scene.projection(), cube_projection(480, 480));
    }
}
