//! wgpu presenter.
//!
//! [`GpuState`] owns the device, the window surface and exactly one render
//! pass, chosen at startup:
//!
//! - [`BlitPass`]: uploads a software pixel buffer and stretches it
//! - [`PlasmaPass`]: fullscreen fragment shader
//! - [`CubePass`]: rotating cube with a depth buffer

mod blit;
mod cube;
mod plasma_pass;

use std::sync::Arc;

use winit::window::Window;

pub use blit::{BlitPass, PIXEL_FORMAT};
pub use cube::{cube_vertices, CubePass, CubeVertex};
pub use plasma_pass::PlasmaPass;

use crate::error::{GpuError, PresentError};
use crate::render_loop::Surface;
use crate::scene::Frame;
use crate::shader::ShaderSources;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Which pass the presenter builds.
#[derive(Debug, Clone)]
pub enum PassConfig {
    /// Software pixels of the given logical size.
    Pixels { width: u32, height: u32 },
    /// Fullscreen plasma shader.
    Plasma(ShaderSources),
    /// Cube shader.
    Cube(ShaderSources),
}

enum Pass {
    Blit(BlitPass),
    Plasma(PlasmaPass),
    Cube(CubePass),
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    render_format: wgpu::TextureFormat,
    pass: Pass,
}

impl GpuState {
    pub async fn new(window: Arc<Window>, pass: PassConfig) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let info = adapter.get_info();
        log::info!("using {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let (surface_format, render_format) =
            choose_formats(&surface_caps.formats).ok_or(GpuError::UnsupportedSurface)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        // the pacer owns frame timing, so no vsync
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoNoVsync,
            alpha_mode,
            view_formats: if render_format == surface_format {
                vec![]
            } else {
                vec![render_format]
            },
            desired_maximum_frame_latency: 2,
        };
        with_error_scope(&device, "surface configuration", || surface.configure(&device, &config))?;
        log::info!(
            "surface configured: {}x{} {:?} (drawing as {:?})",
            config.width,
            config.height,
            config.format,
            render_format
        );

        let pass = match pass {
            PassConfig::Pixels { width, height } => Pass::Blit(BlitPass::new(&device, render_format, width, height)?),
            PassConfig::Plasma(sources) => Pass::Plasma(PlasmaPass::new(&device, render_format, &sources)?),
            PassConfig::Cube(sources) => Pass::Cube(CubePass::new(&device, &config, render_format, &sources)?),
        };

        Ok(Self {
            surface,
            device,
            queue,
            config,
            render_format,
            pass,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    fn render(&mut self, frame: Frame<'_>) -> Result<(), wgpu::SurfaceError> {
        match (&mut self.pass, &frame) {
            (Pass::Blit(pass), Frame::Pixels(pixels)) => pass.upload(&self.device, &self.queue, pixels),
            (Pass::Plasma(pass), Frame::Plasma(uniforms)) => pass.update(&self.queue, uniforms),
            (Pass::Cube(pass), Frame::Cube(uniforms)) => pass.update(&self.queue, uniforms),
            _ => {
                log::warn!("frame does not match the configured pass, skipped");
                return Ok(());
            }
        }

        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.render_format),
            ..Default::default()
        });

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        match &self.pass {
            Pass::Blit(pass) => pass.draw(&mut encoder, &view),
            Pass::Plasma(pass) => pass.draw(&mut encoder, &view),
            Pass::Cube(pass) => pass.draw(&mut encoder, &view),
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl Surface for GpuState {
    fn present(&mut self, frame: Frame<'_>) -> Result<(), PresentError> {
        match self.render(frame) {
            Ok(()) => Ok(()),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost or outdated, reconfiguring");
                self.reconfigure();
                Ok(())
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("surface timed out, frame skipped");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
        if let Pass::Cube(pass) = &mut self.pass {
            pass.resize(&self.device, &self.config);
        }
    }
}

/// Pick `(surface format, render format)` from what the surface offers.
///
/// Colors are written as raw unit values, so passes always draw into a
/// non-sRGB view. An sRGB-only surface gets a non-sRGB view format.
pub fn choose_formats(available: &[wgpu::TextureFormat]) -> Option<(wgpu::TextureFormat, wgpu::TextureFormat)> {
    let surface_format = available
        .iter()
        .find(|f| !f.is_srgb())
        .or_else(|| available.first())
        .copied()?;
    Some((surface_format, surface_format.remove_srgb_suffix()))
}

/// Run `create` inside a validation error scope.
fn with_error_scope<T>(device: &wgpu::Device, label: &str, create: impl FnOnce() -> T) -> Result<T, GpuError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();
    match pollster::block_on(device.pop_error_scope()) {
        None => Ok(value),
        Some(e) => {
            let log = e.to_string();
            log::error!("failed to create {}:\n{}", label, log);
            Err(GpuError::ResourceCreation {
                label: label.to_string(),
                log,
            })
        }
    }
}

/// Create a shader module, turning compiler errors into [`GpuError`].
fn compile_shader(device: &wgpu::Device, label: &str, source: &str) -> Result<wgpu::ShaderModule, GpuError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    let info = pollster::block_on(module.get_compilation_info());
    let scope_error = pollster::block_on(device.pop_error_scope());

    let mut errors: Vec<String> = info
        .messages
        .iter()
        .filter(|m| matches!(m.message_type, wgpu::CompilationMessageType::Error))
        .map(|m| match &m.location {
            Some(loc) => format!("{}:{}: {}", loc.line_number, loc.line_position, m.message),
            None => m.message.clone(),
        })
        .collect();
    if errors.is_empty() {
        if let Some(e) = scope_error {
            errors.push(e.to_string());
        }
    }

    if errors.is_empty() {
        Ok(module)
    } else {
        let log = errors.join("\n");
        log::error!("failed to compile shader {}:\n{}", label, log);
        Err(GpuError::ShaderCompilation {
            label: label.to_string(),
            log,
        })
    }
}

/// Create a render pipeline inside a validation error scope.
fn create_pipeline(
    device: &wgpu::Device,
    label: &str,
    descriptor: &wgpu::RenderPipelineDescriptor<'_>,
) -> Result<wgpu::RenderPipeline, GpuError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = device.create_render_pipeline(descriptor);
    match pollster::block_on(device.pop_error_scope()) {
        None => Ok(pipeline),
        Some(e) => {
            let log = e.to_string();
            log::error!("failed to link pipeline {}:\n{}", label, log);
            Err(GpuError::PipelineCreation {
                label: label.to_string(),
                log,
            })
        }
    }
}

fn create_depth_texture(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn clear_black() -> wgpu::Operations<wgpu::Color> {
    wgpu::Operations {
        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
        store: wgpu::StoreOp::Store,
    }
}

fn uniform_layout_entry(visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat;

    #[test]
    fn test_prefers_linear_surface_format() {
        let formats = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Bgra8Unorm];
        assert_eq!(
            choose_formats(&formats),
            Some((TextureFormat::Bgra8Unorm, TextureFormat::Bgra8Unorm))
        );
    }

    #[test]
    fn test_srgb_only_surface_draws_linear_view() {
        let (surface, render) = choose_formats(&[TextureFormat::Rgba8UnormSrgb]).unwrap();
        assert_eq!(surface, TextureFormat::Rgba8UnormSrgb);
        assert_eq!(render, TextureFormat::Rgba8Unorm);
        assert!(!render.is_srgb());
    }

    #[test]
    fn test_pixel_bytes_are_not_gamma_decoded() {
        // same encoding as the render view, so byte 127 is shown as 127
        assert!(!PIXEL_FORMAT.is_srgb());
        assert_eq!(PIXEL_FORMAT, PIXEL_FORMAT.remove_srgb_suffix());
    }

    #[test]
    fn test_no_formats_is_unsupported() {
        assert_eq!(choose_formats(&[]), None);
    }
}
