//! Shader sources and the uniform blocks they read.
//!
//! The blit shader used by the software scenes is compiled in. The plasma
//! and cube programs are loaded from `src/shaders/` at startup, one file per
//! stage, so they can be edited without rebuilding.

use std::fs;
use std::path::{Path, PathBuf};

use bytemuck::{Pod, Zeroable};

use crate::error::ShaderError;

pub const BLIT_SOURCE: &str = include_str!("shaders/blit.wgsl");

/// Shader directory, relative to the crate root.
pub const SHADER_DIR: &str = "src/shaders";

/// Uniforms of the fullscreen plasma shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PlasmaUniforms {
    pub resolution: [f32; 2],
    pub time: f32,
    pub scale: f32,
}

/// Uniforms of the cube shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CubeUniforms {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub view_position: [f32; 3],
    pub time: f32,
    pub scale: f32,
    pub _padding: [f32; 3],
}

/// Shader programs loaded from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderProgram {
    Plasma,
    Cube,
}

impl ShaderProgram {
    pub fn name(self) -> &'static str {
        match self {
            ShaderProgram::Plasma => "plasma",
            ShaderProgram::Cube => "cube",
        }
    }

    pub fn vertex_path(self, root: &Path) -> PathBuf {
        root.join(format!("{}.vert.wgsl", self.name()))
    }

    pub fn fragment_path(self, root: &Path) -> PathBuf {
        root.join(format!("{}.frag.wgsl", self.name()))
    }

    /// Load both stages from the crate's shader directory.
    pub fn load(self) -> Result<ShaderSources, ShaderError> {
        self.load_from(&default_shader_root())
    }

    /// Load both stages from `root`.
    pub fn load_from(self, root: &Path) -> Result<ShaderSources, ShaderError> {
        let vertex = read_source(&self.vertex_path(root))?;
        let fragment = read_source(&self.fragment_path(root))?;
        log::info!("loaded {} shader sources from {}", self.name(), root.display());
        Ok(ShaderSources {
            program: self,
            vertex,
            fragment,
        })
    }
}

/// Vertex and fragment WGSL of one program.
#[derive(Debug, Clone)]
pub struct ShaderSources {
    pub program: ShaderProgram,
    pub vertex: String,
    pub fragment: String,
}

pub fn default_shader_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(SHADER_DIR)
}

fn read_source(path: &Path) -> Result<String, ShaderError> {
    fs::read_to_string(path).map_err(|source| ShaderError::Read {
        path: path.to_path_buf(),
        source,
    })
}
