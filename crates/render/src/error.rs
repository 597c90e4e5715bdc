use std::fmt;

use thiserror::Error;

/// Programmable stage a shader source belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Failures while a backend builds its shader program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("{stage} shader compilation failed: {message}")]
    ShaderCompile { stage: ShaderStage, message: String },
    #[error("program creation failed: {0}")]
    ProgramLink(String),
}
