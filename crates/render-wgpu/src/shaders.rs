use tilescape_render::{SetupError, ShaderStage};

/// Entry point of the vertex shader source.
pub const VERTEX_ENTRY: &str = "vs_main";
/// Entry point of the fragment shader source.
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Compile one WGSL module, turning validation errors into [`SetupError`].
pub async fn compile(
    device: &wgpu::Device,
    stage: ShaderStage,
    source: &str,
) -> Result<wgpu::ShaderModule, SetupError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(match stage {
            ShaderStage::Vertex => "tile_vertex_shader",
            ShaderStage::Fragment => "tile_fragment_shader",
        }),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    match device.pop_error_scope().await {
        Some(err) => {
            let message = err.to_string();
            tracing::error!(%stage, %message, "shader compilation failed");
            Err(SetupError::ShaderCompile { stage, message })
        }
        None => Ok(module),
    }
}

/// Run `create` inside a validation scope, reporting failure as a link error.
pub async fn link<T>(
    device: &wgpu::Device,
    create: impl FnOnce() -> T,
) -> Result<T, SetupError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let created = create();
    match device.pop_error_scope().await {
        Some(err) => {
            let message = err.to_string();
            tracing::error!(%message, "render pipeline creation failed");
            Err(SetupError::ProgramLink(message))
        }
        None => Ok(created),
    }
}
