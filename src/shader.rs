// SPDX-License-Identifier: LGPL-3.0-or-later OR MPL-2.0
// This file is a part of `shader-glue`.
//
// `shader-glue` is free software: you can redistribute it and/or modify it under the
// terms of either:
//
// * GNU Lesser General Public License as published by the Free Software Foundation, either
//   version 3 of the License, or (at your option) any later version.
// * Mozilla Public License as published by the Mozilla Foundation, version 2.
//
// `shader-glue` is distributed in the hope that it will be useful, but WITHOUT ANY
// WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR
// PURPOSE. See the GNU Lesser General Public License or the Mozilla Public License for more
// details.
//
// You should have received a copy of the GNU Lesser General Public License and the Mozilla
// Public License along with `shader-glue`. If not, see <https://www.gnu.org/licenses/>.

//! Shader compilation.

use crate::gpu_backend::GpuContext;
use crate::options::BuildOptions;

use std::fmt;

/// A stage of the graphics pipeline that a shader runs in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Per-vertex processing.
    Vertex,

    /// Per-fragment processing.
    Fragment,
}

impl ShaderStage {
    /// The OpenGL enum for this stage.
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => 0x8B31,
            ShaderStage::Fragment => 0x8B30,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// Source text for one shader stage.
///
/// The source may be split over several strings; they are submitted in order.
#[derive(Debug, Clone)]
pub struct ShaderSource<'a> {
    stage: ShaderStage,
    sources: Vec<&'a str>,
}

impl<'a> ShaderSource<'a> {
    /// Create a source from a single string.
    pub fn new(stage: ShaderStage, source: &'a str) -> Self {
        Self {
            stage,
            sources: vec![source],
        }
    }

    /// Create a source from several strings, concatenated in order.
    pub fn from_parts(stage: ShaderStage, sources: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            stage,
            sources: sources.into_iter().collect(),
        }
    }

    /// The stage this source is meant for.
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// The source strings.
    pub fn parts(&self) -> &[&'a str] {
        &self.sources
    }

    /// Compile this source into a new shader object.
    pub fn compile<C: GpuContext + ?Sized>(&self, ctx: &mut C) -> CompiledShader<C> {
        compile_shader(ctx, self.stage, &self.sources)
    }
}

/// The result of compiling a shader stage.
///
/// The shader object is owned by whoever holds this value and must be released with
/// [`CompiledShader::delete`]. Once a shader is attached to a program it is no longer
/// needed after linking.
pub struct CompiledShader<C: GpuContext + ?Sized> {
    stage: ShaderStage,
    shader: Option<C::Shader>,
    success: bool,
    info_log: String,
}

impl<C: GpuContext + ?Sized> fmt::Debug for CompiledShader<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledShader")
            .field("stage", &self.stage)
            .field("shader", &self.shader)
            .field("success", &self.success)
            .finish_non_exhaustive()
    }
}

impl<C: GpuContext + ?Sized> CompiledShader<C> {
    /// The stage this shader was compiled for.
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// The shader handle.
    ///
    /// This is `None` if the driver could not create a shader object at all.
    pub fn handle(&self) -> Option<C::Shader> {
        self.shader
    }

    /// Whether compilation succeeded.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// The compiler's info log.
    ///
    /// If the shader object could not be created, this holds the driver's message.
    pub fn info_log(&self) -> &str {
        &self.info_log
    }

    pub(crate) fn take_info_log(&mut self) -> String {
        std::mem::take(&mut self.info_log)
    }

    /// Delete the shader object, if there is one.
    pub fn delete(self, ctx: &mut C) {
        if let Some(shader) = self.shader {
            tracing::debug!(stage = %self.stage, shader = ?shader, "deleting shader");
            ctx.delete_shader(shader);
        }
    }
}

/// Compile a shader for `stage` from the provided source strings.
///
/// The driver's info log is logged whenever it is non-empty, since it may carry warnings
/// even on success. On failure the submitted sources are echoed to the log.
pub fn compile_shader<C: GpuContext + ?Sized>(
    ctx: &mut C,
    stage: ShaderStage,
    sources: &[&str],
) -> CompiledShader<C> {
    compile_shader_with(ctx, stage, sources, &BuildOptions::default())
}

pub(crate) fn compile_shader_with<C: GpuContext + ?Sized>(
    ctx: &mut C,
    stage: ShaderStage,
    sources: &[&str],
    options: &BuildOptions<'_>,
) -> CompiledShader<C> {
    let shader = match ctx.create_shader(stage) {
        Ok(shader) => shader,
        Err(err) => {
            tracing::error!(stage = %stage, "Failed to create shader: {}", err);
            if options.check_errors {
                crate::check_gpu_error!(ctx);
            }

            return CompiledShader {
                stage,
                shader: None,
                success: false,
                info_log: err,
            };
        }
    };

    ctx.shader_source(shader, sources);
    ctx.compile_shader(shader);

    let info_log = ctx.shader_info_log(shader);
    if !info_log.is_empty() {
        tracing::info!(stage = %stage, "Shader compile log:\n{}", info_log);
    }

    let success = ctx.shader_compile_status(shader);
    if !success {
        tracing::error!(stage = %stage, shader = ?shader, "Failed to compile shader");
        if options.echo_sources_on_failure {
            for source in sources {
                tracing::info!(stage = %stage, "{}", source);
            }
        }
    }

    if options.check_errors {
        crate::check_gpu_error!(ctx);
    }

    CompiledShader {
        stage,
        shader: Some(shader),
        success,
        info_log,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_enums_match_gl() {
        assert_eq!(ShaderStage::Vertex.gl_enum(), 0x8B31);
        assert_eq!(ShaderStage::Fragment.gl_enum(), 0x8B30);
    }

    #[test]
    fn source_keeps_parts_in_order() {
        let source = ShaderSource::from_parts(
            ShaderStage::Fragment,
            ["precision mediump float;\n", "void main() {}\n"],
        );
        assert_eq!(source.stage(), ShaderStage::Fragment);
        assert_eq!(
            source.parts(),
            &["precision mediump float;\n", "void main() {}\n"]
        );
        assert_eq!(source.stage().to_string(), "fragment");
    }
}
