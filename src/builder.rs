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

//! Building a complete program from vertex and fragment sources.

use crate::error::{BuildError, BuildStatus, StageFailure};
use crate::gpu_backend::GpuContext;
use crate::options::{BuildOptions, BuildPolicy};
use crate::program::{self, Program};
use crate::shader::{self, CompiledShader, ShaderSource, ShaderStage};

use std::fmt;

/// A vertex attribute name paired with the location it should be bound to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct AttribBinding<'a> {
    /// The name of the attribute in the vertex shader.
    pub name: &'a str,

    /// The location to bind it to.
    pub location: u32,
}

impl<'a> AttribBinding<'a> {
    /// Create a new attribute binding.
    pub fn new(name: &'a str, location: u32) -> Self {
        Self { name, location }
    }
}

impl<'a> From<(&'a str, u32)> for AttribBinding<'a> {
    fn from((name, location): (&'a str, u32)) -> Self {
        Self::new(name, location)
    }
}

/// A program that compiled, linked and validated.
///
/// Holds the location of every uniform requested from the [`ProgramBuilder`], in the
/// order they were requested.
pub struct LinkedProgram<C: GpuContext + ?Sized> {
    program: Program<C>,
    uniforms: Vec<(String, Option<C::UniformLocation>)>,
}

impl<C: GpuContext + ?Sized> fmt::Debug for LinkedProgram<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedProgram")
            .field("program", &self.program)
            .field("uniforms", &self.uniforms)
            .finish()
    }
}

impl<C: GpuContext + ?Sized> LinkedProgram<C> {
    /// The linked program.
    pub fn program(&self) -> &Program<C> {
        &self.program
    }

    /// The raw program handle.
    pub fn resource(&self) -> C::Program {
        self.program.resource()
    }

    /// The location of the uniform requested at `index`.
    ///
    /// Returns `None` if the index is out of range, the name was empty, or the program
    /// has no active uniform by that name.
    pub fn uniform_at(&self, index: usize) -> Option<&C::UniformLocation> {
        self.uniforms
            .get(index)
            .and_then(|(_, location)| location.as_ref())
    }

    /// The location of the uniform with the given name.
    pub fn uniform(&self, name: &str) -> Option<&C::UniformLocation> {
        self.uniforms
            .iter()
            .find(|(uniform, _)| !uniform.is_empty() && uniform == name)
            .and_then(|(_, location)| location.as_ref())
    }

    /// Every uniform location, in the order they were requested.
    pub fn uniform_locations(&self) -> impl Iterator<Item = Option<&C::UniformLocation>> + '_ {
        self.uniforms.iter().map(|(_, location)| location.as_ref())
    }

    /// Split into the program and the uniform table.
    pub fn into_parts(self) -> (Program<C>, Vec<Option<C::UniformLocation>>) {
        let uniforms = self
            .uniforms
            .into_iter()
            .map(|(_, location)| location)
            .collect();
        (self.program, uniforms)
    }

    /// Delete the program object.
    pub fn delete(self, ctx: &mut C) {
        self.program.delete(ctx);
    }
}

/// Builds a program out of a vertex and a fragment shader.
///
/// The build compiles both stages, attaches them to a new program, binds attribute
/// locations, links and validates. Uniform locations are only resolved if every one of
/// those stages succeeds. The intermediate shader objects are always deleted, whether
/// the build succeeds or not.
#[derive(Debug, Clone)]
pub struct ProgramBuilder<'a> {
    vertex: ShaderSource<'a>,
    fragment: ShaderSource<'a>,
    attributes: Vec<AttribBinding<'a>>,
    uniforms: Vec<&'a str>,
    options: BuildOptions<'a>,
}

impl<'a> ProgramBuilder<'a> {
    /// Start building a program from single-string vertex and fragment sources.
    pub fn new(vertex_source: &'a str, fragment_source: &'a str) -> Self {
        Self::from_sources(
            ShaderSource::new(ShaderStage::Vertex, vertex_source),
            ShaderSource::new(ShaderStage::Fragment, fragment_source),
        )
    }

    /// Start building a program from prepared shader sources.
    ///
    /// `vertex` is always compiled as the vertex stage and `fragment` as the fragment
    /// stage. A source tagged with the other stage is logged as a warning.
    pub fn from_sources(vertex: ShaderSource<'a>, fragment: ShaderSource<'a>) -> Self {
        let slots = [
            (&vertex, ShaderStage::Vertex),
            (&fragment, ShaderStage::Fragment),
        ];
        for (source, slot) in slots {
            if source.stage() != slot {
                tracing::warn!(
                    "{} shader source passed as the {} stage",
                    source.stage(),
                    slot
                );
            }
        }

        Self {
            vertex: ShaderSource::from_parts(ShaderStage::Vertex, vertex.parts().iter().copied()),
            fragment: ShaderSource::from_parts(
                ShaderStage::Fragment,
                fragment.parts().iter().copied(),
            ),
            attributes: Vec::new(),
            uniforms: Vec::new(),
            options: BuildOptions::default(),
        }
    }

    /// Bind the attribute `name` to `location` before linking.
    ///
    /// Empty names are skipped.
    pub fn attribute(mut self, name: &'a str, location: u32) -> Self {
        self.attributes.push(AttribBinding::new(name, location));
        self
    }

    /// Bind several attributes before linking.
    pub fn attributes<A: Into<AttribBinding<'a>>>(
        mut self,
        attributes: impl IntoIterator<Item = A>,
    ) -> Self {
        self.attributes
            .extend(attributes.into_iter().map(Into::into));
        self
    }

    /// Resolve the location of the uniform `name` once the program links.
    ///
    /// Empty names keep their slot in the uniform table but are never looked up.
    pub fn uniform(mut self, name: &'a str) -> Self {
        self.uniforms.push(name);
        self
    }

    /// Resolve the location of several uniforms once the program links.
    pub fn uniforms(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.uniforms.extend(names);
        self
    }

    /// Set the options for this build.
    pub fn options(mut self, options: BuildOptions<'a>) -> Self {
        self.options = options;
        self
    }

    /// Build the program.
    ///
    /// On failure the program object is deleted and nothing is handed back; build again
    /// from scratch to retry.
    pub fn build<C: GpuContext + ?Sized>(
        &self,
        ctx: &mut C,
    ) -> Result<LinkedProgram<C>, BuildError> {
        let span = tracing::debug_span!("build_program", label = tracing::field::Empty);
        if let Some(label) = self.options.label {
            span.record("label", label);
        }
        let _enter = span.enter();

        let program = match ctx.create_program() {
            Ok(program) => program,
            Err(err) => {
                tracing::error!("Failed to create program: {}", err);
                if self.options.check_errors {
                    crate::check_gpu_error!(ctx);
                }
                return Err(BuildError::CreateProgram(err));
            }
        };
        tracing::debug!(program = ?program, "created program");

        let mut status = BuildStatus::default();
        let mut failures = Vec::new();
        let short_circuit = self.options.policy == BuildPolicy::ShortCircuit;

        // Compile both stages.
        let mut shaders: Vec<CompiledShader<C>> = Vec::with_capacity(2);
        for source in [&self.vertex, &self.fragment] {
            if short_circuit && !failures.is_empty() {
                break;
            }

            let mut compiled =
                shader::compile_shader_with(ctx, source.stage(), source.parts(), &self.options);
            status.set_compiled(source.stage(), compiled.is_success());
            if !compiled.is_success() {
                failures.push(StageFailure::Compile {
                    stage: source.stage(),
                    info_log: compiled.take_info_log(),
                });
            }
            shaders.push(compiled);
        }

        if !(short_circuit && !failures.is_empty()) {
            // Shaders that failed to compile are attached too, so the linker gets a say.
            for compiled in &shaders {
                if let Some(shader) = compiled.handle() {
                    tracing::debug!(stage = %compiled.stage(), shader = ?shader, "attaching shader");
                    ctx.attach_shader(program, shader);
                }
            }

            // Attribute locations only take effect at link time.
            for attribute in self.attributes.iter().filter(|a| !a.name.is_empty()) {
                tracing::debug!(
                    name = attribute.name,
                    location = attribute.location,
                    "binding attribute"
                );
                ctx.bind_attrib_location(program, attribute.location, attribute.name);
            }

            let (linked, info_log) = program::link_program_with(ctx, program, &self.options);
            status.link = linked;
            if !linked {
                failures.push(StageFailure::Link { info_log });
            }
        }

        if !(short_circuit && !failures.is_empty()) {
            let (validated, info_log) =
                program::validate_program_with(ctx, program, &self.options);
            status.validate = validated;
            if !validated {
                failures.push(StageFailure::Validate { info_log });
            }
        }

        let result = if status.is_success() {
            let uniforms = self
                .uniforms
                .iter()
                .map(|&name| {
                    let location = if name.is_empty() {
                        None
                    } else {
                        program::get_uniform_location(ctx, program, name)
                    };
                    (name.to_owned(), location)
                })
                .collect();

            Ok(LinkedProgram {
                program: Program::from_raw(program),
                uniforms,
            })
        } else {
            Program::<C>::from_raw(program).delete(ctx);
            Err(BuildError::Failed { status, failures })
        };

        // The program keeps what it needs from the shaders once linked.
        for compiled in shaders {
            compiled.delete(ctx);
        }

        if self.options.check_errors {
            crate::check_gpu_error!(ctx);
        }

        result
    }
}

/// Compile, link and validate a program, then resolve its uniforms.
///
/// This is shorthand for [`ProgramBuilder`] with the default options.
///
/// ```no_run
/// # use shader_glue::AttribBinding;
/// # fn build<C: shader_glue::GpuContext>(ctx: &mut C) -> Result<(), shader_glue::BuildError> {
/// let program = shader_glue::create_program(
///     ctx,
///     "attribute vec4 inVertex; void main() { gl_Position = inVertex; }",
///     "uniform lowp vec4 color; void main() { gl_FragColor = color; }",
///     &[AttribBinding::new("inVertex", 0)],
///     &["color"],
/// )?;
/// assert!(program.uniform("color").is_some());
/// program.delete(ctx);
/// # Ok(())
/// # }
/// ```
pub fn create_program<'a, C: GpuContext + ?Sized>(
    ctx: &mut C,
    vertex_source: &'a str,
    fragment_source: &'a str,
    attributes: &[AttribBinding<'a>],
    uniforms: &[&'a str],
) -> Result<LinkedProgram<C>, BuildError> {
    ProgramBuilder::new(vertex_source, fragment_source)
        .attributes(attributes.iter().copied())
        .uniforms(uniforms.iter().copied())
        .build(ctx)
}
