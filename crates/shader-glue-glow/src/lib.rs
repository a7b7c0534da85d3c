// SPDX-License-Identifier: LGPL-3.0-or-later OR MPL-2.0
// This file is a part of `shader-glue-glow`.
//
// `shader-glue-glow` is free software: you can redistribute it and/or modify it under the
// terms of either:
//
// * GNU Lesser General Public License as published by the Free Software Foundation, either
// version 3 of the License, or (at your option) any later version.
// * Mozilla Public License as published by the Mozilla Foundation, version 2.
//
// `shader-glue-glow` is distributed in the hope that it will be useful, but WITHOUT ANY
// WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR
// PURPOSE. See the GNU Lesser General Public License or the Mozilla Public License for more
// details.
//
// You should have received a copy of the GNU Lesser General Public License and the Mozilla
// Public License along with `shader-glue-glow`. If not, see <https://www.gnu.org/licenses/>.

//! A [`shader-glue`] backend that uses the [`glow`] crate.
//!
//! Wrap any [`HasContext`] in a [`GlowContext`] and pass it to a
//! [`ProgramBuilder`](shader_glue::ProgramBuilder).
//!
//! [`shader-glue`]: https://crates.io/crates/shader-glue
//! [`glow`]: https://crates.io/crates/glow
//! [`HasContext`]: https://docs.rs/glow/latest/glow/trait.HasContext.html

use glow::HasContext;
use shader_glue::{GpuContext, ShaderStage};

use std::borrow::Cow;
use std::fmt;

pub use glow;
pub use shader_glue;

/// The flavor of OpenGL behind a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlVersion {
    /// Desktop OpenGL.
    Gl,

    /// OpenGL ES or WebGL.
    Es,
}

impl GlVersion {
    /// A GLSL preamble that lets the same shader body compile on this flavor.
    ///
    /// GLSL ES sources use precision qualifiers, which desktop GLSL 1.20 rejects, so on
    /// desktop they are defined away.
    pub fn glsl_header(self) -> &'static str {
        match self {
            GlVersion::Gl => "#version 120\n#define lowp\n#define mediump\n#define highp\n",
            GlVersion::Es => "#version 100\nprecision mediump float;\n",
        }
    }
}

/// A wrapper around a `glow` context.
pub struct GlowContext<H: ?Sized> {
    /// Whether this is an ES context.
    version: GlVersion,

    /// The underlying context.
    context: H,
}

impl<H: HasContext + ?Sized> fmt::Debug for GlowContext<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlowContext")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl<H: HasContext> GlowContext<H> {
    /// Create a new `GlowContext` from something that implements [`HasContext`].
    ///
    /// # Safety
    ///
    /// `context` must be current on this thread whenever this value is used to build or
    /// delete GPU objects.
    ///
    /// [`HasContext`]: https://docs.rs/glow/latest/glow/trait.HasContext.html
    pub unsafe fn new(context: H) -> Self {
        let version = if context.version().is_embedded {
            GlVersion::Es
        } else {
            GlVersion::Gl
        };
        tracing::debug!("Using {:?} context: {:?}", version, context.version());

        Self { version, context }
    }

    /// Consume this structure and return the underlying context.
    pub fn into_inner(self) -> H {
        self.context
    }
}

impl<H: HasContext + ?Sized> GlowContext<H> {
    /// Get a reference to the underlying context.
    pub fn context(&self) -> &H {
        &self.context
    }

    /// Get a mutable reference to the underlying context.
    ///
    /// # Safety
    ///
    /// The context must not be replaced with one that isn't current.
    pub unsafe fn context_mut(&mut self) -> &mut H {
        &mut self.context
    }

    /// The flavor of OpenGL behind this context.
    pub fn version(&self) -> GlVersion {
        self.version
    }
}

impl<H: HasContext + ?Sized> GpuContext for GlowContext<H> {
    type Shader = H::Shader;
    type Program = H::Program;
    type UniformLocation = H::UniformLocation;

    fn create_shader(&mut self, stage: ShaderStage) -> Result<Self::Shader, String> {
        unsafe { self.context.create_shader(stage.gl_enum()) }
    }

    fn shader_source(&mut self, shader: Self::Shader, sources: &[&str]) {
        let source = match sources {
            [source] => Cow::Borrowed(*source),
            sources => Cow::Owned(sources.concat()),
        };

        unsafe { self.context.shader_source(shader, &source) }
    }

    fn compile_shader(&mut self, shader: Self::Shader) {
        unsafe { self.context.compile_shader(shader) }
    }

    fn shader_compile_status(&mut self, shader: Self::Shader) -> bool {
        unsafe { self.context.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&mut self, shader: Self::Shader) -> String {
        unsafe { self.context.get_shader_info_log(shader) }
    }

    fn delete_shader(&mut self, shader: Self::Shader) {
        unsafe { self.context.delete_shader(shader) }
    }

    fn create_program(&mut self) -> Result<Self::Program, String> {
        unsafe { self.context.create_program() }
    }

    fn attach_shader(&mut self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.context.attach_shader(program, shader) }
    }

    fn bind_attrib_location(&mut self, program: Self::Program, location: u32, name: &str) {
        unsafe { self.context.bind_attrib_location(program, location, name) }
    }

    fn link_program(&mut self, program: Self::Program) {
        unsafe { self.context.link_program(program) }
    }

    fn program_link_status(&mut self, program: Self::Program) -> bool {
        unsafe { self.context.get_program_link_status(program) }
    }

    fn validate_program(&mut self, program: Self::Program) {
        unsafe { self.context.validate_program(program) }
    }

    fn program_validate_status(&mut self, program: Self::Program) -> bool {
        unsafe { self.context.get_program_validate_status(program) }
    }

    fn program_info_log(&mut self, program: Self::Program) -> String {
        unsafe { self.context.get_program_info_log(program) }
    }

    fn delete_program(&mut self, program: Self::Program) {
        unsafe { self.context.delete_program(program) }
    }

    fn uniform_location(
        &mut self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { self.context.get_uniform_location(program, name) }
    }

    fn get_error(&mut self) -> u32 {
        unsafe { self.context.get_error() }
    }
}
