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

//! Defines the GPU backend for shader-glue.

use crate::shader::ShaderStage;

use std::fmt;

/// The GPU context that shader programs are built against.
///
/// Handles returned by this trait are opaque and only meaningful to the context that
/// created them. Every operation in this crate takes the context explicitly; there is
/// no notion of an ambient "current" context.
///
/// Implementors are expected to guarantee that the underlying driver context is current
/// on the calling thread for as long as the value is alive. Backends usually do this
/// by making their constructor `unsafe`.
pub trait GpuContext {
    /// The handle to a shader object.
    type Shader: Copy + fmt::Debug;

    /// The handle to a program object.
    type Program: Copy + fmt::Debug;

    /// The location of a uniform inside of a linked program.
    type UniformLocation: Clone + fmt::Debug;

    /// Create a new, empty shader object for the given stage.
    fn create_shader(&mut self, stage: ShaderStage) -> Result<Self::Shader, String>;

    /// Replace the source of a shader object.
    ///
    /// The strings are concatenated in order, the same way `glShaderSource` treats an
    /// array of strings.
    fn shader_source(&mut self, shader: Self::Shader, sources: &[&str]);

    /// Compile the source currently attached to the shader.
    fn compile_shader(&mut self, shader: Self::Shader);

    /// Whether the last compilation of this shader succeeded.
    fn shader_compile_status(&mut self, shader: Self::Shader) -> bool;

    /// The info log of the shader, or an empty string if the driver has nothing to say.
    fn shader_info_log(&mut self, shader: Self::Shader) -> String;

    /// Delete a shader object.
    fn delete_shader(&mut self, shader: Self::Shader);

    /// Create a new, empty program object.
    fn create_program(&mut self) -> Result<Self::Program, String>;

    /// Attach a shader object to a program.
    fn attach_shader(&mut self, program: Self::Program, shader: Self::Shader);

    /// Bind a vertex attribute name to a fixed location.
    ///
    /// This only takes effect on the next link.
    fn bind_attrib_location(&mut self, program: Self::Program, location: u32, name: &str);

    /// Link the program with all of its currently attached shaders.
    fn link_program(&mut self, program: Self::Program);

    /// Whether the last link of this program succeeded.
    fn program_link_status(&mut self, program: Self::Program) -> bool;

    /// Validate the program against the current pipeline state.
    fn validate_program(&mut self, program: Self::Program);

    /// Whether the last validation of this program succeeded.
    fn program_validate_status(&mut self, program: Self::Program) -> bool;

    /// The info log of the program, or an empty string if the driver has nothing to say.
    fn program_info_log(&mut self, program: Self::Program) -> String;

    /// Delete a program object.
    fn delete_program(&mut self, program: Self::Program);

    /// Look up the location of a uniform in a linked program.
    ///
    /// Returns `None` if the program has no active uniform by that name.
    fn uniform_location(
        &mut self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation>;

    /// Get and clear the last error recorded by the driver.
    ///
    /// Zero means no error.
    fn get_error(&mut self) -> u32;
}

impl<C: GpuContext + ?Sized> GpuContext for &mut C {
    type Shader = C::Shader;
    type Program = C::Program;
    type UniformLocation = C::UniformLocation;

    fn create_shader(&mut self, stage: ShaderStage) -> Result<Self::Shader, String> {
        (**self).create_shader(stage)
    }

    fn shader_source(&mut self, shader: Self::Shader, sources: &[&str]) {
        (**self).shader_source(shader, sources)
    }

    fn compile_shader(&mut self, shader: Self::Shader) {
        (**self).compile_shader(shader)
    }

    fn shader_compile_status(&mut self, shader: Self::Shader) -> bool {
        (**self).shader_compile_status(shader)
    }

    fn shader_info_log(&mut self, shader: Self::Shader) -> String {
        (**self).shader_info_log(shader)
    }

    fn delete_shader(&mut self, shader: Self::Shader) {
        (**self).delete_shader(shader)
    }

    fn create_program(&mut self) -> Result<Self::Program, String> {
        (**self).create_program()
    }

    fn attach_shader(&mut self, program: Self::Program, shader: Self::Shader) {
        (**self).attach_shader(program, shader)
    }

    fn bind_attrib_location(&mut self, program: Self::Program, location: u32, name: &str) {
        (**self).bind_attrib_location(program, location, name)
    }

    fn link_program(&mut self, program: Self::Program) {
        (**self).link_program(program)
    }

    fn program_link_status(&mut self, program: Self::Program) -> bool {
        (**self).program_link_status(program)
    }

    fn validate_program(&mut self, program: Self::Program) {
        (**self).validate_program(program)
    }

    fn program_validate_status(&mut self, program: Self::Program) -> bool {
        (**self).program_validate_status(program)
    }

    fn program_info_log(&mut self, program: Self::Program) -> String {
        (**self).program_info_log(program)
    }

    fn delete_program(&mut self, program: Self::Program) {
        (**self).delete_program(program)
    }

    fn uniform_location(
        &mut self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        (**self).uniform_location(program, name)
    }

    fn get_error(&mut self) -> u32 {
        (**self).get_error()
    }
}
