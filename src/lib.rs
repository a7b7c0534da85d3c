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

//! Compile, link and validate GPU shader programs.
//!
//! This crate wraps the shader program pipeline of OpenGL-like APIs: compiling vertex and
//! fragment sources, binding attribute locations, linking, validating and resolving
//! uniform locations. Every stage reports the driver's info log through [`tracing`], and
//! the driver's error flag is checked along the way with [`check_gpu_error!`].
//!
//! To use, implement the [`GpuContext`] trait on a type that represents an active GPU
//! context, or use a ready-made backend such as `shader-glue-glow`. Then describe the
//! program with a [`ProgramBuilder`] and build it against the context.
//!
//! ```no_run
//! use shader_glue::{GpuContext, ProgramBuilder};
//!
//! # fn build<C: GpuContext>(ctx: &mut C) -> Result<(), shader_glue::BuildError> {
//! let program = ProgramBuilder::new(
//!     "attribute vec4 inVertex; void main() { gl_Position = inVertex; }",
//!     "void main() { gl_FragColor = vec4(1.0); }",
//! )
//! .attribute("inVertex", 0)
//! .uniform("MVP")
//! .build(ctx)?;
//!
//! // ... draw with the program ...
//!
//! program.delete(ctx);
//! # Ok(())
//! # }
//! ```
//!
//! Note that none of the types here are thread-safe. GPU contexts are bound to a single
//! thread, so programs are built one at a time on that thread.
//!
//! [`tracing`]: https://crates.io/crates/tracing

#![forbid(unsafe_code)]

pub mod diagnostics;

mod builder;
mod error;
mod gpu_backend;
mod options;
mod program;
mod shader;

pub use builder::{create_program, AttribBinding, LinkedProgram, ProgramBuilder};
pub use diagnostics::GpuErrorCode;
pub use error::{BuildError, BuildStatus, StageFailure};
pub use gpu_backend::GpuContext;
pub use options::{BuildOptions, BuildPolicy};
pub use program::{get_uniform_location, link_program, validate_program, Program};
pub use shader::{compile_shader, CompiledShader, ShaderSource, ShaderStage};
