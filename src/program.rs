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

//! Program linking, validation and uniform lookup.

use crate::gpu_backend::GpuContext;
use crate::options::BuildOptions;

use std::fmt;

/// A linked program object.
///
/// This does not release the program when dropped, since doing so needs the context.
/// Call [`Program::delete`] once the program is no longer used.
pub struct Program<C: GpuContext + ?Sized> {
    resource: C::Program,
}

impl<C: GpuContext + ?Sized> fmt::Debug for Program<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Program").field(&self.resource).finish()
    }
}

impl<C: GpuContext + ?Sized> Program<C> {
    pub(crate) fn from_raw(resource: C::Program) -> Self {
        Self { resource }
    }

    /// The raw program handle.
    pub fn resource(&self) -> C::Program {
        self.resource
    }

    /// Give up ownership of the program handle.
    pub fn into_raw(self) -> C::Program {
        self.resource
    }

    /// Delete the program object.
    pub fn delete(self, ctx: &mut C) {
        tracing::debug!(program = ?self.resource, "deleting program");
        ctx.delete_program(self.resource);
    }
}

/// Link a program with all of its currently attached shaders.
///
/// Returns whether linking succeeded. The linker's info log is logged if present.
pub fn link_program<C: GpuContext + ?Sized>(ctx: &mut C, program: C::Program) -> bool {
    link_program_with(ctx, program, &BuildOptions::default()).0
}

pub(crate) fn link_program_with<C: GpuContext + ?Sized>(
    ctx: &mut C,
    program: C::Program,
    options: &BuildOptions<'_>,
) -> (bool, String) {
    ctx.link_program(program);

    let info_log = ctx.program_info_log(program);
    if !info_log.is_empty() {
        tracing::info!(program = ?program, "Program link log:\n{}", info_log);
    }

    let success = ctx.program_link_status(program);
    if !success {
        tracing::error!("Failed to link program {:?}", program);
    }

    if options.check_errors {
        crate::check_gpu_error!(ctx);
    }

    (success, info_log)
}

/// Validate a program, catching problems such as inconsistent sampler usage.
///
/// Returns whether validation succeeded. The validator's info log is logged if present.
pub fn validate_program<C: GpuContext + ?Sized>(ctx: &mut C, program: C::Program) -> bool {
    validate_program_with(ctx, program, &BuildOptions::default()).0
}

pub(crate) fn validate_program_with<C: GpuContext + ?Sized>(
    ctx: &mut C,
    program: C::Program,
    options: &BuildOptions<'_>,
) -> (bool, String) {
    ctx.validate_program(program);

    let info_log = ctx.program_info_log(program);
    if !info_log.is_empty() {
        tracing::info!(program = ?program, "Program validate log:\n{}", info_log);
    }

    let success = ctx.program_validate_status(program);
    if !success {
        tracing::error!("Failed to validate program {:?}", program);
    }

    if options.check_errors {
        crate::check_gpu_error!(ctx);
    }

    (success, info_log)
}

/// Look up a uniform's location in a linked program.
///
/// Returns `None` if the program has no active uniform with that name.
pub fn get_uniform_location<C: GpuContext + ?Sized>(
    ctx: &mut C,
    program: C::Program,
    name: &str,
) -> Option<C::UniformLocation> {
    ctx.uniform_location(program, name)
}
