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

//! Checking for errors recorded by the GPU driver.

use crate::gpu_backend::GpuContext;

use std::fmt;

/// Check the GPU context for an error and log it, tagged with the current file and line.
///
/// Evaluates to the [`GpuErrorCode`] that was found, if any.
///
/// ```
/// # fn check<C: shader_glue::GpuContext>(ctx: &mut C) {
/// use shader_glue::check_gpu_error;
/// check_gpu_error!(ctx);
/// check_gpu_error!(ctx, "after uploading uniforms");
/// # }
/// ```
#[macro_export]
macro_rules! check_gpu_error {
    ($ctx:expr) => {{
        $crate::diagnostics::check_error_impl($ctx, file!(), line!(), "")
    }};
    ($ctx:expr, $context:literal) => {{
        $crate::diagnostics::check_error_impl($ctx, file!(), line!(), $context)
    }};
}

/// An error code reported by the driver's error query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GpuErrorCode(pub u32);

impl GpuErrorCode {
    /// The raw error code.
    pub fn raw(self) -> u32 {
        self.0
    }

    /// The symbolic name of this error, as it appears in the OpenGL headers.
    pub fn name(self) -> &'static str {
        match self.0 {
            0x0500 => "GL_INVALID_ENUM",
            0x0501 => "GL_INVALID_VALUE",
            0x0502 => "GL_INVALID_OPERATION",
            0x0503 => "GL_STACK_OVERFLOW",
            0x0504 => "GL_STACK_UNDERFLOW",
            0x0505 => "GL_OUT_OF_MEMORY",
            0x0506 => "GL_INVALID_FRAMEBUFFER_OPERATION",
            0x0507 => "GL_CONTEXT_LOST",
            0x8031 => "GL_TABLE_TOO_LARGE",
            0x9242 => "CONTEXT_LOST_WEBGL",
            _ => "<unknown>",
        }
    }
}

impl fmt::Display for GpuErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#x})", self.name(), self.0)
    }
}

impl fmt::LowerHex for GpuErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::UpperHex for GpuErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

/// Query the last error and log it with the given call site.
///
/// Use [`check_gpu_error!`] instead of calling this directly.
#[doc(hidden)]
pub fn check_error_impl<C: GpuContext + ?Sized>(
    ctx: &mut C,
    file: &str,
    line: u32,
    context: &str,
) -> Option<GpuErrorCode> {
    let code = ctx.get_error();
    if code == 0 {
        return None;
    }

    let code = GpuErrorCode(code);
    if context.is_empty() {
        tracing::error!("glError: {:x} caught at {}:{} ({})", code, file, line, code.name());
    } else {
        tracing::error!(
            "glError: {:x} caught at {}:{} ({}): {}",
            code,
            file,
            line,
            code.name(),
            context
        );
    }

    Some(code)
}

#[cfg(test)]
mod tests {
    use super::GpuErrorCode;

    #[test]
    fn names_standard_codes() {
        assert_eq!(GpuErrorCode(0x0500).name(), "GL_INVALID_ENUM");
        assert_eq!(GpuErrorCode(0x0502).name(), "GL_INVALID_OPERATION");
        assert_eq!(GpuErrorCode(0x0505).name(), "GL_OUT_OF_MEMORY");
        assert_eq!(GpuErrorCode(0x1234).name(), "<unknown>");
    }

    #[test]
    fn formats_as_hex() {
        let code = GpuErrorCode(0x0502);
        assert_eq!(format!("{code:x}"), "502");
        assert_eq!(format!("{code:X}"), "502");
        assert_eq!(code.to_string(), "GL_INVALID_OPERATION (0x502)");
    }
}
