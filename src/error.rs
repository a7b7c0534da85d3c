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

//! Build status and errors.

use crate::shader::ShaderStage;

use std::error::Error;
use std::fmt;

/// The outcome of each stage of a program build.
///
/// A stage that was never run counts as failed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct BuildStatus {
    /// Whether the vertex shader compiled.
    pub vertex: bool,

    /// Whether the fragment shader compiled.
    pub fragment: bool,

    /// Whether the program linked.
    pub link: bool,

    /// Whether the program validated.
    pub validate: bool,
}

impl BuildStatus {
    /// Whether every stage succeeded.
    pub fn is_success(&self) -> bool {
        self.vertex && self.fragment && self.link && self.validate
    }

    /// Whether both shader stages compiled.
    pub fn compiled(&self) -> bool {
        self.vertex && self.fragment
    }

    pub(crate) fn set_compiled(&mut self, stage: ShaderStage, success: bool) {
        match stage {
            ShaderStage::Vertex => self.vertex = success,
            ShaderStage::Fragment => self.fragment = success,
        }
    }
}

/// A single stage of a program build that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageFailure {
    /// A shader failed to compile, or its shader object could not be created.
    Compile {
        /// The stage of the shader.
        stage: ShaderStage,

        /// The compiler's info log.
        info_log: String,
    },

    /// The program failed to link.
    Link {
        /// The linker's info log.
        info_log: String,
    },

    /// The program failed to validate.
    Validate {
        /// The validator's info log.
        info_log: String,
    },
}

impl StageFailure {
    /// The driver's info log for this failure.
    pub fn info_log(&self) -> &str {
        match self {
            StageFailure::Compile { info_log, .. }
            | StageFailure::Link { info_log }
            | StageFailure::Validate { info_log } => info_log,
        }
    }
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageFailure::Compile { stage, .. } => write!(f, "failed to compile {stage} shader")?,
            StageFailure::Link { .. } => f.write_str("failed to link program")?,
            StageFailure::Validate { .. } => f.write_str("failed to validate program")?,
        }

        let info_log = self.info_log().trim_end();
        if !info_log.is_empty() {
            write!(f, ": {info_log}")?;
        }

        Ok(())
    }
}

/// An error that occurred while building a program.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BuildError {
    /// The driver could not create a program object.
    CreateProgram(String),

    /// One or more build stages failed.
    Failed {
        /// The outcome of every stage.
        status: BuildStatus,

        /// The stages that ran and failed, in the order they ran.
        failures: Vec<StageFailure>,
    },
}

impl BuildError {
    /// The outcome of every stage.
    pub fn status(&self) -> BuildStatus {
        match self {
            BuildError::CreateProgram(_) => BuildStatus::default(),
            BuildError::Failed { status, .. } => *status,
        }
    }

    /// The stages that failed.
    pub fn failures(&self) -> &[StageFailure] {
        match self {
            BuildError::CreateProgram(_) => &[],
            BuildError::Failed { failures, .. } => failures,
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::CreateProgram(err) => write!(f, "failed to create program: {err}"),
            BuildError::Failed { failures, .. } => {
                f.write_str("failed to build program")?;
                for (i, failure) in failures.iter().enumerate() {
                    f.write_str(if i == 0 { ": " } else { "; " })?;
                    write!(f, "{failure}")?;
                }
                Ok(())
            }
        }
    }
}

impl Error for BuildError {}
