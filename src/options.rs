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

//! Knobs for a program build.

/// What to do after a build stage fails.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum BuildPolicy {
    /// Run every stage even after one has failed.
    ///
    /// The driver gets a chance to report on every stage, so a single failed build
    /// produces the complete set of compiler and linker logs.
    #[default]
    RunAllStages,

    /// Stop at the first stage that fails.
    ///
    /// Shader and program objects are still cleaned up. Stages that never ran are
    /// reported as failed.
    ShortCircuit,
}

/// Options for building a shader program.
#[derive(Debug, Clone)]
pub struct BuildOptions<'a> {
    pub(crate) policy: BuildPolicy,
    pub(crate) echo_sources_on_failure: bool,
    pub(crate) check_errors: bool,
    pub(crate) label: Option<&'a str>,
}

impl Default for BuildOptions<'_> {
    fn default() -> Self {
        Self {
            policy: BuildPolicy::default(),
            echo_sources_on_failure: true,
            check_errors: true,
            label: None,
        }
    }
}

impl<'a> BuildOptions<'a> {
    /// Create the default set of options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the failure policy.
    pub fn policy(mut self, policy: BuildPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set whether shader sources are logged when they fail to compile.
    pub fn echo_sources_on_failure(mut self, echo: bool) -> Self {
        self.echo_sources_on_failure = echo;
        self
    }

    /// Set whether the driver's error flag is checked after each stage.
    pub fn check_errors(mut self, check: bool) -> Self {
        self.check_errors = check;
        self
    }

    /// Name the program in every log event emitted while building it.
    pub fn label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }

    /// The failure policy.
    pub fn get_policy(&self) -> BuildPolicy {
        self.policy
    }

    /// The label, if one was set.
    pub fn get_label(&self) -> Option<&'a str> {
        self.label
    }
}
