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

// An in-memory GL driver for the tests.
//
// It follows the rules of the real API closely enough to exercise the builder: sticky
// error flags, attribute bindings that only apply at link time, and uniforms that only
// exist once a program links.

#![allow(dead_code)]

use shader_glue::{GpuContext, ShaderStage};

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

pub const INVALID_VALUE: u32 = 0x0501;
pub const INVALID_OPERATION: u32 = 0x0502;

pub const MINIMAL_VERTEX: &str = "void main(){gl_Position=vec4(0);}";
pub const MINIMAL_FRAGMENT: &str = "void main(){gl_FragColor=vec4(1);}";

pub const BRUSH_VERTEX: &str = "
attribute vec4 inVertex;

uniform mat4 MVP;
uniform float pointSize;
uniform lowp vec4 vertexColor;

varying lowp vec4 color;

void main()
{
    gl_Position = MVP * inVertex;
    gl_PointSize = pointSize;
    color = vertexColor;
}
";

pub const BRUSH_FRAGMENT: &str = "
uniform sampler2D texture;
varying lowp vec4 color;

void main()
{
    gl_FragColor = color * texture2D(texture, gl_PointCoord);
}
";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// A log sink shared between a subscriber and the test that reads it back.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a subscriber that records everything at debug level and above, and
/// return what `f` returned along with the formatted log.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .without_time()
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    (result, buffer.contents())
}

/// The lines of `logs` that contain every one of `needles`.
pub fn lines_with<'a>(logs: &'a str, needles: &[&str]) -> Vec<&'a str> {
    logs.lines()
        .filter(|line| needles.iter().all(|needle| line.contains(needle)))
        .collect()
}

/// A call made into the fake driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateShader(ShaderStage, u32),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram(u32),
    AttachShader(u32, u32),
    BindAttribLocation(u32, u32, String),
    LinkProgram(u32),
    ValidateProgram(u32),
    DeleteProgram(u32),
    UniformLocation(u32, String),
    GetError(u32),
}

struct Shader {
    stage: ShaderStage,
    source: String,
    compiled: bool,
    info_log: String,
}

#[derive(Default)]
struct Program {
    attached: Vec<u32>,
    pending_attributes: HashMap<String, u32>,
    attributes: HashMap<String, u32>,
    uniforms: HashMap<String, i32>,
    linked: bool,
    validated: bool,
    info_log: String,
}

#[derive(Default)]
pub struct FakeGl {
    next_handle: u32,
    shaders: HashMap<u32, Shader>,
    programs: HashMap<u32, Program>,
    error: u32,

    /// Every call made so far, in order.
    pub calls: Vec<Call>,

    /// Make `create_program` fail.
    pub fail_create_program: bool,

    /// Make `create_shader` fail for this stage.
    pub fail_create_shader: Option<ShaderStage>,

    /// Make validation fail with this log, even for linked programs.
    pub validation_failure: Option<String>,

    /// Leave this in the info log of programs that link.
    pub link_log: Option<String>,
}

impl FakeGl {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    /// Record an error, keeping the first one until it is queried.
    pub fn raise(&mut self, code: u32) {
        if self.error == 0 {
            self.error = code;
        }
    }

    pub fn is_shader(&self, shader: u32) -> bool {
        self.shaders.contains_key(&shader)
    }

    pub fn is_program(&self, program: u32) -> bool {
        self.programs.contains_key(&program)
    }

    pub fn attached_shaders(&self, program: u32) -> Vec<u32> {
        self.programs
            .get(&program)
            .map(|p| p.attached.clone())
            .unwrap_or_default()
    }

    pub fn linked_attribute(&self, program: u32, name: &str) -> Option<u32> {
        self.programs
            .get(&program)
            .and_then(|p| p.attributes.get(name).copied())
    }

    pub fn created_shaders(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::CreateShader(_, shader) => Some(*shader),
                _ => None,
            })
            .collect()
    }

    pub fn position(&self, predicate: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls.iter().position(predicate)
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    /// Errors that were reported to the caller through `get_error`.
    pub fn reported_errors(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::GetError(code) if *code != 0 => Some(*code),
                _ => None,
            })
            .collect()
    }
}

fn compile(source: &str) -> Result<(), String> {
    let count = |c: char| source.chars().filter(|&x| x == c).count();

    if !source.contains("void main") {
        return Err("ERROR: 0:1: 'main' : function not defined\n".into());
    }
    if count('{') == 0 || count('{') != count('}') || count('(') != count(')') {
        return Err("ERROR: 0:1: '' : syntax error: unbalanced brackets\n".into());
    }

    Ok(())
}

fn declared_uniforms(source: &str) -> Vec<String> {
    source
        .split(';')
        .filter_map(|statement| {
            let mut tokens = statement.split_whitespace();
            if tokens.next() != Some("uniform") {
                return None;
            }

            tokens
                .last()
                .map(|name| name.split('[').next().unwrap_or(name).to_owned())
        })
        .collect()
}

impl GpuContext for FakeGl {
    type Shader = u32;
    type Program = u32;
    type UniformLocation = i32;

    fn create_shader(&mut self, stage: ShaderStage) -> Result<u32, String> {
        if self.fail_create_shader == Some(stage) {
            self.raise(0x0505);
            return Err(format!("could not create {stage} shader"));
        }

        let shader = self.handle();
        self.shaders.insert(
            shader,
            Shader {
                stage,
                source: String::new(),
                compiled: false,
                info_log: String::new(),
            },
        );
        self.calls.push(Call::CreateShader(stage, shader));
        Ok(shader)
    }

    fn shader_source(&mut self, shader: u32, sources: &[&str]) {
        match self.shaders.get_mut(&shader) {
            Some(s) => s.source = sources.concat(),
            None => self.raise(INVALID_VALUE),
        }
    }

    fn compile_shader(&mut self, shader: u32) {
        self.calls.push(Call::CompileShader(shader));
        match self.shaders.get_mut(&shader) {
            Some(s) => match compile(&s.source) {
                Ok(()) => {
                    s.compiled = true;
                    s.info_log = if s.source.contains("#warning") {
                        "WARNING: 0:1: user warning\n".into()
                    } else {
                        String::new()
                    };
                }
                Err(log) => {
                    s.compiled = false;
                    s.info_log = log;
                }
            },
            None => self.raise(INVALID_VALUE),
        }
    }

    fn shader_compile_status(&mut self, shader: u32) -> bool {
        self.shaders.get(&shader).map_or(false, |s| s.compiled)
    }

    fn shader_info_log(&mut self, shader: u32) -> String {
        self.shaders
            .get(&shader)
            .map(|s| s.info_log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&mut self, shader: u32) {
        self.calls.push(Call::DeleteShader(shader));
        if self.shaders.remove(&shader).is_none() {
            self.raise(INVALID_VALUE);
        }
    }

    fn create_program(&mut self) -> Result<u32, String> {
        if self.fail_create_program {
            self.raise(0x0505);
            return Err("could not create program".into());
        }

        let program = self.handle();
        self.programs.insert(program, Program::default());
        self.calls.push(Call::CreateProgram(program));
        Ok(program)
    }

    fn attach_shader(&mut self, program: u32, shader: u32) {
        self.calls.push(Call::AttachShader(program, shader));
        if !self.shaders.contains_key(&shader) {
            self.raise(INVALID_VALUE);
            return;
        }

        let Some(p) = self.programs.get_mut(&program) else {
            self.raise(INVALID_VALUE);
            return;
        };

        if p.attached.contains(&shader) {
            self.raise(INVALID_OPERATION);
        } else {
            p.attached.push(shader);
        }
    }

    fn bind_attrib_location(&mut self, program: u32, location: u32, name: &str) {
        self.calls
            .push(Call::BindAttribLocation(program, location, name.to_owned()));
        if name.starts_with("gl_") {
            self.raise(INVALID_OPERATION);
            return;
        }

        match self.programs.get_mut(&program) {
            Some(p) => {
                p.pending_attributes.insert(name.to_owned(), location);
            }
            None => self.raise(INVALID_VALUE),
        }
    }

    fn link_program(&mut self, program: u32) {
        self.calls.push(Call::LinkProgram(program));
        let Some(p) = self.programs.get_mut(&program) else {
            self.raise(INVALID_VALUE);
            return;
        };

        let compiled_stage = |stage: ShaderStage| {
            p.attached.iter().any(|shader| {
                self.shaders
                    .get(shader)
                    .map_or(false, |s| s.stage == stage && s.compiled)
            })
        };

        let missing = [ShaderStage::Vertex, ShaderStage::Fragment]
            .into_iter()
            .find(|&stage| !compiled_stage(stage));

        p.uniforms.clear();
        p.attributes.clear();
        p.validated = false;

        if let Some(stage) = missing {
            p.linked = false;
            p.info_log = format!("ERROR: Linking failed: no compiled {stage} shader attached\n");
            return;
        }

        let mut uniforms = Vec::new();
        for shader in &p.attached {
            if let Some(s) = self.shaders.get(shader) {
                for name in declared_uniforms(&s.source) {
                    if !uniforms.contains(&name) {
                        uniforms.push(name);
                    }
                }
            }
        }

        p.uniforms = uniforms
            .into_iter()
            .enumerate()
            .map(|(i, name)| (name, i as i32))
            .collect();
        p.attributes = p.pending_attributes.clone();
        p.linked = true;
        p.info_log = self.link_log.clone().unwrap_or_default();
    }

    fn program_link_status(&mut self, program: u32) -> bool {
        self.programs.get(&program).map_or(false, |p| p.linked)
    }

    fn validate_program(&mut self, program: u32) {
        self.calls.push(Call::ValidateProgram(program));
        let failure = self.validation_failure.clone();
        let Some(p) = self.programs.get_mut(&program) else {
            self.raise(INVALID_VALUE);
            return;
        };

        if !p.linked {
            p.validated = false;
            p.info_log = "Validation Failed: Program is not successfully linked.\n".into();
        } else if let Some(log) = failure {
            p.validated = false;
            p.info_log = log;
        } else {
            p.validated = true;
            p.info_log = String::new();
        }
    }

    fn program_validate_status(&mut self, program: u32) -> bool {
        self.programs.get(&program).map_or(false, |p| p.validated)
    }

    fn program_info_log(&mut self, program: u32) -> String {
        self.programs
            .get(&program)
            .map(|p| p.info_log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&mut self, program: u32) {
        self.calls.push(Call::DeleteProgram(program));
        if self.programs.remove(&program).is_none() {
            self.raise(INVALID_VALUE);
        }
    }

    fn uniform_location(&mut self, program: u32, name: &str) -> Option<i32> {
        self.calls
            .push(Call::UniformLocation(program, name.to_owned()));
        match self.programs.get(&program) {
            Some(p) if p.linked => p.uniforms.get(name).copied(),
            Some(_) => {
                self.raise(INVALID_OPERATION);
                None
            }
            None => {
                self.raise(INVALID_VALUE);
                None
            }
        }
    }

    fn get_error(&mut self) -> u32 {
        let code = std::mem::take(&mut self.error);
        self.calls.push(Call::GetError(code));
        code
    }
}
