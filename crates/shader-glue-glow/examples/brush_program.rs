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

//! Builds the point-sprite program used to paint with a textured brush, then builds a
//! broken one to show what a failed build reports.

#[path = "util/setup_context.rs"]
mod util;

use shader_glue::{BuildOptions, ProgramBuilder, ShaderSource, ShaderStage};

const POINT_VERTEX: &str = "
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

const POINT_FRAGMENT: &str = "
uniform sampler2D texture;
varying lowp vec4 color;

void main()
{
    gl_FragColor = color * texture2D(texture, gl_PointCoord);
}
";

const UNIFORMS: [&str; 4] = ["MVP", "pointSize", "vertexColor", "texture"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    util::init();

    util::with_context(|gl| {
        let header = gl.version().glsl_header();

        let brush = ProgramBuilder::from_sources(
            ShaderSource::from_parts(ShaderStage::Vertex, [header, POINT_VERTEX]),
            ShaderSource::from_parts(ShaderStage::Fragment, [header, POINT_FRAGMENT]),
        )
        .attribute("inVertex", 0)
        .uniforms(UNIFORMS)
        .options(BuildOptions::new().label("brush"))
        .build(gl);

        match brush {
            Ok(program) => {
                for (name, location) in UNIFORMS.iter().zip(program.uniform_locations()) {
                    tracing::info!("uniform {} -> {:?}", name, location);
                }
                program.delete(gl);
            }
            Err(err) => tracing::error!("{}", err),
        }

        // The vertex stage does not compile, but the fragment stage, link and validation
        // still run and report.
        let broken = ProgramBuilder::new("not valid glsl", POINT_FRAGMENT)
            .options(BuildOptions::new().label("broken"))
            .build(gl);
        if let Err(err) = broken {
            tracing::info!("expected failure: {}", err);
        }
    })
}
