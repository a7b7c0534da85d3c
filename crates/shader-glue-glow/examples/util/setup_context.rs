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

// Sets up a current OpenGL context for the examples using glutin.

use shader_glue_glow::GlowContext;

use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, NotCurrentContext, PossiblyCurrentContext, Version,
};
use glutin::display::{Display, GetGlDisplay};
use glutin::prelude::*;
use glutin::surface::{Surface, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};

use raw_window_handle::HasRawWindowHandle;

use std::error::Error;
use std::mem;

use winit::event::{Event, WindowEvent};
use winit::event_loop::{EventLoop, EventLoopWindowTarget};
use winit::window::{Window, WindowBuilder};

pub(crate) fn init() {
    tracing_subscriber::fmt::init();
}

struct GlutinSetup {
    display: Display,
    config: Config,
    context: ContextType,
    window: Option<Window>,
}

#[derive(Default)]
enum ContextType {
    NotCurrent(NotCurrentContext),
    Current {
        #[allow(dead_code)]
        context: PossiblyCurrentContext,
        #[allow(dead_code)]
        window: Window,
        #[allow(dead_code)]
        surface: Surface<WindowSurface>,
    },
    #[default]
    Hole,
}

fn make_window_builder() -> WindowBuilder {
    WindowBuilder::new()
        .with_title("shader-glue-glow example")
        .with_visible(false)
}

impl GlutinSetup {
    fn new<T>(event_loop: &EventLoopWindowTarget<T>) -> Result<Self, Box<dyn Error>> {
        let window = if cfg!(windows) {
            Some(make_window_builder())
        } else {
            None
        };

        let display = DisplayBuilder::new().with_window_builder(window);
        let (window, gl_config) =
            display.build(event_loop, ConfigTemplateBuilder::new(), |mut configs| {
                configs.next().expect("no GL configs available")
            })?;

        tracing::debug!("Config: {:?}", &gl_config);
        tracing::debug!("Api: {:?}", gl_config.api());

        // Try a desktop context first, then fall back to the ES flavors.
        let window_handle = window.as_ref().map(|w| w.raw_window_handle());
        let contexts = [
            ContextAttributesBuilder::new().build(window_handle),
            ContextAttributesBuilder::new()
                .with_context_api(ContextApi::Gles(None))
                .build(window_handle),
            ContextAttributesBuilder::new()
                .with_context_api(ContextApi::Gles(Some(Version::new(2, 0))))
                .build(window_handle),
        ];

        let display = gl_config.display();
        let gl_context = contexts
            .iter()
            .find_map(|attributes| unsafe { display.create_context(&gl_config, attributes).ok() })
            .ok_or("Could not create a context")?;

        Ok(Self {
            display,
            config: gl_config,
            context: ContextType::NotCurrent(gl_context),
            window,
        })
    }

    fn make_current<T>(
        &mut self,
        window_target: &EventLoopWindowTarget<T>,
    ) -> Result<glow::Context, Box<dyn Error>> {
        let window = match self.window.take() {
            Some(window) => window,
            None => glutin_winit::finalize_window(
                window_target,
                make_window_builder(),
                &self.config,
            )?,
        };

        let attrs = window.build_surface_attributes(<_>::default());
        let surface = unsafe { self.display.create_window_surface(&self.config, &attrs)? };

        let context = match mem::take(&mut self.context) {
            ContextType::NotCurrent(context) => context.make_current(&surface)?,
            _ => return Err("context is already current".into()),
        };

        self.context = ContextType::Current {
            context,
            window,
            surface,
        };

        let display = self.display.clone();
        #[allow(unused_mut)]
        let mut glow_context = unsafe {
            glow::Context::from_loader_function_cstr(|s| display.get_proc_address(s) as *const _)
        };

        #[cfg(not(target_vendor = "apple"))]
        unsafe {
            use glow::HasContext;

            glow_context.enable(glow::DEBUG_OUTPUT);
            glow_context.debug_message_callback(debug_message_callback);
        }

        Ok(glow_context)
    }
}

/// Make a context current, run `f` against it once, then exit.
pub(crate) fn with_context(
    f: impl FnOnce(&mut GlowContext<glow::Context>) + 'static,
) -> Result<(), Box<dyn Error>> {
    let event_loop = EventLoop::new();
    let mut setup = GlutinSetup::new(&event_loop)?;
    let mut f = Some(f);

    event_loop.run(move |event, window_target, control_flow| {
        control_flow.set_wait();
        match event {
            Event::Resumed => {
                match setup.make_current(window_target) {
                    Ok(context) => {
                        if let Some(f) = f.take() {
                            // SAFETY: The context was just made current.
                            let mut context = unsafe { GlowContext::new(context) };
                            f(&mut context);
                        }
                    }
                    Err(err) => tracing::error!("Failed to set up a GL context: {}", err),
                }
                control_flow.set_exit();
            }
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => control_flow.set_exit(),
            _ => (),
        }
    })
}

#[cfg(not(target_vendor = "apple"))]
fn debug_message_callback(source: u32, ty: u32, id: u32, severity: u32, message: &str) {
    let source = match source {
        glow::DEBUG_SOURCE_API => "API",
        glow::DEBUG_SOURCE_WINDOW_SYSTEM => "Window System",
        glow::DEBUG_SOURCE_SHADER_COMPILER => "Shader Compiler",
        glow::DEBUG_SOURCE_THIRD_PARTY => "Third Party",
        glow::DEBUG_SOURCE_APPLICATION => "Application",
        glow::DEBUG_SOURCE_OTHER => "Other",
        _ => "Unknown",
    };

    let ty = match ty {
        glow::DEBUG_TYPE_ERROR => "Error",
        glow::DEBUG_TYPE_DEPRECATED_BEHAVIOR => "Deprecated Behavior",
        glow::DEBUG_TYPE_UNDEFINED_BEHAVIOR => "Undefined Behavior",
        glow::DEBUG_TYPE_PORTABILITY => "Portability",
        glow::DEBUG_TYPE_PERFORMANCE => "Performance",
        glow::DEBUG_TYPE_MARKER => "Marker",
        glow::DEBUG_TYPE_OTHER => "Other",
        _ => "Unknown",
    };

    match severity {
        glow::DEBUG_SEVERITY_HIGH => tracing::error!("{ty}-{id} ({source}): {message}"),
        glow::DEBUG_SEVERITY_MEDIUM => tracing::warn!("{ty}-{id} ({source}): {message}"),
        glow::DEBUG_SEVERITY_LOW => tracing::info!("{ty}-{id} ({source}): {message}"),
        glow::DEBUG_SEVERITY_NOTIFICATION => tracing::debug!("{ty}-{id} ({source}): {message}"),
        _ => (),
    }
}
