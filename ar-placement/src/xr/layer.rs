//! The session's render surface.
//!
//! Bevy renders through its WebGL2 backend into a canvas that carries an
//! XR-compatible context. After every update the canvas drawing buffer is
//! blitted into the `XRWebGLLayer` framebuffer the session composites.

use bevy::prelude::*;
use bevy::window::{PrimaryWindow, RawHandleWrapper, RawHandleWrapperHolder, WindowWrapper};
use js_sys::{Object, Reflect};
use raw_window_handle::{
    DisplayHandle, HandleError, HasDisplayHandle, HasWindowHandle, RawWindowHandle,
    WebWindowHandle, WindowHandle,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlCanvasElement, WebGl2RenderingContext};

use crate::engine::core::window_config::CANVAS_SELECTOR;
use crate::xr::error::{XrError, describe_js_error};
use crate::xr::webxr::XrWebGlLayer;

/// `data-raw-handle` value the renderer finds the session canvas by.
const CANVAS_RAW_HANDLE: u32 = 1;

/// Web window handle naming the session canvas.
struct SessionCanvas;

impl HasWindowHandle for SessionCanvas {
    fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
        let raw = RawWindowHandle::Web(WebWindowHandle::new(CANVAS_RAW_HANDLE));
        // SAFETY: a web handle is an attribute value looked up in the document, not a pointer.
        Ok(unsafe { WindowHandle::borrow_raw(raw) })
    }
}

impl HasDisplayHandle for SessionCanvas {
    fn display_handle(&self) -> Result<DisplayHandle<'_>, HandleError> {
        Ok(DisplayHandle::web())
    }
}

/// Insert the session canvas and give it an XR-compatible WebGL2 context.
///
/// The renderer asks the same canvas for `webgl2` later and receives this
/// context, so the base layer and the renderer share one GL context.
pub fn create_session_canvas(
    document: &Document,
) -> Result<(HtmlCanvasElement, WebGl2RenderingContext), XrError> {
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|err| XrError::RenderSurface(describe_js_error(&err)))?
        .dyn_into()
        .map_err(|_| XrError::RenderSurface("canvas has an unexpected type".to_string()))?;
    canvas.set_id(CANVAS_SELECTOR.trim_start_matches('#'));
    canvas
        .set_attribute("data-raw-handle", &CANVAS_RAW_HANDLE.to_string())
        .map_err(|err| XrError::RenderSurface(describe_js_error(&err)))?;

    document
        .body()
        .ok_or(XrError::MissingGlobal("document.body"))?
        .append_child(&canvas)
        .map_err(|err| XrError::RenderSurface(describe_js_error(&err)))?;

    match xr_compatible_context(&canvas) {
        Ok(gl) => Ok((canvas, gl)),
        Err(err) => {
            canvas.remove();
            Err(err)
        }
    }
}

fn xr_compatible_context(canvas: &HtmlCanvasElement) -> Result<WebGl2RenderingContext, XrError> {
    let options = Object::new();
    for (key, value) in [("xrCompatible", true), ("antialias", false), ("alpha", true)] {
        Reflect::set(&options, &JsValue::from_str(key), &JsValue::from_bool(value))
            .map_err(|err| XrError::RenderSurface(describe_js_error(&err)))?;
    }

    canvas
        .get_context_with_context_options("webgl2", &options)
        .map_err(|err| XrError::RenderSurface(describe_js_error(&err)))?
        .ok_or_else(|| XrError::RenderSurface("WebGL2 is unavailable".to_string()))?
        .dyn_into()
        .map_err(|_| XrError::RenderSurface("unexpected WebGL context type".to_string()))
}

/// Point the primary window at the session canvas.
///
/// Must run right after the plugins are added: the renderer reads the
/// handle when its asynchronous initialisation starts.
pub fn bind_canvas_surface(app: &mut App) -> Result<(), XrError> {
    let wrapper = RawHandleWrapper::new(&WindowWrapper::new(SessionCanvas))
        .map_err(|err| XrError::RenderSurface(err.to_string()))?;

    let world = app.world_mut();
    let mut windows =
        world.query_filtered::<(Entity, &RawHandleWrapperHolder), With<PrimaryWindow>>();
    let (window, holder) = windows
        .single(world)
        .map(|(window, holder)| (window, holder.clone()))
        .map_err(|_| XrError::RenderSurface("the app has no primary window".to_string()))?;

    if let Ok(mut slot) = holder.0.lock() {
        *slot = Some(wrapper.clone());
    }
    world.entity_mut(window).insert(wrapper);
    Ok(())
}

/// Copies each rendered frame into the session's base layer.
pub struct LayerPresenter {
    gl: WebGl2RenderingContext,
    canvas: HtmlCanvasElement,
    layer: XrWebGlLayer,
}

impl LayerPresenter {
    pub fn new(gl: WebGl2RenderingContext, canvas: HtmlCanvasElement, layer: XrWebGlLayer) -> Self {
        Self { gl, canvas, layer }
    }

    pub fn layer(&self) -> &XrWebGlLayer {
        &self.layer
    }

    /// Blit the canvas drawing buffer into the layer framebuffer.
    pub fn present(&self) {
        let gl = &self.gl;
        gl.disable(WebGl2RenderingContext::SCISSOR_TEST);
        gl.bind_framebuffer(WebGl2RenderingContext::READ_FRAMEBUFFER, None);
        gl.bind_framebuffer(
            WebGl2RenderingContext::DRAW_FRAMEBUFFER,
            self.layer.framebuffer().as_ref(),
        );
        gl.blit_framebuffer(
            0,
            0,
            self.canvas.width() as i32,
            self.canvas.height() as i32,
            0,
            0,
            self.layer.framebuffer_width(),
            self.layer.framebuffer_height(),
            WebGl2RenderingContext::COLOR_BUFFER_BIT,
            WebGl2RenderingContext::LINEAR,
        );
        gl.bind_framebuffer(WebGl2RenderingContext::FRAMEBUFFER, None);
    }
}
