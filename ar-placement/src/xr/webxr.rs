//! WebXR Device API, Hit Test and DOM Overlay bindings.
//!
//! `web-sys` only exposes WebXR behind an unstable cfg and lacks the hit-test
//! module, so the handful of types the session needs are bound here.

use bevy::prelude::*;
use js_sys::{Array, Float32Array, Object, Promise, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{WebGl2RenderingContext, WebGlFramebuffer};

use crate::engine::tracking::frame_update::{ViewerPose, XrFrameSnapshot, first_hit};
use crate::xr::error::{XrError, describe_js_error};
use crate::xr::host::{ImmersiveHost, ReferenceSpaceKind, SessionRequest};
use crate::xr::session::XrSessionContext;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(extends = Object, js_name = XRSystem)]
    #[derive(Debug, Clone)]
    pub type XrSystem;

    #[wasm_bindgen(method, js_name = isSessionSupported)]
    fn is_session_supported(this: &XrSystem, mode: &str) -> Promise;

    #[wasm_bindgen(method, js_name = requestSession)]
    fn request_session(this: &XrSystem, mode: &str, options: &Object) -> Promise;

    #[wasm_bindgen(extends = web_sys::EventTarget, js_name = XRSession)]
    #[derive(Debug, Clone)]
    pub type XrSession;

    #[wasm_bindgen(method, js_name = requestReferenceSpace)]
    fn request_reference_space(this: &XrSession, kind: &str) -> Promise;

    #[wasm_bindgen(method, js_name = requestHitTestSource)]
    fn request_hit_test_source(this: &XrSession, options: &Object) -> Promise;

    #[wasm_bindgen(method, js_name = requestAnimationFrame)]
    pub fn request_animation_frame(this: &XrSession, callback: &js_sys::Function) -> u32;

    #[wasm_bindgen(method, js_name = cancelAnimationFrame)]
    pub fn cancel_animation_frame(this: &XrSession, handle: u32);

    #[wasm_bindgen(method, js_name = updateRenderState)]
    pub fn update_render_state(this: &XrSession, state: &Object);

    #[wasm_bindgen(method)]
    pub fn end(this: &XrSession) -> Promise;

    #[wasm_bindgen(extends = web_sys::EventTarget, js_name = XRReferenceSpace)]
    #[derive(Debug, Clone)]
    pub type XrReferenceSpace;

    #[wasm_bindgen(js_name = XRHitTestSource)]
    #[derive(Debug, Clone)]
    pub type XrHitTestSource;

    #[wasm_bindgen(js_name = XRWebGLLayer)]
    #[derive(Debug, Clone)]
    pub type XrWebGlLayer;

    #[wasm_bindgen(constructor, js_class = "XRWebGLLayer", catch)]
    pub fn new(
        session: &XrSession,
        context: &WebGl2RenderingContext,
        init: &Object,
    ) -> Result<XrWebGlLayer, JsValue>;

    #[wasm_bindgen(method, getter)]
    pub fn framebuffer(this: &XrWebGlLayer) -> Option<WebGlFramebuffer>;

    #[wasm_bindgen(method, getter, js_name = framebufferWidth)]
    pub fn framebuffer_width(this: &XrWebGlLayer) -> i32;

    #[wasm_bindgen(method, getter, js_name = framebufferHeight)]
    pub fn framebuffer_height(this: &XrWebGlLayer) -> i32;

    #[wasm_bindgen(method, js_name = getViewport)]
    fn get_viewport(this: &XrWebGlLayer, view: &XrView) -> Option<XrViewport>;

    #[wasm_bindgen(js_name = XRFrame)]
    #[derive(Debug, Clone)]
    pub type XrFrame;

    #[wasm_bindgen(method, js_name = getViewerPose)]
    fn get_viewer_pose(this: &XrFrame, space: &XrReferenceSpace) -> Option<XrViewerPose>;

    #[wasm_bindgen(method, js_name = getHitTestResults)]
    fn get_hit_test_results(this: &XrFrame, source: &XrHitTestSource) -> Array;

    #[wasm_bindgen(js_name = XRViewerPose)]
    type XrViewerPose;

    #[wasm_bindgen(method, getter)]
    fn views(this: &XrViewerPose) -> Array;

    #[wasm_bindgen(js_name = XRView)]
    type XrView;

    #[wasm_bindgen(method, getter)]
    fn transform(this: &XrView) -> XrRigidTransform;

    #[wasm_bindgen(method, getter, js_name = projectionMatrix)]
    fn projection_matrix(this: &XrView) -> Float32Array;

    #[wasm_bindgen(js_name = XRViewport)]
    type XrViewport;

    #[wasm_bindgen(method, getter)]
    fn width(this: &XrViewport) -> i32;

    #[wasm_bindgen(method, getter)]
    fn height(this: &XrViewport) -> i32;

    #[wasm_bindgen(js_name = XRHitTestResult)]
    type XrHitTestResult;

    #[wasm_bindgen(method, js_name = getPose)]
    fn get_pose(this: &XrHitTestResult, space: &XrReferenceSpace) -> Option<XrPose>;

    #[wasm_bindgen(js_name = XRPose)]
    type XrPose;

    #[wasm_bindgen(method, getter, js_name = transform)]
    fn pose_transform(this: &XrPose) -> XrRigidTransform;

    #[wasm_bindgen(js_name = XRRigidTransform)]
    type XrRigidTransform;

    #[wasm_bindgen(method, getter)]
    fn matrix(this: &XrRigidTransform) -> Float32Array;
}

/// `navigator.xr`, the browser side of [`ImmersiveHost`].
pub struct WebXrHost {
    system: XrSystem,
}

impl WebXrHost {
    pub fn from_navigator() -> Result<Self, XrError> {
        let window = web_sys::window().ok_or(XrError::MissingGlobal("window"))?;
        let xr = Reflect::get(&window.navigator(), &JsValue::from_str("xr"))
            .map_err(|_| XrError::MissingGlobal("navigator.xr"))?;
        if xr.is_undefined() || xr.is_null() {
            return Err(XrError::MissingGlobal("navigator.xr"));
        }
        Ok(Self {
            system: xr.unchecked_into(),
        })
    }
}

impl ImmersiveHost for WebXrHost {
    type Session = XrSession;
    type Space = XrReferenceSpace;
    type HitTestSource = XrHitTestSource;

    async fn is_session_supported(&self, mode: &str) -> Result<bool, XrError> {
        let supported = JsFuture::from(self.system.is_session_supported(mode))
            .await
            .map_err(|err| {
                warn!("Support query failed: {}", describe_js_error(&err));
                XrError::Unsupported
            })?;
        Ok(supported.as_bool().unwrap_or(false))
    }

    async fn request_session(&self, request: &SessionRequest) -> Result<XrSession, XrError> {
        let options = session_options(request)
            .map_err(|err| XrError::SessionRequest(describe_js_error(&err)))?;
        let session = JsFuture::from(self.system.request_session(request.mode, &options))
            .await
            .map_err(|err| XrError::SessionRequest(describe_js_error(&err)))?;
        Ok(session.unchecked_into())
    }

    async fn request_reference_space(
        &self,
        session: &XrSession,
        kind: ReferenceSpaceKind,
    ) -> Result<XrReferenceSpace, XrError> {
        let space = JsFuture::from(session.request_reference_space(kind.as_str()))
            .await
            .map_err(|err| XrError::ReferenceSpace {
                kind,
                reason: describe_js_error(&err),
            })?;
        Ok(space.unchecked_into())
    }

    async fn request_hit_test_source(
        &self,
        session: &XrSession,
        space: &XrReferenceSpace,
    ) -> Result<XrHitTestSource, XrError> {
        let options = Object::new();
        Reflect::set(&options, &JsValue::from_str("space"), space)
            .map_err(|err| XrError::HitTestSource(describe_js_error(&err)))?;
        let source = JsFuture::from(session.request_hit_test_source(&options))
            .await
            .map_err(|err| XrError::HitTestSource(describe_js_error(&err)))?;
        Ok(source.unchecked_into())
    }

    fn end_session(&self, session: &XrSession) {
        let _ = session.end();
    }
}

fn session_options(request: &SessionRequest) -> Result<Object, JsValue> {
    let options = Object::new();
    Reflect::set(
        &options,
        &JsValue::from_str("requiredFeatures"),
        &string_array(&request.required_features),
    )?;
    Reflect::set(
        &options,
        &JsValue::from_str("optionalFeatures"),
        &string_array(&request.optional_features),
    )?;

    if let Some(root_id) = request.dom_overlay_root {
        let root = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id(root_id))
            .ok_or_else(|| JsValue::from_str("DOM overlay root is not in the document"))?;
        let dom_overlay = Object::new();
        Reflect::set(&dom_overlay, &JsValue::from_str("root"), &root)?;
        Reflect::set(&options, &JsValue::from_str("domOverlay"), &dom_overlay)?;
    }
    Ok(options)
}

fn string_array(values: &[&str]) -> Array {
    values.iter().map(|value| JsValue::from_str(value)).collect()
}

/// Attach a WebGL layer bound to `context` as the session's base layer.
///
/// The layer is single-sampled so the rendered canvas can be blitted into it.
pub fn attach_base_layer(
    session: &XrSession,
    context: &WebGl2RenderingContext,
) -> Result<XrWebGlLayer, XrError> {
    let init = Object::new();
    Reflect::set(&init, &JsValue::from_str("antialias"), &JsValue::FALSE)
        .map_err(|err| XrError::RenderSurface(describe_js_error(&err)))?;
    Reflect::set(&init, &JsValue::from_str("alpha"), &JsValue::TRUE)
        .map_err(|err| XrError::RenderSurface(describe_js_error(&err)))?;

    let layer = XrWebGlLayer::new(session, context, &init)
        .map_err(|err| XrError::RenderSurface(describe_js_error(&err)))?;
    let state = Object::new();
    Reflect::set(&state, &JsValue::from_str("baseLayer"), &layer)
        .map_err(|err| XrError::RenderSurface(describe_js_error(&err)))?;
    session.update_render_state(&state);
    Ok(layer)
}

/// Read pose, viewport and hit-test results for one frame.
///
/// Only the first view is used. Hit positions are in the local space.
pub fn read_frame(
    frame: &XrFrame,
    context: &XrSessionContext<WebXrHost>,
    layer: &XrWebGlLayer,
) -> XrFrameSnapshot {
    let Some(pose) = frame.get_viewer_pose(&context.local_space) else {
        return XrFrameSnapshot::lost();
    };
    let views = pose.views();
    if views.length() == 0 {
        return XrFrameSnapshot::lost();
    }
    let view: XrView = views.get(0).unchecked_into();

    let (Some(world_from_view), Some(clip_from_view)) = (
        mat4_from(&view.transform().matrix()),
        mat4_from(&view.projection_matrix()),
    ) else {
        return XrFrameSnapshot::lost();
    };

    let viewport = layer
        .get_viewport(&view)
        .map(|viewport| {
            UVec2::new(
                viewport.width().max(0) as u32,
                viewport.height().max(0) as u32,
            )
        })
        .unwrap_or_default();

    let hits = first_hit(
        frame
            .get_hit_test_results(&context.hit_test_source)
            .iter()
            .map(|result| hit_position(&result.unchecked_into(), &context.local_space)),
    );

    XrFrameSnapshot::tracked(
        ViewerPose {
            world_from_view,
            clip_from_view,
            viewport,
        },
        hits,
    )
}

fn hit_position(result: &XrHitTestResult, space: &XrReferenceSpace) -> Option<Vec3> {
    let pose = result.get_pose(space)?;
    mat4_from(&pose.pose_transform().matrix()).map(|matrix| matrix.w_axis.truncate())
}

/// WebXR matrices are column-major `Float32Array`s of length 16.
fn mat4_from(array: &Float32Array) -> Option<Mat4> {
    if array.length() != 16 {
        return None;
    }
    let mut columns = [0.0f32; 16];
    array.copy_to(&mut columns);
    Some(Mat4::from_cols_array(&columns))
}
