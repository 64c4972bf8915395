use thiserror::Error;

use crate::xr::host::ReferenceSpaceKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XrError {
    #[error("immersive AR is not supported by this browser")]
    Unsupported,
    #[error("session request rejected: {0}")]
    SessionRequest(String),
    #[error("{kind} reference space unavailable: {reason}")]
    ReferenceSpace {
        kind: ReferenceSpaceKind,
        reason: String,
    },
    #[error("hit-test source request rejected: {0}")]
    HitTestSource(String),
    #[error("render surface setup failed: {0}")]
    RenderSurface(String),
    #[error("browser global `{0}` is missing")]
    MissingGlobal(&'static str),
}

/// Readable message for a rejected promise or thrown exception.
#[cfg(target_arch = "wasm32")]
pub fn describe_js_error(value: &wasm_bindgen::JsValue) -> String {
    use wasm_bindgen::JsCast;

    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}
