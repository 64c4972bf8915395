use bevy::prelude::*;
use constants::assets::BACK_BUTTON_IMAGE_PATH;
use constants::overlay::{
    BACK_BUTTON_ID, FLOWER_BUTTON_ID, FLOWER_BUTTON_LABEL, OVERLAY_ROOT_ID, SKELETON_BUTTON_ID,
    SKELETON_BUTTON_LABEL, SPAWN_BUTTON_ID, SPAWN_BUTTON_LABEL,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlButtonElement, HtmlElement, HtmlImageElement};

use crate::engine::assets::model_templates::PlaceableModel;
use crate::overlay::input::{SessionInput, SessionInputQueue};
use crate::overlay::spawn_button::OverlayState;
use crate::xr::error::{XrError, describe_js_error};

/// The in-session overlay: back, two model selectors, and spawn.
///
/// Held as a non-send resource since DOM handles cannot leave the main thread.
/// The back button is wired by the session driver, which ends the session
/// directly instead of going through the queue.
pub struct DomOverlay {
    root: HtmlElement,
    back_button: HtmlButtonElement,
    spawn_button: HtmlButtonElement,
    // Released with the overlay.
    _listeners: Vec<Closure<dyn FnMut()>>,
}

impl DomOverlay {
    /// Build the overlay tree, append it to the body and wire the model and
    /// spawn buttons to the input queue.
    pub fn build(document: &Document, queue: &SessionInputQueue) -> Result<Self, XrError> {
        let root: HtmlElement = create_element(document, "div")?;
        root.set_id(OVERLAY_ROOT_ID);

        let back_button: HtmlButtonElement = create_element(document, "button")?;
        back_button.set_id(BACK_BUTTON_ID);
        let back_image: HtmlImageElement = create_element(document, "img")?;
        back_image.set_src(BACK_BUTTON_IMAGE_PATH);
        append(&back_button, &back_image)?;

        let skeleton_button = text_button(document, SKELETON_BUTTON_ID, SKELETON_BUTTON_LABEL)?;
        let flower_button = text_button(document, FLOWER_BUTTON_ID, FLOWER_BUTTON_LABEL)?;
        let spawn_button = text_button(document, SPAWN_BUTTON_ID, SPAWN_BUTTON_LABEL)?;

        for button in [&back_button, &skeleton_button, &flower_button, &spawn_button] {
            append(&root, button)?;
        }

        let listeners = vec![
            on_click(
                &skeleton_button,
                queue,
                SessionInput::SelectModel(PlaceableModel::Skeleton),
            )?,
            on_click(
                &flower_button,
                queue,
                SessionInput::SelectModel(PlaceableModel::Flower),
            )?,
            on_click(&spawn_button, queue, SessionInput::Spawn)?,
        ];

        let body = document.body().ok_or(XrError::MissingGlobal("document.body"))?;
        append(&body, &root)?;

        let overlay = Self {
            root,
            back_button,
            spawn_button,
            _listeners: listeners,
        };
        overlay.set_spawn_button_visible(false);
        Ok(overlay)
    }

    pub fn root(&self) -> &HtmlElement {
        &self.root
    }

    pub fn back_button(&self) -> &HtmlButtonElement {
        &self.back_button
    }

    pub fn set_spawn_button_visible(&self, visible: bool) {
        let display = if visible { "block" } else { "none" };
        let _ = self.spawn_button.style().set_property("display", display);
    }
}

/// Mirror [`OverlayState`] into the DOM when it changes.
pub fn sync_dom_overlay(overlay: Option<NonSend<DomOverlay>>, state: Res<OverlayState>) {
    let Some(overlay) = overlay else {
        return;
    };
    if state.is_changed() {
        overlay.set_spawn_button_visible(state.spawn_button_visible);
    }
}

fn create_element<T: JsCast>(document: &Document, tag: &str) -> Result<T, XrError> {
    document
        .create_element(tag)
        .map_err(|err| XrError::RenderSurface(describe_js_error(&err)))?
        .dyn_into::<T>()
        .map_err(|_| XrError::RenderSurface(format!("<{tag}> has an unexpected type")))
}

fn text_button(document: &Document, id: &str, label: &str) -> Result<HtmlButtonElement, XrError> {
    let button: HtmlButtonElement = create_element(document, "button")?;
    button.set_id(id);
    button.set_text_content(Some(label));
    Ok(button)
}

fn append(parent: &web_sys::Node, child: &web_sys::Node) -> Result<(), XrError> {
    parent
        .append_child(child)
        .map(|_| ())
        .map_err(|err| XrError::RenderSurface(describe_js_error(&err)))
}

fn on_click(
    button: &HtmlButtonElement,
    queue: &SessionInputQueue,
    input: SessionInput,
) -> Result<Closure<dyn FnMut()>, XrError> {
    let queue = queue.clone();
    let closure = Closure::<dyn FnMut()>::new(move || {
        queue.push(input);
    });
    button
        .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
        .map_err(|err| XrError::RenderSurface(describe_js_error(&err)))?;
    Ok(closure)
}
