//! Browser entry point: entry button, session activation, the session's
//! animation frame callback and page teardown.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use bevy::prelude::*;
use constants::overlay::ENTRY_BUTTON_ID;
use js_sys::Promise;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    Document, Event, EventTarget, HtmlButtonElement, HtmlCanvasElement, HtmlElement,
    WebGl2RenderingContext, console,
};

use crate::engine::core::app_setup::{create_app, finish_plugins};
use crate::engine::core::app_state::ExitReason;
use crate::engine::core::config::{ArConfig, InteractionMode};
use crate::overlay::dom_overlay::DomOverlay;
use crate::overlay::entry_button::EntryButtonState;
use crate::overlay::input::{SessionInput, SessionInputQueue};
use crate::xr::error::{XrError, describe_js_error};
use crate::xr::frame_loop::{FrameOutcome, SessionTeardown, XrFrameLoop, end_from_event};
use crate::xr::host::{ImmersiveHost, SessionRequest};
use crate::xr::layer::{LayerPresenter, bind_canvas_surface, create_session_canvas};
use crate::xr::session::{XrSessionContext, bootstrap_session};
use crate::xr::webxr::{WebXrHost, XrFrame, XrSession, attach_base_layer, read_frame};

type SharedFrameLoop = Rc<RefCell<XrFrameLoop<WebSessionTeardown>>>;

// Bevy's logger is installed with the app, so failures before that go to the console.
fn log_error(message: &str) {
    console::error_1(&JsValue::from_str(message));
}

fn document() -> Result<Document, XrError> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or(XrError::MissingGlobal("document"))
}

fn set_display(element: &HtmlElement, display: &str) {
    let _ = element.style().set_property("display", display);
}

/// Label the entry button from the support query and start a session on click.
pub fn install_entry_button(config: ArConfig) -> Result<(), XrError> {
    let button: HtmlButtonElement = document()?
        .get_element_by_id(ENTRY_BUTTON_ID)
        .ok_or(XrError::MissingGlobal("#enter-ar-btn"))?
        .dyn_into()
        .map_err(|_| XrError::MissingGlobal("#enter-ar-btn"))?;

    let support_button = button.clone();
    spawn_local(async move {
        let supported = match WebXrHost::from_navigator() {
            Ok(host) => host
                .is_session_supported(constants::session::IMMERSIVE_AR_MODE)
                .await
                .unwrap_or(false),
            Err(err) => {
                log_error(&err.to_string());
                false
            }
        };
        EntryButtonState::from_support(supported).apply(&support_button);
    });

    let entry_button = button.clone();
    let on_click = Closure::<dyn FnMut()>::new(move || {
        let config = config.clone();
        let entry_button = entry_button.clone();
        spawn_local(async move {
            if let Err(err) = activate_xr(config, entry_button).await {
                log_error(&format!("Could not start AR session: {err}"));
            }
        });
    });
    button
        .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
        .map_err(|err| XrError::RenderSurface(describe_js_error(&err)))?;
    // The entry button lives as long as the page.
    on_click.forget();
    Ok(())
}

/// DOM created for one session, removed on failure or teardown.
#[derive(Clone)]
struct SessionPage {
    entry_button: HtmlButtonElement,
    canvas: HtmlCanvasElement,
    overlay_root: Option<HtmlElement>,
}

impl SessionPage {
    fn remove(&self) {
        self.canvas.remove();
        if let Some(root) = &self.overlay_root {
            root.remove();
        }
        set_display(&self.entry_button, "block");
    }
}

async fn activate_xr(config: ArConfig, entry_button: HtmlButtonElement) -> Result<(), XrError> {
    let document = document()?;
    let queue = SessionInputQueue::default();

    set_display(&entry_button, "none");
    let (canvas, gl) = match create_session_canvas(&document) {
        Ok(surface) => surface,
        Err(err) => {
            set_display(&entry_button, "block");
            return Err(err);
        }
    };
    let mut page = SessionPage {
        entry_button,
        canvas,
        overlay_root: None,
    };

    match start_session(&document, &config, &queue, &mut page, gl).await {
        Ok(()) => Ok(()),
        Err(err) => {
            page.remove();
            Err(err)
        }
    }
}

async fn start_session(
    document: &Document,
    config: &ArConfig,
    queue: &SessionInputQueue,
    page: &mut SessionPage,
    gl: WebGl2RenderingContext,
) -> Result<(), XrError> {
    let overlay = match config.interaction_mode {
        InteractionMode::Overlay => {
            let overlay = DomOverlay::build(document, queue)?;
            page.overlay_root = Some(overlay.root().clone());
            Some(overlay)
        }
        InteractionMode::SelectGesture => None,
    };

    let host = WebXrHost::from_navigator()?;
    let request = SessionRequest::for_mode(config.interaction_mode);
    let context = bootstrap_session(&host, &request).await?;

    let (mut app, presenter) =
        match build_session_app(config, queue, &context.session, gl, page).await {
            Ok(built) => built,
            Err(err) => {
                host.end_session(&context.session);
                return Err(err);
            }
        };
    let back_button = overlay.as_ref().map(|overlay| overlay.back_button().clone());
    if let Some(overlay) = overlay {
        app.insert_non_send_resource(overlay);
    }

    let listeners = Rc::new(RefCell::new(SessionListeners::default()));
    let frame_request = Rc::new(RefCell::new(FrameRequest::default()));
    let teardown = WebSessionTeardown {
        session: context.session.clone(),
        page: page.clone(),
        listeners: listeners.clone(),
        frame_request: frame_request.clone(),
    };
    let frame_loop: SharedFrameLoop = Rc::new(RefCell::new(XrFrameLoop::new(app, teardown)));

    match SessionListeners::attach(
        &context.session,
        back_button.as_ref(),
        Rc::downgrade(&frame_loop),
        queue,
    ) {
        Ok(attached) => *listeners.borrow_mut() = attached,
        Err(err) => {
            host.end_session(&context.session);
            return Err(err);
        }
    }
    start_frame_loop(frame_loop, Rc::new(context), presenter, frame_request);
    Ok(())
}

/// Build the app on the session canvas and attach the base layer.
async fn build_session_app(
    config: &ArConfig,
    queue: &SessionInputQueue,
    session: &XrSession,
    gl: WebGl2RenderingContext,
    page: &SessionPage,
) -> Result<(App, LayerPresenter), XrError> {
    let mut app = create_app(config.clone(), queue.clone());
    bind_canvas_surface(&mut app)?;
    // The renderer finishes initialising asynchronously on the web.
    while !finish_plugins(&mut app) {
        yield_to_browser().await;
    }

    let layer = attach_base_layer(session, &gl)?;
    Ok((app, LayerPresenter::new(gl, page.canvas.clone(), layer)))
}

async fn yield_to_browser() {
    let promise = Promise::new(&mut |resolve, _reject| {
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback(&resolve);
        }
    });
    let _ = JsFuture::from(promise).await;
}

/// A listener registered on `target` for `event`.
struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, XrError> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|err| XrError::RenderSurface(describe_js_error(&err)))?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }

    fn detach(&self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// Page and session listeners for one session. They only hold a weak
/// reference to the frame loop.
#[derive(Default)]
struct SessionListeners(Vec<Listener>);

impl SessionListeners {
    fn attach(
        session: &XrSession,
        back_button: Option<&HtmlButtonElement>,
        frame_loop: Weak<RefCell<XrFrameLoop<WebSessionTeardown>>>,
        queue: &SessionInputQueue,
    ) -> Result<Self, XrError> {
        let window = web_sys::window().ok_or(XrError::MissingGlobal("window"))?;
        let mut listeners = Vec::new();

        // Ends the session right away rather than on the next frame, which
        // may never come while the session is hidden.
        let exit_handler = |reason: ExitReason| {
            let frame_loop = frame_loop.clone();
            let queue = queue.clone();
            move |_event: Event| {
                if let Some(frame_loop) = frame_loop.upgrade() {
                    end_from_event(&frame_loop, reason, &queue);
                }
            }
        };

        if let Some(back_button) = back_button {
            listeners.push(Listener::attach(
                back_button,
                "click",
                exit_handler(ExitReason::BackButton),
            )?);
        }

        // Push a history entry so browser back fires `popstate` instead of leaving the page.
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", None);
        }
        listeners.push(Listener::attach(
            &window,
            "popstate",
            exit_handler(ExitReason::BackGesture),
        )?);

        listeners.push(Listener::attach(
            session,
            "end",
            exit_handler(ExitReason::HostEnded),
        )?);

        let select_queue = queue.clone();
        listeners.push(Listener::attach(session, "select", move |_event: Event| {
            select_queue.push(SessionInput::SelectAction);
        })?);

        Ok(Self(listeners))
    }

    fn detach(&self) {
        for listener in &self.0 {
            listener.detach();
        }
    }
}

/// The session's animation frame callback and its pending request.
#[derive(Default)]
struct FrameRequest {
    callback: Option<Closure<dyn FnMut(f64, XrFrame)>>,
    pending: Option<u32>,
}

impl FrameRequest {
    fn schedule(&mut self, session: &XrSession) {
        if let Some(callback) = self.callback.as_ref() {
            self.pending = Some(session.request_animation_frame(callback.as_ref().unchecked_ref()));
        }
    }
}

fn start_frame_loop(
    frame_loop: SharedFrameLoop,
    context: Rc<XrSessionContext<WebXrHost>>,
    presenter: LayerPresenter,
    frame_request: Rc<RefCell<FrameRequest>>,
) {
    let next_frame = frame_request.clone();
    let session = context.session.clone();
    let first_session = context.session.clone();

    let callback = Closure::new(move |_time: f64, frame: XrFrame| {
        next_frame.borrow_mut().pending = None;
        if !frame_loop.borrow().is_active() {
            return;
        }
        next_frame.borrow_mut().schedule(&session);

        let snapshot = read_frame(&frame, &context, presenter.layer());
        if frame_loop.borrow_mut().on_frame(snapshot) == FrameOutcome::Stop {
            debug!("Frame loop stopped");
            return;
        }
        presenter.present();
    });

    let mut request = frame_request.borrow_mut();
    request.callback = Some(callback);
    request.schedule(&first_session);
}

/// Ends the session and restores the page to its pre-session state.
pub struct WebSessionTeardown {
    session: XrSession,
    page: SessionPage,
    listeners: Rc<RefCell<SessionListeners>>,
    frame_request: Rc<RefCell<FrameRequest>>,
}

impl SessionTeardown for WebSessionTeardown {
    fn teardown(&mut self, reason: ExitReason) {
        let listeners = std::mem::take(&mut *self.listeners.borrow_mut());
        listeners.detach();

        let frame_callback = {
            let mut request = self.frame_request.borrow_mut();
            if let Some(pending) = request.pending.take() {
                self.session.cancel_animation_frame(pending);
            }
            request.callback.take()
        };

        if reason != ExitReason::HostEnded {
            let _ = self.session.end();
        }
        self.page.remove();

        // One of these closures may be the caller; release them after it returns.
        spawn_local(async move {
            drop(listeners);
            drop(frame_callback);
        });
        info!("Exited AR ({})", reason.as_str());
    }
}
