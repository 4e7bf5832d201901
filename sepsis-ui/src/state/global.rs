//! Global Application State
//!
//! The view controller owns the dashboard state; Leptos only sees a revision
//! counter that is bumped after every controller call. Components read the
//! controller state through [`GlobalState::read`], which tracks that counter.

use leptos::*;
use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use sepsis_dashboard::view::{AppState, Notification, ViewController, TOAST_DURATION_MS};

use crate::api::GlooClient;
use crate::components::chart::{CanvasSlot, CanvasSurface};

pub type Controller = ViewController<GlooClient, CanvasSurface>;

/// Global application state provided to all components
#[derive(Clone)]
pub struct GlobalState {
    pub controller: Rc<Controller>,
    /// Canvas the risk chart is drawn on
    pub canvas: Rc<CanvasSlot>,
    /// Bumped whenever the controller state may have changed
    pub revision: RwSignal<u64>,
    /// Visible toast with its sequence number
    pub toast: RwSignal<Option<(u64, Notification)>>,
    /// Requests in flight
    pub pending: RwSignal<u32>,
    toast_seq: Rc<Cell<u64>>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let canvas = Rc::new(CanvasSlot::default());
    let surface = CanvasSurface::new(canvas.clone());
    let controller = ViewController::new(GlooClient::from_storage(), surface);

    let state = GlobalState {
        controller: Rc::new(controller),
        canvas,
        revision: create_rw_signal(0),
        toast: create_rw_signal(None),
        pending: create_rw_signal(0),
        toast_seq: Rc::new(Cell::new(0)),
    };

    provide_context(state);
}

impl GlobalState {
    /// Read the controller state, re-running the caller when it changes
    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        self.revision.track();
        f(&self.controller.state())
    }

    /// Publish controller changes: show queued notifications, re-render readers
    pub fn sync(&self) {
        for notification in self.controller.take_notifications() {
            self.show(notification);
        }
        self.revision.update(|r| *r += 1);
    }

    /// Run a controller future on the event loop, then sync
    pub fn run<F, Fut>(&self, f: F)
    where
        F: FnOnce(Rc<Controller>) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let state = self.clone();
        state.pending.update(|n| *n += 1);
        spawn_local(async move {
            f(state.controller.clone()).await;
            state.pending.update(|n| *n = n.saturating_sub(1));
            state.sync();
        });
    }

    /// Show a toast (auto-clears after timeout)
    pub fn show(&self, notification: Notification) {
        if notification.is_error() {
            web_sys::console::error_1(&notification.message.clone().into());
        }

        let seq = self.toast_seq.get() + 1;
        self.toast_seq.set(seq);
        self.toast.set(Some((seq, notification)));

        let toast_signal = self.toast;
        gloo_timers::callback::Timeout::new(TOAST_DURATION_MS, move || {
            // A newer toast keeps its own timer
            if toast_signal.with_untracked(|t| matches!(t, Some((n, _)) if *n == seq)) {
                toast_signal.set(None);
            }
        })
        .forget();
    }

    pub fn show_error(&self, message: &str) {
        self.show(Notification::error(message));
    }

    pub fn is_busy(&self) -> bool {
        self.pending.get() > 0
    }
}
