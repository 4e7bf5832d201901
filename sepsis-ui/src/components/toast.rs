//! Toast Notification Component
//!
//! Single toast element; the class carries the level and `show` while visible.

use leptos::*;

use crate::state::global::GlobalState;

/// Toast notification
#[component]
pub fn Toast() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let toast = state.toast;

    view! {
        <div
            id="toast"
            class=move || toast.with(|t| match t {
                Some((_, notification)) => notification.css_class(),
                None => "toast".to_string(),
            })
        >
            {move || toast.with(|t| t.as_ref().map(|(_, n)| n.message.clone()).unwrap_or_default())}
        </div>
    }
}
