//! App Root Component
//!
//! Routing and global providers.

use leptos::*;
use leptos_router::*;

use crate::components::Toast;
use crate::pages::{Dashboard, Login};
use crate::state::global::provide_global_state;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // Provide global state to all components
    provide_global_state();

    view! {
        <Router>
            <Routes>
                <Route path="/login" view=Login />
                <Route path="/" view=Dashboard />
                <Route path="/*any" view=NotFound />
            </Routes>

            // Toast notifications
            <Toast />
        </Router>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="empty-state">
            <h1>"Sayfa bulunamadı"</h1>
            <A href="/" class="btn btn-primary">"Hasta listesine dön"</A>
        </div>
    }
}
