//! Navigation Component
//!
//! Header bar with the logged-in user and the logout button.

use leptos::*;
use leptos_router::*;

use crate::state::browser::{browser_sessions, LocalStorageUserCache};
use crate::state::global::GlobalState;

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let navigate = use_navigate();

    let state_for_user = state.clone();
    let user_label = move || {
        state_for_user.read(|s| {
            s.current_user.as_ref().map(|user| {
                let name = user.full_name.clone().unwrap_or_else(|| user.username.clone());
                match &user.hospital_name {
                    Some(hospital) => format!("{} · {}", name, hospital),
                    None => name,
                }
            })
        })
    };

    let state_for_busy = state.clone();
    let on_logout = move |_| {
        let navigate = navigate.clone();
        state.run(move |controller| async move {
            let mut sessions = browser_sessions();
            let mut cache = LocalStorageUserCache;
            if let Err(e) = controller.logout(&mut sessions, &mut cache).await {
                web_sys::console::error_1(&format!("Logout error: {}", e).into());
            }
            navigate("/login", Default::default());
        });
    };

    view! {
        <header class="header">
            <div class="header-content">
                <A href="/" class="brand">
                    <span class="brand-title">"Sepsis Erken Uyarı Sistemi"</span>
                </A>

                {move || state_for_busy.is_busy().then(|| view! { <div class="loading-spinner" /> })}

                <div id="user-info" class="user-info">
                    {move || user_label().map(|label| view! {
                        <span class="user-name">{label}</span>
                        <button class="btn btn-secondary btn-sm" on:click=on_logout.clone()>
                            "Çıkış"
                        </button>
                    })}
                </div>
            </div>
        </header>
    }
}
