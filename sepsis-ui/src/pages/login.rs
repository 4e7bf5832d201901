//! Login Page
//!
//! Hospital selection and credentials. An existing valid session skips
//! straight to the dashboard.

use leptos::*;
use leptos_router::*;

use sepsis_dashboard::api::{DashboardApi, Hospital};
use sepsis_dashboard::session::{self, LoginForm, SessionProbe};

use crate::state::browser::{browser_sessions, LocalStorageUserCache};
use crate::state::global::GlobalState;

const HOSPITALS_LOAD_FAILED: &str = "Hastane listesi yüklenemedi. Lütfen sayfayı yenileyin.";
const LOGIN_SUCCEEDED: &str = "Giriş başarılı! Yönlendiriliyorsunuz...";
const REDIRECT_DELAY_MS: u32 = 1000;

/// Banner above the form
#[derive(Clone, PartialEq)]
enum Banner {
    Error(String),
    Success(String),
}

/// Login page component
#[component]
pub fn Login() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let navigate = use_navigate();

    let (hospitals, set_hospitals) = create_signal(Vec::<Hospital>::new());
    let hospital = create_rw_signal(String::new());
    let username = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let remember_me = create_rw_signal(false);
    let show_password = create_rw_signal(false);
    let banner = create_rw_signal(None::<Banner>);
    let loading = create_rw_signal(false);

    // Load hospitals and probe any existing session on mount
    let controller = state.controller.clone();
    let navigate_existing = navigate.clone();
    spawn_local(async move {
        match controller.api().list_hospitals().await {
            Ok(list) => set_hospitals.set(list),
            Err(e) => {
                web_sys::console::error_1(&format!("Failed to load hospitals: {}", e).into());
                banner.set(Some(Banner::Error(HOSPITALS_LOAD_FAILED.to_string())));
            }
        }

        if let SessionProbe::Active(_) = browser_sessions().check_existing(controller.api()).await {
            navigate_existing("/", Default::default());
        }
    });

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();

        let form = LoginForm {
            hospital_id: hospital.get_untracked().parse().ok(),
            username: username.get_untracked(),
            password: password.get_untracked(),
            remember_me: remember_me.get_untracked(),
        };

        // Pre-checks never reach the backend
        if let Err(e) = form.validate() {
            banner.set(Some(Banner::Error(e.to_string())));
            return;
        }

        loading.set(true);
        banner.set(None);

        let controller = state.controller.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            let mut sessions = browser_sessions();
            let mut cache = LocalStorageUserCache;

            match session::login(controller.api(), &mut sessions, &mut cache, &form).await {
                Ok(_) => {
                    banner.set(Some(Banner::Success(LOGIN_SUCCEEDED.to_string())));
                    gloo_timers::callback::Timeout::new(REDIRECT_DELAY_MS, move || {
                        navigate("/", Default::default());
                    })
                    .forget();
                }
                Err(e) => {
                    banner.set(Some(Banner::Error(e.to_string())));
                    loading.set(false);
                }
            }
        });
    };

    view! {
        <div class="login-container">
            <div class="login-card">
                <div class="login-header">
                    <h1>"Sepsis Erken Uyarı Sistemi"</h1>
                    <p>"Devam etmek için giriş yapın"</p>
                </div>

                {move || banner.get().map(|b| match b {
                    Banner::Error(message) => view! {
                        <div id="errorMessage" class="error-message">{message}</div>
                    },
                    Banner::Success(message) => view! {
                        <div id="errorMessage" class="error-message success">{message}</div>
                    },
                })}

                <form id="loginForm" on:submit=on_submit>
                    <div class="form-group">
                        <label for="hospital">"Hastane"</label>
                        <select
                            id="hospital"
                            prop:value=move || hospital.get()
                            on:change=move |ev| hospital.set(event_target_value(&ev))
                        >
                            <option value="">"Hastane seçiniz"</option>
                            <For
                                each=move || hospitals.get()
                                key=|h| h.id
                                children=|h| view! {
                                    <option value=h.id.to_string()>{h.label()}</option>
                                }
                            />
                        </select>
                    </div>

                    <div class="form-group">
                        <label for="username">"Kullanıcı Adı"</label>
                        <input
                            type="text"
                            id="username"
                            autocomplete="username"
                            prop:value=move || username.get()
                            on:input=move |ev| username.set(event_target_value(&ev))
                        />
                    </div>

                    <div class="form-group">
                        <label for="password">"Şifre"</label>
                        <div class="password-input">
                            <input
                                type=move || if show_password.get() { "text" } else { "password" }
                                id="password"
                                autocomplete="current-password"
                                prop:value=move || password.get()
                                on:input=move |ev| password.set(event_target_value(&ev))
                            />
                            <button
                                type="button"
                                class="toggle-password"
                                on:click=move |_| show_password.update(|v| *v = !*v)
                            >
                                {move || if show_password.get() { "Gizle" } else { "Göster" }}
                            </button>
                        </div>
                    </div>

                    <div class="form-group checkbox">
                        <label>
                            <input
                                type="checkbox"
                                id="rememberMe"
                                prop:checked=move || remember_me.get()
                                on:change=move |ev| remember_me.set(event_target_checked(&ev))
                            />
                            " Beni hatırla"
                        </label>
                    </div>

                    <button
                        type="submit"
                        id="loginButton"
                        class="btn btn-primary btn-block"
                        disabled=move || loading.get()
                    >
                        {move || if loading.get() { "Giriş yapılıyor..." } else { "Giriş Yap" }}
                    </button>
                </form>
            </div>
        </div>
    }
}
