//! Dashboard Page
//!
//! Patient list and patient detail. Both panels stay in the DOM; the active
//! one carries the `active` class.

use leptos::*;
use leptos_router::*;

use sepsis_dashboard::view::{ActiveView, HourlyCard, NO_HOURLY_DATA, NO_PATIENTS};

use crate::components::{AddPatientModal, BiomarkerForm, Nav, PatientCardItem, RiskChart};
use crate::state::global::GlobalState;

const DELETE_CONFIRMATION: &str = "Bu hastayı silmek istediğinizden emin misiniz?";

/// Dashboard page component
#[component]
pub fn Dashboard() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let navigate = use_navigate();
    let modal_open = create_rw_signal(false);

    // Confirm the session, then load the list
    state.run(move |controller| async move {
        if controller.check_auth().await {
            controller.load_patients().await;
        } else {
            navigate("/login", Default::default());
        }
    });

    let state_for_list = state.clone();
    let list_class =
        move || state_for_list.read(|s| format!("view {}", s.view.class_for(ActiveView::List)));
    let state_for_detail = state.clone();
    let detail_class =
        move || state_for_detail.read(|s| format!("view {}", s.view.class_for(ActiveView::Detail)));

    view! {
        <Nav />
        <main class="container">
            <section id="patient-list-view" class=list_class>
                <div class="view-header">
                    <h2>"Hastalar"</h2>
                    <button class="btn btn-primary" on:click=move |_| modal_open.set(true)>
                        "+ Yeni Hasta"
                    </button>
                </div>
                <PatientList modal_open=modal_open />
            </section>

            <section id="patient-detail-view" class=detail_class>
                <PatientDetail />
            </section>
        </main>
        <AddPatientModal open=modal_open />
    }
}

/// Patient grid, or the empty state
#[component]
fn PatientList(modal_open: RwSignal<bool>) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <div id="patients-container" class="patients-grid">
            {move || {
                let cards = state.read(|s| s.patient_cards());
                if cards.is_empty() {
                    view! {
                        <div class="empty-state">
                            <p>{NO_PATIENTS}</p>
                            <button class="btn btn-primary" on:click=move |_| modal_open.set(true)>
                                "İlk Hastayı Ekle"
                            </button>
                        </div>
                    }
                    .into_view()
                } else {
                    cards
                        .into_iter()
                        .map(|card| view! { <PatientCardItem card=card /> })
                        .collect_view()
                }
            }}
        </div>
    }
}

/// Header, chart, data form and hourly history of the selected patient
#[component]
fn PatientDetail() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let state_for_back = state.clone();
    let on_back = move |_| {
        state_for_back.run(|controller| async move {
            controller.show_list().await;
        });
    };

    let state_for_delete = state.clone();
    let on_delete = move |_| {
        let confirmed = window()
            .confirm_with_message(DELETE_CONFIRMATION)
            .unwrap_or(false);
        state_for_delete.run(move |controller| async move {
            controller.delete_current_patient(confirmed).await;
        });
    };

    let state_for_header = state.clone();
    let header = move || state_for_header.read(|s| s.detail_header());

    let state_for_history = state.clone();
    let history = move || state_for_history.read(|s| s.hourly_cards());

    view! {
        <div class="view-header">
            <button class="btn btn-secondary" on:click=on_back>"← Geri"</button>
            <div class="patient-title">
                <h2 id="patient-name">{move || header().map(|h| h.name)}</h2>
                <p id="patient-meta">{move || header().map(|h| h.meta)}</p>
            </div>
            <button class="btn btn-danger" on:click=on_delete>"Hastayı Sil"</button>
        </div>

        <div class="card">
            <h3>"Risk Trendi"</h3>
            <RiskChart />
        </div>

        <div class="card">
            <h3>"Saatlik Veri Girişi"</h3>
            <BiomarkerForm />
        </div>

        <div class="card">
            <h3>"Saatlik Geçmiş"</h3>
            <div id="hourly-data-container">
                {move || {
                    let cards = history();
                    if cards.is_empty() {
                        view! { <p class="text-muted">{NO_HOURLY_DATA}</p> }.into_view()
                    } else {
                        cards.into_iter().map(hourly_card).collect_view()
                    }
                }}
            </div>
        </div>
    }
}

fn hourly_card(card: HourlyCard) -> impl IntoView {
    view! {
        <div class="hourly-card">
            <div class="hourly-card-header">
                <h4>{card.title}</h4>
                <span class=card.risk.css_class()>{card.risk.label}</span>
            </div>
            <div class="vitals-grid">
                {card
                    .vitals
                    .into_iter()
                    .map(|vital| view! {
                        <div class="vital-item">
                            <span class="vital-name">{vital.name}</span>
                            <span class="vital-value">{vital.value}</span>
                        </div>
                    })
                    .collect_view()}
            </div>
            <div class="risk-score">"Risk: "{card.risk_score}</div>
        </div>
    }
}
