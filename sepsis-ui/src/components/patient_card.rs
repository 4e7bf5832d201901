//! Patient Card Component

use leptos::*;

use sepsis_dashboard::view::PatientCard;

use crate::state::global::GlobalState;

/// One patient in the list; clicking opens the detail view
#[component]
pub fn PatientCardItem(card: PatientCard) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let key = card.key;

    let on_click = move |_| {
        state.run(move |controller| async move {
            controller.show_detail(key).await;
        });
    };

    let footer = match (card.risk, card.risk_score) {
        (Some(badge), Some(score)) => view! {
            <div class=badge.css_class()>{badge.label}</div>
            <div class="risk-score">{score}</div>
        }
        .into_view(),
        _ => view! { <div class="text-muted">{PatientCard::AWAITING_DATA}</div> }.into_view(),
    };

    view! {
        <div class="patient-card" on:click=on_click>
            <div class="patient-card-header">
                <h3>{card.name}</h3>
                <span class="patient-id">{card.patient_id}</span>
            </div>
            <div class="patient-card-body">
                <p><strong>"Yaş: "</strong>{card.age}</p>
                <p><strong>"Cinsiyet: "</strong>{card.gender}</p>
                <p><strong>"Toplam Saat: "</strong>{card.total_hours}</p>
            </div>
            <div class="patient-card-footer">{footer}</div>
        </div>
    }
}
