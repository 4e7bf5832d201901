//! Add Patient Modal

use leptos::*;

use sepsis_dashboard::api::NewPatient;

use crate::state::global::GlobalState;

/// Age input -> submitted age; blank, zero or unparsable means unknown
fn parse_age(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|age| *age > 0)
}

/// Modal form creating a patient; `open` controls visibility
#[component]
pub fn AddPatientModal(open: RwSignal<bool>) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let patient_id = create_rw_signal(String::new());
    let name = create_rw_signal(String::new());
    let age = create_rw_signal(String::new());
    let gender = create_rw_signal(String::new());

    let close = move || {
        open.set(false);
        patient_id.set(String::new());
        name.set(String::new());
        age.set(String::new());
        gender.set(String::new());
    };

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();

        let patient = NewPatient::admitted_now(
            &patient_id.get_untracked(),
            &name.get_untracked(),
            parse_age(&age.get_untracked()),
            Some(gender.get_untracked()),
        );

        state.run(move |controller| async move {
            if controller.add_patient(&patient).await {
                close();
            }
        });
    };

    view! {
        <div
            id="add-patient-modal"
            class=move || if open.get() { "modal active" } else { "modal" }
        >
            <div class="modal-content">
                <div class="modal-header">
                    <h2>"Yeni Hasta Ekle"</h2>
                    <button class="close-btn" on:click=move |_| close()>"×"</button>
                </div>
                <form id="add-patient-form" on:submit=on_submit>
                    <div class="form-group">
                        <label for="new-patient-id">"Hasta ID"</label>
                        <input
                            type="text"
                            id="new-patient-id"
                            required
                            prop:value=move || patient_id.get()
                            on:input=move |ev| patient_id.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-group">
                        <label for="new-patient-name">"Ad Soyad"</label>
                        <input
                            type="text"
                            id="new-patient-name"
                            required
                            prop:value=move || name.get()
                            on:input=move |ev| name.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-group">
                        <label for="new-patient-age">"Yaş"</label>
                        <input
                            type="number"
                            id="new-patient-age"
                            min="0"
                            prop:value=move || age.get()
                            on:input=move |ev| age.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-group">
                        <label for="new-patient-gender">"Cinsiyet"</label>
                        <select
                            id="new-patient-gender"
                            prop:value=move || gender.get()
                            on:change=move |ev| gender.set(event_target_value(&ev))
                        >
                            <option value="">"Seçiniz"</option>
                            <option value="Erkek">"Erkek"</option>
                            <option value="Kadın">"Kadın"</option>
                        </select>
                    </div>
                    <div class="modal-actions">
                        <button type="button" class="btn btn-secondary" on:click=move |_| close()>
                            "İptal"
                        </button>
                        <button type="submit" class="btn btn-primary">"Ekle"</button>
                    </div>
                </form>
            </div>
        </div>
    }
}
