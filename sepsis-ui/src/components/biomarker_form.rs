//! Biomarker Form Component
//!
//! Hourly data entry for the selected patient. Sections collapse through the
//! view controller; inputs are range-checked when they lose focus. Blank
//! inputs are submitted as null.

use leptos::*;
use std::collections::BTreeMap;

use sepsis_dashboard::api::VitalSigns;
use sepsis_dashboard::validation::{form_fields, FieldSection, FORM_SECTIONS};

use crate::state::global::GlobalState;

const INVALID_HOUR: &str = "Geçerli bir saat giriniz";

/// Raw input -> submitted value; blank or unparsable becomes null
fn parse_input(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Hourly data form
#[component]
pub fn BiomarkerForm() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let values = create_rw_signal(BTreeMap::<String, String>::new());
    let hour = create_rw_signal(String::from("1"));

    // Suggest the next hour whenever a detail is (re)loaded
    let state_for_hour = state.clone();
    let next_hour = create_memo(move |_| state_for_hour.read(|s| s.next_hour));
    create_effect(move |_| hour.set(next_hour.get().to_string()));

    let state_for_submit = state.clone();
    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();

        let hour_value = match hour.get_untracked().trim().parse::<u32>() {
            Ok(h) if h > 0 => h,
            _ => {
                state_for_submit.show_error(INVALID_HOUR);
                return;
            }
        };

        let vital_signs: VitalSigns = values.with_untracked(|raw| {
            form_fields()
                .map(|field| {
                    let value = raw.get(field).and_then(|r| parse_input(r));
                    (field.to_string(), value)
                })
                .collect()
        });

        state_for_submit.run(move |controller| async move {
            if controller.submit_hourly(hour_value, vital_signs).await {
                values.set(BTreeMap::new());
            }
        });
    };

    view! {
        <form id="hourly-data-form" class="hourly-form" on:submit=on_submit>
            <div class="form-group">
                <label for="hour">"Saat"</label>
                <input
                    type="number"
                    id="hour"
                    min="1"
                    required
                    prop:value=move || hour.get()
                    on:input=move |ev| hour.set(event_target_value(&ev))
                />
            </div>

            {FORM_SECTIONS
                .iter()
                .map(|section| view! { <FormSection section=*section values=values /> })
                .collect_view()}

            <button type="submit" class="btn btn-primary">"Kaydet ve Tahmin Et"</button>
        </form>
    }
}

/// One collapsible group of inputs
#[component]
fn FormSection(section: FieldSection, values: RwSignal<BTreeMap<String, String>>) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let id = section.id;

    let state_for_class = state.clone();
    let class = move |base: &str| {
        let collapsed = state_for_class.read(|s| s.section_class(id));
        format!("{} {}", base, collapsed).trim_end().to_string()
    };
    let section_class = class.clone();

    let on_toggle = move |_| {
        state.controller.toggle_section(id);
        state.sync();
    };

    view! {
        <div class=move || section_class("biomarker-section") id=id>
            <h4 class=move || class("section-header") on:click=on_toggle>
                {section.title}
                <span class="toggle-icon">"▼"</span>
            </h4>
            <div class="section-content">
                {section
                    .fields
                    .iter()
                    .map(|field| view! { <FieldInput field=*field values=values /> })
                    .collect_view()}
            </div>
        </div>
    }
}

/// A single biomarker input with its inline message
#[component]
fn FieldInput(field: &'static str, values: RwSignal<BTreeMap<String, String>>) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let label = match state.controller.table().get(field) {
        Some(rule) if rule.unit.is_empty() => rule.display_name.clone(),
        Some(rule) => format!("{} ({})", rule.display_name, rule.unit),
        None => field.to_string(),
    };

    let state_for_class = state.clone();
    let input_class = move || state_for_class.read(|s| s.feedback.mark(field).css_class());

    let state_for_error = state.clone();
    let error = move || state_for_error.read(|s| s.feedback.error(field).map(str::to_string));

    let state_for_blur = state.clone();
    let on_blur = move |ev: ev::FocusEvent| {
        state_for_blur.controller.blur_field(field, &event_target_value(&ev));
        state_for_blur.sync();
    };

    let on_focus = move |_| {
        state.controller.focus_field(field);
        state.sync();
    };

    view! {
        <div class="form-group">
            <label for=field>{label}</label>
            <input
                type="number"
                step="any"
                id=field
                class=input_class
                prop:value=move || values.with(|v| v.get(field).cloned().unwrap_or_default())
                on:input=move |ev| {
                    let raw = event_target_value(&ev);
                    values.update(|v| {
                        v.insert(field.to_string(), raw);
                    });
                }
                on:blur=on_blur
                on:focus=on_focus
            />
            {move || error().map(|message| view! { <span class="field-error">{message}</span> })}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input(" 92 "), Some(92.0));
        assert_eq!(parse_input("37.5"), Some(37.5));
        assert_eq!(parse_input(""), None);
        assert_eq!(parse_input("abc"), None);
        assert_eq!(parse_input("NaN"), None);
    }
}
