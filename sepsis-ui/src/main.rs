//! Sepsis Dashboard
//!
//! Browser front end for the hospital sepsis prediction service, built with
//! Leptos (WASM).
//!
//! # Features
//!
//! - Hospital login with optional "remember me"
//! - Patient list with latest risk badges
//! - Patient detail with risk trend chart and hourly history
//! - Hourly biomarker form with inline range checks
//!
//! # Architecture
//!
//! Client-side rendered Leptos application. All state transitions go through
//! the `sepsis-dashboard` view controller; this crate binds it to the DOM,
//! `document.cookie`, `localStorage` and a canvas chart surface.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
