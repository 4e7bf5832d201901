//! State Management
//!
//! Global application state and the browser-backed session stores.

pub mod browser;
pub mod global;

