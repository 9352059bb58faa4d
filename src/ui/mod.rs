//! egui panels. Everything here reads [`crate::state::AppState`] and only
//! changes it through its methods or the per-column picks.

pub mod panels;
pub mod plot;
