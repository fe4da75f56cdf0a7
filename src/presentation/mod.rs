//! Presentation adapters turning records into display-ready views.

pub mod views;
