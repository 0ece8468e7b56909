//! Proposal slide deck layout engine.
//!
//! [`layout`] turns a [`models::ProposalData`] into a backend-neutral
//! [`layout::Deck`]; [`render`] draws that deck as an HTML preview or a PPTX
//! package; [`api`] serves both over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod layout;
pub mod models;
pub mod render;
