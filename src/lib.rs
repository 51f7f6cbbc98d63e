//! AI-assisted roster builder for Dokkan Battle teams.
//!
//! The interesting part is the client pipeline that turns free-form output
//! from a hosted generative model into strictly typed characters:
//! [`extract`] isolates a JSON array from prose, [`sanitize`] forces every
//! entry into a valid [`model::Character`], and [`generate`] wraps both in a
//! grounded-then-fallback two-phase flow. [`analysis`] requests a structured
//! synergy critique of the assembled roster.

pub mod analysis;
pub mod app;
pub mod config;
pub mod extract;
pub mod gemini;
pub mod generate;
pub mod mechanics;
pub mod model;
pub mod sanitize;
