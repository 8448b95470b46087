//! Swatchcard - color profile report cards
//!
//! Reduces a photograph to its dominant colors, stands a tile image and a
//! color name in for each, and renders the result as a card: a grid of
//! tiles sized by share, a title, and a ranked legend.
//! This library exposes modules for integration testing.

pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
