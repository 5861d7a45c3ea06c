//! Core entry point for the geo_report crate.
//!
//! The crate turns GEO analytics payloads into static audit documents: three
//! PDF reports built on `genpdf` and a set of PNG charts rasterized with
//! `image`/`imageproc`. Every report is assembled as an inspectable sequence
//! of [`layout::Fragment`] values before it is handed to the renderer.

pub mod builder;
pub mod charts;
pub mod cli;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod format;
pub mod input;
pub mod layout;
pub mod metadata;
pub mod model;
pub mod render;
pub mod report;
pub mod richtext;
pub mod routes;
pub mod theme;

pub use error::ReportError;
