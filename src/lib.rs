//! Batch OpenAPI-to-PDF conversion: ReDoc bundles each spec into a single
//! HTML document, then a headless browser (or wkhtmltopdf as fallback)
//! prints that HTML to PDF.

pub mod cli;
pub mod discover;
pub mod error;
pub mod pipeline;
pub mod printer;
pub mod render;
pub mod report;
pub mod tools;
pub mod util;
