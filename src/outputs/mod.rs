//! Output generation: HTML rendering and report files.
//!
//! # Submodules
//!
//! - [`html`]: Renders scored ideas into one self-contained HTML document
//! - [`report`]: Names the dated report file and writes it to disk

pub mod html;
pub mod report;
