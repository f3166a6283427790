//! Reporting module.
//!
//! Turns aggregate scores into advice and renders a finished analysis as
//! plain text.

pub mod recommendations;
pub mod text;

pub use recommendations::*;
pub use text::*;
