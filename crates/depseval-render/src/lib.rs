//! Rendering utilities for CI surfaces (Markdown, GitHub annotations).
//!
//! Renderers take a [`RenderableReport`], never the receipt types, so they stay independent of
//! the report schema version.

#![forbid(unsafe_code)]

mod gha;
mod markdown;
mod model;

pub use gha::render_github_annotations;
pub use markdown::render_markdown;
pub use model::{
    RenderableFinding, RenderableReport, RenderableSeverity, RenderableSite, RenderableSummary,
    RenderableVerdictStatus,
};
