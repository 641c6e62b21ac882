//! Document builder pipeline: render-context assembly and builder dispatch.

mod builder;
mod context;

pub use builder::{BuildMeta, BuildRequest, BuildResult, build};
pub use context::{Labels, LineRow, RenderContext, StyleConfig, assemble_context, format_date,
                  format_money};
