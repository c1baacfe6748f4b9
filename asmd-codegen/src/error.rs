/// Crate-level error: one value describing the first failure of a
/// read -> decode -> validate -> render pipeline.
use std::path::PathBuf;

use crate::compiler::ValidationError;
use crate::emit_vhdl::RenderError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed description: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid description: {0}")]
    Validation(#[from] ValidationError),
    #[error("cannot render VHDL: {0}")]
    Render(#[from] RenderError),
}
