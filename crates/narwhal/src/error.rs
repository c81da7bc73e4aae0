pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid metadata for `{id}`: {message}")]
    InvalidMeta { id: String, message: String },

    #[error("Group `{id}` has no definition")]
    MissingDefinition { id: String },

    #[error("Loop group `{id}` must not declare edges between its children ({edges} found)")]
    LoopGroupHasEdges { id: String, edges: usize },

    #[error("Group `{id}` uses a custom control node but does not hide it on expand")]
    CustomControlNodeRequiresHide { id: String },

    #[error("Unknown margin side: {side}")]
    InvalidMarginSide { side: String },

    #[error("State color table is missing entries for: {missing}")]
    IncompleteStateColors { missing: String },

    #[error("Invalid clamp range: min {min} > max {max}")]
    InvalidClampRange { min: f64, max: f64 },

    #[error("Invalid configuration at `{path}`: {message}")]
    Config { path: String, message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
