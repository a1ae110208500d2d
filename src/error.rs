use std::path::PathBuf;

/// Errors surfaced by the conversion pipeline.
///
/// Per-file failures are collected by the driver so that one bad input
/// cannot prevent sibling files from being emitted.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The type converter hit a documentation-comment construct outside
    /// its grammar. Conversion fails loudly rather than guessing.
    #[error("unsupported type construct: {0}")]
    UnsupportedTypeConstruct(String),

    /// The lowering stage hit JavaScript syntax the pipeline does not
    /// model.
    #[error("unsupported syntax in {file}: {construct}")]
    UnsupportedSyntax {
        /// Name of the offending source file.
        file: String,
        /// Human-readable description of the construct.
        construct: &'static str,
    },

    /// The backing JavaScript parser rejected the input.
    #[error("failed to parse {file}: {message}")]
    Parse {
        /// Name of the offending source file.
        file: String,
        /// Parser diagnostic text.
        message: String,
    },

    /// The externs-map file existed but was not a valid JSON object of
    /// strings.
    #[error("invalid externs map {path}: {source}")]
    ExternsMap {
        /// Path the map was loaded from.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// The emitter was handed a node it has no rule for; upstream
    /// passes only produce the shapes it knows.
    #[error("cannot emit node: {0}")]
    Emit(String),

    /// Filesystem failure while reading inputs or writing outputs.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
