#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

/// The syntax tree all passes operate on: token-tagged nodes carrying
/// documentation info, declared types, and attached comments.
pub mod ast;

/// Documentation-comment parsing: tags and the embedded type grammar.
pub mod jsdoc;

/// The swc parsing frontend and the lowering into [`ast::Node`].
pub mod parse;

/// Module metadata records and the legacy-namespace collector.
pub mod modules;

/// Path helpers: extension stripping and relative import computation.
pub mod paths;

/// Dotted-name helpers: longest-prefix matching and substitution.
pub mod names;

/// The type-annotation pass.
pub mod annotate;

/// The style-fix pass.
pub mod style;

/// The TypeScript emitter.
pub mod emit;

mod error;
mod transpiler;

/// Private crate for testing utilities.
#[cfg(test)]
pub(crate) mod testing;

pub use error::Error;
pub use transpiler::{transpile, Options, SourceFile, TranspileResult, Transpiler};
