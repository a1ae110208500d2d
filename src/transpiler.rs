//! The pipeline driver: parse each input, collect module metadata, run
//! the annotation and style passes in order, and emit TypeScript for
//! the requested files.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::PathBuf;

use crate::annotate::TypeAnnotationPass;
use crate::error::Error;
use crate::modules::{collect_module, SymbolIndex};
use crate::{emit, parse, paths, style};

/// Driver configuration.
#[derive(Debug, Default)]
pub struct Options {
    /// JSON file mapping extern type names to their TypeScript
    /// equivalents. A missing file yields an empty map.
    pub externs_map_file: Option<PathBuf>,
}

/// One named input source.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Name the file is addressed by; also used for relative-import
    /// computation.
    pub name: String,
    /// Source text.
    pub text: String,
}

impl SourceFile {
    /// Wraps a name and source text.
    pub fn from_code(name: impl Into<String>, text: impl Into<String>) -> Self {
        SourceFile {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Outcome of one compilation: emitted files keyed by basename without
/// extension, plus the per-file failures that were skipped over.
#[derive(Debug, Default)]
pub struct TranspileResult {
    /// Emitted TypeScript keyed by basename without extension.
    pub files: BTreeMap<String, String>,
    /// Inputs that were skipped, with the error that disqualified
    /// them.
    pub failures: Vec<(String, Error)>,
}

impl TranspileResult {
    /// True when every input converted cleanly.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Converts annotated JavaScript sources into TypeScript.
pub struct Transpiler {
    externs_map: HashMap<String, String>,
    symbol_index: SymbolIndex,
}

impl Transpiler {
    /// Builds a transpiler from driver options, loading the externs
    /// map when configured.
    pub fn new(options: &Options) -> Result<Self, Error> {
        let externs_map = match &options.externs_map_file {
            Some(path) if path.exists() => {
                let text = fs::read_to_string(path)?;
                serde_json::from_str(&text).map_err(|source| Error::ExternsMap {
                    path: path.clone(),
                    source,
                })?
            }
            Some(path) => {
                log::warn!("externs map {} not found; using an empty map", path.display());
                HashMap::new()
            }
            None => HashMap::new(),
        };
        Ok(Transpiler::with_externs_map(externs_map))
    }

    /// Builds a transpiler around an already-loaded externs map.
    pub fn with_externs_map(externs_map: HashMap<String, String>) -> Self {
        Transpiler {
            externs_map,
            symbol_index: SymbolIndex::new(),
        }
    }

    /// Module records for namespaces provided outside the compiled
    /// sources (notably ECMAScript-form modules) are registered here.
    pub fn symbol_index_mut(&mut self) -> &mut SymbolIndex {
        &mut self.symbol_index
    }

    /// Runs the full pipeline. Inputs listed in `externs` are parsed
    /// for their declarations but never emitted; a failing file is
    /// logged, recorded, and skipped without disturbing its siblings.
    pub fn transpile(
        &self,
        files_to_emit: &BTreeSet<String>,
        sources: &[SourceFile],
        externs: &[SourceFile],
    ) -> TranspileResult {
        let mut result = TranspileResult::default();

        let mut scripts = Vec::new();
        for (source, is_extern) in externs
            .iter()
            .map(|s| (s, true))
            .chain(sources.iter().map(|s| (s, false)))
        {
            match parse::parse_source(&source.name, &source.text) {
                Ok(mut script) => {
                    script.externs |= is_extern;
                    scripts.push(script);
                }
                Err(e) => {
                    log::error!("failed to parse {}: {}", source.name, e);
                    result.failures.push((source.name.clone(), e));
                }
            }
        }

        let mut index = self.symbol_index.clone();
        for script in &scripts {
            if let Some(record) = collect_module(script) {
                index.insert(record);
            }
        }

        let mut pass = TypeAnnotationPass::new(&index, &self.externs_map);
        let mut good = vec![true; scripts.len()];
        for (i, script) in scripts.iter_mut().enumerate() {
            if let Err(e) = pass.process_script(script) {
                let name = script.source_file.clone().unwrap_or_default();
                log::error!("skipping {}: {}", name, e);
                result.failures.push((name, e));
                good[i] = false;
            }
        }
        for (i, script) in scripts.iter_mut().enumerate() {
            if good[i] {
                pass.inject_imports(script);
                style::fix_styles(script);
            }
        }

        for (i, script) in scripts.iter().enumerate() {
            if !good[i] || script.externs {
                continue;
            }
            let Some(name) = script.source_file.clone() else {
                continue;
            };
            if !files_to_emit.contains(&name) {
                continue;
            }
            match emit::emit_script(script) {
                Ok(text) => {
                    result.files.insert(paths::file_name_without_extension(&name), text);
                }
                Err(e) => {
                    log::error!("failed to emit {}: {}", name, e);
                    result.failures.push((name, e));
                }
            }
        }
        result
    }
}

/// Convenience entry point with no externs map and no pre-registered
/// modules.
pub fn transpile(
    files_to_emit: &BTreeSet<String>,
    sources: &[SourceFile],
    externs: &[SourceFile],
) -> TranspileResult {
    Transpiler::with_externs_map(HashMap::new()).transpile(files_to_emit, sources, externs)
}
