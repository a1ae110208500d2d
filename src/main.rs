use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use jsdoc2ts::{Error, Options, SourceFile, Transpiler};

#[derive(Parser)]
#[command(about = "Converts Closure-annotated JavaScript into TypeScript")]
struct Args {
    /// Output directory; `-` prints to stdout.
    #[arg(short = 'o', default_value = "-", value_name = "OUTPUT")]
    output: String,

    /// Root directory input paths are resolved against.
    #[arg(long, value_name = "ROOT")]
    root: Option<PathBuf>,

    /// Run in debug mode (prints pipeline warnings).
    #[arg(long)]
    debug: bool,

    /// Files to convert to TypeScript, in addition to the positional
    /// sources.
    #[arg(long = "convert", value_name = "CONV", num_args = 1..)]
    convert: Vec<String>,

    /// Files to read externs definitions from.
    #[arg(long = "externs", value_name = "EXTERN", num_args = 1..)]
    externs: Vec<String>,

    /// JSON file mapping externs to their TypeScript typings.
    #[arg(long = "externsMap", value_name = "EXTERNSMAP")]
    externs_map: Option<PathBuf>,

    /// Source files.
    sources: Vec<String>,
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(if args.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    match run(&args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<i32, Error> {
    let mut src_names: Vec<String> = Vec::new();
    for name in args.sources.iter().chain(&args.convert) {
        if !src_names.contains(name) {
            src_names.push(name.clone());
        }
    }
    if src_names.is_empty() {
        eprintln!("no input files were given");
        return Ok(1);
    }

    let sources = read_files(&src_names, args.root.as_deref())?;
    let externs = read_files(&args.externs, args.root.as_deref())?;

    let transpiler = Transpiler::new(&Options {
        externs_map_file: args.externs_map.clone(),
    })?;
    let files_to_emit: BTreeSet<String> = src_names.into_iter().collect();
    let result = transpiler.transpile(&files_to_emit, &sources, &externs);

    if args.output == "-" {
        for (basename, text) in &result.files {
            println!("// {}.ts", basename);
            print!("{}", text);
        }
    } else {
        let out_dir = Path::new(&args.output);
        fs::create_dir_all(out_dir)?;
        for (basename, text) in &result.files {
            fs::write(out_dir.join(format!("{}.ts", basename)), text)?;
        }
    }

    Ok(if result.is_success() { 0 } else { 1 })
}

fn read_files(names: &[String], root: Option<&Path>) -> Result<Vec<SourceFile>, Error> {
    let mut out = Vec::new();
    for name in names {
        let path = match root {
            Some(root) if !Path::new(name).is_absolute() => root.join(name),
            _ => PathBuf::from(name),
        };
        out.push(SourceFile::from_code(name.clone(), fs::read_to_string(path)?));
    }
    Ok(out)
}
