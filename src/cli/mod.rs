//! CLI module for surveyor

mod args;

pub use args::{Args, Command};

use crate::analysis::Analyzer;
use crate::config::Config;
use crate::error::Result;
use crate::output::ReportWriter;
use crate::parser::SourceFile;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

const DEFAULT_CONFIG: &str = "surveyor.toml";

/// Run the CLI application
pub fn run(args: Args) -> ExitCode {
    match execute(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) if e.is_content_error() => {
            eprintln!("Error: analysis could not run: {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(args: Args) -> Result<()> {
    match args.command {
        Command::Analyze {
            paths,
            output,
            format,
            highlight,
            exclude,
            input_json,
            config,
            max_functions,
            no_diagrams,
            verbose,
        } => {
            let mut cfg = load_config(config.as_deref())?;

            // Merge CLI arguments (CLI takes precedence)
            cfg.merge_cli(output, exclude, format, max_functions, highlight, no_diagrams);
            cfg.validate()?;

            if verbose {
                println!("Analyzing: {}", display_paths(&paths, input_json.as_deref()));
                println!("Output: {}", cfg.output.directory.display());
                println!("Format: {}", cfg.output.format);
                println!("Diagrams: {}", cfg.diagrams.enabled);
                println!("Extensions: {:?}", cfg.analysis.extensions);
                println!("Exclude: {:?}", cfg.analysis.exclude);
                if !cfg.diagrams.highlight.is_empty() {
                    println!("Highlight: {:?}", cfg.diagrams.highlight);
                }
            }

            let analyzer = Analyzer::new(cfg.clone())?.with_verbose(verbose);
            let sources = load(&analyzer, &paths, input_json.as_deref())?;
            println!("Found {} source files", sources.len());

            println!("Analyzing sources...");
            let analysis = analyzer.analyze(&sources);
            let stats = analysis.stats();
            println!(
                "Analysis complete: {} files, {} functions, {} classes, {} calls ({} resolved)",
                stats.files, stats.functions, stats.classes, stats.calls, stats.resolved_calls
            );

            let project_name = project_name(&cfg, &paths);
            let writer = ReportWriter::from_config(&cfg, project_name);
            let report = writer.write(&analysis)?;

            println!("{}", report.summary());
            println!("Output written to: {}", cfg.output.directory.display());
            Ok(())
        }

        Command::Diagram {
            kind,
            paths,
            highlight,
            config,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            cfg.merge_cli(None, vec![], None, None, highlight, false);

            let analyzer = Analyzer::new(cfg.clone())?;
            let sources = analyzer.load_sources(&paths)?;
            let analysis = analyzer.analyze(&sources);

            println!("{}", analysis.diagrams.get(kind));
            Ok(())
        }

        Command::Version => {
            println!("surveyor {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Load the given config, or `surveyor.toml` from the working directory if
/// present. An explicitly named config must exist and parse.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG);
            if default_path.exists() {
                debug!(path = %default_path.display(), "using config");
                Config::load(default_path)
            } else {
                Ok(Config::default())
            }
        }
    }
}

fn load(analyzer: &Analyzer, paths: &[PathBuf], input_json: Option<&Path>) -> Result<Vec<SourceFile>> {
    let mut sources = Vec::new();
    if let Some(json) = input_json {
        sources.extend(analyzer.load_json(json)?);
    }
    if !paths.is_empty() {
        sources.extend(analyzer.load_sources(paths)?);
    }
    Ok(sources)
}

/// Project name from config, else the first analyzed directory
fn project_name(cfg: &Config, paths: &[PathBuf]) -> String {
    if !cfg.project.name.is_empty() && cfg.project.name != "Untitled Project" {
        return cfg.project.name.clone();
    }

    paths
        .first()
        .and_then(|p| p.canonicalize().ok())
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "Project".to_string())
}

fn display_paths(paths: &[PathBuf], input_json: Option<&Path>) -> String {
    let mut shown: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
    if let Some(json) = input_json {
        shown.push(json.display().to_string());
    }
    shown.join(", ")
}
