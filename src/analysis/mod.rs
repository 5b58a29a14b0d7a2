// Analysis: structural model, module view, and the pipeline that ties them to
// the diagram renderers

pub mod builder;
pub mod model;
pub mod modules;

pub use builder::build_model;
pub use model::{ModelStats, OrderedSet, StructuralModel};
pub use modules::{build_modules, resolve_include, scan_module};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{DiagramGenerator, DiagramSet};
use crate::parser::{ModuleEntity, SourceFile};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::error::Category;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Everything derived from one set of files
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub model: StructuralModel,
    pub modules: Vec<ModuleEntity>,
    pub diagrams: DiagramSet,
}

impl Analysis {
    pub fn stats(&self) -> ModelStats {
        self.model.stats()
    }
}

/// Analyze files with the default diagram settings.
///
/// Never fails: text that matches nothing contributes nothing, and empty
/// input yields placeholder diagrams.
pub fn analyze(files: &[SourceFile], highlights: &HashSet<String>) -> Analysis {
    analyze_with(files, highlights, &DiagramGenerator::default())
}

/// Analyze files with explicit diagram settings
pub fn analyze_with(
    files: &[SourceFile],
    highlights: &HashSet<String>,
    generator: &DiagramGenerator,
) -> Analysis {
    let model = build_model(files);
    let modules = build_modules(files);
    let diagrams = generator.render_all(&model, &modules, highlights);

    Analysis {
        model,
        modules,
        diagrams,
    }
}

/// Loads source files from disk according to the configuration and runs the
/// analysis over them
pub struct Analyzer {
    config: Config,
    excludes: Vec<glob::Pattern>,
    verbose: bool,
}

impl Analyzer {
    /// Create a new analyzer with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        let excludes = config
            .analysis
            .exclude
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            config,
            excludes,
            verbose: false,
        })
    }

    /// Create analyzer with verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the pipeline over already loaded files
    pub fn analyze(&self, files: &[SourceFile]) -> Analysis {
        if files.is_empty() {
            warn!("no source files to analyze");
        }
        let analysis = analyze_with(
            files,
            &self.config.diagrams.highlight_set(),
            &self.config.diagrams.generator(),
        );
        info!(
            files = files.len(),
            functions = analysis.model.functions.len(),
            classes = analysis.model.classes.len(),
            "analysis complete"
        );
        analysis
    }

    /// Load every file named by `paths`; directories are walked.
    ///
    /// A file given directly is named by its file name; a file found under a
    /// directory is named by its path relative to that directory.
    pub fn load_sources(&self, paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
        let mut found: Vec<(PathBuf, String)> = Vec::new();

        for path in paths {
            if !path.exists() {
                return Err(Error::PathNotFound(path.clone()));
            }

            if path.is_dir() {
                for file in self.discover_files(path)? {
                    let name = relative_name(&file, path);
                    found.push((file, name));
                }
            } else {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.to_string_lossy().into_owned());
                found.push((path.clone(), name));
            }
        }

        let progress = if self.verbose {
            let pb = ProgressBar::new(found.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .map_err(|e| Error::other(e.to_string()))?
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        let mut sources = Vec::with_capacity(found.len());
        for (path, name) in found {
            if let Some(ref pb) = progress {
                pb.set_message(name.clone());
                pb.inc(1);
            }

            let bytes = std::fs::read(&path)?;
            debug!(file = %name, bytes = bytes.len(), "loaded source");
            sources.push(SourceFile::from_bytes(name, bytes)?);
        }

        if let Some(pb) = progress {
            pb.finish_with_message("Loading complete");
        }

        Ok(sources)
    }

    /// Read a JSON array of `{ "fileName", "content" }` records
    pub fn load_json(&self, path: &Path) -> Result<Vec<SourceFile>> {
        if !path.exists() {
            return Err(Error::PathNotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        // records whose fields are not strings break the text contract
        let files: Vec<SourceFile> = serde_json::from_str(&contents).map_err(|e| match e.classify() {
            Category::Data => Error::non_text(path.display().to_string()),
            _ => Error::Json(e),
        })?;
        debug!(files = files.len(), path = %path.display(), "loaded sources from json");
        Ok(files)
    }

    /// Find every source file under a directory, sorted by path
    pub fn discover_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry?;
            let path = entry.path();

            if !entry.file_type().is_file() {
                continue;
            }

            let accepted = path
                .extension()
                .and_then(|e| e.to_str())
                .map_or(false, |ext| self.config.analysis.accepts_extension(ext));
            if !accepted {
                continue;
            }

            if self.should_exclude(path, root) {
                debug!(path = %path.display(), "excluded");
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    /// Check if a path should be excluded based on config patterns
    fn should_exclude(&self, path: &Path, root: &Path) -> bool {
        let relative = relative_name(path, root);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.excludes
            .iter()
            .any(|pattern| pattern.matches(&relative) || pattern.matches(&file_name))
    }
}

/// Path of `path` relative to `root`, joined with `/`
fn relative_name(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_project() -> TempDir {
        let dir = TempDir::new().unwrap();

        let src = dir.path().join("src");
        fs::create_dir_all(&src).unwrap();

        fs::write(
            src.join("main.c"),
            "#include \"util.h\"\n\nint main() {\n    helper();\n    return 0;\n}\n",
        )
        .unwrap();
        fs::write(src.join("util.h"), "extern void helper(void);\n").unwrap();
        fs::write(src.join("util.c"), "#include \"util.h\"\n\nvoid helper() {\n}\n").unwrap();
        fs::write(dir.path().join("README.md"), "# not C\n").unwrap();

        let build = dir.path().join("build");
        fs::create_dir_all(&build).unwrap();
        fs::write(build.join("generated.c"), "void generated() {\n}\n").unwrap();

        dir
    }

    #[test]
    fn test_analyze_entry_point() {
        let files = vec![SourceFile::new(
            "main.c",
            "int add(int a, int b) { return a + b; }\nint main() { add(1,2); }",
        )];
        let analysis = analyze(&files, &HashSet::new());
        assert_eq!(analysis.model.functions.len(), 2);
        assert_eq!(analysis.modules.len(), 1);
        assert!(analysis.diagrams.call_graph.contains("main --> add"));
        assert_eq!(analysis.stats().resolved_calls, 1);
    }

    #[test]
    fn test_analyze_empty_input_gives_placeholders() {
        let analysis = analyze(&[], &HashSet::new());
        assert!(analysis.model.is_empty());
        for (_, text) in analysis.diagrams.iter() {
            assert!(!text.is_empty());
        }
    }

    #[test]
    fn test_analyzer_new_rejects_bad_glob() {
        let mut config = Config::default();
        config.analysis.exclude = vec!["[".to_string()];
        assert!(matches!(Analyzer::new(config), Err(Error::GlobPattern(_))));
    }

    #[test]
    fn test_discover_files_filters_and_sorts() {
        let dir = create_test_project();
        let analyzer = Analyzer::new(Config::default()).unwrap();

        let files = analyzer.discover_files(dir.path()).unwrap();
        let names: Vec<String> = files.iter().map(|f| relative_name(f, dir.path())).collect();
        // build/** is excluded by default and README.md is not a source file
        assert_eq!(names, vec!["src/main.c", "src/util.c", "src/util.h"]);
    }

    #[test]
    fn test_exclude_by_file_name() {
        let dir = create_test_project();
        let mut config = Config::default();
        config.analysis.exclude.push("*.h".to_string());
        let analyzer = Analyzer::new(config).unwrap();

        let files = analyzer.discover_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| !f.ends_with("util.h")));
    }

    #[test]
    fn test_load_sources_names_files() {
        let dir = create_test_project();
        let analyzer = Analyzer::new(Config::default()).unwrap().with_verbose(true);

        let sources = analyzer
            .load_sources(&[dir.path().to_path_buf(), dir.path().join("build/generated.c")])
            .unwrap();
        let names: Vec<&str> = sources.iter().map(|s| s.file_name.as_str()).collect();
        assert_eq!(names, vec!["src/main.c", "src/util.c", "src/util.h", "generated.c"]);
    }

    #[test]
    fn test_load_sources_missing_path() {
        let analyzer = Analyzer::new(Config::default()).unwrap();
        let result = analyzer.load_sources(&[PathBuf::from("/nonexistent/src")]);
        assert!(matches!(result, Err(Error::PathNotFound(_))));
    }

    #[test]
    fn test_load_sources_rejects_binary() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("blob.c"), [0xffu8, 0xfe, 0x00, 0x80]).unwrap();
        let analyzer = Analyzer::new(Config::default()).unwrap();

        let err = analyzer.load_sources(&[dir.path().to_path_buf()]).unwrap_err();
        assert!(err.is_content_error());
    }

    #[test]
    fn test_load_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("files.json");
        fs::write(
            &path,
            r#"[{"fileName": "a.c", "content": "void a() {\n}"}, {"fileName": "b.h", "content": ""}]"#,
        )
        .unwrap();
        let analyzer = Analyzer::new(Config::default()).unwrap();

        let files = analyzer.load_json(&path).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].file_name, "a.c");
        assert!(analyzer.load_json(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_load_json_non_string_content_is_content_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("files.json");
        fs::write(&path, r#"[{"fileName": "a.c", "content": 42}]"#).unwrap();
        let analyzer = Analyzer::new(Config::default()).unwrap();

        let err = analyzer.load_json(&path).unwrap_err();
        assert!(matches!(err, Error::NonText { .. }));
        assert!(err.is_content_error());

        fs::write(&path, "[{\"fileName\": ").unwrap();
        let err = analyzer.load_json(&path).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert!(!err.is_content_error());
    }

    #[test]
    fn test_analyze_project_from_disk() {
        let dir = create_test_project();
        let mut config = Config::default();
        config.diagrams.highlight = vec!["helper".to_string()];
        let analyzer = Analyzer::new(config).unwrap();

        let sources = analyzer.load_sources(&[dir.path().to_path_buf()]).unwrap();
        let analysis = analyzer.analyze(&sources);

        let main = analysis.model.resolve("main").unwrap();
        assert_eq!(main.calls, vec!["helper"]);
        assert_eq!(main.source_file, "src/main.c");
        assert!(analysis.diagrams.module_graph.contains("file_srcmainc -.-> file_srcutilh"));
        assert!(analysis.diagrams.module_graph.contains("highlighted"));
    }

    #[test]
    fn test_with_verbose() {
        let analyzer = Analyzer::new(Config::default()).unwrap().with_verbose(true);
        assert!(analyzer.verbose);
    }
}
