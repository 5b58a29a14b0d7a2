use crate::error::{Error, Result};
use crate::output::{DiagramGenerator, Direction};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub project: ProjectConfig,
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
    pub diagrams: DiagramConfig,
}

/// Project metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
    pub description: Option<String>,
}

/// Analysis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// File extensions picked up when walking a directory
    pub extensions: Vec<String>,
    /// Glob patterns, relative to the walked directory
    pub exclude: Vec<String>,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub directory: PathBuf,
}

/// Diagram settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    pub enabled: bool,
    pub max_functions_per_file: usize,
    pub flowchart_direction: Direction,
    pub call_graph_direction: Direction,
    /// Function names styled as highlighted in the module graph
    pub highlight: Vec<String>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Mermaid,
    Json,
    Markdown,
    Html,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Mermaid => "mermaid",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Html => "html",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mermaid" | "mmd" => Ok(OutputFormat::Mermaid),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "html" => Ok(OutputFormat::Html),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "Untitled Project".to_string(),
            description: None,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            extensions: ["c", "h", "cc", "cpp", "cxx", "hh", "hpp", "hxx"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            exclude: vec![".git/**".to_string(), "build/**".to_string()],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            directory: PathBuf::from("./surveyor-docs"),
        }
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_functions_per_file: 10,
            flowchart_direction: Direction::TopDown,
            call_graph_direction: Direction::LeftRight,
            highlight: Vec::new(),
        }
    }
}

impl AnalysisConfig {
    /// Whether a file extension is one we scan, ignoring case and a leading dot
    pub fn accepts_extension(&self, ext: &str) -> bool {
        self.extensions
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}

impl DiagramConfig {
    pub fn generator(&self) -> DiagramGenerator {
        DiagramGenerator::new()
            .with_max_functions(self.max_functions_per_file)
            .with_flowchart_direction(self.flowchart_direction)
            .with_call_graph_direction(self.call_graph_direction)
    }

    pub fn highlight_set(&self) -> HashSet<String> {
        self.highlight.iter().cloned().collect()
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file or return defaults
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(
        &mut self,
        output: Option<PathBuf>,
        exclude: Vec<String>,
        format: Option<OutputFormat>,
        max_functions: Option<usize>,
        highlight: Vec<String>,
        no_diagrams: bool,
    ) {
        if let Some(out) = output {
            self.output.directory = out;
        }

        if !exclude.is_empty() {
            self.analysis.exclude.extend(exclude);
        }

        if let Some(fmt) = format {
            self.output.format = fmt;
        }

        if let Some(max) = max_functions {
            self.diagrams.max_functions_per_file = max;
        }

        for name in highlight {
            if !self.diagrams.highlight.contains(&name) {
                self.diagrams.highlight.push(name);
            }
        }

        if no_diagrams {
            self.diagrams.enabled = false;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.diagrams.max_functions_per_file == 0 {
            return Err(Error::config_validation(
                "max_functions_per_file must be at least 1",
            ));
        }

        if self.analysis.extensions.is_empty() {
            return Err(Error::config_validation("at least one file extension required"));
        }

        if self.analysis.extensions.iter().any(|e| e.trim_start_matches('.').is_empty()) {
            return Err(Error::config_validation("file extensions cannot be empty"));
        }

        for pattern in &self.analysis.exclude {
            glob::Pattern::new(pattern)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.project.name, "Untitled Project");
        assert_eq!(config.diagrams.max_functions_per_file, 10);
        assert!(config.diagrams.enabled);
        assert_eq!(config.output.format, OutputFormat::Mermaid);
        assert!(config.analysis.accepts_extension("c"));
        assert!(config.analysis.accepts_extension("HPP"));
        assert!(!config.analysis.accepts_extension("py"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_valid_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[project]
name = "Firmware"

[analysis]
extensions = [".c", ".h"]
exclude = ["vendor/**"]

[diagrams]
max_functions_per_file = 4
call_graph_direction = "TB"
highlight = ["main"]

[output]
format = "html"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.project.name, "Firmware");
        assert!(config.analysis.accepts_extension("h"));
        assert!(!config.analysis.accepts_extension("cpp"));
        assert_eq!(config.analysis.exclude, vec!["vendor/**"]);
        assert_eq!(config.diagrams.max_functions_per_file, 4);
        assert_eq!(config.diagrams.call_graph_direction, Direction::TopDown);
        assert_eq!(config.diagrams.flowchart_direction, Direction::TopDown);
        assert!(config.diagrams.highlight_set().contains("main"));
        assert_eq!(config.output.format, OutputFormat::Html);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Path::new("/nonexistent/surveyor.toml"));
        assert!(result.is_err());
        let config = Config::load_or_default(Path::new("/nonexistent/surveyor.toml"));
        assert_eq!(config.project.name, "Untitled Project");
    }

    #[test]
    fn test_load_rejects_bad_direction() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[diagrams]\nflowchart_direction = \"diagonal\"").unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_validation_max_functions_zero() {
        let mut config = Config::default();
        config.diagrams.max_functions_per_file = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_empty_extensions() {
        let mut config = Config::default();
        config.analysis.extensions.clear();
        assert!(config.validate().is_err());

        config.analysis.extensions = vec![".".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_bad_glob() {
        let mut config = Config::default();
        config.analysis.exclude.push("[unclosed".to_string());
        assert!(matches!(config.validate(), Err(Error::GlobPattern(_))));
    }

    #[test]
    fn test_merge_cli_output() {
        let mut config = Config::default();
        config.merge_cli(Some(PathBuf::from("/custom/output")), vec![], None, None, vec![], false);
        assert_eq!(config.output.directory, PathBuf::from("/custom/output"));
    }

    #[test]
    fn test_merge_cli_exclude() {
        let mut config = Config::default();
        let initial_excludes = config.analysis.exclude.len();
        config.merge_cli(None, vec!["third_party/**".to_string()], None, None, vec![], false);
        assert_eq!(config.analysis.exclude.len(), initial_excludes + 1);
    }

    #[test]
    fn test_merge_cli_format_and_limits() {
        let mut config = Config::default();
        config.merge_cli(None, vec![], Some(OutputFormat::Json), Some(3), vec![], false);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.diagrams.max_functions_per_file, 3);
    }

    #[test]
    fn test_merge_cli_highlight_dedups() {
        let mut config = Config::default();
        config.diagrams.highlight = vec!["main".to_string()];
        config.merge_cli(
            None,
            vec![],
            None,
            None,
            vec!["main".to_string(), "init".to_string()],
            false,
        );
        assert_eq!(config.diagrams.highlight, vec!["main", "init"]);
    }

    #[test]
    fn test_merge_cli_no_diagrams() {
        let mut config = Config::default();
        config.merge_cli(None, vec![], None, None, vec![], true);
        assert!(!config.diagrams.enabled);
    }

    #[test]
    fn test_output_format_parsing() {
        let toml_str = r#"format = "markdown""#;
        let output: OutputConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(output.format, OutputFormat::Markdown);

        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("MMD".parse::<OutputFormat>().unwrap(), OutputFormat::Mermaid);
        assert!("pdf".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Html.to_string(), "html");
    }
}
