// Report writers
//
// Dispatches an analysis to one of the output formats and records what was
// written.

use crate::analysis::{Analysis, ModelStats, StructuralModel};
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::output::diagrams::DiagramSet;
use crate::output::html::{HtmlConfig, HtmlGenerator};
use crate::output::markdown::generate_markdown;
use crate::parser::ModuleEntity;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Report of what was generated
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub files: Vec<PathBuf>,
    pub diagrams_written: usize,
}

impl GenerationReport {
    pub fn summary(&self) -> String {
        format!(
            "Wrote {} file{} ({} diagram{})",
            self.files.len(),
            if self.files.len() == 1 { "" } else { "s" },
            self.diagrams_written,
            if self.diagrams_written == 1 { "" } else { "s" }
        )
    }
}

/// Shape of analysis.json
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    project: &'a str,
    stats: ModelStats,
    model: &'a StructuralModel,
    modules: &'a [ModuleEntity],
    #[serde(skip_serializing_if = "Option::is_none")]
    diagrams: Option<&'a DiagramSet>,
}

/// Writes an analysis in one output format
#[derive(Debug, Clone)]
pub struct ReportWriter {
    pub output_dir: PathBuf,
    pub project_name: String,
    pub format: OutputFormat,
    pub include_diagrams: bool,
}

impl ReportWriter {
    pub fn from_config(config: &Config, project_name: impl Into<String>) -> Self {
        Self {
            output_dir: config.output.directory.clone(),
            project_name: project_name.into(),
            format: config.output.format,
            include_diagrams: config.diagrams.enabled,
        }
    }

    pub fn write(&self, analysis: &Analysis) -> Result<GenerationReport> {
        debug!(format = %self.format, dir = %self.output_dir.display(), "writing report");
        match self.format {
            OutputFormat::Mermaid => self.write_mermaid(analysis),
            OutputFormat::Json => self.write_json(analysis),
            OutputFormat::Markdown => self.write_markdown(analysis),
            OutputFormat::Html => {
                let generator = HtmlGenerator::new(HtmlConfig {
                    output_dir: self.output_dir.clone(),
                    project_name: self.project_name.clone(),
                    generate_diagrams: self.include_diagrams,
                })?;
                generator.generate(analysis)
            }
        }
    }

    /// One .mmd file per diagram kind
    fn write_mermaid(&self, analysis: &Analysis) -> Result<GenerationReport> {
        let mut report = GenerationReport::default();
        if !self.include_diagrams {
            warn!("diagrams are disabled; mermaid output has nothing to write");
            return Ok(report);
        }

        fs::create_dir_all(&self.output_dir)?;
        for (kind, source) in analysis.diagrams.iter() {
            let path = self.output_dir.join(kind.file_name());
            fs::write(&path, source)?;
            report.files.push(path);
            report.diagrams_written += 1;
        }
        Ok(report)
    }

    fn write_json(&self, analysis: &Analysis) -> Result<GenerationReport> {
        let mut report = GenerationReport::default();
        let payload = JsonReport {
            project: &self.project_name,
            stats: analysis.stats(),
            model: &analysis.model,
            modules: &analysis.modules,
            diagrams: self.include_diagrams.then_some(&analysis.diagrams),
        };

        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join("analysis.json");
        fs::write(&path, serde_json::to_string_pretty(&payload)?)?;
        report.files.push(path);
        if self.include_diagrams {
            report.diagrams_written = 4;
        }
        Ok(report)
    }

    fn write_markdown(&self, analysis: &Analysis) -> Result<GenerationReport> {
        let mut report = GenerationReport::default();
        let md = generate_markdown(analysis, &self.project_name, self.include_diagrams);

        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join("README.md");
        fs::write(&path, md)?;
        report.files.push(path);
        if self.include_diagrams {
            report.diagrams_written = 4;
        }
        Ok(report)
    }
}
