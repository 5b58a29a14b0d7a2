// HTML report generator
//
// Writes index.html and, when diagrams are enabled, the Mermaid sources it
// embeds under diagrams/.

use crate::analysis::Analysis;
use crate::error::Result;
use crate::output::report::GenerationReport;
use crate::output::templates::TemplateEngine;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for HTML generation
#[derive(Debug, Clone)]
pub struct HtmlConfig {
    /// Output directory
    pub output_dir: PathBuf,
    /// Project name for titles
    pub project_name: String,
    /// Whether to embed diagrams
    pub generate_diagrams: bool,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("surveyor-docs"),
            project_name: "Project".to_string(),
            generate_diagrams: true,
        }
    }
}

/// HTML report generator
pub struct HtmlGenerator {
    config: HtmlConfig,
    template_engine: TemplateEngine,
}

impl HtmlGenerator {
    /// Create a new HTML generator
    pub fn new(config: HtmlConfig) -> Result<Self> {
        let template_engine = TemplateEngine::new()?;
        Ok(Self {
            config,
            template_engine,
        })
    }

    /// Generate the report page
    pub fn generate(&self, analysis: &Analysis) -> Result<GenerationReport> {
        let mut report = GenerationReport::default();

        fs::create_dir_all(&self.config.output_dir)?;

        let html = self.template_engine.render_report(
            analysis,
            &self.config.project_name,
            self.config.generate_diagrams,
        )?;
        let path = self.config.output_dir.join("index.html");
        fs::write(&path, html)?;
        report.files.push(path);

        if self.config.generate_diagrams {
            let diagrams_dir = self.config.output_dir.join("diagrams");
            fs::create_dir_all(&diagrams_dir)?;
            for (kind, source) in analysis.diagrams.iter() {
                let path = diagrams_dir.join(kind.file_name());
                fs::write(&path, source)?;
                report.files.push(path);
                report.diagrams_written += 1;
            }
        }

        Ok(report)
    }

    /// Get the output directory
    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }
}
