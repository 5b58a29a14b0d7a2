// Template engine for generating HTML output

use crate::analysis::Analysis;
use crate::error::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera, Value};

/// One diagram as handed to the template
#[derive(Debug, Serialize)]
pub struct DiagramView<'a> {
    pub title: &'static str,
    pub file_name: &'static str,
    pub source: &'a str,
}

/// Template engine wrapping Tera with custom filters and templates
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Create a new template engine with embedded templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![(
            "report.html",
            include_str!("../../templates/report.html.tera"),
        )])?;

        tera.register_filter("pluralize", pluralize);
        tera.register_filter("slugify", slugify_filter);

        Ok(Self { tera })
    }

    /// Render the single-page report
    pub fn render_report(
        &self,
        analysis: &Analysis,
        project_name: &str,
        include_diagrams: bool,
    ) -> Result<String> {
        let diagrams: Vec<DiagramView> = if include_diagrams {
            analysis
                .diagrams
                .iter()
                .map(|(kind, source)| DiagramView {
                    title: kind.title(),
                    file_name: kind.file_name(),
                    source,
                })
                .collect()
        } else {
            Vec::new()
        };

        let mut context = Context::new();
        context.insert("project_name", project_name);
        context.insert("stats", &analysis.stats());
        context.insert("model", &analysis.model);
        context.insert("modules", &analysis.modules);
        context.insert("diagrams", &diagrams);

        Ok(self.tera.render("report.html", &context)?)
    }
}

/// Pluralize a word based on count
fn pluralize(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let count = value.as_u64().unwrap_or(0);
    let singular = args
        .get("singular")
        .and_then(|v| v.as_str())
        .unwrap_or("item");
    let default_plural = format!("{}s", singular);
    let plural = args
        .get("plural")
        .and_then(|v| v.as_str())
        .unwrap_or(&default_plural);

    if count == 1 {
        Ok(Value::String(format!("{} {}", count, singular)))
    } else {
        Ok(Value::String(format!("{} {}", count, plural)))
    }
}

fn slugify_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value.as_str().unwrap_or("");
    Ok(Value::String(slugify(s)))
}

/// Convert text to URL-friendly slug
pub fn slugify(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
