// Markdown report

use crate::analysis::Analysis;
use crate::parser::FunctionKind;

/// Generate markdown documentation
pub fn generate_markdown(analysis: &Analysis, project_name: &str, include_diagrams: bool) -> String {
    let stats = analysis.stats();
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", project_name));
    md.push_str("## Project Statistics\n\n");
    md.push_str(&format!("- **Files:** {}\n", stats.files));
    md.push_str(&format!("- **Lines:** {}\n", stats.lines));
    md.push_str(&format!("- **Functions:** {}\n", stats.functions));
    md.push_str(&format!("- **Classes:** {}\n", stats.classes));
    md.push_str(&format!("- **Includes:** {}\n", stats.includes));
    md.push_str(&format!("- **Defines:** {}\n", stats.defines));
    md.push_str(&format!(
        "- **Calls:** {} ({} to known functions)\n",
        stats.calls, stats.resolved_calls
    ));
    md.push('\n');

    if include_diagrams {
        for (kind, source) in analysis.diagrams.iter() {
            md.push_str(&format!("## {}\n\n", kind.title()));
            md.push_str("```mermaid\n");
            md.push_str(source);
            md.push_str("\n```\n\n");
        }
    }

    md.push_str("## Functions\n\n");
    if analysis.model.functions.is_empty() {
        md.push_str("_No functions found_\n\n");
    } else {
        md.push_str("| Function | Returns | Parameters | Calls | Location |\n");
        md.push_str("|---|---|---|---|---|\n");
        for func in &analysis.model.functions {
            md.push_str(&format!(
                "| `{}` | `{}` | {} | {} | {}:{} |\n",
                func.name,
                func.return_type,
                code_list(&func.parameters),
                code_list(&func.calls),
                func.source_file,
                func.source_line
            ));
        }
        md.push('\n');
    }

    md.push_str("## Classes\n\n");
    if analysis.model.classes.is_empty() {
        md.push_str("_No classes found_\n\n");
    }
    for class in &analysis.model.classes {
        md.push_str(&format!("### {}\n\n", class.name));
        md.push_str(&format!("Defined in {}:{}\n\n", class.source_file, class.source_line));
        if !class.members.is_empty() {
            md.push_str(&format!("- **Members:** {}\n", code_list(&class.members)));
        }
        if !class.methods.is_empty() {
            md.push_str(&format!("- **Methods:** {}\n", code_list(&class.methods)));
        }
        md.push('\n');
    }

    md.push_str("## Files\n\n");
    for module in &analysis.modules {
        let definitions = module
            .functions
            .iter()
            .filter(|f| f.kind == FunctionKind::Definition)
            .count();
        md.push_str(&format!(
            "- `{}`: {} defined, {} declared",
            module.file_name,
            definitions,
            module.functions.len() - definitions
        ));
        if !module.includes.is_empty() {
            md.push_str(&format!(", includes {}", code_list(&module.includes)));
        }
        md.push('\n');
    }

    if !analysis.model.defines.is_empty() {
        md.push_str("\n## Macros\n\n");
        for name in analysis.model.defines.iter() {
            md.push_str(&format!("- `{}`\n", name));
        }
    }

    md
}

fn code_list(items: &[String]) -> String {
    items
        .iter()
        .map(|i| format!("`{}`", i))
        .collect::<Vec<_>>()
        .join(", ")
}
