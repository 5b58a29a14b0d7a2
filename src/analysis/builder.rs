// Structural model builder
//
// Walks files in caller order and lines in file order, classifying each line
// with the plain dialect and pulling calls or members out of the scope that
// follows a signature.

use crate::analysis::model::StructuralModel;
use crate::parser::{
    classify, extract_calls, extract_members, track_scope, ClassEntity, Dialect, FunctionEntity,
    LineKind, SourceFile, Terminator,
};
use tracing::debug;

/// Build the structural model for a set of files
pub fn build_model(files: &[SourceFile]) -> StructuralModel {
    let mut model = StructuralModel::new();

    for file in files {
        scan_file(&mut model, file);
    }

    debug!(
        files = model.file_count,
        functions = model.functions.len(),
        classes = model.classes.len(),
        "built structural model"
    );

    model
}

fn scan_file(model: &mut StructuralModel, file: &SourceFile) {
    let lines = file.lines();
    model.file_count += 1;
    model.line_count += lines.len();

    for (index, raw) in lines.iter().enumerate() {
        match classify(raw, Dialect::Plain) {
            LineKind::None => {}
            LineKind::Include(path) => {
                model.includes.insert(&path);
            }
            LineKind::Define(name) => {
                model.defines.insert(&name);
            }
            LineKind::FunctionSignature(sig) => {
                let calls = match sig.terminator {
                    Terminator::Declaration => Vec::new(),
                    Terminator::Body => track_scope(&lines, index)
                        .map(|range| extract_calls(&lines, range, &sig.name))
                        .unwrap_or_default(),
                };
                model.functions.push(FunctionEntity {
                    name: sig.name,
                    return_type: sig.return_type,
                    parameters: sig.parameters,
                    calls,
                    source_line: index + 1,
                    source_file: file.file_name.clone(),
                });
            }
            LineKind::ClassSignature(name) => {
                let found = track_scope(&lines, index)
                    .map(|range| extract_members(&lines, range))
                    .unwrap_or_default();
                model.classes.push(ClassEntity {
                    name,
                    methods: found.methods,
                    members: found.members,
                    source_line: index + 1,
                    source_file: file.file_name.clone(),
                });
            }
        }
    }

    debug!(file = %file.file_name, lines = lines.len(), "scanned file");
}
