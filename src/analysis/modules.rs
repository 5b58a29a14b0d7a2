// Per-file module view
//
// Each file becomes one module listing the functions the module dialect
// recognizes and the raw include targets, in source order.

use crate::parser::{
    base_name, classify, file_stem, Dialect, FunctionKind, LineKind, ModuleEntity, ModuleFunction,
    SourceFile, Terminator,
};
use tracing::debug;

/// Scan every file with the module dialect
pub fn build_modules(files: &[SourceFile]) -> Vec<ModuleEntity> {
    let modules: Vec<ModuleEntity> = files.iter().map(scan_module).collect();
    debug!(modules = modules.len(), "built module view");
    modules
}

/// Scan a single file into a module
pub fn scan_module(file: &SourceFile) -> ModuleEntity {
    let mut module = ModuleEntity::new(file);

    for (index, raw) in file.content.lines().enumerate() {
        match classify(raw, Dialect::Module) {
            LineKind::Include(path) => module.includes.push(path),
            LineKind::FunctionSignature(sig) => {
                let kind = match sig.terminator {
                    Terminator::Body => FunctionKind::Definition,
                    Terminator::Declaration => FunctionKind::Declaration,
                };
                module.functions.push(ModuleFunction {
                    function_name: sig.name,
                    line: index + 1,
                    kind,
                });
            }
            LineKind::None | LineKind::Define(_) | LineKind::ClassSignature(_) => {}
        }
    }

    module
}

/// Indices of the modules an include target refers to.
///
/// A module matches when its stem equals the target's stem. When several
/// modules share that stem, the ones whose file name equals the target's
/// file name are preferred. `from` itself is never returned.
pub fn resolve_include(modules: &[ModuleEntity], from: usize, target: &str) -> Vec<usize> {
    let stem = file_stem(target);
    let target_name = base_name(target);

    let by_stem: Vec<usize> = modules
        .iter()
        .enumerate()
        .filter(|(idx, m)| *idx != from && m.file_stem == stem)
        .map(|(idx, _)| idx)
        .collect();

    let exact: Vec<usize> = by_stem
        .iter()
        .copied()
        .filter(|&idx| base_name(&modules[idx].file_name) == target_name)
        .collect();

    if exact.is_empty() {
        by_stem
    } else {
        exact
    }
}
