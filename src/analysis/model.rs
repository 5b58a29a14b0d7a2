// Structural model aggregated over all analyzed files

use crate::parser::{ClassEntity, FunctionEntity};
use serde::{Serialize, Serializer};
use std::collections::{HashMap, HashSet};

/// Insertion-ordered set of strings, deduplicated by exact value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedSet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl OrderedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value unless already present. Returns whether it was added.
    pub fn insert(&mut self, value: &str) -> bool {
        if self.seen.contains(value) {
            return false;
        }
        self.seen.insert(value.to_string());
        self.items.push(value.to_string());
        true
    }

    pub fn contains(&self, value: &str) -> bool {
        self.seen.contains(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Serialize for OrderedSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.items)
    }
}

/// Functions, classes, includes and defines from one analysis run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralModel {
    /// Every recognized function; duplicates across files are kept
    pub functions: Vec<FunctionEntity>,
    pub classes: Vec<ClassEntity>,
    pub includes: OrderedSet,
    pub defines: OrderedSet,
    /// Number of files scanned
    pub file_count: usize,
    /// Number of lines scanned across all files
    pub line_count: usize,
}

impl StructuralModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a function by exact name. The first entry wins on duplicates.
    pub fn resolve(&self, name: &str) -> Option<&FunctionEntity> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Name to function map with the same first-wins rule as `resolve`
    pub fn function_lookup(&self) -> HashMap<&str, &FunctionEntity> {
        let mut lookup = HashMap::new();
        for func in &self.functions {
            lookup.entry(func.name.as_str()).or_insert(func);
        }
        lookup
    }

    /// Whether a function called `main` was found
    pub fn has_main(&self) -> bool {
        self.resolve("main").is_some()
    }

    /// Whether nothing at all was recognized
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
            && self.classes.is_empty()
            && self.includes.is_empty()
            && self.defines.is_empty()
    }

    /// Summary counts
    pub fn stats(&self) -> ModelStats {
        let lookup = self.function_lookup();
        let calls: usize = self.functions.iter().map(|f| f.calls.len()).sum();
        let resolved_calls = self
            .functions
            .iter()
            .flat_map(|f| f.calls.iter())
            .filter(|c| lookup.contains_key(c.as_str()))
            .count();

        ModelStats {
            files: self.file_count,
            lines: self.line_count,
            functions: self.functions.len(),
            classes: self.classes.len(),
            includes: self.includes.len(),
            defines: self.defines.len(),
            calls,
            resolved_calls,
        }
    }
}

/// Summary counts for a model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModelStats {
    pub files: usize,
    pub lines: usize,
    pub functions: usize,
    pub classes: usize,
    pub includes: usize,
    pub defines: usize,
    /// Call candidates recorded across all functions
    pub calls: usize,
    /// Call candidates that name a known function
    pub resolved_calls: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn func(name: &str, file: &str, calls: &[&str]) -> FunctionEntity {
        FunctionEntity {
            name: name.to_string(),
            return_type: "int".to_string(),
            parameters: vec![],
            calls: calls.iter().map(|c| c.to_string()).collect(),
            source_line: 1,
            source_file: file.to_string(),
        }
    }

    #[test]
    fn test_ordered_set_keeps_first_seen_order() {
        let mut set = OrderedSet::new();
        assert!(set.insert("stdio.h"));
        assert!(set.insert("list.h"));
        assert!(!set.insert("stdio.h"));
        assert!(set.insert("stdlib.h"));

        let items: Vec<&str> = set.iter().collect();
        assert_eq!(items, vec!["stdio.h", "list.h", "stdlib.h"]);
        assert!(set.contains("list.h"));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_ordered_set_serializes_as_list() {
        let mut set = OrderedSet::new();
        set.insert("B");
        set.insert("A");
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["B","A"]"#);
    }

    #[test]
    fn test_resolve_first_match_wins() {
        let model = StructuralModel {
            functions: vec![func("init", "a.c", &[]), func("init", "b.c", &["x"])],
            ..Default::default()
        };
        assert_eq!(model.resolve("init").unwrap().source_file, "a.c");
        assert_eq!(model.function_lookup()["init"].source_file, "a.c");
        assert!(model.resolve("missing").is_none());
    }

    #[test]
    fn test_stats_counts_resolved_calls() {
        let model = StructuralModel {
            functions: vec![
                func("main", "m.c", &["add", "printf", "if"]),
                func("add", "m.c", &[]),
            ],
            file_count: 1,
            line_count: 12,
            ..Default::default()
        };
        let stats = model.stats();
        assert_eq!(stats.functions, 2);
        assert_eq!(stats.calls, 3);
        assert_eq!(stats.resolved_calls, 1);
        assert_eq!(stats.lines, 12);
        assert!(model.has_main());
    }

    #[test]
    fn test_empty_model() {
        let model = StructuralModel::new();
        assert!(model.is_empty());
        assert_eq!(model.stats(), ModelStats::default());
    }
}
