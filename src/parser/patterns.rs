// Line classification for C/C++ sources
//
// Every consumer goes through `classify`, which tries the recognizers in a
// fixed priority order and returns a tagged `LineKind`. Two dialects exist for
// function signatures because the model builder and the module view have
// always disagreed on what a signature looks like.

use once_cell::sync::Lazy;
use regex::Regex;

static INCLUDE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^#\s*include\s*[<"]([^>"]+)[>"]"#).unwrap());

static DEFINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#\s*define\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap());

static CLASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^class\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap());

/// `<type>[*] <name>(<params>) {` or `;`
static PLAIN_FN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^((?:[A-Za-z_](?:\w|::|[<>])*\s+)*[A-Za-z_](?:\w|::|[<>])*)(\s*\*+\s*|\s+)([A-Za-z_][A-Za-z0-9_]*)\s*\(([^()]*)\)\s*(?:const\s*)?([{;])",
    )
    .unwrap()
});

/// Definition, optionally `static`/`inline` qualified
static MODULE_DEF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?:static|inline)\s+)*([A-Za-z_][\w\s\*:]*?[\s\*])([A-Za-z_][A-Za-z0-9_]*)\s*\(([^()]*)\)\s*\{",
    )
    .unwrap()
});

/// K&R style definition with no return type
static MODULE_BARE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*\(([^()]*)\)\s*\{").unwrap()
});

/// `extern` prototype
static MODULE_EXTERN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^extern\s+([A-Za-z_][\w\s\*:]*?[\s\*])([A-Za-z_][A-Za-z0-9_]*)\s*\(([^()]*)\)\s*;",
    )
    .unwrap()
});

/// Names the module dialect refuses to treat as functions
pub const CONTROL_KEYWORDS: &[&str] =
    &["if", "while", "for", "switch", "return", "sizeof", "typedef"];

/// Words that start a statement and therefore can never start a return or
/// member type. Type words may only contain `:` as part of `::`, so labels
/// like `done:` never pass for a type either.
pub const STATEMENT_KEYWORDS: &[&str] =
    &["return", "else", "case", "default", "goto", "new", "delete", "throw", "do"];

/// Which signature grammar to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Used by the flowchart, call graph and class diagram pipeline
    Plain,
    /// Used by the per-file module view
    Module,
}

/// How a recognized signature line ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// Ends in `{`
    Body,
    /// Ends in `;`
    Declaration,
}

/// A single-line function signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub return_type: String,
    pub name: String,
    pub parameters: Vec<String>,
    pub terminator: Terminator,
}

/// Classification of one trimmed source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    None,
    Include(String),
    Define(String),
    FunctionSignature(Signature),
    ClassSignature(String),
}

/// Classify a line. Leading and trailing whitespace is ignored.
pub fn classify(line: &str, dialect: Dialect) -> LineKind {
    let line = line.trim();
    if line.is_empty() {
        return LineKind::None;
    }

    if let Some(caps) = INCLUDE_RE.captures(line) {
        return LineKind::Include(caps[1].to_string());
    }
    if let Some(caps) = DEFINE_RE.captures(line) {
        return LineKind::Define(caps[1].to_string());
    }

    let signature = match dialect {
        Dialect::Plain => match_plain_signature(line),
        Dialect::Module => match_module_signature(line),
    };
    if let Some(signature) = signature {
        return LineKind::FunctionSignature(signature);
    }

    if let Some(caps) = CLASS_RE.captures(line) {
        return LineKind::ClassSignature(caps[1].to_string());
    }

    LineKind::None
}

fn match_plain_signature(line: &str) -> Option<Signature> {
    if line.contains("class") || line.contains("struct") {
        return None;
    }
    let caps = PLAIN_FN_RE.captures(line)?;

    let base_type = &caps[1];
    if starts_with_statement_keyword(base_type) {
        return None;
    }

    let stars = caps[2].trim();
    let terminator = if &caps[5] == "{" {
        Terminator::Body
    } else {
        Terminator::Declaration
    };

    Some(Signature {
        return_type: format!("{}{}", base_type, stars),
        name: caps[3].to_string(),
        parameters: parse_parameters(&caps[4]),
        terminator,
    })
}

fn match_module_signature(line: &str) -> Option<Signature> {
    // The first alternative that matches decides; a keyword name there means
    // the line is not a function at all.
    let (return_type, name, params, terminator) = if let Some(caps) = MODULE_DEF_RE.captures(line)
    {
        (
            normalize_type(&caps[1]),
            caps[2].to_string(),
            caps[3].to_string(),
            Terminator::Body,
        )
    } else if let Some(caps) = MODULE_BARE_RE.captures(line) {
        (
            String::new(),
            caps[1].to_string(),
            caps[2].to_string(),
            Terminator::Body,
        )
    } else if let Some(caps) = MODULE_EXTERN_RE.captures(line) {
        (
            normalize_type(&caps[1]),
            caps[2].to_string(),
            caps[3].to_string(),
            Terminator::Declaration,
        )
    } else {
        return None;
    };

    if CONTROL_KEYWORDS.contains(&name.as_str()) {
        return None;
    }

    Some(Signature {
        return_type,
        name,
        parameters: parse_parameters(&params),
        terminator,
    })
}

/// Split a raw parameter list. An empty list or a lone `void` yields nothing.
pub fn parse_parameters(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty() && *p != "void")
        .map(str::to_string)
        .collect()
}

/// Whether the first word of a type is a statement keyword
pub fn starts_with_statement_keyword(type_text: &str) -> bool {
    type_text
        .split_whitespace()
        .next()
        .map_or(false, |word| STATEMENT_KEYWORDS.contains(&word))
}

/// Collapse runs of whitespace and drop the space before pointer stars
fn normalize_type(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(" *", "*")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: &str) -> LineKind {
        classify(line, Dialect::Plain)
    }

    fn module(line: &str) -> LineKind {
        classify(line, Dialect::Module)
    }

    fn signature(kind: LineKind) -> Signature {
        match kind {
            LineKind::FunctionSignature(sig) => sig,
            other => panic!("expected a function signature, got {:?}", other),
        }
    }

    #[test]
    fn test_include_both_delimiters() {
        assert_eq!(plain("#include <stdio.h>"), LineKind::Include("stdio.h".into()));
        assert_eq!(plain("#include \"list.h\""), LineKind::Include("list.h".into()));
        assert_eq!(plain("#  include <sys/types.h>"), LineKind::Include("sys/types.h".into()));
        assert_eq!(module("#include \"util/math.h\""), LineKind::Include("util/math.h".into()));
    }

    #[test]
    fn test_define() {
        assert_eq!(plain("#define MAX_SIZE 100"), LineKind::Define("MAX_SIZE".into()));
        assert_eq!(plain("#define SQUARE(x) ((x) * (x))"), LineKind::Define("SQUARE".into()));
        assert_eq!(plain("#ifdef DEBUG"), LineKind::None);
    }

    #[test]
    fn test_plain_definition() {
        let sig = signature(plain("int add(int a, int b) { return a + b; }"));
        assert_eq!(sig.name, "add");
        assert_eq!(sig.return_type, "int");
        assert_eq!(sig.parameters, vec!["int a", "int b"]);
        assert_eq!(sig.terminator, Terminator::Body);
    }

    #[test]
    fn test_plain_pointer_return_and_declaration() {
        let sig = signature(plain("char *duplicate(const char *s);"));
        assert_eq!(sig.name, "duplicate");
        assert_eq!(sig.return_type, "char*");
        assert_eq!(sig.parameters, vec!["const char *s"]);
        assert_eq!(sig.terminator, Terminator::Declaration);

        let sig = signature(plain("Node* make_node(int value) {"));
        assert_eq!(sig.return_type, "Node*");
        assert_eq!(sig.name, "make_node");
    }

    #[test]
    fn test_plain_void_parameters_dropped() {
        let sig = signature(plain("void init(void) {"));
        assert!(sig.parameters.is_empty());
        let sig = signature(plain("int main() {"));
        assert!(sig.parameters.is_empty());
    }

    #[test]
    fn test_plain_multi_word_return_type() {
        let sig = signature(plain("static unsigned int count_bits(unsigned int v) {"));
        assert_eq!(sig.return_type, "static unsigned int");
        assert_eq!(sig.name, "count_bits");
    }

    #[test]
    fn test_plain_rejects_class_and_struct_lines() {
        assert_eq!(plain("struct Node* make_node(int value) {"), LineKind::None);
        assert_eq!(plain("void subclass_init(int x) {"), LineKind::None);
    }

    #[test]
    fn test_plain_rejects_statements() {
        assert_eq!(plain("return compute(x);"), LineKind::None);
        assert_eq!(plain("result = add(1, 2);"), LineKind::None);
        assert_eq!(plain("printf(\"hi\");"), LineKind::None);
        assert_eq!(plain("int total = add(1, 2);"), LineKind::None);
        assert_eq!(plain("if (x > 0) {"), LineKind::None);
    }

    #[test]
    fn test_plain_rejects_labelled_statements() {
        assert_eq!(plain("case 1: f(x);"), LineKind::None);
        assert_eq!(plain("default: g(x);"), LineKind::None);
        assert_eq!(plain("label: h();"), LineKind::None);
        assert_eq!(plain("default : g(x);"), LineKind::None);
    }

    #[test]
    fn test_plain_scoped_return_type() {
        let sig = signature(plain("std::string name_of(int id) {"));
        assert_eq!(sig.return_type, "std::string");
        assert_eq!(sig.name, "name_of");
    }

    #[test]
    fn test_plain_misses_split_signatures() {
        assert_eq!(plain("int add(int a,"), LineKind::None);
        assert_eq!(plain("int add(int a, int b)"), LineKind::None);
    }

    #[test]
    fn test_class_signature() {
        assert_eq!(plain("class Shape {"), LineKind::ClassSignature("Shape".into()));
        assert_eq!(
            plain("class Circle : public Shape {"),
            LineKind::ClassSignature("Circle".into())
        );
        assert_eq!(module("class Shape {"), LineKind::ClassSignature("Shape".into()));
        assert_eq!(plain("struct Point {"), LineKind::None);
    }

    #[test]
    fn test_module_qualified_definition() {
        let sig = signature(module("static inline int max(int a, int b) {"));
        assert_eq!(sig.name, "max");
        assert_eq!(sig.return_type, "int");
        assert_eq!(sig.terminator, Terminator::Body);
    }

    #[test]
    fn test_module_accepts_struct_return() {
        let sig = signature(module("struct Node* create_node(int data) {"));
        assert_eq!(sig.name, "create_node");
        assert_eq!(sig.return_type, "struct Node*");
    }

    #[test]
    fn test_module_bare_definition() {
        let sig = signature(module("main() {"));
        assert_eq!(sig.name, "main");
        assert_eq!(sig.return_type, "");
        assert_eq!(sig.terminator, Terminator::Body);
    }

    #[test]
    fn test_module_extern_declaration() {
        let sig = signature(module("extern int add(int a, int b);"));
        assert_eq!(sig.name, "add");
        assert_eq!(sig.terminator, Terminator::Declaration);
    }

    #[test]
    fn test_module_plain_prototype_not_recognized() {
        assert_eq!(module("int add(int a, int b);"), LineKind::None);
    }

    #[test]
    fn test_module_discards_control_keywords() {
        for line in [
            "if (x) {",
            "while (running) {",
            "for (int i = 0; i < n; i++) {",
            "switch (c) {",
            "else if (y) {",
            "return (x) {",
            "sizeof (x) {",
        ] {
            assert_eq!(module(line), LineKind::None, "line {:?}", line);
        }
    }

    #[test]
    fn test_blank_and_comment_lines() {
        assert_eq!(plain(""), LineKind::None);
        assert_eq!(plain("   "), LineKind::None);
        assert_eq!(plain("// int add(int a) {"), LineKind::None);
        assert_eq!(module("/* main() { */"), LineKind::None);
    }

    #[test]
    fn test_parse_parameters() {
        assert_eq!(parse_parameters(""), Vec::<String>::new());
        assert_eq!(parse_parameters(" void "), Vec::<String>::new());
        assert_eq!(parse_parameters("int a,  char *b"), vec!["int a", "char *b"]);
    }

    #[test]
    fn test_starts_with_statement_keyword() {
        assert!(starts_with_statement_keyword("return"));
        assert!(starts_with_statement_keyword("else int"));
        assert!(starts_with_statement_keyword("default"));
        assert!(!starts_with_statement_keyword("returned_t"));
        assert!(!starts_with_statement_keyword("int"));
    }
}
