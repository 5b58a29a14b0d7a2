// Entity types extracted from C/C++ source text
//
// These are the leaves of the structural model. They are serializable so the
// whole analysis can be dumped as JSON.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A single uploaded source file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    /// File name as supplied by the caller (opaque apart from its extension)
    pub file_name: String,
    /// Raw newline-delimited text
    pub content: String,
}

impl SourceFile {
    pub fn new(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    /// Build a source file from raw bytes, rejecting anything that is not UTF-8
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let file_name = file_name.into();
        match String::from_utf8(bytes) {
            Ok(content) => Ok(Self { file_name, content }),
            Err(_) => Err(Error::non_text(file_name)),
        }
    }

    /// Header or source, by extension
    pub fn kind(&self) -> FileKind {
        FileKind::from_file_name(&self.file_name)
    }

    /// File name without directories or extension
    pub fn stem(&self) -> &str {
        file_stem(&self.file_name)
    }

    /// Lines of the file, untrimmed
    pub fn lines(&self) -> Vec<&str> {
        self.content.lines().collect()
    }
}

/// Whether a file is a header or a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Header,
    Source,
}

impl FileKind {
    /// `.h` and `.hpp` are headers, everything else is a source file
    pub fn from_file_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".h") || lower.ends_with(".hpp") {
            FileKind::Header
        } else {
            FileKind::Source
        }
    }
}

/// Strip directories and the last extension from a file name or include target
pub fn file_stem(name: &str) -> &str {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match base.rfind('.') {
        Some(0) | None => base,
        Some(idx) => &base[..idx],
    }
}

/// Strip directories from a file name or include target
pub fn base_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// A function found by the plain recognizer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEntity {
    pub name: String,
    /// Return type as written, including any pointer stars
    pub return_type: String,
    /// Raw parameter strings; a lone `void` is dropped
    pub parameters: Vec<String>,
    /// Called names in first-seen order, deduplicated, never the function itself
    pub calls: Vec<String>,
    /// 1-based line of the signature
    pub source_line: usize,
    pub source_file: String,
}

/// A class found by the class recognizer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClassEntity {
    pub name: String,
    pub methods: Vec<String>,
    pub members: Vec<String>,
    /// 1-based line of the `class` keyword
    pub source_line: usize,
    pub source_file: String,
}

/// Whether a module-view function is a prototype or has a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionKind {
    Declaration,
    Definition,
}

/// A function as seen by the per-file module scan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ModuleFunction {
    pub function_name: String,
    /// 1-based line
    pub line: usize,
    pub kind: FunctionKind,
}

/// One file in the module view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ModuleEntity {
    pub file_name: String,
    pub file_stem: String,
    pub kind: FileKind,
    pub functions: Vec<ModuleFunction>,
    /// Include targets exactly as written between the delimiters
    pub includes: Vec<String>,
}

impl ModuleEntity {
    pub fn new(file: &SourceFile) -> Self {
        Self {
            file_name: file.file_name.clone(),
            file_stem: file.stem().to_string(),
            kind: file.kind(),
            functions: Vec::new(),
            includes: Vec::new(),
        }
    }

    pub fn is_header(&self) -> bool {
        self.kind == FileKind::Header
    }
}
