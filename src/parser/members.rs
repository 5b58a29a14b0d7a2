// Class body scanning
//
// Picks methods and data members out of the lines of a class scope. Only
// `class` bodies are scanned; `struct` bodies never reach this code.

use crate::parser::patterns::starts_with_statement_keyword;
use crate::parser::scope::ScopeRange;
use once_cell::sync::Lazy;
use regex::Regex;

/// `<type> <name>(...) [;{]`, allowing trailing `const`, `override` and `= 0`
static METHOD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^((?:[A-Za-z_](?:\w|::|[<>])*\s+)*[A-Za-z_](?:\w|::|[<>])*)[\s\*&]+([A-Za-z_~][A-Za-z0-9_]*)\s*\([^()]*\)\s*(?:const\s*)?(?:override\s*)?(?:=\s*0\s*)?[;{]",
    )
    .unwrap()
});

/// `<type> <name> [=;]`, allowing an array suffix
static MEMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^((?:[A-Za-z_](?:\w|::|[<>])*\s+)*[A-Za-z_](?:\w|::|[<>])*)[\s\*&]+([A-Za-z_][A-Za-z0-9_]*)\s*(?:\[[^\]]*\]\s*)?[=;]",
    )
    .unwrap()
});

/// Methods and members of one class, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassMembers {
    pub methods: Vec<String>,
    pub members: Vec<String>,
}

/// Scan every line of a class scope for methods and members
pub fn extract_members(lines: &[&str], range: ScopeRange) -> ClassMembers {
    let mut found = ClassMembers::default();

    for raw in range.slice(lines) {
        let line = raw.trim();

        if !line.contains("class") {
            if let Some(caps) = METHOD_RE.captures(line) {
                if !starts_with_statement_keyword(&caps[1]) {
                    found.methods.push(caps[2].to_string());
                    continue;
                }
            }
        }

        if line.contains('(') {
            continue;
        }
        if let Some(caps) = MEMBER_RE.captures(line) {
            if !starts_with_statement_keyword(&caps[1]) {
                found.members.push(caps[2].to_string());
            }
        }
    }

    found
}
