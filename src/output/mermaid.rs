// Mermaid diagram representation
//
// Renderers build a `Diagram` out of tagged statements and serialize it last.
// Node and edge declarations are deduplicated in first-seen order, so the
// text only depends on the order statements were added.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Layout direction of a flowchart or graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Direction {
    #[default]
    #[serde(rename = "TD", alias = "TB")]
    TopDown,
    #[serde(rename = "BT")]
    BottomUp,
    #[serde(rename = "LR")]
    LeftRight,
    #[serde(rename = "RL")]
    RightLeft,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::TopDown => "TD",
            Direction::BottomUp => "BT",
            Direction::LeftRight => "LR",
            Direction::RightLeft => "RL",
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TD" | "TB" => Ok(Direction::TopDown),
            "BT" => Ok(Direction::BottomUp),
            "LR" => Ok(Direction::LeftRight),
            "RL" => Ok(Direction::RightLeft),
            other => Err(format!("unknown direction: {}", other)),
        }
    }
}

/// First line of a diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Header {
    Flowchart(Direction),
    Graph(Direction),
    ClassDiagram,
}

/// Node outline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    Rect,
    Rounded,
    Stadium,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub shape: NodeShape,
}

impl Node {
    pub fn rect(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::with_shape(id, label, NodeShape::Rect)
    }

    pub fn rounded(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::with_shape(id, label, NodeShape::Rounded)
    }

    pub fn stadium(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::with_shape(id, label, NodeShape::Stadium)
    }

    fn with_shape(id: impl Into<String>, label: impl Into<String>, shape: NodeShape) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            shape,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub style: EdgeStyle,
}

impl Edge {
    pub fn solid(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            style: EdgeStyle::Solid,
        }
    }

    pub fn dashed(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            style: EdgeStyle::Dashed,
        }
    }
}

/// A class box in a class diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassBox {
    pub name: String,
    /// Member lines, already decorated (`+name`, `+name()`)
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Node(Node),
    Edge(Edge),
    ClassBox(ClassBox),
    Subgraph {
        id: String,
        label: String,
        body: Vec<Statement>,
    },
    /// `classDef name attributes`
    StyleDef { class: String, attributes: String },
    /// `class a,b name`
    StyleAssignment { nodes: Vec<String>, class: String },
}

/// A diagram under construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram {
    header: Header,
    statements: Vec<Statement>,
    node_ids: HashSet<String>,
    edge_set: HashSet<Edge>,
}

impl Diagram {
    pub fn new(header: Header) -> Self {
        Self {
            header,
            statements: Vec::new(),
            node_ids: HashSet::new(),
            edge_set: HashSet::new(),
        }
    }

    pub fn header(&self) -> Header {
        self.header
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Declare a node unless one with the same id exists. Returns whether it
    /// was added.
    pub fn add_node(&mut self, node: Node) -> bool {
        if !self.node_ids.insert(node.id.clone()) {
            return false;
        }
        self.statements.push(Statement::Node(node));
        true
    }

    /// Add an edge unless an identical one exists
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        if !self.edge_set.insert(edge.clone()) {
            return false;
        }
        self.statements.push(Statement::Edge(edge));
        true
    }

    pub fn add_class(&mut self, class: ClassBox) {
        self.statements.push(Statement::ClassBox(class));
    }

    /// Add a subgraph built separately; nodes and edges already declared
    /// elsewhere in this diagram are dropped from it
    pub fn add_subgraph(&mut self, id: impl Into<String>, label: impl Into<String>, sub: Diagram) {
        let mut body = Vec::new();
        for statement in sub.statements {
            let keep = match &statement {
                Statement::Node(node) => self.node_ids.insert(node.id.clone()),
                Statement::Edge(edge) => self.edge_set.insert(edge.clone()),
                _ => true,
            };
            if keep {
                body.push(statement);
            }
        }
        self.statements.push(Statement::Subgraph {
            id: id.into(),
            label: label.into(),
            body,
        });
    }

    pub fn add_style_def(&mut self, class: impl Into<String>, attributes: impl Into<String>) {
        self.statements.push(Statement::StyleDef {
            class: class.into(),
            attributes: attributes.into(),
        });
    }

    pub fn assign_style(&mut self, nodes: Vec<String>, class: impl Into<String>) {
        if nodes.is_empty() {
            return;
        }
        self.statements.push(Statement::StyleAssignment {
            nodes,
            class: class.into(),
        });
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_ids.contains(id)
    }

    /// All node declarations, including those inside subgraphs
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        flatten(&self.statements).into_iter().filter_map(|s| match s {
            Statement::Node(node) => Some(node),
            _ => None,
        })
    }

    /// All edges, including those inside subgraphs
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        flatten(&self.statements).into_iter().filter_map(|s| match s {
            Statement::Edge(edge) => Some(edge),
            _ => None,
        })
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassBox> {
        self.statements.iter().filter_map(|s| match s {
            Statement::ClassBox(class) => Some(class),
            _ => None,
        })
    }

    /// The style class assigned to a node, if any
    pub fn style_of(&self, id: &str) -> Option<&str> {
        flatten(&self.statements).into_iter().find_map(|s| match s {
            Statement::StyleAssignment { nodes, class } if nodes.iter().any(|n| n == id) => {
                Some(class.as_str())
            }
            _ => None,
        })
    }

    pub fn edge_count(&self) -> usize {
        self.edge_set.len()
    }

    /// Serialize to Mermaid text
    pub fn render(&self) -> String {
        let mut lines = vec![match self.header {
            Header::Flowchart(dir) => format!("flowchart {}", dir.as_str()),
            Header::Graph(dir) => format!("graph {}", dir.as_str()),
            Header::ClassDiagram => "classDiagram".to_string(),
        }];
        render_statements(&self.statements, 1, &mut lines);
        lines.join("\n")
    }
}

impl fmt::Display for Diagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn flatten(statements: &[Statement]) -> Vec<&Statement> {
    let mut out = Vec::new();
    for statement in statements {
        out.push(statement);
        if let Statement::Subgraph { body, .. } = statement {
            out.extend(flatten(body));
        }
    }
    out
}

fn render_statements(statements: &[Statement], depth: usize, lines: &mut Vec<String>) {
    let indent = "    ".repeat(depth);
    for statement in statements {
        match statement {
            Statement::Node(node) => {
                let label = escape_label(&node.label);
                let text = match node.shape {
                    NodeShape::Rect => format!("{}[\"{}\"]", node.id, label),
                    NodeShape::Rounded => format!("{}(\"{}\")", node.id, label),
                    NodeShape::Stadium => format!("{}([\"{}\"])", node.id, label),
                };
                lines.push(format!("{}{}", indent, text));
            }
            Statement::Edge(edge) => {
                let arrow = match edge.style {
                    EdgeStyle::Solid => "-->",
                    EdgeStyle::Dashed => "-.->",
                };
                lines.push(format!("{}{} {} {}", indent, edge.from, arrow, edge.to));
            }
            Statement::ClassBox(class) => {
                if class.lines.is_empty() {
                    lines.push(format!("{}class {}", indent, class.name));
                } else {
                    lines.push(format!("{}class {} {{", indent, class.name));
                    for line in &class.lines {
                        lines.push(format!("{}    {}", indent, line));
                    }
                    lines.push(format!("{}}}", indent));
                }
            }
            Statement::Subgraph { id, label, body } => {
                lines.push(format!("{}subgraph {} [{}]", indent, id, escape_label(label)));
                render_statements(body, depth + 1, lines);
                lines.push(format!("{}end", indent));
            }
            Statement::StyleDef { class, attributes } => {
                lines.push(format!("{}classDef {} {}", indent, class, attributes));
            }
            Statement::StyleAssignment { nodes, class } => {
                lines.push(format!("{}class {} {}", indent, nodes.join(","), class));
            }
        }
    }
}

/// Strip every character outside `[A-Za-z0-9_]` so a name can be a node id
pub fn sanitize_id(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Words Mermaid reads as keywords when they appear as a bare node id
const RESERVED_IDS: &[&str] = &[
    "end", "graph", "flowchart", "subgraph", "direction", "style", "class", "classDef",
    "click", "linkStyle",
];

/// Sanitized node id for a name, suffixed with `_` when it would collide
/// with a Mermaid keyword
pub fn node_id(name: &str) -> String {
    let mut id = sanitize_id(name);
    if RESERVED_IDS.contains(&id.as_str()) {
        id.push('_');
    }
    id
}

/// Make text safe inside a quoted Mermaid label
fn escape_label(s: &str) -> String {
    s.replace('"', "#quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_id() {
        assert_eq!(sanitize_id("My::Class"), "MyClass");
        assert_eq!(sanitize_id("MyClass"), "MyClass");
        assert_eq!(sanitize_id("foo-bar.c"), "foobarc");
        assert_eq!(sanitize_id("operator<<"), "operator");
        assert_eq!(sanitize_id("naïve_x"), "nave_x");
    }

    #[test]
    fn test_sanitize_id_is_idempotent() {
        for raw in ["My::Class", "a b c", "__init__", "~Destructor", ""] {
            let once = sanitize_id(raw);
            assert_eq!(sanitize_id(&once), once);
        }
    }

    #[test]
    fn test_node_id_avoids_keywords() {
        assert_eq!(node_id("end"), "end_");
        assert_eq!(node_id("subgraph"), "subgraph_");
        assert_eq!(node_id("End"), "End");
        assert_eq!(node_id("my::end"), "myend");
        assert_eq!(node_id("main"), "main");
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("TB".parse::<Direction>().unwrap(), Direction::TopDown);
        assert_eq!("lr".parse::<Direction>().unwrap(), Direction::LeftRight);
        assert!("sideways".parse::<Direction>().is_err());
        assert_eq!(Direction::RightLeft.as_str(), "RL");
    }

    #[test]
    fn test_render_nodes_and_edges() {
        let mut d = Diagram::new(Header::Flowchart(Direction::TopDown));
        d.add_node(Node::stadium("Start", "Start"));
        d.add_node(Node::rect("main", "main"));
        d.add_node(Node::rounded("util", "say \"hi\""));
        d.add_edge(Edge::solid("Start", "main"));
        d.add_edge(Edge::dashed("main", "util"));

        assert_eq!(
            d.render(),
            "flowchart TD\n    Start([\"Start\"])\n    main[\"main\"]\n    util(\"say #quot;hi#quot;\")\n    Start --> main\n    main -.-> util"
        );
        assert_eq!(d.to_string(), d.render());
    }

    #[test]
    fn test_duplicates_are_dropped() {
        let mut d = Diagram::new(Header::Graph(Direction::LeftRight));
        assert!(d.add_node(Node::rect("a", "a")));
        assert!(!d.add_node(Node::rect("a", "again")));
        assert!(d.add_edge(Edge::solid("a", "b")));
        assert!(!d.add_edge(Edge::solid("a", "b")));
        assert!(d.add_edge(Edge::dashed("a", "b")));
        assert_eq!(d.nodes().count(), 1);
        assert_eq!(d.edge_count(), 2);
    }

    #[test]
    fn test_render_class_boxes() {
        let mut d = Diagram::new(Header::ClassDiagram);
        d.add_class(ClassBox {
            name: "Shape".into(),
            lines: vec!["+id".into(), "+draw()".into()],
        });
        d.add_class(ClassBox {
            name: "Empty".into(),
            lines: vec![],
        });
        assert_eq!(
            d.render(),
            "classDiagram\n    class Shape {\n        +id\n        +draw()\n    }\n    class Empty"
        );
        assert_eq!(d.classes().count(), 2);
    }

    #[test]
    fn test_subgraphs_and_styles() {
        let mut sub = Diagram::new(Header::Graph(Direction::TopDown));
        sub.add_node(Node::rect("f", "f()"));
        sub.add_edge(Edge::solid("file", "f"));

        let mut d = Diagram::new(Header::Graph(Direction::TopDown));
        d.add_subgraph("Sources", "Sources", sub);
        d.add_style_def("function", "fill:#fff");
        d.assign_style(vec!["f".into()], "function");
        d.assign_style(vec![], "more");

        assert!(d.has_node("f"));
        assert_eq!(d.edge_count(), 1);
        assert_eq!(d.style_of("f"), Some("function"));
        assert_eq!(d.style_of("g"), None);
        assert_eq!(
            d.render(),
            "graph TD\n    subgraph Sources [Sources]\n        f[\"f()\"]\n        file --> f\n    end\n    classDef function fill:#fff\n    class f function"
        );
    }
}
