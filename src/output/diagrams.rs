// Diagram generation for surveyor
//
// Turns a structural model and its module view into Mermaid diagrams.
// Rendering is a pure function of the input lists; nothing is sorted or hashed
// into the output order.

use crate::analysis::modules::resolve_include;
use crate::analysis::StructuralModel;
use crate::output::mermaid::{node_id, sanitize_id, ClassBox, Diagram, Direction, Edge, Header, Node};
use crate::parser::{FileKind, FunctionKind, ModuleEntity};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

const START_ID: &str = "Start";
const PLACEHOLDER_FUNCTION_ID: &str = "NoFunctions";
const PLACEHOLDER_FUNCTION_LABEL: &str = "No functions found";
const PLACEHOLDER_CLASS_NAME: &str = "NoClasses";
const PLACEHOLDER_CLASS_LABEL: &str = "No classes found";

const HIGHLIGHTED_STYLE: &str = "fill:#ffd54f,stroke:#f57f17,stroke-width:2px";
const FUNCTION_STYLE: &str = "fill:#e3f2fd,stroke:#1565c0";
const MORE_STYLE: &str = "fill:#eeeeee,stroke:#9e9e9e,stroke-dasharray:3 3";

/// The four diagram kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramKind {
    Flowchart,
    ClassDiagram,
    CallGraph,
    ModuleGraph,
}

impl DiagramKind {
    pub const ALL: [DiagramKind; 4] = [
        DiagramKind::Flowchart,
        DiagramKind::ClassDiagram,
        DiagramKind::CallGraph,
        DiagramKind::ModuleGraph,
    ];

    /// File name used when the diagram is written to disk
    pub fn file_name(&self) -> &'static str {
        match self {
            DiagramKind::Flowchart => "flowchart.mmd",
            DiagramKind::ClassDiagram => "classes.mmd",
            DiagramKind::CallGraph => "call_graph.mmd",
            DiagramKind::ModuleGraph => "modules.mmd",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DiagramKind::Flowchart => "Flowchart",
            DiagramKind::ClassDiagram => "Class Diagram",
            DiagramKind::CallGraph => "Call Graph",
            DiagramKind::ModuleGraph => "Module Graph",
        }
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagramKind::Flowchart => "flowchart",
            DiagramKind::ClassDiagram => "class",
            DiagramKind::CallGraph => "call-graph",
            DiagramKind::ModuleGraph => "module",
        };
        f.write_str(name)
    }
}

impl FromStr for DiagramKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flowchart" | "flow" => Ok(DiagramKind::Flowchart),
            "class" | "classes" | "class-diagram" => Ok(DiagramKind::ClassDiagram),
            "call-graph" | "callgraph" | "calls" => Ok(DiagramKind::CallGraph),
            "module" | "modules" | "module-graph" => Ok(DiagramKind::ModuleGraph),
            other => Err(format!(
                "unknown diagram kind '{}' (expected flowchart, class, call-graph or module)",
                other
            )),
        }
    }
}

/// Rendered text of every diagram kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramSet {
    pub flowchart: String,
    pub class_diagram: String,
    pub call_graph: String,
    pub module_graph: String,
}

impl DiagramSet {
    pub fn get(&self, kind: DiagramKind) -> &str {
        match kind {
            DiagramKind::Flowchart => &self.flowchart,
            DiagramKind::ClassDiagram => &self.class_diagram,
            DiagramKind::CallGraph => &self.call_graph,
            DiagramKind::ModuleGraph => &self.module_graph,
        }
    }

    /// Diagrams in a fixed order
    pub fn iter(&self) -> impl Iterator<Item = (DiagramKind, &str)> {
        DiagramKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}

/// Diagram generator for creating Mermaid diagrams
#[derive(Debug, Clone)]
pub struct DiagramGenerator {
    /// Function nodes shown per file in the module graph before collapsing
    max_functions_per_file: usize,
    flowchart_direction: Direction,
    call_graph_direction: Direction,
}

impl DiagramGenerator {
    pub fn new() -> Self {
        Self {
            max_functions_per_file: 10,
            flowchart_direction: Direction::TopDown,
            call_graph_direction: Direction::LeftRight,
        }
    }

    /// Set the per-file function limit of the module graph
    pub fn with_max_functions(mut self, max: usize) -> Self {
        self.max_functions_per_file = max;
        self
    }

    pub fn with_flowchart_direction(mut self, dir: Direction) -> Self {
        self.flowchart_direction = dir;
        self
    }

    pub fn with_call_graph_direction(mut self, dir: Direction) -> Self {
        self.call_graph_direction = dir;
        self
    }

    /// Render every diagram kind
    pub fn render_all(
        &self,
        model: &StructuralModel,
        modules: &[ModuleEntity],
        highlights: &HashSet<String>,
    ) -> DiagramSet {
        DiagramSet {
            flowchart: self.flowchart(model).render(),
            class_diagram: self.class_diagram(model).render(),
            call_graph: self.call_graph(model).render(),
            module_graph: self.module_graph(modules, highlights).render(),
        }
    }

    /// Render a single diagram kind
    pub fn render(
        &self,
        kind: DiagramKind,
        model: &StructuralModel,
        modules: &[ModuleEntity],
        highlights: &HashSet<String>,
    ) -> Diagram {
        match kind {
            DiagramKind::Flowchart => self.flowchart(model),
            DiagramKind::ClassDiagram => self.class_diagram(model),
            DiagramKind::CallGraph => self.call_graph(model),
            DiagramKind::ModuleGraph => self.module_graph(modules, highlights),
        }
    }

    /// Control-flow overview: functions hanging off a `Start` node
    pub fn flowchart(&self, model: &StructuralModel) -> Diagram {
        let mut diagram = Diagram::new(Header::Flowchart(self.flowchart_direction));
        if model.functions.is_empty() {
            diagram.add_node(Node::rect(PLACEHOLDER_FUNCTION_ID, PLACEHOLDER_FUNCTION_LABEL));
            return diagram;
        }

        diagram.add_node(Node::stadium(START_ID, "Start"));
        for func in &model.functions {
            diagram.add_node(Node::rect(flow_node_id(&func.name), func.name.as_str()));
        }

        if model.has_main() {
            diagram.add_edge(Edge::solid(START_ID, "main"));
        }
        add_call_edges(&mut diagram, model, flow_node_id);

        // keep every node reachable when nothing links them
        if diagram.edge_count() == 0 {
            for func in &model.functions {
                diagram.add_edge(Edge::solid(START_ID, flow_node_id(&func.name)));
            }
        }

        diagram
    }

    /// Who calls whom; isolated functions stay isolated
    pub fn call_graph(&self, model: &StructuralModel) -> Diagram {
        let mut diagram = Diagram::new(Header::Graph(self.call_graph_direction));
        if model.functions.is_empty() {
            diagram.add_node(Node::rect(PLACEHOLDER_FUNCTION_ID, PLACEHOLDER_FUNCTION_LABEL));
            return diagram;
        }

        for func in &model.functions {
            let label = format!("{}()", sanitize_id(&func.name));
            diagram.add_node(Node::rect(node_id(&func.name), label));
        }
        add_call_edges(&mut diagram, model, node_id);

        diagram
    }

    /// One box per class with its members and methods.
    ///
    /// Classes sharing a sanitized name (a forward declaration followed by
    /// the definition, say) are merged into the first box.
    pub fn class_diagram(&self, model: &StructuralModel) -> Diagram {
        let mut diagram = Diagram::new(Header::ClassDiagram);
        if model.classes.is_empty() {
            diagram.add_class(ClassBox {
                name: PLACEHOLDER_CLASS_NAME.to_string(),
                lines: vec![PLACEHOLDER_CLASS_LABEL.to_string()],
            });
            return diagram;
        }

        let mut boxes: Vec<ClassBox> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for class in &model.classes {
            let name = sanitize_id(&class.name);
            let idx = *positions.entry(name.clone()).or_insert_with(|| {
                boxes.push(ClassBox {
                    name,
                    lines: Vec::new(),
                });
                boxes.len() - 1
            });

            let lines = class
                .members
                .iter()
                .map(|m| format!("+{}", sanitize_id(m)))
                .chain(class.methods.iter().map(|m| format!("+{}()", sanitize_id(m))));
            for line in lines {
                if !boxes[idx].lines.contains(&line) {
                    boxes[idx].lines.push(line);
                }
            }
        }

        for class_box in boxes {
            diagram.add_class(class_box);
        }
        diagram
    }

    /// Per-file view: files grouped into `Headers` and `Sources`, their
    /// functions, and dashed edges for local includes
    pub fn module_graph(&self, modules: &[ModuleEntity], highlights: &HashSet<String>) -> Diagram {
        let mut diagram = Diagram::new(Header::Graph(Direction::TopDown));
        if modules.iter().all(|m| m.functions.is_empty()) {
            diagram.add_node(Node::rect(PLACEHOLDER_FUNCTION_ID, PLACEHOLDER_FUNCTION_LABEL));
            return diagram;
        }

        let file_ids = file_node_ids(modules);
        let mut highlighted = Vec::new();
        let mut plain = Vec::new();
        let mut more = Vec::new();

        for (group, kind) in [("Headers", FileKind::Header), ("Sources", FileKind::Source)] {
            let mut sub = Diagram::new(Header::Graph(Direction::TopDown));
            for (idx, module) in modules.iter().enumerate().filter(|(_, m)| m.kind == kind) {
                let file_id = &file_ids[idx];
                sub.add_node(Node::rect(file_id.as_str(), module.file_name.as_str()));

                for func in module.functions.iter().take(self.max_functions_per_file) {
                    let id = format!("{}_{}_{}", file_id, sanitize_id(&func.function_name), func.line);
                    let label = match func.kind {
                        FunctionKind::Definition => format!("{}()", func.function_name),
                        FunctionKind::Declaration => format!("{}();", func.function_name),
                    };
                    if sub.add_node(Node::rounded(id.as_str(), label)) {
                        if highlights.contains(&func.function_name) {
                            highlighted.push(id.clone());
                        } else {
                            plain.push(id.clone());
                        }
                    }
                    sub.add_edge(Edge::solid(file_id.as_str(), id));
                }

                let hidden = module.functions.len().saturating_sub(self.max_functions_per_file);
                if hidden > 0 {
                    let id = format!("{}_more", file_id);
                    sub.add_node(Node::rect(id.as_str(), format!("+{} more", hidden)));
                    sub.add_edge(Edge::solid(file_id.as_str(), id.as_str()));
                    more.push(id);
                }
            }

            if !sub.statements().is_empty() {
                diagram.add_subgraph(group, group, sub);
            }
        }

        for (idx, module) in modules.iter().enumerate() {
            for target in &module.includes {
                for to in resolve_include(modules, idx, target) {
                    diagram.add_edge(Edge::dashed(file_ids[idx].as_str(), file_ids[to].as_str()));
                }
            }
        }

        diagram.add_style_def("highlighted", HIGHLIGHTED_STYLE);
        diagram.add_style_def("function", FUNCTION_STYLE);
        diagram.add_style_def("more", MORE_STYLE);
        diagram.assign_style(highlighted, "highlighted");
        diagram.assign_style(plain, "function");
        diagram.assign_style(more, "more");

        diagram
    }
}

impl Default for DiagramGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// One edge per call that names a known function
fn add_call_edges(diagram: &mut Diagram, model: &StructuralModel, id_of: fn(&str) -> String) {
    let lookup = model.function_lookup();
    for func in &model.functions {
        let from = id_of(&func.name);
        for call in &func.calls {
            if let Some(target) = lookup.get(call.as_str()) {
                let to = id_of(&target.name);
                if to != from {
                    diagram.add_edge(Edge::solid(from.as_str(), to));
                }
            }
        }
    }
}

/// Flowchart node id; a function called `Start` steps aside for the entry node
fn flow_node_id(name: &str) -> String {
    let mut id = node_id(name);
    if id == START_ID {
        id.push('_');
    }
    id
}

/// Unique node ids for file nodes, in module order
fn file_node_ids(modules: &[ModuleEntity]) -> Vec<String> {
    let mut used = HashSet::new();
    modules
        .iter()
        .enumerate()
        .map(|(idx, module)| {
            let base = format!("file_{}", sanitize_id(&module.file_name));
            let id = if used.contains(&base) {
                format!("{}_{}", base, idx)
            } else {
                base
            };
            used.insert(id.clone());
            id
        })
        .collect()
}
