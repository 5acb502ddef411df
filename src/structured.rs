//! The node/edge form automata take when they cross into or out of the library.

use crate::{
    automaton::{AddMode, Automaton, Kind, ValidationReport, EPSILON},
    error::{Error, Result},
};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    /// Display text. Defaults to the id and is never read back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "final", default)]
    pub is_final: bool,
    #[serde(default)]
    pub initial: bool,
}

impl Node {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            label: None,
            is_final: false,
            initial: false,
        }
    }

    pub fn initial(mut self) -> Self {
        self.initial = true;
        self
    }

    pub fn accepting(mut self) -> Self {
        self.is_final = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    /// A single symbol. Absent, empty and `ε` all mean epsilon.
    #[serde(default)]
    pub label: Option<String>,
}

impl Edge {
    pub fn new<F, T>(from: F, label: Option<&str>, to: T) -> Self
    where
        F: Into<String>,
        T: Into<String>,
    {
        Self {
            from: from.into(),
            to: to.into(),
            label: label.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

/// Reads an edge label: `None` for epsilon, the symbol otherwise.
pub(crate) fn parse_symbol(label: Option<&str>) -> Result<Option<char>> {
    let label = match label {
        None | Some("") => return Ok(None),
        Some(label) => label,
    };

    let mut chars = label.chars();
    match (chars.next(), chars.next()) {
        (Some(EPSILON), None) => Ok(None),
        (Some(symbol), None) => Ok(Some(symbol)),
        _ => Err(Error::InvalidSymbol(label.to_string())),
    }
}

pub(crate) fn symbol_label(symbol: Option<char>) -> String {
    symbol.unwrap_or(EPSILON).to_string()
}

/// Builds an automaton from nodes and edges.
///
/// States are added in node order; a repeated id fails with `DuplicateState`.
/// The first node marked initial becomes the initial state, otherwise the first
/// node. Edges are then added in order.
pub fn build_from_structured(nodes: &[Node], edges: &[Edge], kind: Kind) -> Result<Automaton> {
    let mut automaton = Automaton::new(kind);

    for node in nodes {
        automaton.add_state(node.id.as_str(), node.is_final, AddMode::Strict)?;
    }
    if let Some(node) = nodes.iter().find(|node| node.initial) {
        automaton.set_initial(&node.id)?;
    }
    for edge in edges {
        let symbol = parse_symbol(edge.label.as_deref())?;
        automaton.add_transition(&edge.from, symbol, &edge.to)?;
    }

    debug!(
        "built {} with {} states and {} transitions",
        kind,
        automaton.len(),
        edges.len()
    );
    Ok(automaton)
}

/// One node per state and one edge per transition. Epsilon edges are labelled `ε`.
pub fn to_structured(automaton: &Automaton) -> Graph {
    let initial = automaton.initial();

    let nodes = automaton
        .states()
        .map(|(id, state)| Node {
            id: state.name().to_string(),
            label: Some(state.name().to_string()),
            is_final: state.is_final(),
            initial: Some(id) == initial,
        })
        .collect();

    let edges = automaton
        .transitions()
        .map(|(from, symbol, to)| Edge {
            from: automaton[from].name().to_string(),
            to: automaton[to].name().to_string(),
            label: Some(symbol_label(symbol)),
        })
        .collect();

    Graph { nodes, edges }
}

/// Checks a graph before building it. Only an empty node list is an error.
pub fn validate_graph(graph: &Graph) -> ValidationReport {
    let mut report = ValidationReport::default();

    if graph.nodes.is_empty() {
        report.error("no nodes");
        return report;
    }
    if graph.edges.is_empty() {
        report.warn("no edges");
    }

    let initials: Vec<&str> = graph
        .nodes
        .iter()
        .filter(|node| node.initial)
        .map(|node| node.id.as_str())
        .collect();
    match initials.len() {
        0 => report.warn("no initial node"),
        1 => {}
        _ => report.warn(format!("several initial nodes: {}", initials.join(", "))),
    }

    if !graph.nodes.iter().any(|node| node.is_final) {
        report.warn("no final node");
    }

    report
}

impl Graph {
    pub fn validate(&self) -> ValidationReport {
        validate_graph(self)
    }

    pub fn build(&self, kind: Kind) -> Result<Automaton> {
        build_from_structured(&self.nodes, &self.edges, kind)
    }
}

impl From<&Automaton> for Graph {
    fn from(automaton: &Automaton) -> Self {
        to_structured(automaton)
    }
}
