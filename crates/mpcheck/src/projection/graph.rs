//! Flat usage graph of the resolved components.

use std::collections::HashMap;

use log::trace;
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};
use serde::Serialize;

use crate::{
    component::ComponentMap, config::ProjectConfig, logical_path::LogicalPath,
    projection::display_name,
};

/// A component in the usage graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub path: LogicalPath,
    pub name: String,
    /// Number of edges touching this node, in either direction.
    pub weight: usize,
    pub external: bool,
}

/// `source` uses `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: LogicalPath,
    pub target: LogicalPath,
}

/// One node per component, one edge per distinct resolved usage.
///
/// Built-in elements and unresolved names have no edges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UsageGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl UsageGraph {
    pub fn node(&self, path: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.path.as_str() == path)
    }
}

/// Build the usage graph of `components`, nodes in component map order.
pub fn build_graph(components: &ComponentMap, project: &ProjectConfig) -> UsageGraph {
    let mut graph: DiGraph<&LogicalPath, ()> = DiGraph::new();
    let indices: HashMap<&LogicalPath, NodeIndex> = components
        .keys()
        .map(|path| (path, graph.add_node(path)))
        .collect();

    for (path, component) in components {
        let source = indices[path];
        for dependency in component.component_dependencies() {
            if let Some(&target) = indices.get(dependency) {
                graph.update_edge(source, target, ());
            }
        }
    }
    trace!(nodes = graph.node_count(), edges = graph.edge_count(); "Usage graph built");

    let nodes = graph
        .node_indices()
        .map(|index| {
            let path = graph[index];
            let weight = graph.edges_directed(index, Direction::Incoming).count()
                + graph.edges_directed(index, Direction::Outgoing).count();
            GraphNode {
                path: path.clone(),
                name: display_name(path, project),
                weight,
                external: path.is_under(project.registry_dir()),
            }
        })
        .collect();

    let edges = graph
        .edge_references()
        .map(|edge| GraphEdge {
            source: graph[edge.source()].clone(),
            target: graph[edge.target()].clone(),
        })
        .collect();

    UsageGraph { nodes, edges }
}
