//! Multi-stage flow graph between categorical fields, for Sankey charts.
//!
//! Nodes are keyed by `(stage, value)`, so the same label in two stages is
//! two nodes. Node ids and link order follow first appearance while walking
//! stage pairs left to right and records in view order, which makes the
//! output identical for identical input.

use crate::record::{CategoricalField, Record};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Composite node identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeKey {
    /// Index into the stage list
    pub stage: usize,
    /// Category label at that stage
    pub value: String,
}

/// A graph node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowNode {
    /// Position in [`FlowGraph::nodes`]
    pub id: usize,
    /// Index into the stage list
    pub stage: usize,
    /// Category label
    pub value: String,
}

/// A weighted edge between nodes of adjacent stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowLink {
    /// Node id in the earlier stage
    pub source_id: usize,
    /// Node id in the next stage
    pub target_id: usize,
    /// Records observed with this (source, target) pair
    pub weight: usize,
}

/// Nodes and links of a flow graph.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlowGraph {
    /// Nodes, indexed by id
    pub nodes: Vec<FlowNode>,
    /// Links in first-seen order
    pub links: Vec<FlowLink>,
}

impl FlowGraph {
    /// Find a node by stage and label.
    #[must_use]
    pub fn node(&self, stage: usize, value: &str) -> Option<&FlowNode> {
        self.nodes
            .iter()
            .find(|n| n.stage == stage && n.value == value)
    }

    /// Sum of link weights leaving `stage`.
    #[must_use]
    pub fn outflow(&self, stage: usize) -> usize {
        self.links
            .iter()
            .filter(|l| self.nodes.get(l.source_id).is_some_and(|n| n.stage == stage))
            .map(|l| l.weight)
            .sum()
    }
}

#[derive(Default)]
struct Builder {
    graph: FlowGraph,
    nodes: HashMap<NodeKey, usize>,
    links: HashMap<(usize, usize), usize>,
}

impl Builder {
    fn node(&mut self, stage: usize, value: &str) -> usize {
        let key = NodeKey {
            stage,
            value: value.to_string(),
        };
        if let Some(&id) = self.nodes.get(&key) {
            return id;
        }
        let id = self.graph.nodes.len();
        self.graph.nodes.push(FlowNode {
            id,
            stage,
            value: key.value.clone(),
        });
        self.nodes.insert(key, id);
        id
    }

    fn link(&mut self, source_id: usize, target_id: usize) {
        let slot = *self.links.entry((source_id, target_id)).or_insert_with(|| {
            self.graph.links.push(FlowLink {
                source_id,
                target_id,
                weight: 0,
            });
            self.graph.links.len() - 1
        });
        self.graph.links[slot].weight += 1;
    }
}

/// Build the flow graph across `stages` for the records in `view`.
///
/// Fewer than two stages produce an empty graph.
#[must_use]
pub fn build_flow_graph(view: &[&Record], stages: &[CategoricalField]) -> FlowGraph {
    let mut builder = Builder::default();

    for (stage, pair) in stages.windows(2).enumerate() {
        let (from, to) = (pair[0], pair[1]);
        for record in view {
            let source = builder.node(stage, record.categorical(from));
            let target = builder.node(stage + 1, record.categorical(to));
            builder.link(source, target);
        }
    }

    builder.graph
}
