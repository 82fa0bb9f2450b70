use crate::charset::{CharCode, CharSet};
use std::collections::{BTreeMap, BTreeSet};

/// Index of a node within its automaton. Nodes are numbered densely from 0
/// in allocation order.
pub type NodeRef = usize;

/// A canonical set of nodes, usable as a map key.
pub type NodeSet = BTreeSet<NodeRef>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeRef,
    /// Outgoing transitions in insertion order. An empty label is an epsilon transition.
    pub transitions: Vec<(CharSet, NodeRef)>,
}

impl Node {
    pub fn new(id: NodeRef) -> Self {
        Self {
            id,
            transitions: Vec::new(),
        }
    }

    pub fn epsilon_targets(&self) -> impl Iterator<Item = NodeRef> + '_ {
        self.transitions
            .iter()
            .filter(|(cc, _)| cc.is_empty())
            .map(|&(_, target)| target)
    }
}

/// A finite automaton whose accepting nodes are labelled with an item of type `T`.
///
/// The same shape serves both as an [`Nfa`] and as a [`Dfa`]; only the invariants differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton<T> {
    pub start_node: NodeRef,
    pub end_nodes: BTreeMap<NodeRef, T>,
    pub nodes: Vec<Node>,
}

/// May contain epsilon transitions and overlapping labels.
pub type Nfa<T> = Automaton<T>;

/// No epsilon transitions; the outgoing labels of every node are pairwise disjoint.
pub type Dfa<T> = Automaton<T>;

impl<T> Automaton<T> {
    pub fn node(&self, id: NodeRef) -> &Node {
        &self.nodes[id]
    }

    pub fn start(&self) -> &Node {
        self.node(self.start_node)
    }

    /// The item accepted at `id`, if it is an end node.
    pub fn item(&self, id: NodeRef) -> Option<&T> {
        self.end_nodes.get(&id)
    }

    /// Follows the first transition out of `from` whose label contains `code`.
    pub fn step(&self, from: NodeRef, code: CharCode) -> Option<NodeRef> {
        self.node(from)
            .transitions
            .iter()
            .find(|(cc, _)| cc.contains(code))
            .map(|&(_, target)| target)
    }

    pub fn transition_count(&self) -> usize {
        self.nodes.iter().map(|n| n.transitions.len()).sum()
    }

    /// True when no node has an epsilon transition and no two outgoing
    /// transitions of the same node share a character.
    pub fn is_deterministic(&self) -> bool {
        self.nodes.iter().all(|node| {
            let mut seen = CharSet::empty();
            node.transitions.iter().all(|(cc, _)| {
                let disjoint = !cc.is_empty() && seen.is_disjoint(cc);
                seen = seen.union(cc);
                disjoint
            })
        })
    }
}
