//! Subset construction of a [`Dfa`] from an [`Nfa`].
//!
//! Every distinct epsilon-closed set of NFA nodes becomes exactly one DFA node.
//! When a DFA node contains several NFA end nodes, the smallest item wins: items
//! are numbered in declaration order, so the earliest declaration takes priority.

use crate::charset::CharSet;
use crate::fa::{Dfa, Nfa, Node, NodeRef, NodeSet};
use crate::nfa::{epsilon_transitions, transitive_closure};
use std::collections::{BTreeMap, HashMap, VecDeque};

/// The order in which pending DFA states are taken off the work list.
///
/// The order changes the numbering of DFA nodes but never the automaton
/// itself: any two orders give isomorphic results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VisitOrder {
    /// First discovered, first visited.
    #[default]
    BreadthFirst,
    /// Last discovered, first visited.
    DepthFirst,
}

struct SubsetConstruction<'a, T> {
    nfa: &'a Nfa<T>,
    epsilon_closure: Vec<NodeSet>,
    order: VisitOrder,

    nodes: Vec<Node>,
    // epsilon-closed NFA node set => DFA node
    mappings: HashMap<NodeSet, NodeRef>,
    // DFA node => epsilon-closed NFA node set
    states: Vec<NodeSet>,
    to_visit: VecDeque<NodeRef>,
}

impl<'a, T> SubsetConstruction<'a, T>
where
    T: Clone + Ord,
{
    fn new(nfa: &'a Nfa<T>, order: VisitOrder) -> Self {
        Self {
            nfa,
            epsilon_closure: transitive_closure(&epsilon_transitions(nfa)),
            order,
            nodes: Vec::new(),
            mappings: HashMap::new(),
            states: Vec::new(),
            to_visit: VecDeque::new(),
        }
    }

    fn epsilon_reachable_nodes(&self, node_refs: &NodeSet) -> NodeSet {
        node_refs
            .iter()
            .flat_map(|&n| self.epsilon_closure[n].iter().copied())
            .chain(node_refs.iter().copied())
            .collect()
    }

    /// Finds the DFA node for `node_refs`, allocating and queueing one if this
    /// closed set has not been seen before.
    fn resolve_state(&mut self, node_refs: &NodeSet) -> NodeRef {
        let reachable = self.epsilon_reachable_nodes(node_refs);
        if let Some(&id) = self.mappings.get(&reachable) {
            return id;
        }

        let id = self.nodes.len();
        log::trace!("DFA state {id} = NFA states {reachable:?}");

        self.nodes.push(Node::new(id));
        self.states.push(reachable.clone());
        self.mappings.insert(reachable, id);
        self.to_visit.push_back(id);
        id
    }

    fn next_to_visit(&mut self) -> Option<NodeRef> {
        match self.order {
            VisitOrder::BreadthFirst => self.to_visit.pop_front(),
            VisitOrder::DepthFirst => self.to_visit.pop_back(),
        }
    }

    fn visit(&mut self, state: NodeRef) {
        let nfa = self.nfa;
        let transitions: Vec<(CharSet, NodeRef)> = self.states[state]
            .iter()
            .flat_map(|&n| nfa.nodes[n].transitions.iter().copied())
            .collect();

        let alphabet = transitions
            .iter()
            .fold(CharSet::empty(), |acc, (cc, _)| acc.union(cc));

        // target DFA node => every character leading there, in order of first appearance
        let mut reverse_mapping: Vec<(NodeRef, CharSet)> = Vec::new();
        for ch in alphabet.iter() {
            let targets: NodeSet = transitions
                .iter()
                .filter(|(cc, _)| cc.contains(ch))
                .map(|&(_, target)| target)
                .collect();
            let target = self.resolve_state(&targets);

            match reverse_mapping.iter_mut().find(|(n, _)| *n == target) {
                Some((_, cc)) => {
                    cc.insert(ch);
                }
                None => reverse_mapping.push((target, CharSet::singleton(ch))),
            }
        }

        self.nodes[state].transitions = reverse_mapping
            .into_iter()
            .map(|(target, cc)| (cc, target))
            .collect();
    }

    /// Every DFA node holding at least one NFA end node accepts the smallest of their items.
    fn final_states(&self) -> BTreeMap<NodeRef, T> {
        self.states
            .iter()
            .enumerate()
            .filter_map(|(id, nodes)| {
                nodes
                    .iter()
                    .filter_map(|n| self.nfa.end_nodes.get(n))
                    .min()
                    .map(|item| (id, item.clone()))
            })
            .collect()
    }

    fn construct(mut self) -> Dfa<T> {
        let start_node = self.resolve_state(&NodeSet::from([self.nfa.start_node]));

        while let Some(state) = self.next_to_visit() {
            self.visit(state);
        }

        let end_nodes = self.final_states();
        log::debug!(
            "subset construction: {} NFA nodes => {} DFA nodes, {} accepting",
            self.nfa.nodes.len(),
            self.nodes.len(),
            end_nodes.len()
        );

        let dfa = Dfa {
            start_node,
            end_nodes,
            nodes: self.nodes,
        };

        #[cfg(debug_assertions)]
        assert!(dfa.is_deterministic(), "subset construction produced an NFA");

        dfa
    }
}

/// Determinizes `nfa`, visiting pending states breadth first.
pub fn from_nfa<T: Clone + Ord>(nfa: &Nfa<T>) -> Dfa<T> {
    from_nfa_with(nfa, VisitOrder::default())
}

pub fn from_nfa_with<T: Clone + Ord>(nfa: &Nfa<T>, order: VisitOrder) -> Dfa<T> {
    SubsetConstruction::new(nfa, order).construct()
}
