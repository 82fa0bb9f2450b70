//! Thompson construction of an [`Nfa`] from labelled regular expressions,
//! and the epsilon closure over the result.

use crate::charset::{codes, CharSet};
use crate::fa::{Nfa, Node, NodeRef, NodeSet};
use crate::RegEx;
use std::collections::BTreeMap;

/// Builds one [`Nfa`] out of any number of labelled regular expressions.
///
/// Every item gets its own final node; all items hang off a single shared
/// start node through epsilon transitions.
pub struct Builder<T> {
    start_node: NodeRef,
    nodes: Vec<Node>,
    end_nodes: BTreeMap<NodeRef, T>,
}

impl<T> Default for Builder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Builder<T> {
    pub fn new() -> Self {
        let mut builder = Self {
            start_node: 0,
            nodes: Vec::new(),
            end_nodes: BTreeMap::new(),
        };
        builder.start_node = builder.new_node();
        builder
    }

    /// Adds a sub-automaton recognising `regex` that accepts as `item`.
    pub fn add_item(&mut self, item: T, regex: &RegEx) -> &mut Self {
        let first_node = self.nodes.len();
        let last_node = self.new_node();
        let entry = self.thompson_construction(regex, last_node);

        self.end_nodes.insert(last_node, item);
        self.add_transition(self.start_node, CharSet::empty(), entry);

        log::debug!(
            "added item for {regex}: nodes {first_node}..{}, entry {entry}, final {last_node}",
            self.nodes.len()
        );
        self
    }

    pub fn build(self) -> Nfa<T> {
        Nfa {
            start_node: self.start_node,
            end_nodes: self.end_nodes,
            nodes: self.nodes,
        }
    }

    fn new_node(&mut self) -> NodeRef {
        let id = self.nodes.len();
        self.nodes.push(Node::new(id));
        id
    }

    fn add_transition(&mut self, source: NodeRef, cc: CharSet, target: NodeRef) {
        self.nodes[source].transitions.push((cc, target));
    }

    /// Lowers `regex` into a fragment that exits at `last`, returning its entry node.
    fn thompson_construction(&mut self, regex: &RegEx, last: NodeRef) -> NodeRef {
        match regex {
            RegEx::CharacterClass(cc) => self.construct_set(*cc, last),
            RegEx::LiteralString(s) => self.construct_literal_string(s, last),
            RegEx::Many(inner) => self.construct_many(inner, last),
            RegEx::Optional(inner) => self.construct_optional(inner, last),
            RegEx::Sequence(items) => self.construct_sequence(items, last),
            RegEx::Alternative(items) => self.construct_alternative(items, last),
        }
    }

    fn construct_set(&mut self, cc: CharSet, last: NodeRef) -> NodeRef {
        let node = self.new_node();
        self.add_transition(node, cc, last);
        node
    }

    fn construct_literal_string(&mut self, s: &str, last: NodeRef) -> NodeRef {
        let codes: Vec<_> = codes(s).collect();

        codes.into_iter().rev().fold(last, |runner, code| {
            let current = self.new_node();
            self.add_transition(current, CharSet::singleton(code), runner);
            current
        })
    }

    fn construct_many(&mut self, inner: &RegEx, last: NodeRef) -> NodeRef {
        let start = self.thompson_construction(inner, last);

        self.add_transition(last, CharSet::empty(), start);
        self.add_transition(start, CharSet::empty(), last);

        start
    }

    fn construct_optional(&mut self, inner: &RegEx, last: NodeRef) -> NodeRef {
        let start = self.thompson_construction(inner, last);

        self.add_transition(start, CharSet::empty(), last);

        start
    }

    fn construct_sequence(&mut self, items: &[RegEx], last: NodeRef) -> NodeRef {
        items
            .iter()
            .rev()
            .fold(last, |next, item| self.thompson_construction(item, next))
    }

    fn construct_alternative(&mut self, items: &[RegEx], last: NodeRef) -> NodeRef {
        match items {
            [] => last,
            [only] => self.thompson_construction(only, last),
            _ => {
                let start = self.new_node();

                for item in items {
                    let alternative = self.thompson_construction(item, last);
                    self.add_transition(start, CharSet::empty(), alternative);
                }

                start
            }
        }
    }
}

/// For every node, in node order, the nodes reachable through exactly one epsilon transition.
pub fn epsilon_transitions<T>(nfa: &Nfa<T>) -> Vec<NodeSet> {
    nfa.nodes
        .iter()
        .map(|node| node.epsilon_targets().collect())
        .collect()
}

/// The reflexive-transitive closure of an adjacency relation.
///
/// Each row is relaxed against the rows of its neighbours over a growing window
/// of rows, and the sweep is repeated until nothing changes.
pub fn transitive_closure(adjacency: &[NodeSet]) -> Vec<NodeSet> {
    let mut result: Vec<NodeSet> = adjacency
        .iter()
        .enumerate()
        .map(|(n, row)| {
            let mut row = row.clone();
            row.insert(n);
            row
        })
        .collect();
    let dimension = result.len();

    let mut changed = true;
    while changed {
        changed = false;
        for count in 0..dimension {
            for row in 0..=count {
                let reachable: NodeSet = result[row]
                    .iter()
                    .flat_map(|&n| result[n].iter().copied())
                    .collect();
                let before = result[row].len();
                result[row].extend(reachable);
                changed |= result[row].len() != before;
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Automaton;
    use pretty_assertions::assert_eq;

    fn chr(c: char) -> CharSet {
        CharSet::singleton(c as i32)
    }

    fn node(id: NodeRef, transitions: Vec<(CharSet, NodeRef)>) -> Node {
        Node { id, transitions }
    }

    fn eps() -> CharSet {
        CharSet::empty()
    }

    fn nfa_of(regex: RegEx) -> Nfa<usize> {
        let mut builder = Builder::new();
        builder.add_item(0, &regex);
        builder.build()
    }

    #[test]
    fn init() {
        let nfa = Builder::<usize>::new().build();

        assert_eq!(
            nfa,
            Automaton {
                start_node: 0,
                end_nodes: BTreeMap::new(),
                nodes: vec![node(0, vec![])],
            }
        );
    }

    #[test]
    fn character_class() {
        let nfa = nfa_of(RegEx::class(CharSet::range(0, 32)));

        assert_eq!(nfa.end_nodes, BTreeMap::from([(1, 0)]));
        assert_eq!(nfa.start_node, 0);
        assert_eq!(
            nfa.nodes,
            vec![
                node(0, vec![(eps(), 2)]),
                node(1, vec![]),
                node(2, vec![(CharSet::range(0, 32), 1)]),
            ]
        );
    }

    #[test]
    fn empty_literal_string_allocates_nothing() {
        let nfa = nfa_of(RegEx::literal(""));

        assert_eq!(nfa.end_nodes, BTreeMap::from([(1, 0)]));
        assert_eq!(
            nfa.nodes,
            vec![node(0, vec![(eps(), 1)]), node(1, vec![])]
        );
    }

    #[test]
    fn literal_string_chains_one_node_per_character() {
        let nfa = nfa_of(RegEx::literal("hello"));

        assert_eq!(nfa.end_nodes, BTreeMap::from([(1, 0)]));
        assert_eq!(
            nfa.nodes,
            vec![
                node(0, vec![(eps(), 6)]),
                node(1, vec![]),
                node(2, vec![(chr('o'), 1)]),
                node(3, vec![(chr('l'), 2)]),
                node(4, vec![(chr('l'), 3)]),
                node(5, vec![(chr('e'), 4)]),
                node(6, vec![(chr('h'), 5)]),
            ]
        );
    }

    #[test]
    fn many_adds_loop_back_and_bypass() {
        let nfa = nfa_of(RegEx::many(RegEx::literal("x")));

        assert_eq!(nfa.end_nodes, BTreeMap::from([(1, 0)]));
        assert_eq!(
            nfa.nodes,
            vec![
                node(0, vec![(eps(), 2)]),
                node(1, vec![(eps(), 2)]),
                node(2, vec![(chr('x'), 1), (eps(), 1)]),
            ]
        );
    }

    #[test]
    fn optional_adds_bypass_only() {
        let nfa = nfa_of(RegEx::optional(RegEx::literal("x")));

        assert_eq!(
            nfa.nodes,
            vec![
                node(0, vec![(eps(), 2)]),
                node(1, vec![]),
                node(2, vec![(chr('x'), 1), (eps(), 1)]),
            ]
        );
    }

    #[test]
    fn many_and_optional_edge_counts() {
        let inner = RegEx::sequence([RegEx::literal("ab"), RegEx::class(chr('c'))]);
        let plain = nfa_of(inner.clone()).transition_count();

        assert_eq!(nfa_of(RegEx::many(inner.clone())).transition_count(), plain + 2);
        assert_eq!(nfa_of(RegEx::optional(inner)).transition_count(), plain + 1);
    }

    #[test]
    fn sequence() {
        let nfa = nfa_of(RegEx::sequence([
            RegEx::literal("x"),
            RegEx::literal("y"),
            RegEx::literal("z"),
        ]));

        assert_eq!(nfa.end_nodes, BTreeMap::from([(1, 0)]));
        assert_eq!(
            nfa.nodes,
            vec![
                node(0, vec![(eps(), 4)]),
                node(1, vec![]),
                node(2, vec![(chr('z'), 1)]),
                node(3, vec![(chr('y'), 2)]),
                node(4, vec![(chr('x'), 3)]),
            ]
        );
    }

    #[test]
    fn alternative() {
        let nfa = nfa_of(RegEx::alternative([
            RegEx::literal("x"),
            RegEx::literal("y"),
            RegEx::literal("z"),
        ]));

        assert_eq!(nfa.end_nodes, BTreeMap::from([(1, 0)]));
        assert_eq!(
            nfa.nodes,
            vec![
                node(0, vec![(eps(), 2)]),
                node(1, vec![]),
                node(2, vec![(eps(), 3), (eps(), 4), (eps(), 5)]),
                node(3, vec![(chr('x'), 1)]),
                node(4, vec![(chr('y'), 1)]),
                node(5, vec![(chr('z'), 1)]),
            ]
        );
    }

    #[test]
    fn degenerate_alternatives() {
        let empty = nfa_of(RegEx::alternative([]));
        assert_eq!(empty.nodes, vec![node(0, vec![(eps(), 1)]), node(1, vec![])]);

        let single = nfa_of(RegEx::alternative([RegEx::literal("x")]));
        assert_eq!(single, nfa_of(RegEx::literal("x")));
    }

    #[test]
    fn items_share_the_start_node() {
        let mut builder = Builder::new();
        builder
            .add_item(7, &RegEx::literal("a"))
            .add_item(3, &RegEx::literal("b"));
        let nfa = builder.build();

        assert_eq!(nfa.end_nodes, BTreeMap::from([(1, 7), (3, 3)]));
        assert_eq!(nfa.start().transitions, vec![(eps(), 2), (eps(), 4)]);
    }

    fn graph(edges: &[(NodeRef, NodeRef)], size: usize) -> Nfa<usize> {
        let mut nodes: Vec<Node> = (0..size).map(Node::new).collect();
        for &(from, to) in edges {
            nodes[from].transitions.push((eps(), to));
        }
        Automaton {
            start_node: 0,
            end_nodes: BTreeMap::new(),
            nodes,
        }
    }

    fn set(nodes: &[NodeRef]) -> NodeSet {
        nodes.iter().copied().collect()
    }

    #[test]
    fn epsilon_closure_of_single_edge() {
        let nfa = graph(&[(0, 1)], 2);

        assert_eq!(epsilon_transitions(&nfa), vec![set(&[1]), set(&[])]);
        assert_eq!(
            transitive_closure(&epsilon_transitions(&nfa)),
            vec![set(&[0, 1]), set(&[1])]
        );
    }

    #[test]
    fn epsilon_closure_with_self_loops() {
        let nfa = graph(&[(0, 0), (0, 1), (1, 2), (2, 2)], 3);

        assert_eq!(
            transitive_closure(&epsilon_transitions(&nfa)),
            vec![set(&[0, 1, 2]), set(&[1, 2]), set(&[2])]
        );
    }

    #[test]
    fn epsilon_closure_ignores_labelled_transitions() {
        let mut nfa = graph(&[(0, 1)], 3);
        nfa.nodes[1].transitions.push((chr('a'), 2));

        assert_eq!(
            transitive_closure(&epsilon_transitions(&nfa)),
            vec![set(&[0, 1]), set(&[1]), set(&[2])]
        );
    }

    #[test]
    fn closure_is_reflexive_and_transitive() {
        // a descending chain plus a cycle, so rows are discovered out of window order
        let nfa = graph(
            &[(0, 5), (5, 4), (4, 3), (3, 2), (2, 1), (6, 7), (7, 6), (1, 6)],
            8,
        );
        let closure = transitive_closure(&epsilon_transitions(&nfa));

        for (n, row) in closure.iter().enumerate() {
            assert!(row.contains(&n));
            for m in row {
                assert!(closure[*m].is_subset(row), "{m} in closure({n}) but not closed");
            }
        }
        assert_eq!(closure[0], set(&[0, 1, 2, 3, 4, 5, 6, 7]));
        assert_eq!(closure[6], set(&[6, 7]));
    }
}
