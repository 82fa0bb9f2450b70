use crate::Automaton;
use std::fmt::Display;
use std::io;
use std::io::Write;

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

impl<T: Display> Automaton<T> {
    /// Writes the automaton as a Graphviz digraph. Accepting nodes are drawn as
    /// double circles labelled with their item.
    pub fn output_dot(&self, w: &mut impl Write) -> io::Result<()> {
        writeln!(w, "digraph {{")?;
        writeln!(w, "rankdir=LR")?;
        writeln!(w, "start[shape=point]")?;
        writeln!(w, "start -> id{}", self.start_node)?;

        for node in &self.nodes {
            let src = node.id;
            match self.item(src) {
                Some(item) => {
                    let item = escape(&item.to_string());
                    writeln!(w, "node[label=\"{src}: {item}\", shape=doublecircle] id{src}")?
                }
                None => writeln!(w, "node[label=\"{src}\", shape=circle] id{src}")?,
            }

            for (cc, tgt) in &node.transitions {
                let label = if cc.is_empty() {
                    "ε".to_string()
                } else {
                    escape(&cc.to_string())
                };
                writeln!(w, "id{src} -> id{tgt} [label=\"{label}\"]")?;
            }
        }

        writeln!(w, "}}")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::nfa::Builder;
    use crate::{CharSet, RegEx};

    #[test]
    fn renders_nodes_and_edges() {
        let mut builder = Builder::new();
        builder.add_item(0, &RegEx::optional(CharSet::singleton(34).into()));
        let nfa = builder.build();

        let mut out = Vec::new();
        nfa.output_dot(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert_eq!(
            out,
            "digraph {\n\
             rankdir=LR\n\
             start[shape=point]\n\
             start -> id0\n\
             node[label=\"0\", shape=circle] id0\n\
             id0 -> id2 [label=\"ε\"]\n\
             node[label=\"1: 0\", shape=doublecircle] id1\n\
             node[label=\"2\", shape=circle] id2\n\
             id2 -> id1 [label=\"{'\\\"'}\"]\n\
             id2 -> id1 [label=\"ε\"]\n\
             }\n"
        );
    }
}
