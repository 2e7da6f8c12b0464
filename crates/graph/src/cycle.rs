use std::collections::HashSet;

use crate::graph::DependencyGraph;

/// A single detected cycle: the ordered sequence of node ids that form it,
/// starting from the node where the recursion stack was re-entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub nodes: Vec<String>,
}

impl Cycle {
    pub fn length(&self) -> usize {
        self.nodes.len()
    }

    /// The lexicographically smallest rotation of this cycle's node
    /// sequence, used when `normalize_cycles` is enabled to collapse
    /// rotated duplicates (A→B→A and B→A→B) into a single report.
    fn normalized(&self) -> Vec<String> {
        if self.nodes.is_empty() {
            return Vec::new();
        }

        (0..self.nodes.len())
            .map(|start| {
                let mut rotation = self.nodes[start..].to_vec();
                rotation.extend_from_slice(&self.nodes[..start]);
                rotation
            })
            .min()
            .unwrap_or_default()
    }
}

/// Finds every cycle in `graph` via depth-first search over a recursion
/// stack, visiting roots in sorted id order for deterministic output (see
/// the "Deterministic cycle reporting" design note). Cycles longer than
/// `max_cycle_length` are discovered but not included in the result. When
/// `normalize_cycles` is set, cycles whose node set (up to rotation) has
/// already been reported are collapsed.
pub fn find_cycles(graph: &DependencyGraph, max_cycle_length: usize, normalize_cycles: bool) -> Vec<Cycle> {
    let mut visited = HashSet::new();
    let mut on_stack_set = HashSet::new();
    let mut stack = Vec::new();
    let mut cycles = Vec::new();
    let mut seen_normalized = HashSet::new();

    let mut roots: Vec<&String> = graph.nodes.keys().collect();
    roots.sort();

    for root in roots {
        if !visited.contains(root) {
            visit(graph, root, &mut visited, &mut on_stack_set, &mut stack, &mut cycles);
        }
    }

    cycles.retain(|cycle| cycle.length() <= max_cycle_length);

    if normalize_cycles {
        cycles.retain(|cycle| seen_normalized.insert(cycle.normalized()));
    }

    cycles
}

fn visit(
    graph: &DependencyGraph,
    current: &str,
    visited: &mut HashSet<String>,
    on_stack_set: &mut HashSet<String>,
    stack: &mut Vec<String>,
    cycles: &mut Vec<Cycle>,
) {
    visited.insert(current.to_string());
    on_stack_set.insert(current.to_string());
    stack.push(current.to_string());

    if let Some(node) = graph.node(current) {
        let mut neighbors: Vec<&String> = node.imports.iter().collect();
        neighbors.sort();

        for neighbor in neighbors {
            if on_stack_set.contains(neighbor) {
                let start = stack.iter().position(|id| id == neighbor).expect("neighbor is on the stack");
                cycles.push(Cycle { nodes: stack[start..].to_vec() });
            } else if !visited.contains(neighbor) {
                visit(graph, neighbor, visited, on_stack_set, stack, cycles);
            }
        }
    }

    stack.pop();
    on_stack_set.remove(current);
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::node::DependencyNode;

    fn node(id: &str, imports: Vec<&str>) -> DependencyNode {
        DependencyNode {
            id: id.to_string(),
            name: id.to_string(),
            file_path: Some(PathBuf::from(id)),
            package_name: None,
            imports: imports.into_iter().map(String::from).collect(),
            imported_by: Vec::new(),
            import_details: Vec::new(),
        }
    }

    fn graph_of(pairs: Vec<(&str, Vec<&str>)>) -> DependencyGraph {
        let mut nodes = BTreeMap::new();
        for (id, imports) in pairs {
            nodes.insert(id.to_string(), node(id, imports));
        }
        DependencyGraph { nodes, edges: Vec::new(), root_path: PathBuf::from("/workspace") }
    }

    #[test]
    fn finds_direct_cycle() {
        let graph = graph_of(vec![("a", vec!["b"]), ("b", vec!["a"])]);

        let cycles = find_cycles(&graph, usize::MAX, false);

        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].nodes, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn acyclic_chain_has_no_cycles() {
        let graph = graph_of(vec![("a", vec!["b"]), ("b", vec!["c"]), ("c", vec![])]);

        assert!(find_cycles(&graph, usize::MAX, false).is_empty());
    }

    #[test]
    fn respects_max_cycle_length() {
        let graph = graph_of(vec![("a", vec!["b"]), ("b", vec!["c"]), ("c", vec!["a"])]);

        let cycles = find_cycles(&graph, 2, false);
        assert!(cycles.is_empty());

        let cycles = find_cycles(&graph, 3, false);
        assert_eq!(cycles.len(), 1);
    }

    #[test]
    fn normalize_cycles_collapses_rotations() {
        // Two separate DFS-discovered 2-cycles with the same node set.
        let graph = graph_of(vec![("a", vec!["b"]), ("b", vec!["a"])]);

        let cycles = find_cycles(&graph, usize::MAX, true);
        assert_eq!(cycles.len(), 1);
    }

    #[test]
    fn terminates_on_self_referential_node() {
        let graph = graph_of(vec![("a", vec!["a"])]);

        let cycles = find_cycles(&graph, usize::MAX, false);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].nodes, vec!["a".to_string()]);
    }
}
