use std::collections::BTreeMap;
use std::collections::HashSet;
use std::path::PathBuf;

use crate::node::DependencyEdge;
use crate::node::DependencyNode;

/// The full dependency graph for a workspace: every source file and every
/// external module it reaches, transitively or not.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    pub nodes: BTreeMap<String, DependencyNode>,
    pub edges: Vec<DependencyEdge>,
    pub root_path: PathBuf,
}

impl DependencyGraph {
    pub fn node(&self, id: &str) -> Option<&DependencyNode> {
        self.nodes.get(id)
    }

    /// The forward closure of `id`'s imports, excluding `id` itself.
    /// Terminates in the presence of cycles by tracking visited ids.
    pub fn transitive_dependencies(&self, id: &str) -> HashSet<String> {
        self.closure(id, |node| &node.imports)
    }

    /// The backward closure of `id`'s dependents, excluding `id` itself.
    pub fn transitive_dependents(&self, id: &str) -> HashSet<String> {
        self.closure(id, |node| &node.imported_by)
    }

    fn closure(&self, id: &str, neighbors: impl Fn(&DependencyNode) -> &Vec<String>) -> HashSet<String> {
        let mut visited = HashSet::new();
        let mut stack = vec![id.to_string()];

        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(&current) else { continue };
            for next in neighbors(node) {
                if next != id && visited.insert(next.clone()) {
                    stack.push(next.clone());
                }
            }
        }

        visited
    }
}
