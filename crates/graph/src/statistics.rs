use crate::graph::DependencyGraph;

/// Aggregate counts and rankings over a [`DependencyGraph`], computed once
/// per run rather than recomputed by each analyzer that needs them.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GraphStatistics {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub internal_nodes: usize,
    pub external_nodes: usize,
    pub top_most_imported: Vec<(String, usize)>,
    pub top_most_importing: Vec<(String, usize)>,
    pub external_dependency_count: usize,
    pub workspace_dependency_count: usize,
}

/// Computes graph-wide statistics. `top_n` bounds the most-imported and
/// most-importing rankings; `workspace_prefixes` distinguishes workspace
/// package specifiers from external ones among the graph's external nodes.
pub fn compute_statistics(graph: &DependencyGraph, top_n: usize, workspace_prefixes: &[String]) -> GraphStatistics {
    let total_edges = graph.edges.len();
    let internal_nodes = graph.nodes.values().filter(|node| !node.is_external()).count();
    let external_nodes = graph.nodes.len() - internal_nodes;

    let mut by_incoming: Vec<(String, usize)> =
        graph.nodes.values().map(|node| (node.id.clone(), node.imported_by.len())).collect();
    by_incoming.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    by_incoming.truncate(top_n);

    let mut by_outgoing: Vec<(String, usize)> =
        graph.nodes.values().map(|node| (node.id.clone(), node.imports.len())).collect();
    by_outgoing.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    by_outgoing.truncate(top_n);

    let external_dependency_count = graph
        .nodes
        .values()
        .filter(|node| node.is_external() && !workspace_prefixes.iter().any(|prefix| node.id.starts_with(prefix.as_str())))
        .count();
    let workspace_dependency_count = graph
        .nodes
        .values()
        .filter(|node| node.is_external() && workspace_prefixes.iter().any(|prefix| node.id.starts_with(prefix.as_str())))
        .count();

    GraphStatistics {
        total_nodes: graph.nodes.len(),
        total_edges,
        internal_nodes,
        external_nodes,
        top_most_imported: by_incoming,
        top_most_importing: by_outgoing,
        external_dependency_count,
        workspace_dependency_count,
    }
}
