//! Layer-boundary enforcement, one of six architecture sub-rules. A layer is
//! a named bucket of workspace files identified by glob pattern; an edge
//! whose source layer does not list the target layer among its allowed
//! dependencies is a violation. A workspace with no `architecture.layers`
//! configured simply produces no findings. The other five sub-rules —
//! barrel-export restrictions, public-API enforcement, side-effect-free
//! modules, path-alias consistency, and package-boundary violations — are
//! each their own analyzer id, registered alongside this one, so each can be
//! enabled, disabled, and given its own severity independently.

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use monorepo_reporting::Issue;
use monorepo_reporting::IssueCategory;
use monorepo_reporting::IssueLocation;
use monorepo_reporting::Severity;

use crate::context::AnalysisContext;
use crate::contract::Analyzer;
use crate::contract::AnalyzerMetadata;
use crate::error::AnalyzerError;
use crate::options::Layer;

pub struct ArchitectureAnalyzer;

const ID: &str = "architecture";

impl Analyzer for ArchitectureAnalyzer {
    fn metadata(&self) -> AnalyzerMetadata {
        AnalyzerMetadata {
            id: ID,
            name: "Architecture layering",
            description: "Flags an import crossing from one configured layer into a layer not listed among its allowed dependencies.",
            categories: &[IssueCategory::Architecture],
            default_severity: Severity::Error,
        }
    }

    fn analyze(&self, context: &AnalysisContext<'_>) -> Result<Vec<Issue>, AnalyzerError> {
        let layers = &context.options.architecture.layers;
        if layers.is_empty() {
            return Ok(Vec::new());
        }

        let severity = context.options.severity_for(ID, self.metadata().default_severity);
        let compiled = compile_layers(layers);

        let mut issues = Vec::new();

        for edge in &context.graph.edges {
            let Some(source_node) = context.graph.node(&edge.from) else { continue };
            let Some(target_node) = context.graph.node(&edge.to) else { continue };
            if target_node.is_external() {
                continue;
            }

            let Some(source_layer) = layer_for(&compiled, &edge.from) else { continue };
            let Some(target_layer) = layer_for(&compiled, &edge.to) else { continue };

            if source_layer.name == target_layer.name {
                continue;
            }
            if source_layer.allowed_dependencies.iter().any(|allowed| allowed == target_layer.name) {
                continue;
            }

            let location = source_node
                .file_path
                .clone()
                .map(IssueLocation::file)
                .unwrap_or_else(|| IssueLocation::file(&context.workspace_path));
            let related: Vec<IssueLocation> = target_node.file_path.clone().map(IssueLocation::file).into_iter().collect();

            issues.push(
                Issue::new(
                    ID,
                    "Layer violation",
                    format!(
                        "{:?} (layer {:?}) imports {:?} (layer {:?}), which is not in {:?}'s allowed dependencies",
                        edge.from, source_layer.name, edge.to, target_layer.name, source_layer.name
                    ),
                    severity,
                    IssueCategory::Architecture,
                    location,
                )
                .with_related_locations(related)
                .with_metadata("sourceLayer", source_layer.name)
                .with_metadata("targetLayer", target_layer.name),
            );
        }

        Ok(issues)
    }
}

struct CompiledLayer<'a> {
    name: &'a str,
    matcher: GlobSet,
    allowed_dependencies: &'a [String],
}

fn compile_layers(layers: &[Layer]) -> Vec<CompiledLayer<'_>> {
    layers
        .iter()
        .map(|layer| {
            let mut builder = GlobSetBuilder::new();
            for pattern in &layer.patterns {
                match Glob::new(pattern) {
                    Ok(glob) => {
                        builder.add(glob);
                    }
                    Err(error) => tracing::warn!("layer {:?} has an invalid glob pattern {pattern:?}: {error}", layer.name),
                }
            }
            let matcher = builder.build().unwrap_or_else(|_| GlobSetBuilder::new().build().expect("empty globset builds"));

            CompiledLayer { name: layer.name.as_str(), matcher, allowed_dependencies: &layer.allowed_dependencies }
        })
        .collect()
}

/// First layer (in declared order) whose patterns match `id` wins.
fn layer_for<'a>(compiled: &'a [CompiledLayer<'a>], id: &str) -> Option<&'a CompiledLayer<'a>> {
    compiled.iter().find(|layer| layer.matcher.is_match(id))
}
