use monorepo_reporting::Issue;
use monorepo_reporting::IssueCategory;
use monorepo_reporting::IssueLocation;
use monorepo_reporting::Severity;

use crate::context::AnalysisContext;
use crate::contract::Analyzer;
use crate::contract::AnalyzerMetadata;
use crate::error::AnalyzerError;

pub struct TsConfigAnalyzer;

const ID: &str = "tsconfig";

impl Analyzer for TsConfigAnalyzer {
    fn metadata(&self) -> AnalyzerMetadata {
        AnalyzerMetadata {
            id: ID,
            name: "tsconfig consistency",
            description: "Flags mismatches between a package's manifest and its tsconfig compiler options.",
            categories: &[IssueCategory::Configuration],
            default_severity: Severity::Warning,
        }
    }

    fn analyze(&self, context: &AnalysisContext<'_>) -> Result<Vec<Issue>, AnalyzerError> {
        let severity = context.options.severity_for(ID, self.metadata().default_severity);
        let mut issues = Vec::new();

        for package in context.packages.iter().filter(|package| package.has_tsconfig) {
            let tsconfig_path = package.package_path.join("tsconfig.json");
            let Ok(text) = std::fs::read_to_string(&tsconfig_path) else {
                tracing::debug!("could not read {}", tsconfig_path.display());
                continue;
            };
            let Ok(tsconfig) = serde_json::from_str::<serde_json::Value>(&text) else {
                tracing::debug!("could not parse {} as JSON", tsconfig_path.display());
                continue;
            };

            let compiler_options = tsconfig.get("compilerOptions");
            let module = compiler_options.and_then(|options| options.get("module")).and_then(|value| value.as_str());
            let out_dir = compiler_options.and_then(|options| options.get("outDir")).and_then(|value| value.as_str());
            let root_dir = compiler_options.and_then(|options| options.get("rootDir")).and_then(|value| value.as_str());

            if let Some(module) = module {
                let is_esm_module_field = package.package_json.module_type.as_deref() == Some("module");
                let is_commonjs_module_option = module.eq_ignore_ascii_case("commonjs");

                if is_esm_module_field && is_commonjs_module_option {
                    issues.push(mismatch_issue(
                        &tsconfig_path,
                        severity,
                        "manifest declares `\"type\": \"module\"` (ESM) but tsconfig's `compilerOptions.module` is `CommonJS`",
                    ));
                } else if !is_esm_module_field && module.eq_ignore_ascii_case("esnext") {
                    issues.push(mismatch_issue(
                        &tsconfig_path,
                        severity,
                        "manifest omits `\"type\": \"module\"` (CommonJS default) but tsconfig's `compilerOptions.module` targets ESM",
                    ));
                }
            }

            if let (Some(out_dir), Some(main)) = (out_dir, package.package_json.main.as_deref()) {
                let main_path = package.package_path.join(main);
                let out_dir_path = package.package_path.join(out_dir);
                if !main_path.starts_with(&out_dir_path) {
                    issues.push(mismatch_issue(
                        &tsconfig_path,
                        severity,
                        &format!("manifest `main` ({main:?}) does not resolve under tsconfig `outDir` ({out_dir:?})"),
                    ));
                }
            }

            if root_dir.is_none() && package.src_path.is_dir() && package.src_path != package.package_path {
                issues.push(
                    Issue::new(
                        ID,
                        "Missing `rootDir`",
                        format!("package {:?} has a `src/` directory but tsconfig sets no `compilerOptions.rootDir`", package.name),
                        severity,
                        IssueCategory::Configuration,
                        IssueLocation::file(&tsconfig_path),
                    )
                    .with_suggestion("Set `compilerOptions.rootDir` to \"src\""),
                );
            }
        }

        Ok(issues)
    }
}

fn mismatch_issue(tsconfig_path: &std::path::Path, severity: Severity, description: &str) -> Issue {
    Issue::new(ID, "tsconfig/manifest mismatch", description, severity, IssueCategory::Configuration, IssueLocation::file(tsconfig_path))
}
