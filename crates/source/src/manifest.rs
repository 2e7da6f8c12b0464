use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

/// The subset of a `package.json` manifest the engine cares about.
///
/// Unknown fields are preserved in `raw` so that rules needing something
/// outside this subset (e.g. a custom `exports` shape) can still inspect the
/// full document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(rename = "devDependencies", default)]
    pub dev_dependencies: BTreeMap<String, String>,
    #[serde(rename = "peerDependencies", default)]
    pub peer_dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub exports: Option<serde_json::Value>,
    #[serde(rename = "type", default)]
    pub module_type: Option<String>,
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub types: Option<String>,
    /// The complete, untouched manifest document.
    #[serde(skip)]
    pub raw: serde_json::Value,
}

impl PackageManifest {
    /// Parses a manifest from its raw JSON text.
    ///
    /// A missing `name` or `version` is not rejected here: the manifest is
    /// still returned (with that field empty) so the package reaches the
    /// workspace scan and the `package-manifest` analyzer can flag it as a
    /// proper `Issue` rather than the parse failing silently before the
    /// package ever exists.
    pub fn parse(text: &str) -> Result<Self, String> {
        let raw: serde_json::Value = serde_json::from_str(text).map_err(|error| error.to_string())?;

        let mut manifest: PackageManifest = serde_json::from_value(raw.clone()).map_err(|error| error.to_string())?;
        manifest.raw = raw;

        Ok(manifest)
    }

    /// `true` if `name` or `version` is missing or empty.
    pub fn is_missing_required_fields(&self) -> bool {
        self.name.trim().is_empty() || self.version.trim().is_empty()
    }

    /// `true` if the dependency set of the given kind (including peer
    /// dependencies) includes `name`.
    pub fn declares_dependency(&self, name: &str) -> bool {
        self.dependencies.contains_key(name)
            || self.dev_dependencies.contains_key(name)
            || self.peer_dependencies.contains_key(name)
    }

    /// `true` when a declared dependency's version specifier refers to
    /// another package in the same workspace (a "workspace protocol"
    /// dependency), e.g. `"workspace:*"` or `"workspace:^1.0.0"`.
    pub fn is_workspace_protocol_dependency(&self, name: &str) -> bool {
        self.dependencies
            .get(name)
            .or_else(|| self.dev_dependencies.get(name))
            .or_else(|| self.peer_dependencies.get(name))
            .is_some_and(|spec| spec.starts_with("workspace:"))
    }

    /// All declared dependency names across dependencies/dev/peer.
    pub fn all_dependency_names(&self, include_dev: bool) -> Vec<&str> {
        let mut names: Vec<&str> = self.dependencies.keys().map(String::as_str).collect();
        if include_dev {
            names.extend(self.dev_dependencies.keys().map(String::as_str));
        }
        names.extend(self.peer_dependencies.keys().map(String::as_str));
        names.sort_unstable();
        names.dedup();
        names
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn manifest_without_name_is_parsed_but_flagged_as_missing_required_fields() {
        let manifest = PackageManifest::parse(r#"{"version": "1.0.0"}"#).unwrap();

        assert_eq!(manifest.name, "");
        assert!(manifest.is_missing_required_fields());
    }

    #[test]
    fn manifest_without_version_is_parsed_but_flagged_as_missing_required_fields() {
        let manifest = PackageManifest::parse(r#"{"name": "pkg"}"#).unwrap();

        assert_eq!(manifest.version, "");
        assert!(manifest.is_missing_required_fields());
    }

    #[test]
    fn complete_manifest_is_not_missing_required_fields() {
        let manifest = PackageManifest::parse(r#"{"name": "pkg", "version": "1.0.0"}"#).unwrap();

        assert!(!manifest.is_missing_required_fields());
    }

    #[test]
    fn parses_a_minimal_manifest() {
        let manifest = PackageManifest::parse(r#"{"name": "pkg", "version": "1.0.0"}"#).unwrap();

        assert_eq!(manifest.name, "pkg");
        assert_eq!(manifest.version, "1.0.0");
    }

    #[test]
    fn detects_workspace_protocol_dependency() {
        let manifest = PackageManifest::parse(
            r#"{"name": "pkg", "version": "1.0.0", "dependencies": {"@myorg/utils": "workspace:*"}}"#,
        )
        .unwrap();

        assert!(manifest.is_workspace_protocol_dependency("@myorg/utils"));
        assert!(manifest.declares_dependency("@myorg/utils"));
    }
}
