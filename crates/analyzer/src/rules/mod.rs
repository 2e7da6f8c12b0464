//! One module per built-in analyzer. Each registers itself with
//! [`crate::registry::default_registry`] under its own id; none depend on
//! each other.

pub mod architecture;
pub mod barrel_export;
pub mod circular_import;
pub mod cross_config_consistency;
pub mod duplicate_code;
pub mod duplicate_dependency;
pub mod exports_field;
pub mod large_dependency;
pub mod package_boundary;
pub mod package_manifest;
pub mod path_alias;
pub mod public_api;
pub mod side_effect_free;
pub mod tree_shaking_blocker;
pub mod tsconfig;
pub mod unused_dependency;
pub mod version_alignment;
