//! `bset_core` resolves the flat build settings that apply to a target in a
//! given build configuration of an Xcode project description.
//!
//! ## Precedence
//!
//! ```text
//! presets (base, config type, platform, product, product×platform)
//!   → deployment targets
//!   → keys owned by override files are removed
//!   → settings groups → direct settings → configuration variants
//! ```
//!
//! Each level (project, target) is resolved on its own. The effective value
//! of a single setting walks target → target override file → project →
//! project override file and stops at the first hit.
//!
//! ## Modules
//!
//! - [`settings`]: settings blocks, group tables and their deserialization.
//! - [`store`]: cached loading of override files and preset files.
//! - [`preset`]: preset identifiers and the preset search path.
//! - [`xcconfig`]: the `.xcconfig` override file reader.
//! - [`spec`]: loading a [`Project`] from YAML or JSON.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bset_core::Project;
//! use bset_core::SettingsResolver;
//! use std::path::Path;
//!
//! let project = Project::load(Path::new("project.yml")).unwrap();
//! let resolver = SettingsResolver::new(&project);
//! let config = project.require_config("Release").unwrap();
//! let target = project.target("App").unwrap();
//!
//! let settings = resolver.target_build_settings(target, config).unwrap();
//! for (key, value) in settings.iter() {
//! 	println!("{key} = {value}");
//! }
//!
//! let bitcode = resolver
//! 	.combined_bool_setting("ENABLE_BITCODE", target, config)
//! 	.unwrap();
//! ```

pub use error::*;
pub use group::*;
pub use platform::*;
pub use preset::PresetLocator;
pub use preset::PresetTier;
pub use preset::SettingsPreset;
pub use project::*;
pub use resolver::*;
pub use settings::SettingGroups;
pub use settings::Settings;
pub use store::*;
pub use value::*;
pub use variant::*;
pub use xcconfig::OverrideFileLoader;
pub use xcconfig::XcconfigLoader;

#[allow(unused_assignments)]
mod error;
mod group;
mod lookup;
mod platform;
pub mod preset;
mod project;
mod resolver;
pub mod settings;
pub mod spec;
pub mod store;
mod value;
mod variant;
pub mod xcconfig;

#[cfg(test)]
mod __fixtures;
