use std::path::Path;

use tempfile::TempDir;

use crate::BuildSettings;
use crate::Config;
use crate::ConfigType;
use crate::Platform;
use crate::PresetLocator;
use crate::ProductType;
use crate::Project;
use crate::Settings;
use crate::SettingsResolver;
use crate::SettingsStore;
use crate::Target;

pub fn temp_dir() -> TempDir {
	tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"))
}

pub fn write_file(root: &Path, relative: &str, content: &str) {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create {}: {e}", parent.display()));
	}
	std::fs::write(&path, content).unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
}

/// Write `content` to `SettingPresets/<preset>.yml` below `root`.
pub fn write_preset(root: &Path, preset: &str, content: &str) {
	write_file(root, &format!("SettingPresets/{preset}.yml"), content);
}

pub fn settings<const N: usize>(entries: [(&str, &str); N]) -> BuildSettings {
	entries.into_iter().collect()
}

pub fn block<const N: usize>(entries: [(&str, &str); N]) -> Settings {
	Settings::new().with_build_settings(settings(entries))
}

pub fn debug_config() -> Config {
	Config::new("Debug", Some(ConfigType::Debug))
}

pub fn release_config() -> Config {
	Config::new("Release", Some(ConfigType::Release))
}

pub fn ios_app(name: &str) -> Target {
	Target::new(name, Platform::Ios, ProductType::Application)
}

/// A project rooted at `root` with one iOS application target named `App`.
pub fn sample_project(root: &Path) -> Project {
	let mut project = Project::new("Sample", root);
	project.targets.push(ios_app("App"));
	project
}

/// A store that only finds presets written below `root` and resolves
/// override files against `root`.
pub fn isolated_store(root: &Path) -> SettingsStore {
	SettingsStore::new(root, PresetLocator::with_parent_dir(root))
}

pub fn isolated_resolver(project: &Project) -> SettingsResolver<'_> {
	SettingsResolver::with_store(project, isolated_store(&project.base_path))
}

/// Presets for every required tier used by an iOS `Release` resolution.
pub fn write_release_presets(root: &Path) {
	write_preset(root, "base", "SWIFT_VERSION: \"5.0\"\nENABLE_BITCODE: YES\nALWAYS_SEARCH_USER_PATHS: NO\n");
	write_preset(root, "Configs/release", "SWIFT_OPTIMIZATION_LEVEL: -O\nVALIDATE_PRODUCT: YES\n");
	write_preset(root, "Configs/debug", "SWIFT_OPTIMIZATION_LEVEL: -Onone\nONLY_ACTIVE_ARCH: YES\n");
	write_preset(root, "Platforms/iOS", "SDKROOT: iphoneos\nTARGETED_DEVICE_FAMILY: \"1,2\"\nENABLE_BITCODE: YES\n");
	write_preset(root, "Products/application", "ASSETCATALOG_COMPILER_APPICON_NAME: AppIcon\n");
	write_preset(
		root,
		"Product_Platform/application_iOS",
		"CODE_SIGN_IDENTITY: iPhone Developer\nTARGETED_DEVICE_FAMILY: \"1\"\n",
	);
}
