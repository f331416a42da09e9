use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::BsetError;
use crate::BsetResult;
use crate::platform::ConfigType;
use crate::platform::DeploymentVersion;
use crate::platform::Platform;
use crate::platform::ProductType;
use crate::settings::SettingGroups;
use crate::settings::Settings;

/// Override file path per configuration name.
pub type ConfigFiles = BTreeMap<String, String>;

/// A named build configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	pub name: String,
	/// Selects the configuration preset. Configurations without a type get
	/// no project presets.
	pub config_type: Option<ConfigType>,
}

impl Config {
	pub fn new(name: impl Into<String>, config_type: Option<ConfigType>) -> Self {
		Self {
			name: name.into(),
			config_type,
		}
	}

	/// The `Debug` and `Release` pair used when a project declares none.
	pub fn defaults() -> Vec<Config> {
		vec![
			Config::new("Debug", Some(ConfigType::Debug)),
			Config::new("Release", Some(ConfigType::Release)),
		]
	}
}

/// Which levels receive preset settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingPresetsMode {
	#[default]
	All,
	Project,
	Targets,
	None,
}

impl SettingPresetsMode {
	pub fn apply_project(self) -> bool {
		matches!(self, Self::All | Self::Project)
	}

	pub fn apply_target(self) -> bool {
		matches!(self, Self::All | Self::Targets)
	}
}

/// Project-wide deployment target versions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentTargets {
	#[serde(default, rename = "iOS")]
	pub ios: Option<DeploymentVersion>,
	#[serde(default, rename = "macOS")]
	pub macos: Option<DeploymentVersion>,
	#[serde(default, rename = "tvOS")]
	pub tvos: Option<DeploymentVersion>,
	#[serde(default, rename = "watchOS")]
	pub watchos: Option<DeploymentVersion>,
	#[serde(default, rename = "visionOS")]
	pub visionos: Option<DeploymentVersion>,
}

impl DeploymentTargets {
	pub fn version(&self, platform: Platform) -> Option<DeploymentVersion> {
		match platform {
			Platform::Ios => self.ios,
			Platform::MacOs => self.macos,
			Platform::TvOs => self.tvos,
			Platform::WatchOs => self.watchos,
			Platform::VisionOs => self.visionos,
		}
	}

	pub fn set(&mut self, platform: Platform, version: Option<DeploymentVersion>) {
		let slot = match platform {
			Platform::Ios => &mut self.ios,
			Platform::MacOs => &mut self.macos,
			Platform::TvOs => &mut self.tvos,
			Platform::WatchOs => &mut self.watchos,
			Platform::VisionOs => &mut self.visionos,
		};
		*slot = version;
	}
}

/// Options that change how settings are resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOptions {
	#[serde(default)]
	pub setting_presets: SettingPresetsMode,
	#[serde(default)]
	pub deployment_target: DeploymentTargets,
}

/// Anything that can be asked for a combined setting.
pub trait ProjectTarget {
	fn name(&self) -> &str;

	/// Override file path per configuration name.
	fn config_files(&self) -> &ConfigFiles;

	/// The native target, when this is one. Only native targets have their
	/// own resolved build settings.
	fn as_target(&self) -> Option<&Target> {
		None
	}
}

/// A native target that builds a product for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
	pub name: String,
	pub platform: Platform,
	pub product_type: ProductType,
	pub deployment_target: Option<DeploymentVersion>,
	pub settings: Settings,
	pub config_files: ConfigFiles,
}

impl Target {
	pub fn new(name: impl Into<String>, platform: Platform, product_type: ProductType) -> Self {
		Self {
			name: name.into(),
			platform,
			product_type,
			deployment_target: None,
			settings: Settings::default(),
			config_files: ConfigFiles::new(),
		}
	}
}

impl ProjectTarget for Target {
	fn name(&self) -> &str {
		&self.name
	}

	fn config_files(&self) -> &ConfigFiles {
		&self.config_files
	}

	fn as_target(&self) -> Option<&Target> {
		Some(self)
	}
}

/// A target that only groups other targets and scripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateTarget {
	pub name: String,
	pub settings: Settings,
	pub config_files: ConfigFiles,
}

impl ProjectTarget for AggregateTarget {
	fn name(&self) -> &str {
		&self.name
	}

	fn config_files(&self) -> &ConfigFiles {
		&self.config_files
	}
}

/// The read-only input to settings resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
	pub name: String,
	/// Directory relative override file paths are resolved against.
	pub base_path: PathBuf,
	pub configs: Vec<Config>,
	pub targets: Vec<Target>,
	pub aggregate_targets: Vec<AggregateTarget>,
	pub settings: Settings,
	pub setting_groups: SettingGroups,
	pub config_files: ConfigFiles,
	pub options: ProjectOptions,
}

impl Project {
	pub fn new(name: impl Into<String>, base_path: impl Into<PathBuf>) -> Self {
		Self {
			name: name.into(),
			base_path: base_path.into(),
			configs: Config::defaults(),
			targets: Vec::new(),
			aggregate_targets: Vec::new(),
			settings: Settings::default(),
			setting_groups: SettingGroups::new(),
			config_files: ConfigFiles::new(),
			options: ProjectOptions::default(),
		}
	}

	/// The configuration whose name equals `name`, ignoring case.
	pub fn config(&self, name: &str) -> Option<&Config> {
		self.configs
			.iter()
			.find(|config| config.name.to_lowercase() == name.to_lowercase())
	}

	pub fn require_config(&self, name: &str) -> BsetResult<&Config> {
		self.config(name)
			.ok_or_else(|| BsetError::UnknownConfig(name.to_string()))
	}

	pub fn target(&self, name: &str) -> Option<&Target> {
		self.targets.iter().find(|target| target.name == name)
	}

	/// A native or aggregate target by name.
	pub fn project_target(&self, name: &str) -> BsetResult<&dyn ProjectTarget> {
		if let Some(target) = self.target(name) {
			return Ok(target);
		}

		self.aggregate_targets
			.iter()
			.find(|target| target.name == name)
			.map(|target| target as &dyn ProjectTarget)
			.ok_or_else(|| BsetError::UnknownTarget(name.to_string()))
	}

	/// The single platform every target shares, if there is exactly one.
	pub fn single_platform(&self) -> Option<Platform> {
		let platforms: BTreeSet<Platform> = self.targets.iter().map(|target| target.platform).collect();
		if platforms.len() == 1 {
			platforms.into_iter().next()
		} else {
			None
		}
	}
}
