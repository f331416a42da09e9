//! Loading a [`Project`] from a YAML or JSON project description.
//!
//! ```yaml
//! name: Weather
//! options:
//!   settingPresets: all
//!   deploymentTarget:
//!     iOS: "16.0"
//! configs:
//!   Debug: debug
//!   Release: release
//! configFiles:
//!   Release: configs/Release.xcconfig
//! settingGroups:
//!   Common:
//!     SWIFT_VERSION: "5.9"
//! settings:
//!   groups: [Common]
//! targets:
//!   Weather:
//!     type: application
//!     platform: iOS
//!     settings:
//!       PRODUCT_BUNDLE_IDENTIFIER: com.example.weather
//! ```

use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::BsetError;
use crate::BsetResult;
use crate::platform::ConfigType;
use crate::platform::DeploymentVersion;
use crate::platform::Platform;
use crate::platform::ProductType;
use crate::project::AggregateTarget;
use crate::project::Config;
use crate::project::ConfigFiles;
use crate::project::Project;
use crate::project::ProjectOptions;
use crate::project::Target;
use crate::settings::OrderedEntries;
use crate::settings::SettingGroups;
use crate::settings::Settings;

/// Project description locations in discovery order (highest precedence
/// first).
pub const SPEC_FILE_CANDIDATES: [&str; 3] = ["project.yml", "project.yaml", "project.json"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectSpec {
	name: String,
	#[serde(default)]
	options: ProjectOptions,
	#[serde(default)]
	configs: Option<OrderedEntries<Option<ConfigType>>>,
	#[serde(default)]
	config_files: ConfigFiles,
	#[serde(default)]
	settings: Settings,
	#[serde(default)]
	setting_groups: SettingGroups,
	#[serde(default)]
	targets: OrderedEntries<TargetSpec>,
	#[serde(default)]
	aggregate_targets: OrderedEntries<AggregateTargetSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TargetSpec {
	#[serde(rename = "type")]
	product_type: ProductType,
	platform: Platform,
	#[serde(default)]
	deployment_target: Option<DeploymentVersion>,
	#[serde(default)]
	settings: Settings,
	#[serde(default)]
	config_files: ConfigFiles,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AggregateTargetSpec {
	#[serde(default)]
	settings: Settings,
	#[serde(default)]
	config_files: ConfigFiles,
}

impl ProjectSpec {
	fn into_project(self, base_path: PathBuf) -> Project {
		let configs = match self.configs {
			Some(configs) if !configs.0.is_empty() => configs
				.0
				.into_iter()
				.map(|(name, config_type)| Config::new(name, config_type))
				.collect(),
			_ => Config::defaults(),
		};

		let targets = self
			.targets
			.0
			.into_iter()
			.map(|(name, spec)| Target {
				name,
				platform: spec.platform,
				product_type: spec.product_type,
				deployment_target: spec.deployment_target,
				settings: spec.settings,
				config_files: spec.config_files,
			})
			.collect();

		let aggregate_targets = self
			.aggregate_targets
			.0
			.into_iter()
			.map(|(name, spec)| AggregateTarget {
				name,
				settings: spec.settings,
				config_files: spec.config_files,
			})
			.collect();

		Project {
			name: self.name,
			base_path,
			configs,
			targets,
			aggregate_targets,
			settings: self.settings,
			setting_groups: self.setting_groups,
			config_files: self.config_files,
			options: self.options,
		}
	}
}

impl Project {
	/// Resolve the project description path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		SPEC_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the project description at `path`. Relative override file paths
	/// are resolved against the directory containing it.
	pub fn load(path: &Path) -> BsetResult<Project> {
		let content = std::fs::read_to_string(path)?;
		let format = path
			.extension()
			.and_then(|e| e.to_str())
			.unwrap_or("")
			.to_ascii_lowercase();
		let base_path = path
			.parent()
			.map_or_else(|| PathBuf::from("."), Path::to_path_buf);

		Self::parse(&content, &format, base_path, &path.display().to_string())
	}

	/// Parse a project description in the given `format` (`yml`, `yaml` or
	/// `json`).
	pub fn parse(content: &str, format: &str, base_path: PathBuf, path_display: &str) -> BsetResult<Project> {
		let spec_parse = |reason: String| BsetError::SpecParse {
			path: path_display.to_string(),
			reason,
		};

		let spec: ProjectSpec = match format {
			"yml" | "yaml" => serde_yaml_ng::from_str(content).map_err(|e| spec_parse(e.to_string()))?,
			"json" => serde_json::from_str(content).map_err(|e| spec_parse(e.to_string()))?,
			other => return Err(BsetError::UnsupportedSpecFormat(other.to_string())),
		};

		Ok(spec.into_project(base_path))
	}
}
