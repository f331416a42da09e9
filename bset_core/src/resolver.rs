use std::fmt;
use std::rc::Rc;

use crate::BsetResult;
use crate::group::SettingsGroupExpander;
use crate::platform::Platform;
use crate::preset::SettingsPreset;
use crate::project::Config;
use crate::project::Project;
use crate::project::Target;
use crate::settings::Settings;
use crate::store::SettingsStore;
use crate::value::BuildSettings;
use crate::value::SettingValue;
use crate::variant::ConfigVariantMatcher;

/// Where a contribution to a resolved settings map comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContributionSource {
	/// `SDKROOT` of a project whose targets share one platform.
	SdkRoot,
	Preset(SettingsPreset),
	DeploymentTarget(Platform),
	ProjectOverrideFile(String),
	TargetOverrideFile(String),
	ProjectSettings,
	TargetSettings,
}

impl fmt::Display for ContributionSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::SdkRoot => f.write_str("sdk root"),
			Self::Preset(preset) => write!(f, "preset `{}`", preset.path()),
			Self::DeploymentTarget(platform) => write!(f, "{platform} deployment target"),
			Self::ProjectOverrideFile(path) => write!(f, "project override file `{path}`"),
			Self::TargetOverrideFile(path) => write!(f, "target override file `{path}`"),
			Self::ProjectSettings => f.write_str("project settings"),
			Self::TargetSettings => f.write_str("target settings"),
		}
	}
}

/// One step of a resolution, applied in order onto an empty map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contribution {
	/// Merge a map; its entries win.
	Merge {
		source: ContributionSource,
		settings: Rc<BuildSettings>,
	},
	/// Set a single key.
	Set {
		source: ContributionSource,
		key: String,
		value: SettingValue,
	},
	/// Remove the keys an override file defines, so the file is not shadowed.
	Exclude {
		source: ContributionSource,
		keys: Vec<String>,
	},
}

impl Contribution {
	pub fn source(&self) -> &ContributionSource {
		match self {
			Self::Merge { source, .. } | Self::Set { source, .. } | Self::Exclude { source, .. } => {
				source
			}
		}
	}

	pub fn apply(&self, build_settings: &mut BuildSettings) {
		match self {
			Self::Merge { settings, .. } => build_settings.merge(settings),
			Self::Set { key, value, .. } => {
				build_settings.insert(key.clone(), value.clone());
			}
			Self::Exclude { keys, .. } => {
				build_settings.remove_overridden(keys.iter().map(String::as_str));
			}
		}
	}
}

/// Apply `contributions` left to right onto an empty map.
pub fn fold_contributions(contributions: &[Contribution]) -> BuildSettings {
	contributions
		.iter()
		.fold(BuildSettings::new(), |mut build_settings, contribution| {
			contribution.apply(&mut build_settings);
			build_settings
		})
}

/// Computes the build settings of a project and its targets per
/// configuration.
///
/// Project level, for a configuration:
///
/// 1. `SDKROOT` when all targets share one platform
/// 2. the `base` and configuration type presets, for typed configurations
/// 3. project deployment targets
/// 4. removal of keys defined by the project override file
/// 5. the expanded project settings
///
/// Target level:
///
/// 1. platform, product and product×platform presets
/// 2. the target deployment target
/// 3. removal of keys defined by the target override file
/// 4. removal of keys defined by the project override file
/// 5. the expanded target settings
///
/// Target resolution never includes project settings; combine levels with
/// [`SettingsResolver::combined_setting`].
#[derive(Debug)]
pub struct SettingsResolver<'p> {
	project: &'p Project,
	store: SettingsStore,
}

impl<'p> SettingsResolver<'p> {
	/// A resolver with a fresh store rooted at the project's base path.
	pub fn new(project: &'p Project) -> Self {
		Self::with_store(project, SettingsStore::from_env(project.base_path.clone()))
	}

	pub fn with_store(project: &'p Project, store: SettingsStore) -> Self {
		Self { project, store }
	}

	pub fn project(&self) -> &'p Project {
		self.project
	}

	pub fn store(&self) -> &SettingsStore {
		&self.store
	}

	/// Expand any settings block of this project for `config`.
	pub fn build_settings(&self, settings: &Settings, config: &Config) -> BsetResult<BuildSettings> {
		let matcher = ConfigVariantMatcher::new(&self.project.configs);
		SettingsGroupExpander::new(&self.project.setting_groups, matcher).expand(settings, config)
	}

	pub fn project_contributions(&self, config: &Config) -> BsetResult<Vec<Contribution>> {
		let project = self.project;
		let mut contributions = Vec::new();

		if let Some(platform) = project.single_platform() {
			contributions.push(Contribution::Set {
				source: ContributionSource::SdkRoot,
				key: "SDKROOT".to_string(),
				value: platform.sdk_root().into(),
			});
		}

		if let Some(config_type) = config.config_type {
			if project.options.setting_presets.apply_project() {
				self.push_preset(&mut contributions, SettingsPreset::Base);
				self.push_preset(&mut contributions, SettingsPreset::Config(config_type));
			}
		}

		for platform in Platform::ALL {
			if let Some(version) = project.options.deployment_target.version(platform) {
				contributions.push(Contribution::Set {
					source: ContributionSource::DeploymentTarget(platform),
					key: platform.deployment_target_setting().to_string(),
					value: version.deployment_target().into(),
				});
			}
		}

		if let Some(path) = project.config_files.get(&config.name) {
			self.push_exclusion(&mut contributions, ContributionSource::ProjectOverrideFile(path.clone()), path);
		}

		contributions.push(Contribution::Merge {
			source: ContributionSource::ProjectSettings,
			settings: Rc::new(self.build_settings(&project.settings, config)?),
		});

		Ok(contributions)
	}

	pub fn project_build_settings(&self, config: &Config) -> BsetResult<BuildSettings> {
		let contributions = self.project_contributions(config)?;
		Ok(fold_contributions(&contributions))
	}

	pub fn target_contributions(&self, target: &Target, config: &Config) -> BsetResult<Vec<Contribution>> {
		let project = self.project;
		let mut contributions = Vec::new();

		if project.options.setting_presets.apply_target() {
			self.push_preset(&mut contributions, SettingsPreset::Platform(target.platform));
			self.push_preset(&mut contributions, SettingsPreset::Product(target.product_type));
			self.push_preset(
				&mut contributions,
				SettingsPreset::ProductPlatform(target.product_type, target.platform),
			);
		}

		if let Some(version) = target.deployment_target {
			contributions.push(Contribution::Set {
				source: ContributionSource::DeploymentTarget(target.platform),
				key: target.platform.deployment_target_setting().to_string(),
				value: version.deployment_target().into(),
			});
		}

		if let Some(path) = target.config_files.get(&config.name) {
			self.push_exclusion(&mut contributions, ContributionSource::TargetOverrideFile(path.clone()), path);
		}

		if let Some(path) = project.config_files.get(&config.name) {
			self.push_exclusion(&mut contributions, ContributionSource::ProjectOverrideFile(path.clone()), path);
		}

		contributions.push(Contribution::Merge {
			source: ContributionSource::TargetSettings,
			settings: Rc::new(self.build_settings(&target.settings, config)?),
		});

		Ok(contributions)
	}

	pub fn target_build_settings(&self, target: &Target, config: &Config) -> BsetResult<BuildSettings> {
		let contributions = self.target_contributions(target, config)?;
		Ok(fold_contributions(&contributions))
	}

	fn push_preset(&self, contributions: &mut Vec<Contribution>, preset: SettingsPreset) {
		if let Some(settings) = self.store.load_preset(&preset) {
			contributions.push(Contribution::Merge {
				source: ContributionSource::Preset(preset),
				settings,
			});
		}
	}

	fn push_exclusion(&self, contributions: &mut Vec<Contribution>, source: ContributionSource, path: &str) {
		if let Some(settings) = self.store.load_override_file(path) {
			contributions.push(Contribution::Exclude {
				source,
				keys: settings.keys().cloned().collect(),
			});
		}
	}
}
