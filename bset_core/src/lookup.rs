//! Effective value of one setting across target, project and their override
//! files.

use crate::BsetResult;
use crate::project::Config;
use crate::project::ProjectTarget;
use crate::resolver::SettingsResolver;
use crate::value::SettingValue;

impl SettingsResolver<'_> {
	/// The effective value of `key` for `target` in `config`.
	///
	/// Sources are tried in order and the first hit wins:
	///
	/// 1. the target's resolved build settings (native targets only)
	/// 2. the target's override file for `config`
	/// 3. the project's resolved build settings
	/// 4. the project's override file for `config`
	///
	/// Override files are a fallback here, never merged into the resolved
	/// maps.
	pub fn combined_setting<T>(&self, key: &str, target: &T, config: &Config) -> BsetResult<Option<SettingValue>>
	where
		T: ProjectTarget + ?Sized,
	{
		if let Some(native) = target.as_target() {
			if let Some(value) = self.target_build_settings(native, config)?.get(key) {
				return Ok(Some(value.clone()));
			}
		}

		if let Some(value) = self.override_file_setting(target.config_files().get(&config.name), key) {
			return Ok(Some(value));
		}

		if let Some(value) = self.project_build_settings(config)?.get(key) {
			return Ok(Some(value.clone()));
		}

		Ok(self.override_file_setting(self.project().config_files.get(&config.name), key))
	}

	/// [`Self::combined_setting`] read as a boolean: `YES` is `true`, any
	/// other string is `false`.
	pub fn combined_bool_setting<T>(&self, key: &str, target: &T, config: &Config) -> BsetResult<Option<bool>>
	where
		T: ProjectTarget + ?Sized,
	{
		Ok(self
			.combined_setting(key, target, config)?
			.as_ref()
			.and_then(SettingValue::as_bool))
	}

	pub fn has_setting<T>(&self, key: &str, target: &T, config: &Config) -> BsetResult<bool>
	where
		T: ProjectTarget + ?Sized,
	{
		Ok(self.combined_setting(key, target, config)?.is_some())
	}

	fn override_file_setting(&self, path: Option<&String>, key: &str) -> Option<SettingValue> {
		let settings = self.store().load_override_file(path?)?;
		settings.get(key).cloned()
	}
}
