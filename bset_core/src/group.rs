use crate::BsetError;
use crate::BsetResult;
use crate::project::Config;
use crate::settings::SettingGroups;
use crate::settings::Settings;
use crate::value::BuildSettings;
use crate::variant::ConfigVariantMatcher;

/// Flattens a settings block for one configuration.
///
/// Referenced groups are expanded first, in order, then the block's own
/// settings, then every matching configuration variant block. Each step
/// overrides the ones before it. Unknown group names contribute nothing.
#[derive(Debug, Clone, Copy)]
pub struct SettingsGroupExpander<'a> {
	groups: &'a SettingGroups,
	matcher: ConfigVariantMatcher<'a>,
}

impl<'a> SettingsGroupExpander<'a> {
	pub fn new(groups: &'a SettingGroups, matcher: ConfigVariantMatcher<'a>) -> Self {
		Self { groups, matcher }
	}

	/// Expand `settings` for `config`.
	///
	/// Fails with [`BsetError::GroupCycle`] when a group references itself,
	/// directly or through other groups.
	pub fn expand(&self, settings: &Settings, config: &Config) -> BsetResult<BuildSettings> {
		let mut chain = Vec::new();
		self.expand_in_chain(settings, config, &mut chain)
	}

	fn expand_in_chain(
		&self,
		settings: &Settings,
		config: &Config,
		chain: &mut Vec<String>,
	) -> BsetResult<BuildSettings> {
		let mut build_settings = BuildSettings::new();

		for name in &settings.groups {
			let Some(group) = self.groups.get(name) else {
				tracing::debug!(group = %name, "skipping unknown settings group");
				continue;
			};

			if chain.contains(name) {
				let mut cycle = chain.clone();
				cycle.push(name.clone());
				tracing::debug!(chain = ?cycle, "settings group cycle");
				return Err(BsetError::GroupCycle {
					chain: cycle.join(" -> "),
				});
			}

			chain.push(name.clone());
			let expanded = self.expand_in_chain(group, config, chain)?;
			chain.pop();
			build_settings.merge(&expanded);
		}

		build_settings.merge(&settings.build_settings);

		for variant_settings in self.matcher.matching(settings, config) {
			let expanded = self.expand_in_chain(variant_settings, config, chain)?;
			build_settings.merge(&expanded);
		}

		Ok(build_settings)
	}
}
