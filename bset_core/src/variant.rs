use crate::project::Config;
use crate::settings::Settings;

/// Decides which configuration variant blocks apply to a configuration.
///
/// A variant token matches every configuration whose name contains it,
/// ignoring case, so `debug` selects `Debug`, `MyDebug` and `Debug-Staging`.
/// A token that is exactly the name of some configuration is reserved for
/// that configuration and never matches the others.
#[derive(Debug, Clone, Copy)]
pub struct ConfigVariantMatcher<'a> {
	configs: &'a [Config],
}

impl<'a> ConfigVariantMatcher<'a> {
	pub fn new(configs: &'a [Config]) -> Self {
		Self { configs }
	}

	pub fn matches(&self, variant: &str, config: &Config) -> bool {
		let variant = variant.to_lowercase();
		if !config.name.to_lowercase().contains(&variant) {
			return false;
		}

		match self
			.configs
			.iter()
			.find(|other| other.name.to_lowercase() == variant)
		{
			Some(exact) => exact.name == config.name,
			None => true,
		}
	}

	/// The variant blocks of `settings` that apply to `config`, in
	/// declaration order.
	pub fn matching<'s>(
		&'s self,
		settings: &'s Settings,
		config: &'s Config,
	) -> impl Iterator<Item = &'s Settings> + 's {
		settings
			.config_settings
			.iter()
			.filter(move |(variant, _)| self.matches(variant, config))
			.map(|(_, settings)| settings)
	}
}
