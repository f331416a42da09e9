use std::ffi::OsStr;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;

use crate::platform::ConfigType;
use crate::platform::Platform;
use crate::platform::ProductType;

/// Environment variable naming the directory that contains `SettingPresets`.
/// When set it is searched before every other location.
pub const PRESETS_PARENT_DIR_ENV: &str = "BSET_SETTINGS_PRESETS_PARENT_DIR";

/// Name of the directory holding the preset files.
pub const PRESETS_DIR_NAME: &str = "SettingPresets";

/// Name used for the `share/<tool>` install location.
pub const TOOL_NAME: &str = "bset";

/// A predefined bundle of build settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsPreset {
	Base,
	Config(ConfigType),
	Platform(Platform),
	Product(ProductType),
	ProductPlatform(ProductType, Platform),
}

/// Whether a missing preset file is worth telling the user about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetTier {
	Required,
	Optional,
}

impl fmt::Display for PresetTier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Required => f.write_str("required"),
			Self::Optional => f.write_str("optional"),
		}
	}
}

impl SettingsPreset {
	/// Cache key and file stem, relative to the presets directory.
	pub fn path(&self) -> String {
		match self {
			Self::Base => "base".to_string(),
			Self::Config(config) => format!("Configs/{config}"),
			Self::Platform(platform) => format!("Platforms/{platform}"),
			Self::Product(product) => format!("Products/{product}"),
			Self::ProductPlatform(product, platform) => {
				format!("Product_Platform/{product}_{platform}")
			}
		}
	}

	/// Name shown in diagnostics.
	pub fn name(&self) -> String {
		match self {
			Self::Base => "base".to_string(),
			Self::Config(config) => config.to_string(),
			Self::Platform(platform) => platform.to_string(),
			Self::Product(product) => product.to_string(),
			Self::ProductPlatform(product, platform) => format!("{product}_{platform}"),
		}
	}

	pub fn tier(&self) -> PresetTier {
		match self {
			Self::Base | Self::Config(_) | Self::Platform(_) => PresetTier::Required,
			Self::Product(_) | Self::ProductPlatform(..) => PresetTier::Optional,
		}
	}

	/// `SettingPresets/<path>.yml`
	pub fn relative_file(&self) -> PathBuf {
		Path::new(PRESETS_DIR_NAME).join(format!("{}.yml", self.path()))
	}
}

impl fmt::Display for SettingsPreset {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.name())
	}
}

/// Finds preset files on disk.
///
/// Candidate locations, in order:
///
/// 1. the symlink target directory of the executable, when it is a symlink
/// 2. the directory named by [`PRESETS_PARENT_DIR_ENV`]
/// 3. the working directory
/// 4. the executable's directory
/// 5. `<executable dir>/../share/bset/`
/// 6. the source root of this crate's workspace
#[derive(Debug, Clone, Default)]
pub struct PresetLocator {
	/// Parent directory of `SettingPresets` supplied by the environment.
	pub env_parent_dir: Option<PathBuf>,
	pub current_dir: Option<PathBuf>,
	/// Full path of the running executable, as invoked. When it was invoked
	/// through a symlink this is the link itself, not its target.
	pub executable: Option<PathBuf>,
	pub source_root: Option<PathBuf>,
}

impl PresetLocator {
	/// Build a locator from the process environment.
	pub fn from_env() -> Self {
		let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
		let path_var = std::env::var_os("PATH");
		let executable = std::env::args_os()
			.next()
			.and_then(|invoked| invoked_symlink(&invoked, &current_dir, path_var.as_deref()))
			.or_else(|| std::env::current_exe().ok());

		Self {
			env_parent_dir: std::env::var_os(PRESETS_PARENT_DIR_ENV)
				.filter(|value| !value.is_empty())
				.map(PathBuf::from),
			current_dir: Some(current_dir),
			executable,
			source_root: Path::new(env!("CARGO_MANIFEST_DIR"))
				.parent()
				.map(Path::to_path_buf),
		}
	}

	/// A locator that only searches `parent_dir`.
	pub fn with_parent_dir(parent_dir: impl Into<PathBuf>) -> Self {
		Self {
			env_parent_dir: Some(parent_dir.into()),
			..Self::default()
		}
	}

	/// Every location that is probed for `preset`, highest priority first.
	pub fn candidates(&self, preset: &SettingsPreset) -> Vec<PathBuf> {
		let relative = preset.relative_file();
		let mut candidates = Vec::new();

		if let Some(target_dir) = self.executable_symlink_dir() {
			candidates.push(target_dir.join(&relative));
		}

		if let Some(parent) = &self.env_parent_dir {
			candidates.push(parent.join(&relative));
		}

		if let Some(current_dir) = &self.current_dir {
			candidates.push(current_dir.join(&relative));
		}

		if let Some(exe_dir) = self.executable_dir() {
			candidates.push(exe_dir.join(&relative));
			candidates.push(exe_dir.join("..").join("share").join(TOOL_NAME).join(&relative));
		}

		if let Some(source_root) = &self.source_root {
			candidates.push(source_root.join(&relative));
		}

		candidates
	}

	/// The first candidate that exists.
	pub fn locate(&self, preset: &SettingsPreset) -> Option<PathBuf> {
		self.candidates(preset).into_iter().find(|path| {
			let exists = path.is_file();
			tracing::debug!(preset = %preset, path = %path.display(), exists, "probing preset");
			exists
		})
	}

	fn executable_dir(&self) -> Option<&Path> {
		self.executable.as_deref().and_then(Path::parent)
	}

	fn executable_symlink_dir(&self) -> Option<PathBuf> {
		let executable = self.executable.as_deref()?;
		let destination = std::fs::read_link(executable).ok()?;
		let destination = match executable.parent() {
			Some(dir) if destination.is_relative() => dir.join(destination),
			_ => destination,
		};

		destination.parent().map(Path::to_path_buf)
	}
}

/// The path the process was invoked as, when that path is a symlink.
///
/// `current_exe` already resolves symlinks on Linux, so the link has to be
/// recovered from `argv[0]`. A bare command name is looked up in `path_var`
/// the way the shell found it.
pub(crate) fn invoked_symlink(invoked: &OsStr, current_dir: &Path, path_var: Option<&OsStr>) -> Option<PathBuf> {
	let invoked = Path::new(invoked);
	let path = if invoked.components().count() > 1 {
		current_dir.join(invoked)
	} else {
		std::env::split_paths(path_var?)
			.map(|dir| dir.join(invoked))
			.find(|candidate| candidate.is_file())?
	};

	let metadata = path.symlink_metadata().ok()?;
	metadata.file_type().is_symlink().then_some(path)
}
