use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use std::rc::Rc;

use serde::Deserialize;
use serde::Serialize;

use crate::BsetError;
use crate::preset::PresetLocator;
use crate::preset::PresetTier;
use crate::preset::SettingsPreset;
use crate::value::BuildSettings;
use crate::xcconfig::OverrideFileLoader;
use crate::xcconfig::XcconfigLoader;

/// Outcome of a load that has already been attempted.
#[derive(Debug, Clone)]
enum Cached<T> {
	Present(T),
	Absent,
}

impl<T: Clone> Cached<T> {
	fn value(&self) -> Option<T> {
		match self {
			Self::Present(value) => Some(value.clone()),
			Self::Absent => None,
		}
	}
}

/// The kind of diagnostic recorded while loading external settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DiagnosticKind {
	/// A required preset file was not found in any search location.
	MissingPreset { preset: String },
	/// A preset file was found but could not be parsed.
	MalformedPreset {
		preset: String,
		path: PathBuf,
		reason: String,
	},
}

/// A non-fatal problem met while loading presets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDiagnostic {
	pub kind: DiagnosticKind,
}

impl StoreDiagnostic {
	pub fn message(&self) -> String {
		match &self.kind {
			DiagnosticKind::MissingPreset { preset } => {
				format!("no settings found for preset \"{preset}\"")
			}
			DiagnosticKind::MalformedPreset {
				preset,
				path,
				reason,
			} => format!(
				"error parsing preset \"{preset}\" at {}: {reason}",
				path.display()
			),
		}
	}
}

/// Loads and caches settings that live outside the project description:
/// override files by path and presets by identifier.
///
/// Successful loads and missing files are cached for the lifetime of the
/// store, so a missing file is probed once and reported once. A preset file
/// that exists but does not parse is not cached: it is read and reported
/// again on every request. Failures never surface as errors; they mean "no
/// settings to contribute".
///
/// The store is single-threaded. Share one store between all resolutions of a
/// project to get the load-once behavior.
#[derive(Debug)]
pub struct SettingsStore {
	base_path: PathBuf,
	locator: PresetLocator,
	loader: Box<dyn OverrideFileLoader>,
	override_files: RefCell<HashMap<PathBuf, Cached<Rc<BuildSettings>>>>,
	presets: RefCell<HashMap<String, Cached<Rc<BuildSettings>>>>,
	diagnostics: RefCell<Vec<StoreDiagnostic>>,
}

impl SettingsStore {
	/// A store resolving override files against `base_path` and presets
	/// through `locator`.
	pub fn new(base_path: impl Into<PathBuf>, locator: PresetLocator) -> Self {
		Self {
			base_path: base_path.into(),
			locator,
			loader: Box::new(XcconfigLoader),
			override_files: RefCell::default(),
			presets: RefCell::default(),
			diagnostics: RefCell::default(),
		}
	}

	/// A store that searches for presets in the standard locations.
	pub fn from_env(base_path: impl Into<PathBuf>) -> Self {
		Self::new(base_path, PresetLocator::from_env())
	}

	/// Replace the override file loader.
	#[must_use]
	pub fn with_loader(mut self, loader: impl OverrideFileLoader + 'static) -> Self {
		self.loader = Box::new(loader);
		self
	}

	pub fn base_path(&self) -> &Path {
		&self.base_path
	}

	pub fn locator(&self) -> &PresetLocator {
		&self.locator
	}

	/// The flattened settings of the override file at `path`, relative to the
	/// base path. `None` when the file is missing or cannot be read.
	pub fn load_override_file(&self, path: &str) -> Option<Rc<BuildSettings>> {
		let full_path = self.base_path.join(path);
		if let Some(cached) = self.override_files.borrow().get(&full_path) {
			return cached.value();
		}

		let entry = match self.loader.flattened_build_settings(&full_path) {
			Ok(settings) => {
				tracing::debug!(path = %full_path.display(), count = settings.len(), "loaded override file");
				Cached::Present(Rc::new(settings))
			}
			Err(error) => {
				tracing::debug!(path = %full_path.display(), %error, "override file unavailable");
				Cached::Absent
			}
		};

		let value = entry.value();
		self.override_files.borrow_mut().insert(full_path, entry);
		value
	}

	/// The settings of `preset`, or `None` when no preset file exists or the
	/// file is malformed. A missing file is remembered; a malformed file is
	/// read again on the next request.
	pub fn load_preset(&self, preset: &SettingsPreset) -> Option<Rc<BuildSettings>> {
		let key = preset.path();
		if let Some(cached) = self.presets.borrow().get(&key) {
			return cached.value();
		}

		let entry = self.read_preset(preset)?;
		let value = entry.value();
		self.presets.borrow_mut().insert(key, entry);
		value
	}

	/// Where `preset` would be loaded from.
	pub fn locate_preset(&self, preset: &SettingsPreset) -> Option<PathBuf> {
		self.locator.locate(preset)
	}

	/// Diagnostics recorded so far, oldest first.
	pub fn diagnostics(&self) -> Vec<StoreDiagnostic> {
		self.diagnostics.borrow().clone()
	}

	/// `None` when the file exists but cannot be parsed, which is not cached.
	fn read_preset(&self, preset: &SettingsPreset) -> Option<Cached<Rc<BuildSettings>>> {
		let Some(path) = self.locator.locate(preset) else {
			if preset.tier() == PresetTier::Required {
				self.report(DiagnosticKind::MissingPreset {
					preset: preset.name(),
				});
			}
			return Some(Cached::Absent);
		};

		match parse_preset_file(preset, &path) {
			Ok(settings) => Some(Cached::Present(Rc::new(settings))),
			Err(error) => {
				let reason = match error {
					BsetError::PresetParse { reason, .. } => reason,
					other => other.to_string(),
				};
				self.report(DiagnosticKind::MalformedPreset {
					preset: preset.name(),
					path,
					reason,
				});
				None
			}
		}
	}

	fn report(&self, kind: DiagnosticKind) {
		let diagnostic = StoreDiagnostic { kind };
		tracing::warn!("{}", diagnostic.message());
		self.diagnostics.borrow_mut().push(diagnostic);
	}
}

fn parse_preset_file(preset: &SettingsPreset, path: &Path) -> Result<BuildSettings, BsetError> {
	let content = std::fs::read_to_string(path)?;
	if content.trim().is_empty() {
		return Ok(BuildSettings::new());
	}

	serde_yaml_ng::from_str(&content).map_err(|e| BsetError::PresetParse {
		preset: preset.name(),
		reason: e.to_string(),
	})
}
