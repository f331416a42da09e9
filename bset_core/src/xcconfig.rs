use std::path::Path;
use std::path::PathBuf;

use crate::BsetError;
use crate::BsetResult;
use crate::value::BuildSettings;
use crate::value::SettingValue;

/// Loads an override file into a flat settings map.
///
/// Implementations follow the file's own include chain. Any error is treated
/// by [`crate::SettingsStore`] as "this file contributes nothing".
pub trait OverrideFileLoader: std::fmt::Debug {
	fn flattened_build_settings(&self, path: &Path) -> BsetResult<BuildSettings>;
}

/// Reads `.xcconfig` files.
///
/// ```text
/// // comment
/// #include "Shared.xcconfig"
/// #include? "Local.xcconfig"
/// SWIFT_VERSION = 5.9
/// OTHER_LDFLAGS[sdk=iphoneos*] = -ObjC
/// ```
///
/// Assignments are applied in file order, so an assignment after an
/// `#include` overrides the included value and one before it is overridden.
/// Included paths are relative to the including file. `#include?` skips a
/// missing file instead of failing.
#[derive(Debug, Clone, Copy, Default)]
pub struct XcconfigLoader;

impl OverrideFileLoader for XcconfigLoader {
	fn flattened_build_settings(&self, path: &Path) -> BsetResult<BuildSettings> {
		let mut settings = BuildSettings::new();
		let mut stack = Vec::new();
		load_into(path, &mut settings, &mut stack)?;
		Ok(settings)
	}
}

fn load_into(path: &Path, settings: &mut BuildSettings, stack: &mut Vec<PathBuf>) -> BsetResult<()> {
	let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
	if stack.contains(&key) {
		return Err(BsetError::OverrideIncludeCycle {
			path: path.display().to_string(),
		});
	}

	let content = std::fs::read_to_string(path).map_err(|e| BsetError::OverrideFile {
		path: path.display().to_string(),
		reason: e.to_string(),
	})?;

	stack.push(key);
	let directory = path.parent().unwrap_or_else(|| Path::new(""));

	for (index, raw_line) in content.lines().enumerate() {
		match parse_line(raw_line) {
			Line::Blank => {}
			Line::Include { file, optional } => {
				let include_path = directory.join(file);
				if optional && !include_path.is_file() {
					tracing::debug!(path = %include_path.display(), "skipping missing optional include");
					continue;
				}
				load_into(&include_path, settings, stack)?;
			}
			Line::Assignment { key, value } => {
				settings.insert(key.to_string(), SettingValue::String(value.to_string()));
			}
			Line::Unrecognized => {
				tracing::debug!(
					path = %path.display(),
					line = index + 1,
					"ignoring unrecognized override file line"
				);
			}
		}
	}

	stack.pop();
	Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
	Blank,
	Include { file: &'a str, optional: bool },
	Assignment { key: &'a str, value: &'a str },
	Unrecognized,
}

fn parse_line(raw_line: &str) -> Line<'_> {
	let line = strip_comment(raw_line).trim();
	if line.is_empty() {
		return Line::Blank;
	}

	if let Some(rest) = line.strip_prefix("#include") {
		let (optional, rest) = match rest.strip_prefix('?') {
			Some(rest) => (true, rest),
			None => (false, rest),
		};
		let file = rest
			.trim()
			.strip_prefix('"')
			.and_then(|rest| rest.strip_suffix('"'));

		return match file {
			Some(file) if !file.is_empty() => Line::Include { file, optional },
			_ => Line::Unrecognized,
		};
	}

	let Some((key, value)) = split_assignment(line) else {
		return Line::Unrecognized;
	};

	let key = key.trim();
	if key.is_empty() || key.contains(char::is_whitespace) {
		return Line::Unrecognized;
	}

	let value = value.trim();
	let value = value.strip_suffix(';').map_or(value, str::trim_end);
	Line::Assignment { key, value }
}

/// Split at the first `=` outside of `[...]` conditions, so
/// `KEY[sdk=iphoneos*] = value` keeps its condition in the key.
fn split_assignment(line: &str) -> Option<(&str, &str)> {
	let mut depth = 0_usize;

	for (index, character) in line.char_indices() {
		match character {
			'[' => depth += 1,
			']' => depth = depth.saturating_sub(1),
			'=' if depth == 0 => return Some((&line[..index], &line[index + 1..])),
			_ => {}
		}
	}

	None
}

/// Cut a `//` comment that is not inside a double-quoted string.
fn strip_comment(line: &str) -> &str {
	let mut in_quotes = false;
	let mut previous = '\0';

	for (index, character) in line.char_indices() {
		match character {
			'"' => in_quotes = !in_quotes,
			'/' if previous == '/' && !in_quotes => return &line[..index - 1],
			_ => {}
		}
		previous = character;
	}

	line
}
