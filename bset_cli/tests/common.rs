#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn bset_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("bset"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("BSET_LOG");
	cmd.env_remove("BSET_SETTINGS_PRESETS_PARENT_DIR");
	cmd
}

/// A `bset` command run from `root` against the project found there.
pub fn bset_in(root: &Path) -> Command {
	let mut cmd = bset_cmd();
	cmd.current_dir(root).arg("--path").arg(root);
	cmd
}

pub fn write_file(root: &Path, relative: &str, content: &str) -> std::io::Result<()> {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, content)
}

/// One iOS app, one aggregate target, an override file for `Release`.
pub const WEATHER_PROJECT: &str = r#"name: Weather
configs:
  Debug: debug
  Release: release
configFiles:
  Release: configs/Release.xcconfig
settingGroups:
  Common:
    SWIFT_VERSION: "5"
settings:
  groups: [Common]
  configs:
    release:
      API_HOST: api.example.com
targets:
  Weather:
    type: application
    platform: iOS
    deploymentTarget: "16.0"
    settings:
      SWIFT_VERSION: "5.5"
      PRODUCT_BUNDLE_IDENTIFIER: com.example.weather
aggregateTargets:
  Lint:
    configFiles:
      Release: configs/Lint.xcconfig
"#;

pub fn write_weather_project(root: &Path) -> std::io::Result<()> {
	write_file(root, "project.yml", WEATHER_PROJECT)?;
	write_file(root, "configs/Release.xcconfig", "ENABLE_BITCODE = NO\nCODE_SIGN_STYLE = Manual\n")?;
	write_file(root, "configs/Lint.xcconfig", "LINT_STRICT = YES\n")
}
