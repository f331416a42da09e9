use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Inspect the resolved build settings of an Xcode project description.",
	long_about = "bset resolves the flat build settings that apply to each target and build \
	              configuration of a project description, layering presets, setting groups, \
	              configuration variants and override files.\n\nQuick start:\n  bset targets    \
	              List the targets of the project\n  bset resolve    Print resolved settings for \
	              a configuration\n  bset get KEY    Print the effective value of one setting\n  \
	              bset presets    Show which preset files were found"
)]
pub struct BsetCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Path to the project description. Defaults to the first of
	/// `project.yml`, `project.yaml` and `project.json` in the project root.
	#[arg(long, short, global = true)]
	pub spec: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Print the resolved build settings for a configuration.
	///
	/// Without `--target` this prints the project level settings. With a
	/// target it prints that target's own settings; project settings are not
	/// folded in, use `get` for the combined value of one key.
	Resolve {
		/// Name of the build configuration, matched ignoring case.
		#[arg(long, short)]
		config: String,

		/// Name of a native target.
		#[arg(long, short)]
		target: Option<String>,

		/// Output format. Use `text` for aligned key/value lines, `json` for
		/// programmatic consumption, or `xcconfig` for `KEY = value` lines.
		#[arg(long, value_enum, default_value_t = ResolveFormat::Text)]
		format: ResolveFormat,
	},
	/// Print the effective value of one setting for a target.
	///
	/// Looks at the target's settings, then the target's override file, then
	/// the project settings, then the project's override file. Exits with
	/// status 1 when no source defines the key.
	Get {
		/// The build setting key, e.g. `SWIFT_VERSION`.
		key: String,

		/// Name of the build configuration, matched ignoring case.
		#[arg(long, short)]
		config: String,

		/// Name of a native or aggregate target.
		#[arg(long, short)]
		target: String,

		/// Print the value as a boolean: `YES` is `true`, anything else is
		/// `false`.
		#[arg(long = "bool", default_value_t = false)]
		as_bool: bool,
	},
	/// List the preset files that apply to the project or a target.
	///
	/// Shows each preset identifier, whether a missing file is reported, and
	/// the path it was loaded from.
	Presets {
		/// Show the presets of a native target instead of the project.
		#[arg(long, short)]
		target: Option<String>,
	},
	/// List the targets declared in the project description.
	Targets,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ResolveFormat {
	/// Human-readable aligned `KEY value` lines.
	Text,
	/// A JSON object of settings.
	Json,
	/// `KEY = value` lines that can be saved as an `.xcconfig` file.
	Xcconfig,
}
