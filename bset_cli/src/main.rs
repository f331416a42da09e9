use std::path::PathBuf;
use std::process;

use bset_cli::BsetCli;
use bset_cli::Commands;
use bset_cli::ResolveFormat;
use bset_core::AnyResult;
use bset_core::BsetError;
use bset_core::BsetResult;
use bset_core::BuildSettings;
use bset_core::Project;
use bset_core::SettingsPreset;
use bset_core::SettingsResolver;
use bset_core::SettingsStore;
use bset_core::Target;
use clap::Parser;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "BSET_LOG";

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,cyan) => {
		if color_enabled() {
			format!("{}", $text.cyan())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = BsetCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_logging(&args, use_color);

	let result = match &args.command {
		Some(Commands::Resolve {
			config,
			target,
			format,
		}) => run_resolve(&args, config, target.as_deref(), *format).map(|()| true),
		Some(Commands::Get {
			key,
			config,
			target,
			as_bool,
		}) => run_get(&args, key, config, target, *as_bool),
		Some(Commands::Presets { target }) => run_presets(&args, target.as_deref()).map(|()| true),
		Some(Commands::Targets) => run_targets(&args).map(|()| true),
		None => {
			eprintln!("No subcommand specified. Run `bset --help` for usage.");
			process::exit(1);
		}
	};

	match result {
		Ok(true) => {}
		Ok(false) => process::exit(1),
		Err(e) => {
			match e.downcast::<BsetError>() {
				Ok(bset_err) => {
					let report: miette::Report = (*bset_err).into();
					eprintln!("{report:?}");
				}
				Err(e) => {
					eprintln!("{} {e}", colored!("error:", red));
				}
			}
			process::exit(2);
		}
	}
}

/// Preset diagnostics are `warn` events, so they show by default.
fn init_logging(args: &BsetCli, use_color: bool) {
	let default_level = if args.verbose { "debug" } else { "warn" };
	let directive = std::env::var(LOG_ENV)
		.ok()
		.filter(|value| !value.trim().is_empty())
		.unwrap_or_else(|| default_level.to_string());

	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::new(directive))
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(args.verbose)
		.without_time()
		.try_init()
		.ok();
}

fn resolve_root(args: &BsetCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// `--spec` relative to the project root, or the first description file
/// found there.
fn resolve_spec_path(args: &BsetCli) -> BsetResult<PathBuf> {
	let root = resolve_root(args);
	if let Some(spec) = &args.spec {
		return Ok(root.join(spec));
	}

	Project::resolve_path(&root).ok_or_else(|| BsetError::MissingSpec(root.display().to_string()))
}

fn load_project(args: &BsetCli) -> BsetResult<Project> {
	let path = resolve_spec_path(args)?;
	if args.verbose {
		eprintln!("{} {}", colored!("project:", cyan), path.display());
	}

	Project::load(&path)
}

fn require_target<'p>(project: &'p Project, name: &str) -> BsetResult<&'p Target> {
	project
		.target(name)
		.ok_or_else(|| BsetError::UnknownTarget(name.to_string()))
}

fn print_section(title: &str) {
	println!("{}", colored!(title, bold));
}

fn print_settings(build_settings: &BuildSettings) {
	if build_settings.is_empty() {
		println!("No build settings.");
		return;
	}

	let width = build_settings.keys().map(String::len).max().unwrap_or(0);
	for (key, value) in build_settings.iter() {
		println!("  {key:<width$}  {value}");
	}
}

fn run_resolve(args: &BsetCli, config_name: &str, target_name: Option<&str>, format: ResolveFormat) -> AnyResult<()> {
	let project = load_project(args)?;
	let config = project.require_config(config_name)?;
	let resolver = SettingsResolver::new(&project);

	let build_settings = match target_name {
		Some(name) => resolver.target_build_settings(require_target(&project, name)?, config)?,
		None => resolver.project_build_settings(config)?,
	};

	match format {
		ResolveFormat::Text => {
			let scope = target_name.map_or_else(|| format!("project {}", project.name), |name| format!("target {name}"));
			print_section(&format!("Build settings for {scope} ({})", config.name));
			print_settings(&build_settings);
		}
		ResolveFormat::Json => {
			let output = serde_json::json!({
				"project": project.name,
				"target": target_name,
				"config": config.name,
				"settings": build_settings,
			});
			println!("{output}");
		}
		ResolveFormat::Xcconfig => {
			for (key, value) in build_settings.iter() {
				println!("{key} = {value}");
			}
		}
	}

	Ok(())
}

/// Returns `false` when the key is not set anywhere.
fn run_get(args: &BsetCli, key: &str, config_name: &str, target_name: &str, as_bool: bool) -> AnyResult<bool> {
	let project = load_project(args)?;
	let config = project.require_config(config_name)?;
	let target = project.project_target(target_name)?;
	let resolver = SettingsResolver::new(&project);

	let value = if as_bool {
		resolver
			.combined_bool_setting(key, target, config)?
			.map(|value| value.to_string())
	} else {
		resolver
			.combined_setting(key, target, config)?
			.map(|value| value.to_string())
	};

	match value {
		Some(value) => {
			println!("{value}");
			Ok(true)
		}
		None => {
			eprintln!(
				"{} `{key}` is not set for `{target_name}` in `{}`",
				colored!("warning:", yellow),
				config.name
			);
			Ok(false)
		}
	}
}

fn run_presets(args: &BsetCli, target_name: Option<&str>) -> AnyResult<()> {
	let project = load_project(args)?;
	let mode = project.options.setting_presets;

	let (title, presets, enabled) = match target_name {
		Some(name) => {
			let target = require_target(&project, name)?;
			let presets = vec![
				SettingsPreset::Platform(target.platform),
				SettingsPreset::Product(target.product_type),
				SettingsPreset::ProductPlatform(target.product_type, target.platform),
			];
			(format!("Presets for target {name}"), presets, mode.apply_target())
		}
		None => {
			let mut presets = vec![SettingsPreset::Base];
			for config_type in project.configs.iter().filter_map(|config| config.config_type) {
				let preset = SettingsPreset::Config(config_type);
				if !presets.contains(&preset) {
					presets.push(preset);
				}
			}
			(format!("Presets for project {}", project.name), presets, mode.apply_project())
		}
	};

	print_section(&title);
	if !enabled {
		println!("  {}", colored!("presets are disabled at this level by `settingPresets`", yellow));
	}

	let store = SettingsStore::from_env(project.base_path.clone());
	let width = presets
		.iter()
		.map(|preset| preset.path().len())
		.max()
		.unwrap_or(0);
	for preset in &presets {
		let location = store
			.locate_preset(preset)
			.map_or_else(|| colored!("missing", red), |path| path.display().to_string());
		println!("  {:<width$}  {:<8}  {location}", preset.path(), preset.tier().to_string());
	}

	Ok(())
}

fn run_targets(args: &BsetCli) -> AnyResult<()> {
	let project = load_project(args)?;
	print_section(&format!("Targets of {}", project.name));

	if project.targets.is_empty() && project.aggregate_targets.is_empty() {
		println!("No targets found.");
		return Ok(());
	}

	let width = project
		.targets
		.iter()
		.map(|target| target.name.len())
		.chain(project.aggregate_targets.iter().map(|target| target.name.len()))
		.max()
		.unwrap_or(0);

	for target in &project.targets {
		println!(
			"  {:<width$}  {:<9}  {}",
			target.name,
			target.platform.name(),
			target.product_type.name()
		);
	}

	for target in &project.aggregate_targets {
		println!("  {:<width$}  aggregate", target.name);
	}

	Ok(())
}
