use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum BsetError {
	#[error(transparent)]
	#[diagnostic(code(bset::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse project description `{path}`: {reason}")]
	#[diagnostic(
		code(bset::spec_parse),
		help("check that the project description is valid YAML or JSON")
	)]
	SpecParse { path: String, reason: String },

	#[error("unsupported project description format: `{0}`")]
	#[diagnostic(
		code(bset::unsupported_format),
		help("supported formats: yml, yaml, json")
	)]
	UnsupportedSpecFormat(String),

	#[error("no project description found in `{0}`")]
	#[diagnostic(
		code(bset::missing_spec),
		help("create a project.yml or pass `--spec <file>`")
	)]
	MissingSpec(String),

	#[error("failed to load override file `{path}`: {reason}")]
	#[diagnostic(code(bset::override_file))]
	OverrideFile { path: String, reason: String },

	#[error("override file include cycle detected at: `{path}`")]
	#[diagnostic(
		code(bset::override_include_cycle),
		help("remove the `#include` that points back to an including file")
	)]
	OverrideIncludeCycle { path: String },

	#[error("error parsing preset \"{preset}\": {reason}")]
	#[diagnostic(code(bset::preset_parse))]
	PresetParse { preset: String, reason: String },

	#[error("setting group cycle detected: {chain}")]
	#[diagnostic(
		code(bset::group_cycle),
		help("a settings group must not reference itself, directly or through other groups")
	)]
	GroupCycle { chain: String },

	#[error("unknown configuration: `{0}`")]
	#[diagnostic(
		code(bset::unknown_config),
		help("configurations are declared under `configs` in the project description")
	)]
	UnknownConfig(String),

	#[error("unknown target: `{0}`")]
	#[diagnostic(
		code(bset::unknown_target),
		help("targets are declared under `targets` or `aggregateTargets`")
	)]
	UnknownTarget(String),

	#[error("invalid deployment target version: `{0}`")]
	#[diagnostic(
		code(bset::invalid_version),
		help("use `major`, `major.minor` or `major.minor.patch`, e.g. `15.4`")
	)]
	InvalidVersion(String),
}

pub type BsetResult<T> = Result<T, BsetError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
