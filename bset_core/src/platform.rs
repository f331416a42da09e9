use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::BsetError;
use crate::BsetResult;

/// An Apple platform a target is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Platform {
	#[serde(rename = "iOS")]
	Ios,
	#[serde(rename = "macOS")]
	MacOs,
	#[serde(rename = "tvOS")]
	TvOs,
	#[serde(rename = "watchOS")]
	WatchOs,
	#[serde(rename = "visionOS")]
	VisionOs,
}

impl Platform {
	pub const ALL: [Platform; 5] = [
		Platform::Ios,
		Platform::MacOs,
		Platform::TvOs,
		Platform::WatchOs,
		Platform::VisionOs,
	];

	pub fn name(self) -> &'static str {
		match self {
			Self::Ios => "iOS",
			Self::MacOs => "macOS",
			Self::TvOs => "tvOS",
			Self::WatchOs => "watchOS",
			Self::VisionOs => "visionOS",
		}
	}

	/// Value of `SDKROOT` for this platform.
	pub fn sdk_root(self) -> &'static str {
		match self {
			Self::Ios => "iphoneos",
			Self::MacOs => "macosx",
			Self::TvOs => "appletvos",
			Self::WatchOs => "watchos",
			Self::VisionOs => "xros",
		}
	}

	/// The minimum OS version setting key for this platform.
	pub fn deployment_target_setting(self) -> &'static str {
		match self {
			Self::Ios => "IPHONEOS_DEPLOYMENT_TARGET",
			Self::MacOs => "MACOSX_DEPLOYMENT_TARGET",
			Self::TvOs => "TVOS_DEPLOYMENT_TARGET",
			Self::WatchOs => "WATCHOS_DEPLOYMENT_TARGET",
			Self::VisionOs => "XROS_DEPLOYMENT_TARGET",
		}
	}
}

impl fmt::Display for Platform {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// A deployment target version such as `15.4` or `10.15.6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeploymentVersion {
	pub major: u32,
	pub minor: u32,
	pub patch: u32,
}

impl DeploymentVersion {
	pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
		Self {
			major,
			minor,
			patch,
		}
	}

	/// The string written into a deployment target setting. The patch
	/// component is only present when it is non-zero.
	pub fn deployment_target(&self) -> String {
		if self.patch > 0 {
			format!("{}.{}.{}", self.major, self.minor, self.patch)
		} else {
			format!("{}.{}", self.major, self.minor)
		}
	}
}

impl fmt::Display for DeploymentVersion {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.deployment_target())
	}
}

impl FromStr for DeploymentVersion {
	type Err = BsetError;

	fn from_str(value: &str) -> BsetResult<Self> {
		let invalid = || BsetError::InvalidVersion(value.to_string());
		let mut components = [0_u32; 3];
		let mut count = 0;

		for part in value.trim().split('.') {
			let slot = components.get_mut(count).ok_or_else(invalid)?;
			*slot = part.parse().map_err(|_| invalid())?;
			count += 1;
		}

		let [major, minor, patch] = components;
		Ok(Self::new(major, minor, patch))
	}
}

impl Serialize for DeploymentVersion {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.deployment_target())
	}
}

impl<'de> Deserialize<'de> for DeploymentVersion {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		// `deploymentTarget: 15.0` arrives as a number in YAML.
		let value = crate::SettingValue::deserialize(deserializer)?;
		let text = value
			.as_str()
			.ok_or_else(|| serde::de::Error::custom("deployment target must be a version"))?;
		text.parse().map_err(serde::de::Error::custom)
	}
}

/// Coarse configuration kind used to pick a configuration preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigType {
	Debug,
	Release,
}

impl ConfigType {
	pub fn name(self) -> &'static str {
		match self {
			Self::Debug => "debug",
			Self::Release => "release",
		}
	}
}

impl fmt::Display for ConfigType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

const PRODUCT_TYPE_PREFIX: &str = "com.apple.product-type.";

macro_rules! product_types {
	($($variant:ident => $name:literal,)+) => {
		/// The kind of product a target builds.
		///
		/// Serialized as the short name (`application`) or the full
		/// `com.apple.product-type.*` identifier.
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
		#[non_exhaustive]
		pub enum ProductType {
			$($variant,)+
		}

		impl ProductType {
			pub const ALL: &'static [ProductType] = &[$(ProductType::$variant,)+];

			/// The identifier without its `com.apple.product-type.` prefix.
			pub fn name(self) -> &'static str {
				match self {
					$(Self::$variant => $name,)+
				}
			}
		}
	};
}

product_types! {
	Application => "application",
	AppExtension => "app-extension",
	Bundle => "bundle",
	CommandLineTool => "tool",
	Framework => "framework",
	StaticFramework => "framework.static",
	XcFramework => "xcframework",
	DynamicLibrary => "library.dynamic",
	StaticLibrary => "library.static",
	UnitTestBundle => "bundle.unit-test",
	UiTestBundle => "bundle.ui-testing",
	WatchApp => "application.watchapp2",
	WatchAppContainer => "application.watchapp2-container",
	WatchExtension => "watchkit2-extension",
	AppClip => "application.on-demand-install-capable",
	ExtensionKitExtension => "extensionkit-extension",
	XpcService => "xpc-service",
	SystemExtension => "system-extension",
	DriverExtension => "driver-extension",
	Metal => "metal-library",
}

impl ProductType {
	pub fn identifier(self) -> String {
		format!("{PRODUCT_TYPE_PREFIX}{}", self.name())
	}
}

impl fmt::Display for ProductType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for ProductType {
	type Err = String;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		let name = value.strip_prefix(PRODUCT_TYPE_PREFIX).unwrap_or(value);
		Self::ALL
			.iter()
			.copied()
			.find(|product| product.name() == name)
			.ok_or_else(|| format!("unknown product type `{value}`"))
	}
}

impl Serialize for ProductType {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.name())
	}
}

impl<'de> Deserialize<'de> for ProductType {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let value = String::deserialize(deserializer)?;
		value.parse().map_err(serde::de::Error::custom)
	}
}
