use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::Deserialize;
use serde::Deserializer;
use serde::de::MapAccess;
use serde::de::SeqAccess;
use serde::de::Visitor;

use crate::value::BuildSettings;
use crate::value::SettingValue;
use crate::value::SettingValueVisitor;

/// Keys that turn a settings mapping into a structured block. A mapping
/// without any of them is read as a plain build settings map.
const STRUCTURED_KEYS: [&str; 4] = ["base", "groups", "presets", "configs"];

/// A block of build settings as written in a project description.
///
/// ```yaml
/// settings:
///   groups: [Common]
///   base:
///     SWIFT_VERSION: "5.9"
///   configs:
///     debug:
///       SWIFT_OPTIMIZATION_LEVEL: -Onone
/// ```
///
/// Blocks are immutable once built and are expanded per configuration by
/// [`crate::SettingsResolver::build_settings`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
	/// Names of setting groups applied first, in order.
	pub groups: Vec<String>,
	/// Settings declared directly on this block.
	pub build_settings: BuildSettings,
	/// Configuration variant token and the block it selects, in declaration
	/// order.
	pub config_settings: Vec<(String, Settings)>,
}

/// Project-wide table of named, reusable settings blocks.
pub type SettingGroups = BTreeMap<String, Settings>;

impl Settings {
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn with_groups<I, S>(mut self, groups: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.groups = groups.into_iter().map(Into::into).collect();
		self
	}

	#[must_use]
	pub fn with_build_settings(mut self, build_settings: BuildSettings) -> Self {
		self.build_settings = build_settings;
		self
	}

	#[must_use]
	pub fn with_config(mut self, variant: impl Into<String>, settings: Settings) -> Self {
		self.config_settings.push((variant.into(), settings));
		self
	}

	pub fn is_empty(&self) -> bool {
		self.groups.is_empty() && self.build_settings.is_empty() && self.config_settings.is_empty()
	}

	fn from_node(node: Node) -> Result<Self, String> {
		let entries = match node {
			Node::Map(entries) => entries.0,
			Node::Value(value) => {
				return Err(format!("expected a settings mapping, found `{value}`"));
			}
		};

		let structured = entries
			.iter()
			.any(|(key, _)| STRUCTURED_KEYS.contains(&key.as_str()));
		if !structured {
			return Self::from_build_settings_entries(entries);
		}

		let mut settings = Self::default();
		let mut groups = None;
		let mut presets = None;

		for (key, node) in entries {
			match key.as_str() {
				"groups" => groups = Some(group_names(&key, node)?),
				"presets" => presets = Some(group_names(&key, node)?),
				"base" => {
					let Node::Map(base) = node else {
						return Err("`base` must be a mapping of build settings".into());
					};
					settings.build_settings = Self::from_build_settings_entries(base.0)?.build_settings;
				}
				"configs" => {
					let Node::Map(variants) = node else {
						return Err("`configs` must be a mapping of configuration to settings".into());
					};
					for (variant, node) in variants.0 {
						settings.config_settings.push((variant, Self::from_node(node)?));
					}
				}
				_ => {}
			}
		}

		settings.groups = groups.or(presets).unwrap_or_default();
		Ok(settings)
	}

	fn from_build_settings_entries(entries: Vec<(String, Node)>) -> Result<Self, String> {
		let mut build_settings = BuildSettings::new();
		for (key, node) in entries {
			match node {
				Node::Value(value) => {
					build_settings.insert(key, value);
				}
				Node::Map(_) => {
					return Err(format!("build setting `{key}` must be a string, boolean, number or list"));
				}
			}
		}

		Ok(Self::new().with_build_settings(build_settings))
	}
}

fn group_names(key: &str, node: Node) -> Result<Vec<String>, String> {
	match node {
		Node::Value(SettingValue::List(names)) => Ok(names),
		Node::Value(SettingValue::String(name)) => Ok(vec![name]),
		_ => Err(format!("`{key}` must be a list of group names")),
	}
}

impl<'de> Deserialize<'de> for Settings {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let node = Node::deserialize(deserializer)?;
		Self::from_node(node).map_err(serde::de::Error::custom)
	}
}

/// Mapping entries in document order.
///
/// `serde_json` and `serde_yaml_ng` both hand map entries to a visitor in the
/// order they were written, which is what configuration variant precedence
/// relies on.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OrderedEntries<V>(pub(crate) Vec<(String, V)>);

impl<V> Default for OrderedEntries<V> {
	fn default() -> Self {
		Self(Vec::new())
	}
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedEntries<V> {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_any(OrderedEntriesVisitor(PhantomData))
	}
}

struct OrderedEntriesVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedEntriesVisitor<V> {
	type Value = OrderedEntries<V>;

	fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
		formatter.write_str("a mapping")
	}

	fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
		Ok(OrderedEntries::default())
	}

	fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
		Ok(OrderedEntries::default())
	}

	fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
		let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
		while let Some((key, value)) = map.next_entry::<String, V>()? {
			entries.push((key, value));
		}

		Ok(OrderedEntries(entries))
	}
}

/// Format-agnostic buffer for a settings block, needed because a block is
/// only known to be structured once all of its keys have been seen.
#[derive(Debug, Clone, PartialEq)]
enum Node {
	Value(SettingValue),
	Map(OrderedEntries<Node>),
}

impl<'de> Deserialize<'de> for Node {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_any(NodeVisitor)
	}
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
	type Value = Node;

	fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
		formatter.write_str("a build setting value or a settings mapping")
	}

	fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
		Ok(Node::Map(OrderedEntries::default()))
	}

	fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
		Ok(Node::Map(OrderedEntries::default()))
	}

	fn visit_bool<E: serde::de::Error>(self, value: bool) -> Result<Self::Value, E> {
		SettingValueVisitor.visit_bool(value).map(Node::Value)
	}

	fn visit_i64<E: serde::de::Error>(self, value: i64) -> Result<Self::Value, E> {
		SettingValueVisitor.visit_i64(value).map(Node::Value)
	}

	fn visit_u64<E: serde::de::Error>(self, value: u64) -> Result<Self::Value, E> {
		SettingValueVisitor.visit_u64(value).map(Node::Value)
	}

	fn visit_f64<E: serde::de::Error>(self, value: f64) -> Result<Self::Value, E> {
		SettingValueVisitor.visit_f64(value).map(Node::Value)
	}

	fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<Self::Value, E> {
		SettingValueVisitor.visit_str(value).map(Node::Value)
	}

	fn visit_string<E: serde::de::Error>(self, value: String) -> Result<Self::Value, E> {
		SettingValueVisitor.visit_string(value).map(Node::Value)
	}

	fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
		SettingValueVisitor.visit_seq(seq).map(Node::Value)
	}

	fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
		OrderedEntriesVisitor(PhantomData).visit_map(map).map(Node::Map)
	}
}
