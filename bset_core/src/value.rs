use std::collections::BTreeMap;
use std::fmt;

use derive_more::Deref;
use derive_more::DerefMut;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::de::SeqAccess;
use serde::de::Visitor;

/// A single build setting value.
///
/// Project descriptions and preset files freely mix strings, booleans,
/// numbers and lists. Numbers are kept as their decimal text so that
/// `SWIFT_VERSION: 5` and `SWIFT_VERSION: "5"` resolve to the same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
	String(String),
	Bool(bool),
	List(Vec<String>),
}

impl SettingValue {
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(value) => Some(value.as_str()),
			_ => None,
		}
	}

	/// Interpret the value as a boolean setting.
	///
	/// Native booleans pass through. A string is `true` only when it is the
	/// literal `YES`; every other string is `false`. Lists have no boolean
	/// reading.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(value) => Some(*value),
			Self::String(value) => Some(value == "YES"),
			Self::List(_) => None,
		}
	}
}

impl fmt::Display for SettingValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::String(value) => f.write_str(value),
			Self::Bool(true) => f.write_str("YES"),
			Self::Bool(false) => f.write_str("NO"),
			Self::List(values) => f.write_str(&values.join(" ")),
		}
	}
}

impl From<&str> for SettingValue {
	fn from(value: &str) -> Self {
		Self::String(value.to_string())
	}
}

impl From<String> for SettingValue {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<bool> for SettingValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<Vec<String>> for SettingValue {
	fn from(value: Vec<String>) -> Self {
		Self::List(value)
	}
}

impl From<Vec<&str>> for SettingValue {
	fn from(value: Vec<&str>) -> Self {
		Self::List(value.into_iter().map(ToString::to_string).collect())
	}
}

impl<'de> Deserialize<'de> for SettingValue {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_any(SettingValueVisitor)
	}
}

pub(crate) struct SettingValueVisitor;

impl<'de> Visitor<'de> for SettingValueVisitor {
	type Value = SettingValue;

	fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
		formatter.write_str("a string, boolean, number or list of strings")
	}

	fn visit_bool<E: serde::de::Error>(self, value: bool) -> Result<Self::Value, E> {
		Ok(SettingValue::Bool(value))
	}

	fn visit_i64<E: serde::de::Error>(self, value: i64) -> Result<Self::Value, E> {
		Ok(SettingValue::String(value.to_string()))
	}

	fn visit_u64<E: serde::de::Error>(self, value: u64) -> Result<Self::Value, E> {
		Ok(SettingValue::String(value.to_string()))
	}

	fn visit_f64<E: serde::de::Error>(self, value: f64) -> Result<Self::Value, E> {
		Ok(SettingValue::String(value.to_string()))
	}

	fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<Self::Value, E> {
		Ok(SettingValue::String(value.to_string()))
	}

	fn visit_string<E: serde::de::Error>(self, value: String) -> Result<Self::Value, E> {
		Ok(SettingValue::String(value))
	}

	fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
		let mut values = Vec::new();
		while let Some(value) = seq.next_element::<SettingValue>()? {
			values.push(value.to_string());
		}

		Ok(SettingValue::List(values))
	}
}

/// A flat map of build setting keys to values.
///
/// Keys are case-sensitive. Merging is right-biased: every entry of the
/// applied map replaces the entry with the same key, lists included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Deref, DerefMut)]
#[serde(transparent)]
pub struct BuildSettings(BTreeMap<String, SettingValue>);

impl BuildSettings {
	pub fn new() -> Self {
		Self::default()
	}

	/// Apply `other` on top of `self`; entries in `other` win.
	pub fn merge(&mut self, other: &BuildSettings) {
		for (key, value) in other.iter() {
			self.0.insert(key.clone(), value.clone());
		}
	}

	#[must_use]
	pub fn merged(mut self, other: &BuildSettings) -> Self {
		self.merge(other);
		self
	}

	/// Remove every entry that refers to one of `keys`.
	///
	/// For each key this removes the key itself, its quoted spelling
	/// (`"KEY"`) and its conditional spellings (`KEY[sdk=iphone*]`), so that
	/// a value defined by an override file is never shadowed.
	pub fn remove_overridden<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) {
		let keys: Vec<&str> = keys.into_iter().collect();
		self.0
			.retain(|candidate, _| !keys.iter().any(|key| refers_to(candidate, key)));
	}

	pub fn into_inner(self) -> BTreeMap<String, SettingValue> {
		self.0
	}
}

impl<K: Into<String>, V: Into<SettingValue>> FromIterator<(K, V)> for BuildSettings {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self(
			iter.into_iter()
				.map(|(key, value)| (key.into(), value.into()))
				.collect(),
		)
	}
}

impl From<BTreeMap<String, SettingValue>> for BuildSettings {
	fn from(map: BTreeMap<String, SettingValue>) -> Self {
		Self(map)
	}
}

/// The quoted spelling of a setting key, as written in some project files.
pub fn quoted(key: &str) -> String {
	format!("\"{key}\"")
}

fn unquoted(candidate: &str) -> &str {
	candidate
		.strip_prefix('"')
		.and_then(|rest| rest.strip_suffix('"'))
		.unwrap_or(candidate)
}

fn refers_to(candidate: &str, key: &str) -> bool {
	let candidate = unquoted(candidate);
	candidate == key
		|| candidate
			.strip_prefix(key)
			.is_some_and(|rest| rest.starts_with('['))
}
