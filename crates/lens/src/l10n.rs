//! Lens title localization.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::config::ConfigError;

/// Resolves a message key to a display string.
pub trait Localizer: Send + Sync {
	/// Returns the text for `key`, or `default` when there is no translation.
	fn localize(&self, key: &str, default: &str) -> String;
}

/// Localizer that always returns the default text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLocalizer;

impl Localizer for DefaultLocalizer {
	fn localize(&self, _key: &str, default: &str) -> String {
		default.to_string()
	}
}

/// Key-to-text table, typically loaded from a TOML message file:
///
/// ```toml
/// acceptCurrentChange = "Aktuelle Änderung akzeptieren"
/// compareChanges = "Änderungen vergleichen"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageBundle {
	messages: HashMap<String, String>,
}

impl MessageBundle {
	/// Creates an empty bundle.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds or replaces a message.
	pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
		self.messages.insert(key.into(), text.into());
	}

	/// Number of messages in the bundle.
	pub fn len(&self) -> usize {
		self.messages.len()
	}

	/// Returns true if the bundle has no messages.
	pub fn is_empty(&self) -> bool {
		self.messages.is_empty()
	}

	/// Parses a flat `key = "text"` TOML table.
	pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
		Self::parse(content, "<string>".to_string())
	}

	/// Reads a message file.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
			path: path.to_path_buf(),
			source,
		})?;
		Self::parse(&content, path.display().to_string())
	}

	fn parse(content: &str, origin: String) -> Result<Self, ConfigError> {
		let messages = toml::from_str(content).map_err(|source| ConfigError::Parse { origin, source })?;
		Ok(Self { messages })
	}
}

impl FromIterator<(String, String)> for MessageBundle {
	fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
		Self {
			messages: iter.into_iter().collect(),
		}
	}
}

impl Localizer for MessageBundle {
	fn localize(&self, key: &str, default: &str) -> String {
		match self.messages.get(key) {
			Some(text) => text.clone(),
			None => {
				debug!(key, "missing translation, using default");
				default.to_string()
			}
		}
	}
}
