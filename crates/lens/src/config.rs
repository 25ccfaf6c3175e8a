//! Merge-conflict extension configuration.
//!
//! Settings may sit at the top level of a TOML document or under a
//! `[merge-conflict]` table:
//!
//! ```toml
//! [merge-conflict]
//! enable-code-lens = true
//! enable-decorations = false
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Errors raised while loading configuration files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// The file could not be read.
	#[error("failed to read {}: {source}", path.display())]
	Read {
		/// Path of the file.
		path: PathBuf,
		/// Underlying I/O error.
		#[source]
		source: std::io::Error,
	},
	/// The document is not valid TOML or has mistyped fields.
	#[error("failed to parse {origin}: {source}")]
	Parse {
		/// Path of the file, or `<string>` for in-memory sources.
		origin: String,
		/// Underlying TOML error.
		#[source]
		source: toml::de::Error,
	},
}

/// Merge-conflict settings.
///
/// Only [`enable_code_lens`](Self::enable_code_lens) is read by the lens
/// provider; the other flags belong to the decoration and overview-ruler
/// features that share this configuration block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LensConfig {
	/// Show accept/compare code lenses above conflicts.
	pub enable_code_lens: bool,
	/// Highlight conflict sections in the editor.
	pub enable_decorations: bool,
	/// Mark conflicts in the overview ruler.
	pub enable_editor_overview: bool,
}

impl Default for LensConfig {
	fn default() -> Self {
		Self {
			enable_code_lens: true,
			enable_decorations: true,
			enable_editor_overview: true,
		}
	}
}

#[derive(Deserialize)]
struct Document {
	#[serde(rename = "merge-conflict")]
	section: Option<LensConfig>,
	#[serde(flatten)]
	top_level: LensConfig,
}

impl LensConfig {
	/// Configuration with code lenses turned off.
	pub fn disabled() -> Self {
		Self {
			enable_code_lens: false,
			..Self::default()
		}
	}

	/// Parses settings from a TOML string.
	///
	/// A `[merge-conflict]` table wins over top-level keys when both are present.
	pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
		Self::parse(content, "<string>".to_string())
	}

	/// Reads and parses settings from a TOML file.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
			path: path.to_path_buf(),
			source,
		})?;
		Self::parse(&content, path.display().to_string())
	}

	fn parse(content: &str, origin: String) -> Result<Self, ConfigError> {
		let doc: Document = toml::from_str(content).map_err(|source| ConfigError::Parse { origin, source })?;
		Ok(doc.section.unwrap_or(doc.top_level))
	}
}
