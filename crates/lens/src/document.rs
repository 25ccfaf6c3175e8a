use std::path::PathBuf;
use std::str::FromStr;

use lsp_types::Uri;

/// Handle to an open text document as seen by lens providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
	/// Document URI.
	pub uri: Uri,
	/// Language identifier, if the editor resolved one.
	pub language_id: Option<String>,
	/// Editor-side version, bumped on every change.
	pub version: i32,
}

impl TextDocument {
	/// Creates a handle for `uri` at version 0 with no language.
	pub fn new(uri: Uri) -> Self {
		Self {
			uri,
			language_id: None,
			version: 0,
		}
	}

	/// Sets the language identifier.
	pub fn with_language(mut self, language_id: impl Into<String>) -> Self {
		self.language_id = Some(language_id.into());
		self
	}

	/// Sets the document version.
	pub fn with_version(mut self, version: i32) -> Self {
		self.version = version;
		self
	}

	/// Filesystem path of the document.
	///
	/// Returns `None` if the URI is not a `file://` URI.
	pub fn path(&self) -> Option<PathBuf> {
		let url = url::Url::from_str(self.uri.as_str()).ok()?;
		url.to_file_path().ok()
	}
}
