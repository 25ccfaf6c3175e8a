use std::fmt;

use globset::{GlobBuilder, GlobMatcher};

use crate::document::TextDocument;
use crate::{Error, Result};

/// Pattern matching every document.
const ALL_DOCUMENTS: &str = "**/*";

#[derive(Debug, Clone)]
enum PathFilter {
	Any,
	Glob(GlobMatcher),
}

/// Decides which documents a provider is asked about.
///
/// Glob patterns are matched against the filesystem path of `file://`
/// documents and against the URI path otherwise. `*` does not cross `/`.
#[derive(Debug, Clone)]
pub struct DocumentSelector {
	pattern: String,
	path: PathFilter,
	language: Option<String>,
}

impl DocumentSelector {
	/// Selects every document, whatever its scheme or language.
	pub fn all() -> Self {
		Self {
			pattern: ALL_DOCUMENTS.to_string(),
			path: PathFilter::Any,
			language: None,
		}
	}

	/// Selects documents whose path matches `pattern`.
	///
	/// `**/*` is equivalent to [`all`](Self::all).
	pub fn pattern(pattern: &str) -> Result<Self> {
		if pattern == ALL_DOCUMENTS {
			return Ok(Self::all());
		}
		let glob = GlobBuilder::new(pattern).literal_separator(true).build().map_err(|source| Error::Selector {
			pattern: pattern.to_string(),
			source,
		})?;
		Ok(Self {
			pattern: pattern.to_string(),
			path: PathFilter::Glob(glob.compile_matcher()),
			language: None,
		})
	}

	/// Additionally requires the document language to be `language`.
	pub fn with_language(mut self, language: impl Into<String>) -> Self {
		self.language = Some(language.into());
		self
	}

	/// Returns true if `document` is selected.
	pub fn matches(&self, document: &TextDocument) -> bool {
		if let Some(language) = &self.language
			&& document.language_id.as_deref() != Some(language.as_str())
		{
			return false;
		}

		match &self.path {
			PathFilter::Any => true,
			PathFilter::Glob(matcher) => match document.path() {
				Some(path) => matcher.is_match(path),
				None => url::Url::parse(document.uri.as_str()).is_ok_and(|url| matcher.is_match(url.path())),
			},
		}
	}
}

impl fmt::Display for DocumentSelector {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.language {
			Some(language) => write!(f, "{} ({language})", self.pattern),
			None => f.write_str(&self.pattern),
		}
	}
}
