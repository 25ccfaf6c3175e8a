//! Code lens annotations for merge-conflict regions.
//!
//! This crate turns the conflict ranges reported by a [`ConflictTracker`] into
//! [`CodeLens`](lsp_types::CodeLens) values offering the four conflict actions:
//! accept current, accept incoming, accept both, and compare. It never parses
//! conflict markers and never edits the document; detection belongs to the
//! tracker and the actions belong to whoever handles the emitted commands.
//!
//! The pieces:
//!
//! * [`MergeConflictLensProvider`]: the provider. Registers itself with a host,
//!   follows configuration updates and emits four lenses per conflict.
//! * [`LensHost`]: an in-process registration point that dispatches render
//!   requests to the providers whose [`DocumentSelector`] matches a document.
//! * [`LensAction`] / [`ConflictCommand`]: the command table and the decoder for
//!   commands coming back from the editor.
//! * [`Localizer`]: resolves lens titles.
//! * [`LensConfig`]: the `enable-code-lens` switch and its siblings, loadable from TOML.
#![warn(missing_docs)]

/// Re-export of the [`lsp_types`] dependency of this crate.
pub use lsp_types;

pub mod command;
pub mod config;
mod conflict;
mod document;
pub mod host;
pub mod l10n;
mod provider;
mod tracker;

pub use command::{CommandError, ConflictCommand, ConflictOrigin, KNOWN_CONFLICT, LensAction};
pub use config::{ConfigError, LensConfig};
pub use conflict::Conflict;
pub use document::TextDocument;
pub use host::{BoxError, CodeLensProvider, DocumentSelector, LensHost, Registration};
pub use l10n::{DefaultLocalizer, Localizer, MessageBundle};
pub use provider::MergeConflictLensProvider;
pub use tracker::ConflictTracker;

/// A convenient type alias for `Result` with `E` = [`enum@crate::Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Possible errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	/// Loading or parsing configuration failed.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// A command routed back from the editor could not be decoded.
	#[error(transparent)]
	Command(#[from] CommandError),
	/// A document selector pattern is not a valid glob.
	#[error("invalid document selector `{pattern}`: {source}")]
	Selector {
		/// The offending pattern.
		pattern: String,
		/// Underlying glob error.
		#[source]
		source: globset::Error,
	},
}
