//! Merge-conflict code lens provider.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use lsp_types::{CodeLens, Position, Range};
use parking_lot::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::command::LensAction;
use crate::config::LensConfig;
use crate::conflict::Conflict;
use crate::document::TextDocument;
use crate::host::{BoxError, CodeLensProvider, DocumentSelector, LensHost, Registration};
use crate::l10n::{DefaultLocalizer, Localizer};
use crate::tracker::ConflictTracker;

/// Annotates merge conflicts with accept/compare code lenses.
///
/// Lifecycle: [`begin`](Self::begin) registers the provider with a [`LensHost`],
/// [`configuration_updated`](Self::configuration_updated) swaps the cached
/// configuration, [`dispose`](Self::dispose) unregisters it for good.
///
/// The cached configuration and the registration handles are the only state
/// kept between requests; lenses are rebuilt from the tracker every time.
pub struct MergeConflictLensProvider<T> {
	tracker: Arc<T>,
	localizer: Arc<dyn Localizer>,
	config: RwLock<Option<LensConfig>>,
	registrations: Mutex<Vec<Registration>>,
	disposed: AtomicBool,
}

impl<T: ConflictTracker + 'static> MergeConflictLensProvider<T> {
	/// Creates a provider backed by `tracker`, with English titles.
	pub fn new(tracker: Arc<T>) -> Self {
		Self {
			tracker,
			localizer: Arc::new(DefaultLocalizer),
			config: RwLock::new(None),
			registrations: Mutex::new(Vec::new()),
			disposed: AtomicBool::new(false),
		}
	}

	/// Replaces the localizer used for lens titles.
	pub fn with_localizer(mut self, localizer: Arc<dyn Localizer>) -> Self {
		self.localizer = localizer;
		self
	}

	/// Stores `config` and registers the provider with `host` for all documents.
	///
	/// Each call adds another registration. Does nothing once disposed.
	pub fn begin(self: &Arc<Self>, host: &LensHost, config: LensConfig) {
		if self.disposed.load(Ordering::Acquire) {
			warn!("begin called on a disposed merge conflict lens provider");
			return;
		}
		*self.config.write() = Some(config);
		let registration = host.register(DocumentSelector::all(), self.clone());
		debug!(id = registration.id(), enabled = config.enable_code_lens, "merge conflict lenses registered");
		self.registrations.lock().push(registration);
	}

	/// Replaces the cached configuration.
	///
	/// Lenses already shown are not refreshed; the host re-renders.
	pub fn configuration_updated(&self, config: LensConfig) {
		debug!(enabled = config.enable_code_lens, "merge conflict lens configuration updated");
		*self.config.write() = Some(config);
	}

	/// Releases every registration. Safe to call more than once.
	pub fn dispose(&self) {
		if self.disposed.swap(true, Ordering::AcqRel) {
			return;
		}
		let registrations = std::mem::take(&mut *self.registrations.lock());
		for mut registration in registrations {
			registration.dispose();
		}
	}

	/// Returns true while at least one registration is live.
	pub fn is_registered(&self) -> bool {
		self.registrations.lock().iter().any(Registration::is_active)
	}

	/// Builds the lenses for `document`.
	///
	/// Returns `Ok(None)` when lenses are disabled, the provider is disposed, or
	/// the tracker reports no conflicts. Otherwise returns four lenses per
	/// conflict in tracker order. Tracker errors are returned as is.
	///
	/// `_token` is accepted for the render contract but not consulted.
	pub async fn provide_annotations(&self, document: &TextDocument, _token: &CancellationToken) -> Result<Option<Vec<CodeLens>>, T::Error> {
		if self.disposed.load(Ordering::Acquire) {
			return Ok(None);
		}
		let enabled = self.config.read().is_some_and(|config| config.enable_code_lens);
		if !enabled {
			return Ok(None);
		}

		let conflicts = match self.tracker.get_conflicts(document).await? {
			Some(conflicts) if !conflicts.is_empty() => conflicts,
			_ => return Ok(None),
		};

		let lenses: Vec<CodeLens> = conflicts.iter().flat_map(|conflict| self.conflict_lenses(conflict)).collect();
		debug!(uri = document.uri.as_str(), conflicts = conflicts.len(), lenses = lenses.len(), "provided merge conflict lenses");
		Ok(Some(lenses))
	}

	/// The four lenses of one conflict, in [`LensAction::ALL`] order.
	fn conflict_lenses<'a>(&'a self, conflict: &'a Conflict) -> impl Iterator<Item = CodeLens> + 'a {
		LensAction::ALL.into_iter().zip(0..).map(move |(action, column)| {
			let title = self.localizer.localize(action.message_key(), action.default_title());
			CodeLens {
				range: anchor(conflict.range, column),
				command: Some(action.command(title, conflict)),
				data: None,
			}
		})
	}
}

/// Shifts the start of `range` right by `column` characters on the same line.
///
/// Lenses anchored at distinct columns keep their left-to-right order in hosts
/// that sort same-line lenses by position.
fn anchor(range: Range, column: u32) -> Range {
	Range {
		start: Position::new(range.start.line, range.start.character.saturating_add(column)),
		end: range.end,
	}
}

#[async_trait]
impl<T: ConflictTracker + 'static> CodeLensProvider for MergeConflictLensProvider<T> {
	async fn provide_code_lenses(&self, document: &TextDocument, token: &CancellationToken) -> Result<Option<Vec<CodeLens>>, BoxError> {
		self.provide_annotations(document, token).await.map_err(BoxError::from)
	}
}

#[cfg(test)]
mod tests;
