//! In-process code lens host.
//!
//! The host keeps the set of registered [`CodeLensProvider`]s and answers render
//! requests by asking every provider whose [`DocumentSelector`] matches the
//! document. Registering returns a [`Registration`] that removes the provider
//! again when disposed or dropped.

mod selector;

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use lsp_types::CodeLens;
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub use self::selector::DocumentSelector;
use crate::document::TextDocument;

/// Type-erased provider error as seen by the host.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Render contract for code lens suppliers.
#[async_trait]
pub trait CodeLensProvider: Send + Sync {
	/// Returns the lenses for `document`, or `None` when there are none.
	///
	/// `token` is cancelled when the host no longer needs the result.
	async fn provide_code_lenses(&self, document: &TextDocument, token: &CancellationToken) -> Result<Option<Vec<CodeLens>>, BoxError>;
}

struct Entry {
	id: u64,
	selector: DocumentSelector,
	provider: Arc<dyn CodeLensProvider>,
}

#[derive(Default)]
struct HostState {
	/// Registered providers in registration order.
	entries: Vec<Entry>,
	next_id: u64,
}

/// Registration point for code lens providers.
///
/// Cheap to clone; clones share the same provider set.
#[derive(Clone, Default)]
pub struct LensHost {
	state: Arc<RwLock<HostState>>,
}

impl LensHost {
	/// Creates a host with no providers.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `provider` for documents matching `selector`.
	pub fn register(&self, selector: DocumentSelector, provider: Arc<dyn CodeLensProvider>) -> Registration {
		let mut state = self.state.write();
		let id = state.next_id;
		state.next_id += 1;
		debug!(id, selector = %selector, "registered code lens provider");
		state.entries.push(Entry { id, selector, provider });

		Registration {
			id,
			host: Arc::downgrade(&self.state),
			released: false,
		}
	}

	/// Number of registered providers.
	pub fn provider_count(&self) -> usize {
		self.state.read().entries.len()
	}

	/// Snapshot of the providers interested in `document`, in registration order.
	fn matching(&self, document: &TextDocument) -> Vec<(u64, Arc<dyn CodeLensProvider>)> {
		self.state
			.read()
			.entries
			.iter()
			.filter(|entry| entry.selector.matches(document))
			.map(|entry| (entry.id, entry.provider.clone()))
			.collect()
	}

	/// Collects the lenses of every matching provider.
	///
	/// A failing provider contributes nothing for this pass. Lenses are ordered
	/// by start position; lenses starting at the same position keep provider
	/// order. Returns nothing once `token` is cancelled.
	pub async fn provide_code_lenses(&self, document: &TextDocument, token: &CancellationToken) -> Vec<CodeLens> {
		let mut lenses = Vec::new();

		for (id, provider) in self.matching(document) {
			if token.is_cancelled() {
				debug!(uri = document.uri.as_str(), "code lens request cancelled");
				return Vec::new();
			}
			match provider.provide_code_lenses(document, token).await {
				Ok(Some(items)) => lenses.extend(items),
				Ok(None) => {}
				Err(error) => warn!(id, uri = document.uri.as_str(), %error, "code lens provider failed"),
			}
		}

		lenses.sort_by_key(|lens| (lens.range.start.line, lens.range.start.character));
		lenses
	}
}

/// Handle keeping a provider registered with a [`LensHost`].
///
/// Released by [`dispose`](Self::dispose) or on drop, whichever comes first.
#[derive(Debug)]
pub struct Registration {
	id: u64,
	host: Weak<RwLock<HostState>>,
	released: bool,
}

impl Registration {
	/// Host-assigned identifier.
	pub fn id(&self) -> u64 {
		self.id
	}

	/// Returns true while the provider is still registered.
	pub fn is_active(&self) -> bool {
		!self.released && self.host.upgrade().is_some_and(|state| state.read().entries.iter().any(|e| e.id == self.id))
	}

	/// Unregisters the provider. Subsequent calls do nothing.
	pub fn dispose(&mut self) {
		if std::mem::replace(&mut self.released, true) {
			return;
		}
		let Some(state) = self.host.upgrade() else {
			return;
		};
		// Dropped outside the lock: the provider may own further registrations.
		let removed = {
			let mut state = state.write();
			let index = state.entries.iter().position(|entry| entry.id == self.id);
			index.map(|index| state.entries.remove(index))
		};
		if removed.is_some() {
			debug!(id = self.id, "unregistered code lens provider");
		}
	}
}

impl Drop for Registration {
	fn drop(&mut self) {
		self.dispose();
	}
}
