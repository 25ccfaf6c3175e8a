use async_trait::async_trait;

use crate::conflict::Conflict;
use crate::document::TextDocument;

/// Source of the merge conflicts present in a document.
///
/// Implementations own detection and caching. The lens provider calls
/// [`get_conflicts`](Self::get_conflicts) once per render request and passes the
/// error through untouched.
#[async_trait]
pub trait ConflictTracker: Send + Sync {
	/// Error reported when conflicts cannot be computed.
	type Error: std::error::Error + Send + Sync + 'static;

	/// Returns the conflicts in `document`, in document order.
	///
	/// `Ok(None)` and `Ok(Some(vec![]))` both mean "no conflicts".
	async fn get_conflicts(&self, document: &TextDocument) -> Result<Option<Vec<Conflict>>, Self::Error>;
}
