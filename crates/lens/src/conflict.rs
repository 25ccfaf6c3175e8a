use lsp_types::Range;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// A merge-conflict block reported by a [`ConflictTracker`](crate::ConflictTracker).
///
/// The provider reads nothing but [`range`](Self::range); the value itself is
/// handed back verbatim as a command argument so the command handler can locate
/// the block again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
	/// Range covering the whole block, from the `<<<<<<<` line to the `>>>>>>>` line.
	pub range: Range,
}

impl Conflict {
	/// Creates a conflict spanning `range`.
	pub const fn new(range: Range) -> Self {
		Self { range }
	}

	/// JSON form passed as a command argument; [`Deserialize`] accepts it back.
	pub fn to_argument(&self) -> Value {
		let Range { start, end } = self.range;
		json!({
			"range": {
				"start": { "line": start.line, "character": start.character },
				"end": { "line": end.line, "character": end.character },
			}
		})
	}
}
