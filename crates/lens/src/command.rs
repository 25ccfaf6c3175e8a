//! Conflict commands attached to code lenses.
//!
//! Each lens carries an LSP [`Command`] whose identifier names one of the four
//! [`LensAction`]s. The accept actions pass `["known-conflict", conflict]`, the
//! compare action passes `[conflict]`. [`ConflictCommand::decode`] reverses this
//! for whoever executes the command.

use lsp_types::Command;
use serde_json::Value;

use crate::conflict::Conflict;

/// Discriminator placed before the conflict argument of the accept commands.
///
/// Marks a conflict that came from a lens rather than one picked from the cursor.
pub const KNOWN_CONFLICT: &str = "known-conflict";

/// Errors raised while decoding a conflict command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
	/// The command identifier is not one of the merge-conflict commands.
	#[error("unknown merge-conflict command `{0}`")]
	UnknownCommand(String),
	/// The argument list does not have the expected shape.
	#[error("malformed arguments for `{command}`: {reason}")]
	MalformedArguments {
		/// Command identifier.
		command: String,
		/// What was wrong.
		reason: String,
	},
	/// The conflict argument did not deserialize.
	#[error("invalid conflict argument for `{command}`: {source}")]
	InvalidConflict {
		/// Command identifier.
		command: String,
		/// Underlying decode error.
		#[source]
		source: serde_json::Error,
	},
}

/// One of the four actions offered per conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LensAction {
	/// Keep the current (ours) side.
	AcceptCurrent,
	/// Keep the incoming (theirs) side.
	AcceptIncoming,
	/// Keep both sides, current first.
	AcceptBoth,
	/// Open a diff of both sides.
	Compare,
}

impl LensAction {
	/// All actions in the order their lenses are laid out.
	pub const ALL: [Self; 4] = [Self::AcceptCurrent, Self::AcceptIncoming, Self::AcceptBoth, Self::Compare];

	/// Command identifier understood by the command handlers.
	pub const fn command_id(self) -> &'static str {
		match self {
			Self::AcceptCurrent => "merge-conflict.accept.current",
			Self::AcceptIncoming => "merge-conflict.accept.incoming",
			Self::AcceptBoth => "merge-conflict.accept.both",
			Self::Compare => "merge-conflict.compare",
		}
	}

	/// Localization key of the lens title.
	pub const fn message_key(self) -> &'static str {
		match self {
			Self::AcceptCurrent => "acceptCurrentChange",
			Self::AcceptIncoming => "acceptIncomingChange",
			Self::AcceptBoth => "acceptBothChanges",
			Self::Compare => "compareChanges",
		}
	}

	/// English title used when no translation is available.
	pub const fn default_title(self) -> &'static str {
		match self {
			Self::AcceptCurrent => "Accept current change",
			Self::AcceptIncoming => "Accept incoming change",
			Self::AcceptBoth => "Accept both changes",
			Self::Compare => "Compare changes",
		}
	}

	/// Looks up the action for a command identifier.
	pub fn from_command_id(id: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|action| action.command_id() == id)
	}

	/// Whether the command carries the [`KNOWN_CONFLICT`] discriminator.
	pub const fn is_accept(self) -> bool {
		!matches!(self, Self::Compare)
	}

	/// Command arguments for `conflict`.
	pub fn arguments(self, conflict: &Conflict) -> Vec<Value> {
		if self.is_accept() {
			vec![Value::String(KNOWN_CONFLICT.to_string()), conflict.to_argument()]
		} else {
			vec![conflict.to_argument()]
		}
	}

	/// Builds the full command with the given title.
	pub fn command(self, title: String, conflict: &Conflict) -> Command {
		Command {
			title,
			command: self.command_id().to_string(),
			arguments: Some(self.arguments(conflict)),
		}
	}
}

/// Where the conflict of a decoded command came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictOrigin {
	/// Tagged with [`KNOWN_CONFLICT`]: the lens named the conflict.
	KnownConflict,
	/// Passed untagged, as the compare lens does.
	Untagged,
	/// No conflict argument; the handler should use the cursor position.
	Cursor,
}

/// A merge-conflict command decoded from an LSP [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictCommand {
	/// The requested action.
	pub action: LensAction,
	/// How the conflict was designated.
	pub origin: ConflictOrigin,
	/// The conflict, unless [`ConflictOrigin::Cursor`].
	pub conflict: Option<Conflict>,
}

impl ConflictCommand {
	/// Decodes a command emitted by a conflict lens or invoked without arguments.
	pub fn decode(command: &Command) -> Result<Self, CommandError> {
		let id = command.command.as_str();
		let action = LensAction::from_command_id(id).ok_or_else(|| CommandError::UnknownCommand(id.to_string()))?;
		let args = command.arguments.as_deref().unwrap_or_default();

		let malformed = |reason: &str| CommandError::MalformedArguments {
			command: id.to_string(),
			reason: reason.to_string(),
		};
		let conflict_from = |value: &Value| {
			serde_json::from_value::<Conflict>(value.clone()).map_err(|source| CommandError::InvalidConflict {
				command: id.to_string(),
				source,
			})
		};

		let (origin, conflict) = match args {
			[] => (ConflictOrigin::Cursor, None),
			[Value::String(tag), value] if tag == KNOWN_CONFLICT => (ConflictOrigin::KnownConflict, Some(conflict_from(value)?)),
			[Value::String(tag), ..] => return Err(malformed(&format!("unexpected discriminator `{tag}`"))),
			[value] => (ConflictOrigin::Untagged, Some(conflict_from(value)?)),
			_ => return Err(malformed(&format!("expected at most 2 arguments, got {}", args.len()))),
		};

		Ok(Self { action, origin, conflict })
	}
}
