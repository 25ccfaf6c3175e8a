use std::sync::atomic::AtomicUsize;

use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;
use crate::l10n::MessageBundle;

#[derive(Debug, thiserror::Error)]
#[error("tracker unavailable")]
struct TrackerDown;

enum Reply {
	Absent,
	Conflicts(Vec<Conflict>),
	Fail,
}

struct MockTracker {
	reply: Reply,
	calls: AtomicUsize,
}

impl MockTracker {
	fn new(reply: Reply) -> Arc<Self> {
		Arc::new(Self {
			reply,
			calls: AtomicUsize::new(0),
		})
	}

	fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl ConflictTracker for MockTracker {
	type Error = TrackerDown;

	async fn get_conflicts(&self, _document: &TextDocument) -> Result<Option<Vec<Conflict>>, TrackerDown> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		match &self.reply {
			Reply::Absent => Ok(None),
			Reply::Conflicts(conflicts) => Ok(Some(conflicts.clone())),
			Reply::Fail => Err(TrackerDown),
		}
	}
}

fn document() -> TextDocument {
	TextDocument::new("file:///project/src/lib.rs".parse().unwrap())
}

fn conflict(line: u32, character: u32, end_line: u32) -> Conflict {
	Conflict::new(Range::new(Position::new(line, character), Position::new(end_line, 7)))
}

fn enabled() -> LensConfig {
	LensConfig::default()
}

fn started(tracker: Arc<MockTracker>, config: LensConfig) -> (LensHost, Arc<MergeConflictLensProvider<MockTracker>>) {
	let host = LensHost::new();
	let provider = Arc::new(MergeConflictLensProvider::new(tracker));
	provider.begin(&host, config);
	(host, provider)
}

#[tokio::test]
async fn test_disabled_config_skips_tracker() {
	let tracker = MockTracker::new(Reply::Conflicts(vec![conflict(1, 0, 5)]));
	let (_host, provider) = started(tracker.clone(), LensConfig::disabled());

	let lenses = provider.provide_annotations(&document(), &CancellationToken::new()).await.unwrap();

	assert_eq!(lenses, None);
	assert_eq!(tracker.calls(), 0);
}

#[tokio::test]
async fn test_missing_config_skips_tracker() {
	let tracker = MockTracker::new(Reply::Conflicts(vec![conflict(1, 0, 5)]));
	let provider = MergeConflictLensProvider::new(tracker.clone());

	let lenses = provider.provide_annotations(&document(), &CancellationToken::new()).await.unwrap();

	assert_eq!(lenses, None);
	assert_eq!(tracker.calls(), 0);
}

#[tokio::test]
async fn test_no_conflicts_yields_nothing() {
	for reply in [Reply::Absent, Reply::Conflicts(Vec::new())] {
		let tracker = MockTracker::new(reply);
		let (_host, provider) = started(tracker.clone(), enabled());

		let lenses = provider.provide_annotations(&document(), &CancellationToken::new()).await.unwrap();

		assert_eq!(lenses, None);
		assert_eq!(tracker.calls(), 1);
	}
}

#[tokio::test]
async fn test_single_conflict_layout() {
	let c = conflict(12, 0, 20);
	let tracker = MockTracker::new(Reply::Conflicts(vec![c.clone()]));
	let (_host, provider) = started(tracker, enabled());

	let lenses = provider.provide_annotations(&document(), &CancellationToken::new()).await.unwrap().unwrap();

	assert_eq!(lenses.len(), 4);
	let starts: Vec<Position> = lenses.iter().map(|lens| lens.range.start).collect();
	assert_eq!(starts, vec![Position::new(12, 0), Position::new(12, 1), Position::new(12, 2), Position::new(12, 3)]);
	assert!(lenses.iter().all(|lens| lens.range.end == Position::new(20, 7)));

	let commands: Vec<_> = lenses.iter().map(|lens| lens.command.clone().unwrap()).collect();
	let ids: Vec<&str> = commands.iter().map(|cmd| cmd.command.as_str()).collect();
	assert_eq!(
		ids,
		vec!["merge-conflict.accept.current", "merge-conflict.accept.incoming", "merge-conflict.accept.both", "merge-conflict.compare"]
	);
	let titles: Vec<&str> = commands.iter().map(|cmd| cmd.title.as_str()).collect();
	assert_eq!(titles, vec!["Accept current change", "Accept incoming change", "Accept both changes", "Compare changes"]);

	let tagged = Some(vec![json!("known-conflict"), serde_json::to_value(&c).unwrap()]);
	assert_eq!(commands[0].arguments, tagged);
	assert_eq!(commands[1].arguments, tagged);
	assert_eq!(commands[2].arguments, tagged);
	assert_eq!(commands[3].arguments, Some(vec![serde_json::to_value(&c).unwrap()]));
	assert!(lenses.iter().all(|lens| lens.data.is_none()));
}

#[tokio::test]
async fn test_multiple_conflicts_grouped_in_order() {
	let conflicts = vec![conflict(30, 4, 40), conflict(2, 0, 8), conflict(50, 0, 60)];
	let tracker = MockTracker::new(Reply::Conflicts(conflicts.clone()));
	let (_host, provider) = started(tracker, enabled());

	let lenses = provider.provide_annotations(&document(), &CancellationToken::new()).await.unwrap().unwrap();

	assert_eq!(lenses.len(), 4 * conflicts.len());
	for (group, conflict) in lenses.chunks(4).zip(&conflicts) {
		for (offset, (lens, action)) in group.iter().zip(LensAction::ALL).enumerate() {
			assert_eq!(lens.range.start.line, conflict.range.start.line);
			assert_eq!(lens.range.start.character, conflict.range.start.character + offset as u32);
			assert_eq!(lens.command.as_ref().unwrap().command, action.command_id());
		}
	}
}

#[tokio::test]
async fn test_tracker_error_propagates() {
	let tracker = MockTracker::new(Reply::Fail);
	let (_host, provider) = started(tracker, enabled());

	let result = provider.provide_annotations(&document(), &CancellationToken::new()).await;

	assert!(matches!(result, Err(TrackerDown)));
}

#[tokio::test]
async fn test_configuration_update_toggles_lenses() {
	let tracker = MockTracker::new(Reply::Conflicts(vec![conflict(0, 0, 4)]));
	let (_host, provider) = started(tracker.clone(), enabled());
	let token = CancellationToken::new();

	provider.configuration_updated(LensConfig::disabled());
	assert_eq!(provider.provide_annotations(&document(), &token).await.unwrap(), None);
	assert_eq!(tracker.calls(), 0);

	provider.configuration_updated(enabled());
	assert_eq!(provider.provide_annotations(&document(), &token).await.unwrap().map(|l| l.len()), Some(4));
	assert_eq!(tracker.calls(), 1);
}

#[tokio::test]
async fn test_cancelled_token_is_not_consulted() {
	let tracker = MockTracker::new(Reply::Conflicts(vec![conflict(3, 0, 9)]));
	let (_host, provider) = started(tracker, enabled());
	let token = CancellationToken::new();
	token.cancel();

	let lenses = provider.provide_annotations(&document(), &token).await.unwrap();

	assert_eq!(lenses.map(|l| l.len()), Some(4));
}

#[tokio::test]
async fn test_titles_use_localizer() {
	let bundle: MessageBundle = [("compareChanges".to_string(), "Änderungen vergleichen".to_string())].into_iter().collect();
	let tracker = MockTracker::new(Reply::Conflicts(vec![conflict(0, 0, 4)]));
	let provider = Arc::new(MergeConflictLensProvider::new(tracker).with_localizer(Arc::new(bundle)));
	provider.begin(&LensHost::new(), enabled());

	let lenses = provider.provide_annotations(&document(), &CancellationToken::new()).await.unwrap().unwrap();
	let titles: Vec<String> = lenses.into_iter().map(|lens| lens.command.unwrap().title).collect();

	assert_eq!(titles, vec!["Accept current change", "Accept incoming change", "Accept both changes", "Änderungen vergleichen"]);
}

#[tokio::test]
async fn test_dispose_releases_registration() {
	let tracker = MockTracker::new(Reply::Conflicts(vec![conflict(0, 0, 4)]));
	let (host, provider) = started(tracker.clone(), enabled());
	assert!(provider.is_registered());
	assert_eq!(host.provider_count(), 1);

	provider.dispose();

	assert!(!provider.is_registered());
	assert_eq!(host.provider_count(), 0);
	assert_eq!(provider.provide_annotations(&document(), &CancellationToken::new()).await.unwrap(), None);
	assert_eq!(tracker.calls(), 0);
	assert_eq!(Arc::strong_count(&provider), 1);
}

#[test]
fn test_dispose_twice_is_noop() {
	let (host, provider) = started(MockTracker::new(Reply::Absent), enabled());

	provider.dispose();
	provider.dispose();

	assert_eq!(host.provider_count(), 0);
}

#[test]
fn test_begin_twice_registers_twice() {
	let (host, provider) = started(MockTracker::new(Reply::Absent), enabled());
	provider.begin(&host, enabled());
	assert_eq!(host.provider_count(), 2);

	provider.dispose();
	assert_eq!(host.provider_count(), 0);
}

#[test]
fn test_begin_after_dispose_is_ignored() {
	let (host, provider) = started(MockTracker::new(Reply::Absent), enabled());
	provider.dispose();

	provider.begin(&host, enabled());

	assert_eq!(host.provider_count(), 0);
	assert!(!provider.is_registered());
}

#[test]
fn test_anchor_saturates() {
	let range = Range::new(Position::new(1, u32::MAX - 1), Position::new(2, 0));
	assert_eq!(anchor(range, 3).start, Position::new(1, u32::MAX));
}
