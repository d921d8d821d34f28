use std::path::PathBuf;

use tailor_contracts::assets::{
    fingerprint, AssetError, AssetStore, BackupStatus, RestoreStatus, SourceOrigin,
};
use tailor_contracts::events::{EventLog, SessionEvent};

use crate::describe::ClothingDescriber;
use crate::error::{EditError, FailureStage};
use crate::synthesize::TextureSynthesizer;

/// One iteration of the interactive loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditRequest {
    Image(PathBuf),
    Text(String),
}

impl EditRequest {
    fn kind(&self) -> &'static str {
        match self {
            Self::Image(_) => "image",
            Self::Text(_) => "text",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Describing,
    Confirming,
    Synthesizing,
    Committing,
    Failed,
}

impl PipelineState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Describing => "describing",
            Self::Confirming => "confirming",
            Self::Synthesizing => "synthesizing",
            Self::Committing => "committing",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Committed {
        description: String,
        raw_width: u32,
        raw_height: u32,
        resized: bool,
        backup_created: bool,
    },
    Cancelled {
        description: String,
    },
    Failed {
        stage: FailureStage,
        reason: String,
    },
}

impl EditOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// Gate between describing an upload and spending a synthesis call on it.
pub trait Confirm {
    fn confirm(&mut self, description: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, description: &str) -> bool {
        self(description)
    }
}

/// Drives one edit request through describe, confirm, synthesize and commit.
///
/// Every request ends back in `Idle`. The live texture is only written by the final
/// commit, after a canonical image is in hand, so any earlier failure leaves it as it was.
pub struct EditPipeline<D, S> {
    store: AssetStore,
    describer: D,
    synthesizer: S,
    events: EventLog,
    state: PipelineState,
    trail: Vec<PipelineState>,
}

impl<D, S> EditPipeline<D, S>
where
    D: ClothingDescriber,
    S: TextureSynthesizer,
{
    pub fn new(store: AssetStore, describer: D, synthesizer: S, events: EventLog) -> Self {
        Self {
            store,
            describer,
            synthesizer,
            events,
            state: PipelineState::Idle,
            trail: Vec::new(),
        }
    }

    pub fn store(&self) -> &AssetStore {
        &self.store
    }

    pub fn describer(&self) -> &D {
        &self.describer
    }

    pub fn synthesizer(&self) -> &S {
        &self.synthesizer
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// States visited by the most recent `run`, in order.
    pub fn last_transitions(&self) -> &[PipelineState] {
        &self.trail
    }

    pub fn run(&mut self, request: EditRequest, confirm: &mut impl Confirm) -> EditOutcome {
        self.state = PipelineState::Idle;
        self.trail.clear();
        let input = match &request {
            EditRequest::Image(path) => path.to_string_lossy().to_string(),
            EditRequest::Text(text) => text.clone(),
        };
        self.emit(SessionEvent::EditRequested {
            kind: request.kind().to_string(),
            input,
        });

        let outcome = match self.drive(request, confirm) {
            Ok(outcome) => outcome,
            Err(err) => {
                self.transition(PipelineState::Failed);
                let stage = err.stage();
                let reason = err.reason();
                self.emit(SessionEvent::EditFailed {
                    stage: stage.as_str().to_string(),
                    reason: reason.clone(),
                });
                EditOutcome::Failed { stage, reason }
            }
        };
        self.transition(PipelineState::Idle);
        outcome
    }

    fn drive(
        &mut self,
        request: EditRequest,
        confirm: &mut impl Confirm,
    ) -> Result<EditOutcome, EditError> {
        if !self.store.has_live() && !self.store.has_backup() {
            return Err(AssetError::MissingAsset {
                path: self.store.live_path().to_path_buf(),
            }
            .into());
        }

        let description = match request {
            EditRequest::Image(path) => {
                self.transition(PipelineState::Describing);
                let description = self.describer.describe(&path)?;
                self.emit(SessionEvent::DescriptionReady {
                    image_path: path,
                    description: description.clone(),
                });
                self.transition(PipelineState::Confirming);
                if !confirm.confirm(&description) {
                    self.emit(SessionEvent::EditCancelled {
                        description: description.clone(),
                    });
                    return Ok(EditOutcome::Cancelled { description });
                }
                description
            }
            EditRequest::Text(text) => text,
        };
        if description.trim().is_empty() {
            return Err(EditError::Configuration(
                "clothing description is empty".to_string(),
            ));
        }

        self.transition(PipelineState::Synthesizing);
        let source = self.store.current_source_for_edit()?;
        let backup_created = source.origin == SourceOrigin::BackedUpLive;
        if backup_created {
            self.emit(SessionEvent::BackupCreated {
                backup: source.path.clone(),
                sha256: Some(fingerprint(&source.bytes)),
            });
        }
        let texture = self.synthesizer.synthesize(&source.bytes, &description)?;
        self.emit(SessionEvent::TextureSynthesized {
            raw_width: texture.raw_width,
            raw_height: texture.raw_height,
            size: texture.size,
            resized: texture.resized(),
            source_sha256: fingerprint(&source.bytes),
        });

        self.transition(PipelineState::Committing);
        self.store.commit(&texture.png)?;
        self.emit(SessionEvent::TextureCommitted {
            texture: self.store.live_path().to_path_buf(),
            sha256: fingerprint(&texture.png),
            bytes: texture.png.len(),
        });

        Ok(EditOutcome::Committed {
            description,
            raw_width: texture.raw_width,
            raw_height: texture.raw_height,
            resized: texture.resized(),
            backup_created,
        })
    }

    /// Creates the baseline backup if the slot is still empty.
    pub fn ensure_backup(&self) -> Result<BackupStatus, EditError> {
        let status = self.store.backup()?;
        if status == BackupStatus::Created {
            self.emit(SessionEvent::BackupCreated {
                backup: self.store.backup_path().to_path_buf(),
                sha256: None,
            });
        }
        Ok(status)
    }

    pub fn restore(&self) -> Result<RestoreStatus, EditError> {
        let status = self.store.restore()?;
        self.emit(match status {
            RestoreStatus::Restored => SessionEvent::TextureRestored {
                texture: self.store.live_path().to_path_buf(),
                backup: self.store.backup_path().to_path_buf(),
            },
            RestoreStatus::NothingToRestore => SessionEvent::RestoreSkipped,
        });
        Ok(status)
    }

    fn transition(&mut self, next: PipelineState) {
        let previous = self.state;
        self.state = next;
        self.trail.push(next);
        self.emit(SessionEvent::StateChanged {
            from: previous.as_str().to_string(),
            to: next.as_str().to_string(),
        });
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events.record(&event);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::OnceLock;

    use tailor_contracts::assets::{
        fingerprint, AssetStore, RestoreStatus, TexturePaths, TEXTURE_SIZE,
    };
    use tailor_contracts::events::{EventLog, SessionEvent};

    use super::{EditOutcome, EditPipeline, EditRequest, PipelineState};
    use crate::describe::ClothingDescriber;
    use crate::error::{EditError, FailureStage};
    use crate::synthesize::tests::png;
    use crate::synthesize::TextureSynthesizer;

    const BASELINE: &[u8] = b"baseline-texture-bytes";

    fn canonical_png() -> &'static [u8] {
        static PNG: OnceLock<Vec<u8>> = OnceLock::new();
        PNG.get_or_init(|| png(TEXTURE_SIZE, TEXTURE_SIZE, 30))
    }

    enum DescribeReply {
        Text(&'static str),
        ServerError,
    }

    struct StubDescriber {
        reply: DescribeReply,
        calls: Cell<usize>,
    }

    impl StubDescriber {
        fn replying(text: &'static str) -> Self {
            Self {
                reply: DescribeReply::Text(text),
                calls: Cell::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                reply: DescribeReply::ServerError,
                calls: Cell::new(0),
            }
        }
    }

    impl ClothingDescriber for StubDescriber {
        fn describe(&self, _: &Path) -> Result<String, EditError> {
            self.calls.set(self.calls.get() + 1);
            match self.reply {
                DescribeReply::Text(text) => Ok(text.to_string()),
                DescribeReply::ServerError => Err(EditError::Http {
                    endpoint: "Gemini stub".to_string(),
                    status: 500,
                    body: "boom".to_string(),
                }),
            }
        }
    }

    enum SynthReply {
        Image(Vec<u8>),
        ServerError,
        Malformed,
    }

    struct StubSynthesizer {
        reply: SynthReply,
        seen: RefCell<Vec<(Vec<u8>, String)>>,
    }

    impl StubSynthesizer {
        fn new(reply: SynthReply) -> Self {
            Self {
                reply,
                seen: RefCell::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.seen.borrow().len()
        }

        fn sources(&self) -> Vec<Vec<u8>> {
            self.seen
                .borrow()
                .iter()
                .map(|(source, _)| source.clone())
                .collect()
        }
    }

    impl TextureSynthesizer for StubSynthesizer {
        fn render(&self, source_png: &[u8], description: &str) -> Result<Vec<u8>, EditError> {
            self.seen
                .borrow_mut()
                .push((source_png.to_vec(), description.to_string()));
            match &self.reply {
                SynthReply::Image(bytes) => Ok(bytes.clone()),
                SynthReply::ServerError => Err(EditError::Http {
                    endpoint: "Gemini stub".to_string(),
                    status: 503,
                    body: "overloaded".to_string(),
                }),
                SynthReply::Malformed => Err(EditError::payload("no candidates returned")),
            }
        }
    }

    struct Fixture {
        _temp: tempfile::TempDir,
        store: AssetStore,
        events: EventLog,
        photo: PathBuf,
    }

    fn fixture(live: Option<&[u8]>, backup: Option<&[u8]>) -> anyhow::Result<Fixture> {
        let temp = tempfile::tempdir()?;
        let paths =
            TexturePaths::with_sibling_backup(temp.path().join("model").join("texture_00.png"));
        fs::create_dir_all(paths.dir())?;
        if let Some(bytes) = live {
            fs::write(&paths.live, bytes)?;
        }
        if let Some(bytes) = backup {
            fs::write(&paths.backup, bytes)?;
        }
        let photo = temp.path().join("hoodie.jpg");
        fs::write(&photo, b"photo")?;
        let events = EventLog::new(temp.path().join("events.jsonl"), "session-test");
        Ok(Fixture {
            store: AssetStore::new(paths),
            events,
            photo,
            _temp: temp,
        })
    }

    fn pipeline(
        fx: &Fixture,
        describer: StubDescriber,
        reply: SynthReply,
    ) -> EditPipeline<StubDescriber, StubSynthesizer> {
        EditPipeline::new(
            fx.store.clone(),
            describer,
            StubSynthesizer::new(reply),
            fx.events.clone(),
        )
    }

    fn accept(_: &str) -> bool {
        true
    }

    fn reject(_: &str) -> bool {
        false
    }

    fn stored_dims(store: &AssetStore) -> anyhow::Result<(u32, u32)> {
        let image = image::load_from_memory(&store.read_live()?)?;
        Ok((image.width(), image.height()))
    }

    #[test]
    fn text_intent_updates_live_and_keeps_baseline_backup() -> anyhow::Result<()> {
        let fx = fixture(Some(b"previous-edit".as_slice()), Some(BASELINE))?;
        let mut pipe = pipeline(
            &fx,
            StubDescriber::replying("unused"),
            SynthReply::Image(canonical_png().to_vec()),
        );

        let outcome = pipe.run(
            EditRequest::Text("red hoodie with white logo".to_string()),
            &mut accept,
        );

        assert!(outcome.is_committed(), "{outcome:?}");
        assert_eq!(fx.store.read_live()?, canonical_png());
        assert_eq!(fx.store.read_backup()?, BASELINE);
        assert_eq!(pipe.describer().calls.get(), 0);
        assert_eq!(
            pipe.synthesizer().seen.borrow()[0].1,
            "red hoodie with white logo"
        );
        assert_eq!(pipe.state(), PipelineState::Idle);
        Ok(())
    }

    #[test]
    fn first_edit_backs_up_live_before_synthesis() -> anyhow::Result<()> {
        let fx = fixture(Some(BASELINE), None)?;
        let mut pipe = pipeline(
            &fx,
            StubDescriber::replying("unused"),
            SynthReply::Image(canonical_png().to_vec()),
        );

        let outcome = pipe.run(EditRequest::Text("green vest".to_string()), &mut accept);

        match outcome {
            EditOutcome::Committed { backup_created, .. } => assert!(backup_created),
            other => panic!("expected commit, got {other:?}"),
        }
        assert_eq!(fx.store.read_backup()?, BASELINE);
        assert_eq!(pipe.synthesizer().sources(), vec![BASELINE.to_vec()]);
        assert!(fx.events.recorded_kinds()?.contains(&"backup_created"));
        Ok(())
    }

    #[test]
    fn repeated_edits_condition_on_the_same_baseline() -> anyhow::Result<()> {
        let fx = fixture(Some(BASELINE), None)?;
        let mut pipe = pipeline(
            &fx,
            StubDescriber::replying("unused"),
            SynthReply::Image(canonical_png().to_vec()),
        );

        assert!(pipe
            .run(EditRequest::Text("yellow raincoat".to_string()), &mut accept)
            .is_committed());
        assert_eq!(fx.store.read_live()?, canonical_png());
        assert!(pipe
            .run(EditRequest::Text("black tuxedo".to_string()), &mut accept)
            .is_committed());

        let sources = pipe.synthesizer().sources();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0], BASELINE);
        assert_eq!(sources[1], fx.store.read_backup()?);
        assert_ne!(sources[1], fx.store.read_live()?);
        Ok(())
    }

    #[test]
    fn committed_textures_are_always_canonical_size() -> anyhow::Result<()> {
        for raw in [png(1024, 1024, 120), canonical_png().to_vec()] {
            let fx = fixture(Some(BASELINE), None)?;
            let mut pipe = pipeline(&fx, StubDescriber::replying("unused"), SynthReply::Image(raw));
            let outcome = pipe.run(EditRequest::Text("striped polo".to_string()), &mut accept);
            assert!(outcome.is_committed(), "{outcome:?}");
            assert_eq!(stored_dims(&fx.store)?, (TEXTURE_SIZE, TEXTURE_SIZE));
        }
        Ok(())
    }

    #[test]
    fn undersized_result_is_reported_as_resized() -> anyhow::Result<()> {
        let fx = fixture(Some(BASELINE), None)?;
        let mut pipe = pipeline(
            &fx,
            StubDescriber::replying("unused"),
            SynthReply::Image(png(1024, 1024, 5)),
        );
        match pipe.run(EditRequest::Text("poncho".to_string()), &mut accept) {
            EditOutcome::Committed {
                raw_width,
                raw_height,
                resized,
                ..
            } => {
                assert_eq!((raw_width, raw_height), (1024, 1024));
                assert!(resized);
            }
            other => panic!("expected commit, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn image_intent_describes_confirms_then_commits() -> anyhow::Result<()> {
        let fx = fixture(Some(BASELINE), None)?;
        let mut pipe = pipeline(
            &fx,
            StubDescriber::replying("navy hoodie, kangaroo pocket"),
            SynthReply::Image(canonical_png().to_vec()),
        );
        let mut shown = Vec::new();
        let mut confirm = |description: &str| {
            shown.push(description.to_string());
            true
        };

        let outcome = pipe.run(EditRequest::Image(fx.photo.clone()), &mut confirm);

        assert!(outcome.is_committed(), "{outcome:?}");
        assert_eq!(shown, vec!["navy hoodie, kangaroo pocket"]);
        assert_eq!(
            pipe.synthesizer().seen.borrow()[0].1,
            "navy hoodie, kangaroo pocket"
        );
        assert_eq!(
            pipe.last_transitions(),
            &[
                PipelineState::Describing,
                PipelineState::Confirming,
                PipelineState::Synthesizing,
                PipelineState::Committing,
                PipelineState::Idle,
            ]
        );
        Ok(())
    }

    #[test]
    fn text_intent_skips_describing() -> anyhow::Result<()> {
        let fx = fixture(Some(BASELINE), None)?;
        let mut pipe = pipeline(
            &fx,
            StubDescriber::replying("unused"),
            SynthReply::Image(canonical_png().to_vec()),
        );
        pipe.run(EditRequest::Text("kimono".to_string()), &mut accept);
        assert_eq!(
            pipe.last_transitions(),
            &[
                PipelineState::Synthesizing,
                PipelineState::Committing,
                PipelineState::Idle,
            ]
        );
        Ok(())
    }

    #[test]
    fn rejection_at_confirmation_leaves_texture_untouched() -> anyhow::Result<()> {
        let fx = fixture(Some(b"live-before".as_slice()), Some(BASELINE))?;
        let mut pipe = pipeline(
            &fx,
            StubDescriber::replying("orange safety vest"),
            SynthReply::Image(canonical_png().to_vec()),
        );

        let outcome = pipe.run(EditRequest::Image(fx.photo.clone()), &mut reject);

        assert_eq!(
            outcome,
            EditOutcome::Cancelled {
                description: "orange safety vest".to_string()
            }
        );
        assert_eq!(fx.store.read_live()?, b"live-before");
        assert_eq!(pipe.synthesizer().calls(), 0);
        assert!(fx.events.recorded_kinds()?.contains(&"edit_cancelled"));
        Ok(())
    }

    #[test]
    fn synthesis_transport_failure_leaves_texture_untouched() -> anyhow::Result<()> {
        let fx = fixture(Some(b"live-before".as_slice()), Some(BASELINE))?;
        let mut pipe = pipeline(&fx, StubDescriber::replying("unused"), SynthReply::ServerError);

        let outcome = pipe.run(EditRequest::Text("bomber jacket".to_string()), &mut accept);

        match &outcome {
            EditOutcome::Failed { stage, reason } => {
                assert_eq!(*stage, FailureStage::Transport);
                assert!(reason.contains("503"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(fx.store.read_live()?, b"live-before");
        assert_eq!(fx.store.read_backup()?, BASELINE);
        assert_eq!(
            pipe.last_transitions(),
            &[
                PipelineState::Synthesizing,
                PipelineState::Failed,
                PipelineState::Idle,
            ]
        );
        Ok(())
    }

    #[test]
    fn malformed_payload_leaves_texture_untouched() -> anyhow::Result<()> {
        let fx = fixture(Some(b"live-before".as_slice()), Some(BASELINE))?;
        let mut pipe = pipeline(&fx, StubDescriber::replying("unused"), SynthReply::Malformed);

        let outcome = pipe.run(EditRequest::Text("cardigan".to_string()), &mut accept);

        assert!(matches!(
            outcome,
            EditOutcome::Failed {
                stage: FailureStage::Payload,
                ..
            }
        ));
        assert_eq!(fx.store.read_live()?, b"live-before");
        Ok(())
    }

    #[test]
    fn undecodable_model_output_leaves_texture_untouched() -> anyhow::Result<()> {
        let fx = fixture(Some(b"live-before".as_slice()), Some(BASELINE))?;
        let mut pipe = pipeline(
            &fx,
            StubDescriber::replying("unused"),
            SynthReply::Image(b"not an image".to_vec()),
        );

        let outcome = pipe.run(EditRequest::Text("parka".to_string()), &mut accept);

        assert!(!outcome.is_committed());
        assert_eq!(fx.store.read_live()?, b"live-before");
        Ok(())
    }

    #[test]
    fn describe_failure_skips_synthesis() -> anyhow::Result<()> {
        let fx = fixture(Some(b"live-before".as_slice()), Some(BASELINE))?;
        let mut pipe = pipeline(
            &fx,
            StubDescriber::failing(),
            SynthReply::Image(canonical_png().to_vec()),
        );

        let outcome = pipe.run(EditRequest::Image(fx.photo.clone()), &mut accept);

        assert!(matches!(
            outcome,
            EditOutcome::Failed {
                stage: FailureStage::Transport,
                ..
            }
        ));
        assert_eq!(pipe.synthesizer().calls(), 0);
        assert_eq!(fx.store.read_live()?, b"live-before");
        assert!(fx.events.recorded_kinds()?.contains(&"edit_failed"));
        Ok(())
    }

    #[test]
    fn missing_asset_fails_before_any_model_call() -> anyhow::Result<()> {
        let fx = fixture(None, None)?;
        let mut pipe = pipeline(
            &fx,
            StubDescriber::replying("denim jacket"),
            SynthReply::Image(canonical_png().to_vec()),
        );

        for request in [
            EditRequest::Image(fx.photo.clone()),
            EditRequest::Text("denim jacket".to_string()),
        ] {
            let outcome = pipe.run(request, &mut accept);
            match outcome {
                EditOutcome::Failed { stage, reason } => {
                    assert_eq!(stage, FailureStage::Configuration);
                    assert!(reason.contains("texture file not found"));
                }
                other => panic!("expected failure, got {other:?}"),
            }
        }
        assert_eq!(pipe.describer().calls.get(), 0);
        assert_eq!(pipe.synthesizer().calls(), 0);
        assert!(!fx.store.has_live());
        Ok(())
    }

    #[test]
    fn blank_text_is_rejected_without_synthesis() -> anyhow::Result<()> {
        let fx = fixture(Some(BASELINE), None)?;
        let mut pipe = pipeline(
            &fx,
            StubDescriber::replying("unused"),
            SynthReply::Image(canonical_png().to_vec()),
        );
        let outcome = pipe.run(EditRequest::Text("   ".to_string()), &mut accept);
        assert!(!outcome.is_committed());
        assert_eq!(pipe.synthesizer().calls(), 0);
        Ok(())
    }

    #[test]
    fn restore_after_edits_returns_first_baseline() -> anyhow::Result<()> {
        let fx = fixture(Some(BASELINE), None)?;
        let mut pipe = pipeline(
            &fx,
            StubDescriber::replying("unused"),
            SynthReply::Image(canonical_png().to_vec()),
        );
        pipe.run(EditRequest::Text("tank top".to_string()), &mut accept);
        pipe.run(EditRequest::Text("trench coat".to_string()), &mut accept);

        assert_eq!(pipe.restore()?, RestoreStatus::Restored);
        assert_eq!(fx.store.read_live()?, BASELINE);
        assert!(fx.events.recorded_kinds()?.contains(&"texture_restored"));
        Ok(())
    }

    #[test]
    fn restore_without_backup_reports_nothing_to_restore() -> anyhow::Result<()> {
        let fx = fixture(Some(b"live-only".as_slice()), None)?;
        let pipe = pipeline(
            &fx,
            StubDescriber::replying("unused"),
            SynthReply::ServerError,
        );

        assert_eq!(pipe.restore()?, RestoreStatus::NothingToRestore);
        assert_eq!(fx.store.read_live()?, b"live-only");
        assert!(!fx.store.has_backup());
        assert!(fx.events.recorded_kinds()?.contains(&"restore_skipped"));
        Ok(())
    }

    #[test]
    fn committed_edit_emits_lifecycle_events_in_order() -> anyhow::Result<()> {
        let fx = fixture(Some(BASELINE), None)?;
        let mut pipe = pipeline(
            &fx,
            StubDescriber::replying("teal windbreaker"),
            SynthReply::Image(canonical_png().to_vec()),
        );
        pipe.run(EditRequest::Image(fx.photo.clone()), &mut accept);

        let kinds = fx.events.recorded_kinds()?;
        let position = |name: &str| kinds.iter().position(|kind| *kind == name);
        let requested = position("edit_requested").unwrap_or(usize::MAX);
        let described = position("description_ready").unwrap_or(usize::MAX);
        let synthesized = position("texture_synthesized").unwrap_or(usize::MAX);
        let committed = position("texture_committed").unwrap_or(usize::MAX);
        assert!(requested < described);
        assert!(described < synthesized);
        assert!(synthesized < committed);
        assert!(committed < usize::MAX);
        Ok(())
    }

    #[test]
    fn commit_event_fingerprints_the_written_texture() -> anyhow::Result<()> {
        let fx = fixture(Some(BASELINE), None)?;
        let mut pipe = pipeline(
            &fx,
            StubDescriber::replying("unused"),
            SynthReply::Image(png(512, 512, 77)),
        );
        assert!(pipe
            .run(EditRequest::Text("wool sweater".to_string()), &mut accept)
            .is_committed());

        let live = fx.store.read_live()?;
        let events = fx.events.replay()?;
        assert!(events.contains(&SessionEvent::TextureCommitted {
            texture: fx.store.live_path().to_path_buf(),
            sha256: fingerprint(&live),
            bytes: live.len(),
        }));
        assert!(events.contains(&SessionEvent::BackupCreated {
            backup: fx.store.backup_path().to_path_buf(),
            sha256: Some(fingerprint(BASELINE)),
        }));
        assert!(events.iter().any(|event| matches!(
            event,
            SessionEvent::TextureSynthesized {
                raw_width: 512,
                resized: true,
                ..
            }
        )));
        Ok(())
    }
}
