//! The editor controller.
//!
//! One controller owns the whole editor state: the cue store, playback
//! position, the loaded audio, and transcription progress. UI event
//! handlers issue commands against it; nothing else mutates the state.

use std::time::Duration;

use cuesmith_audio_ai::progress::TranscriptionProgress;
use cuesmith_audio_ai::segmentation::SegmentationEngine;
use cuesmith_audio_ai::subtitles::{export_filename, generate_cue_file, parse_time, CUE_FILE_MIME};
use cuesmith_audio_ai::transcription::{AudioUpload, TranscriptionProvider, TranscriptionRequest};
use cuesmith_common::clock::SessionClock;
use cuesmith_common::config::{AppConfig, EditorConfig};
use cuesmith_common::error::{CuesmithError, CuesmithResult};
use cuesmith_cue_model::cue::{Cue, CueId, CueList, TimeBound};
use cuesmith_cue_model::state::{EditorSnapshot, PlaybackState, SelectionState};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::auth::{AuthProvider, User};
use crate::export::ExportSink;
use crate::media::{MediaEvent, PlaybackSurface, SubscriptionId};
use crate::store::CueStore;

/// Cadence of the cosmetic progress estimate during transcription.
const PROGRESS_TICK: Duration = Duration::from_millis(250);

/// What happened to a transcript handed to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptOutcome {
    /// The cue list was replaced with this many cues.
    Segmented { cues: usize },
    /// Media duration is still unknown; segmentation runs once it arrives.
    AwaitingDuration,
}

struct AttachedSurface {
    surface: Box<dyn PlaybackSurface>,
    subscription: SubscriptionId,
    events: UnboundedReceiver<MediaEvent>,
}

pub struct EditorController {
    editor: EditorConfig,
    engine: SegmentationEngine,
    auth: Box<dyn AuthProvider>,
    provider: Box<dyn TranscriptionProvider>,
    store: CueStore,
    playback: PlaybackState,
    active: Option<CueId>,
    source: Option<AudioUpload>,
    pending_transcript: Option<String>,
    progress: TranscriptionProgress,
    surface: Option<AttachedSurface>,
}

impl EditorController {
    pub fn new(
        config: &AppConfig,
        auth: Box<dyn AuthProvider>,
        provider: Box<dyn TranscriptionProvider>,
    ) -> Self {
        Self {
            editor: config.editor.clone(),
            engine: SegmentationEngine::new(config.segmentation.clone()),
            auth,
            provider,
            store: CueStore::new(),
            playback: PlaybackState::default(),
            active: None,
            source: None,
            pending_transcript: None,
            progress: TranscriptionProgress::new(PROGRESS_TICK.as_nanos() as u64),
            surface: None,
        }
    }

    // --- authentication ---

    pub fn current_user(&self) -> Option<&User> {
        self.auth.current_user()
    }

    pub fn login(&mut self) -> CuesmithResult<&User> {
        self.auth.login()
    }

    pub fn logout(&mut self) {
        self.auth.logout();
    }

    fn require_user(&self) -> CuesmithResult<()> {
        match self.auth.current_user() {
            Some(_) => Ok(()),
            None => Err(CuesmithError::Unauthenticated),
        }
    }

    // --- playback surface ---

    /// Subscribe to `surface` and adopt its current position and duration.
    /// A previously attached surface is detached and returned.
    pub fn attach_surface(
        &mut self,
        mut surface: Box<dyn PlaybackSurface>,
    ) -> Option<Box<dyn PlaybackSurface>> {
        let previous = self.detach_surface();

        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = surface.subscribe(tx);

        self.playback.position = surface.position();
        self.playback.playing = surface.is_playing();
        self.playback.duration = surface.duration();
        self.surface = Some(AttachedSurface {
            surface,
            subscription,
            events: rx,
        });

        self.apply_pending_transcript();
        self.refresh_active();
        previous
    }

    /// Unsubscribe from the attached surface and hand it back.
    pub fn detach_surface(&mut self) -> Option<Box<dyn PlaybackSurface>> {
        let mut attached = self.surface.take()?;
        attached.surface.unsubscribe(attached.subscription);
        Some(attached.surface)
    }

    pub fn surface_mut(&mut self) -> Option<&mut (dyn PlaybackSurface + 'static)> {
        self.surface.as_mut().map(|a| a.surface.as_mut())
    }

    /// Apply every event the surface has delivered so far. Returns how many
    /// were handled.
    pub fn pump_media_events(&mut self) -> usize {
        let Some(attached) = self.surface.as_mut() else {
            return 0;
        };
        let mut pending = Vec::new();
        while let Ok(event) = attached.events.try_recv() {
            pending.push(event);
        }
        let count = pending.len();
        for event in pending {
            self.handle_media_event(event);
        }
        count
    }

    pub fn handle_media_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::PositionChanged(t) => {
                self.playback.position = t;
                self.refresh_active();
            }
            MediaEvent::DurationChanged(d) => {
                self.playback.duration = Some(d);
                self.apply_pending_transcript();
            }
            MediaEvent::Played => self.playback.playing = true,
            MediaEvent::Paused | MediaEvent::Ended => self.playback.playing = false,
        }
    }

    fn refresh_active(&mut self) -> Option<CueId> {
        let active = self.store.active_at(self.playback.position).map(|c| c.id);
        if active != self.active {
            tracing::trace!(?active, position = self.playback.position, "Active cue changed");
            self.active = active;
        }
        active
    }

    // --- source and transcription ---

    /// Validate and load an uploaded file. A rejected file leaves the
    /// editor untouched.
    pub fn upload(
        &mut self,
        file_name: &str,
        media_type: &str,
        bytes: Vec<u8>,
    ) -> CuesmithResult<()> {
        self.require_user()?;
        let upload = AudioUpload::new(file_name, media_type, bytes)?;
        self.load_audio(upload)
    }

    /// Make `upload` the current source. Cues from the previous file are
    /// discarded, and the attached surface is unloaded so the duration stays
    /// unknown until the new file's metadata arrives.
    pub fn load_audio(&mut self, upload: AudioUpload) -> CuesmithResult<()> {
        self.require_user()?;
        tracing::info!(file = upload.file_name(), bytes = upload.bytes().len(), "Audio loaded");

        // Events still queued belong to the previous media.
        self.pump_media_events();

        self.source = Some(upload);
        self.store.clear();
        self.pending_transcript = None;
        self.progress.reset();
        self.active = None;
        if let Some(surface) = self.surface_mut() {
            surface.unload();
        }
        self.pump_media_events();
        self.playback = PlaybackState::default();
        Ok(())
    }

    /// Transcribe the loaded audio and segment the result.
    ///
    /// On failure the progress estimate resets and existing cues stay as
    /// they were. `on_progress` receives the cosmetic estimate.
    pub async fn transcribe(
        &mut self,
        language: &str,
        on_progress: Option<&(dyn Fn(u8) + Send + Sync)>,
    ) -> CuesmithResult<TranscriptOutcome> {
        self.require_user()?;
        let audio = self.source.clone().ok_or(CuesmithError::NoSource)?;
        let request = TranscriptionRequest {
            audio,
            language: language.to_string(),
        };

        let clock = SessionClock::start();
        tracing::info!(
            file = request.audio.file_name(),
            language,
            started_at = clock.epoch_wall(),
            "Transcription requested"
        );
        let mut ticker = tokio::time::interval(PROGRESS_TICK);
        self.progress.begin();

        let result = {
            let call = self.provider.transcribe(&request);
            tokio::pin!(call);
            loop {
                tokio::select! {
                    result = &mut call => break result,
                    _ = ticker.tick() => {
                        let percent = self.progress.tick(clock.elapsed_ns());
                        if let Some(cb) = on_progress {
                            cb(percent);
                        }
                    }
                }
            }
        };

        match result {
            Ok(transcript) => {
                self.progress.complete();
                if let Some(cb) = on_progress {
                    cb(self.progress.percent());
                }
                tracing::info!(secs = clock.elapsed_secs(), "Transcript received");
                self.apply_transcript(transcript.text)
            }
            Err(e) => {
                self.progress.reset();
                tracing::warn!(error = %e, "Transcription failed; keeping existing cues");
                Err(match e {
                    CuesmithError::Transcription { .. } => e,
                    other => CuesmithError::transcription(other.to_string()),
                })
            }
        }
    }

    /// Segment `text` against the media duration, or hold it until the
    /// duration is known.
    pub fn apply_transcript(&mut self, text: String) -> CuesmithResult<TranscriptOutcome> {
        self.require_user()?;
        match self.playback.known_duration() {
            Some(duration) => {
                let cues = self.engine.segment(&text, duration)?;
                let count = cues.len();
                self.pending_transcript = None;
                self.store.replace_all(cues);
                self.refresh_active();
                Ok(TranscriptOutcome::Segmented { cues: count })
            }
            None => {
                tracing::info!("Media duration unknown; transcript held until metadata loads");
                self.pending_transcript = Some(text);
                Ok(TranscriptOutcome::AwaitingDuration)
            }
        }
    }

    fn apply_pending_transcript(&mut self) {
        let Some(duration) = self.playback.known_duration() else {
            return;
        };
        let Some(text) = self.pending_transcript.take() else {
            return;
        };
        match self.engine.segment(&text, duration) {
            Ok(cues) => {
                self.store.replace_all(cues);
                self.refresh_active();
            }
            Err(e) => tracing::warn!(error = %e, "Held transcript could not be segmented"),
        }
    }

    /// Replace the cue list directly, e.g. with cues read from a file.
    pub fn replace_cues(&mut self, cues: Vec<Cue>) -> CuesmithResult<()> {
        self.require_user()?;
        self.pending_transcript = None;
        self.store.replace_all(cues);
        self.refresh_active();
        Ok(())
    }

    // --- selection and edits ---

    pub fn select(&mut self, id: CueId) -> CuesmithResult<()> {
        self.require_user()?;
        self.store.select(id)
    }

    /// Select a cue and move playback to its start.
    pub fn select_and_seek(&mut self, id: CueId) -> CuesmithResult<()> {
        self.select(id)?;
        let start = self
            .store
            .get(id)
            .map(|c| c.start)
            .ok_or(CuesmithError::CueNotFound { id: id.0 })?;
        if let Some(surface) = self.surface_mut() {
            surface.seek(start);
            self.pump_media_events();
        }
        Ok(())
    }

    pub fn set_text(&mut self, id: CueId, text: impl Into<String>) -> CuesmithResult<()> {
        self.require_user()?;
        self.store.set_text(id, text)
    }

    /// Set both bounds after checking `0 <= start < end <= duration`. The
    /// upper check applies only once the media duration is known.
    pub fn set_timing(&mut self, id: CueId, start: f64, end: f64) -> CuesmithResult<()> {
        self.require_user()?;
        if !(start.is_finite() && end.is_finite() && start >= 0.0 && start < end) {
            return Err(CuesmithError::InvalidTiming { start, end });
        }
        if let Some(total) = self.playback.known_duration() {
            if end > total {
                return Err(CuesmithError::InvalidTiming { start, end });
            }
        }
        self.store.set_timing(id, start, end)?;
        self.refresh_active();
        Ok(())
    }

    /// Commit a typed `MM:SS.mmm` value for one bound.
    ///
    /// Unparsable input reads as zero; the resulting span is validated and
    /// rejected without changes when it is not `0 <= start < end`, or ends
    /// past the known media duration.
    pub fn commit_time_entry(
        &mut self,
        id: CueId,
        bound: TimeBound,
        input: &str,
    ) -> CuesmithResult<(f64, f64)> {
        self.require_user()?;
        let cue = self
            .store
            .get(id)
            .ok_or(CuesmithError::CueNotFound { id: id.0 })?;
        let value = parse_time(input);
        let (start, end) = match bound {
            TimeBound::Start => (value, cue.end),
            TimeBound::End => (cue.start, value),
        };
        self.set_timing(id, start, end)?;
        Ok((start, end))
    }

    /// Move one bound by a single nudge step, forward or backward.
    pub fn nudge(&mut self, id: CueId, bound: TimeBound, forward: bool) -> CuesmithResult<(f64, f64)> {
        self.require_user()?;
        let step = self.editor.nudge_step_secs;
        let delta = if forward { step } else { -step };
        let bounds = self.store.nudge(
            id,
            bound,
            delta,
            self.playback.known_duration(),
            self.editor.min_cue_secs,
        )?;
        self.refresh_active();
        Ok(bounds)
    }

    // --- export and inspection ---

    /// Serialize the current cues and hand them to `sink`. Returns the file
    /// name used.
    pub fn export(&self, sink: &mut dyn ExportSink) -> CuesmithResult<String> {
        self.require_user()?;
        let file_name = export_filename(self.source_name());
        let content = generate_cue_file(self.store.cues().as_slice());
        sink.save(&file_name, CUE_FILE_MIME, &content)?;
        Ok(file_name)
    }

    pub fn cues(&self) -> &CueList {
        self.store.cues()
    }

    pub fn active_cue(&self) -> Option<&Cue> {
        self.active.and_then(|id| self.store.get(id))
    }

    pub fn selected(&self) -> Option<CueId> {
        self.store.selected()
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn progress_percent(&self) -> u8 {
        self.progress.percent()
    }

    pub fn has_pending_transcript(&self) -> bool {
        self.pending_transcript.is_some()
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source.as_ref().map(|s| s.file_name())
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            source_name: self.source_name().map(str::to_string),
            cues: self.store.cues().clone(),
            playback: self.playback.clone(),
            selection: SelectionState {
                selected: self.store.selected(),
                active: self.active,
            },
        }
    }
}

impl Drop for EditorController {
    fn drop(&mut self) {
        self.detach_surface();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticAuth;
    use crate::media::SimulatedPlayback;
    use cuesmith_audio_ai::transcription::Transcript;

    struct Fixed(&'static str);

    #[async_trait::async_trait]
    impl TranscriptionProvider for Fixed {
        async fn transcribe(&self, _: &TranscriptionRequest) -> CuesmithResult<Transcript> {
            Ok(Transcript {
                text: self.0.to_string(),
            })
        }
    }

    fn user() -> User {
        User {
            id: "u".to_string(),
            display_name: "U".to_string(),
        }
    }

    fn controller() -> EditorController {
        EditorController::new(
            &AppConfig::default(),
            Box::new(StaticAuth::signed_in(user())),
            Box::new(Fixed("one two three four five six seven eight")),
        )
    }

    fn with_cues(duration: f64) -> EditorController {
        let mut c = controller();
        let mut surface = SimulatedPlayback::new();
        surface.load_metadata(duration);
        c.attach_surface(Box::new(surface));
        c.apply_transcript("one two three four five six seven eight".to_string())
            .unwrap();
        c
    }

    #[test]
    fn test_inert_without_user() {
        let mut c = EditorController::new(
            &AppConfig::default(),
            Box::new(StaticAuth::new(user())),
            Box::new(Fixed("x")),
        );
        assert!(matches!(
            c.apply_transcript("x".to_string()),
            Err(CuesmithError::Unauthenticated)
        ));
        assert!(matches!(
            c.upload("a.mp3", "audio/mpeg", vec![]),
            Err(CuesmithError::Unauthenticated)
        ));
        c.login().unwrap();
        assert!(c.upload("a.mp3", "audio/mpeg", vec![]).is_ok());
    }

    #[test]
    fn test_rejected_upload_keeps_state() {
        let mut c = with_cues(10.0);
        let err = c.upload("clip.mp4", "video/mp4", vec![1]).unwrap_err();
        assert!(matches!(err, CuesmithError::InvalidInput { .. }));
        assert_eq!(c.cues().len(), 2);
        assert_eq!(c.source_name(), None);
    }

    #[test]
    fn test_transcript_waits_for_duration() {
        let mut c = controller();
        c.attach_surface(Box::new(SimulatedPlayback::new()));

        let outcome = c.apply_transcript("a b c d".to_string()).unwrap();
        assert_eq!(outcome, TranscriptOutcome::AwaitingDuration);
        assert!(c.cues().is_empty());
        assert!(c.has_pending_transcript());

        c.handle_media_event(MediaEvent::DurationChanged(8.0));
        assert!(!c.has_pending_transcript());
        assert_eq!(c.cues().len(), 1);
        assert_eq!(c.cues().as_slice()[0].end, 8.0);
    }

    #[test]
    fn test_active_cue_follows_position() {
        let mut c = with_cues(10.0);
        c.handle_media_event(MediaEvent::PositionChanged(5.0));
        assert_eq!(c.active_cue().map(|cue| cue.id), Some(CueId(0)));
        c.handle_media_event(MediaEvent::PositionChanged(7.0));
        assert_eq!(c.active_cue().map(|cue| cue.id), Some(CueId(1)));
        c.handle_media_event(MediaEvent::PositionChanged(12.0));
        assert!(c.active_cue().is_none());
    }

    #[test]
    fn test_select_and_seek_moves_playhead() {
        let mut c = with_cues(10.0);
        c.select_and_seek(CueId(1)).unwrap();
        assert_eq!(c.selected(), Some(CueId(1)));
        assert_eq!(c.playback().position, 5.0);
        // At the shared boundary the earlier cue is the active one.
        assert_eq!(c.active_cue().map(|cue| cue.id), Some(CueId(0)));
    }

    #[test]
    fn test_selection_independent_of_active() {
        let mut c = with_cues(10.0);
        c.select(CueId(1)).unwrap();
        c.handle_media_event(MediaEvent::PositionChanged(1.0));
        let snapshot = c.snapshot();
        assert_eq!(snapshot.selection.selected, Some(CueId(1)));
        assert_eq!(snapshot.selection.active, Some(CueId(0)));
    }

    #[test]
    fn test_set_timing_validates_span() {
        let mut c = with_cues(10.0);
        assert!(matches!(
            c.set_timing(CueId(0), 3.0, 3.0),
            Err(CuesmithError::InvalidTiming { .. })
        ));
        assert!(c.set_timing(CueId(0), -1.0, 3.0).is_err());
        c.set_timing(CueId(0), 1.0, 6.0).unwrap();
        let cue = c.cues().get(CueId(0)).unwrap();
        assert_eq!((cue.start, cue.end), (1.0, 6.0));
    }

    #[test]
    fn test_set_timing_bounded_by_known_duration() {
        let mut c = with_cues(10.0);
        assert!(matches!(
            c.set_timing(CueId(1), 5.0, 10.5),
            Err(CuesmithError::InvalidTiming { .. })
        ));
        c.set_timing(CueId(1), 5.0, 10.0).unwrap();

        // Before metadata loads there is no upper bound.
        let mut c = controller();
        c.replace_cues(vec![Cue::new(0, 0.0, 1.0, "x")]).unwrap();
        c.set_timing(CueId(0), 0.0, 99.0).unwrap();
    }

    #[test]
    fn test_load_audio_forgets_previous_duration() {
        let mut c = with_cues(10.0);
        c.handle_media_event(MediaEvent::PositionChanged(4.0));
        c.upload("next.mp3", "audio/mpeg", vec![]).unwrap();
        assert_eq!(c.playback(), &PlaybackState::default());
        assert_eq!(c.surface_mut().and_then(|s| s.duration()), None);
    }

    #[test]
    fn test_commit_time_entry() {
        let mut c = with_cues(10.0);
        assert_eq!(
            c.commit_time_entry(CueId(1), TimeBound::End, "00:09.250").unwrap(),
            (5.0, 9.25)
        );

        // Garbage reads as zero, which is an invalid end; nothing changes.
        assert!(c.commit_time_entry(CueId(1), TimeBound::End, "soon").is_err());
        assert_eq!(c.cues().get(CueId(1)).unwrap().end, 9.25);

        // Garbage for a start reads as zero, which is a valid start.
        assert_eq!(
            c.commit_time_entry(CueId(1), TimeBound::Start, "??").unwrap(),
            (0.0, 9.25)
        );
    }

    #[test]
    fn test_nudge_uses_configured_step() {
        let mut c = with_cues(10.0);
        assert_eq!(c.nudge(CueId(1), TimeBound::End, true).unwrap(), (5.0, 10.0));
        assert_eq!(c.nudge(CueId(1), TimeBound::Start, false).unwrap(), (4.5, 10.0));
        assert_eq!(c.nudge(CueId(0), TimeBound::Start, false).unwrap(), (0.0, 5.0));
    }

    #[tokio::test]
    async fn test_transcribe_requires_source() {
        let mut c = controller();
        assert!(matches!(
            c.transcribe("en", None).await,
            Err(CuesmithError::NoSource)
        ));
    }

    #[tokio::test]
    async fn test_transcribe_segments_with_known_duration() {
        let mut c = controller();
        c.upload("talk.mp3", "audio/mpeg", vec![0; 4]).unwrap();
        c.handle_media_event(MediaEvent::DurationChanged(10.0));

        let outcome = c.transcribe("en", None).await.unwrap();
        assert_eq!(outcome, TranscriptOutcome::Segmented { cues: 2 });
        assert_eq!(c.progress_percent(), 100);
    }
}
