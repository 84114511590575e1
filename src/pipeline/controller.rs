//! Single-threaded session controller.
//!
//! Every external stimulus (transcript growth, debounce expiry, translation
//! resolutions, speech lifecycle callbacks) arrives as a `PipelineEvent` on
//! one channel and is handled here, so ordering and cancellation semantics
//! stay testable with a simulated clock and fake collaborators.

use crate::languages::{self, Language};
use crate::pipeline::debounce::DebounceTrigger;
use crate::pipeline::sequencer::SpeechSequencer;
use crate::recognizer::{RecognizerOptions, SpeechRecognizer};
use crate::settings::AppSettings;
use crate::speech::SpeechEngine;
use crate::text::is_blank;
use crate::translator::{TranslationBackend, TranslationRequest};
use log::{debug, error, info};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub type EventSender = UnboundedSender<PipelineEvent>;
pub type EventReceiver = UnboundedReceiver<PipelineEvent>;

/// Channel every collaborator reports into.
pub fn pipeline_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Inbound stimuli for the controller.
#[derive(Debug)]
pub enum PipelineEvent {
    /// Cumulative transcript from the recognizer changed.
    TranscriptChanged { text: String },
    /// The recognizer started or stopped listening on its own.
    ListeningChanged { listening: bool },
    /// A translation call resolved; `seq` identifies the call.
    TranslationResolved {
        seq: u64,
        result: Result<String, String>,
    },
    /// Speech engine lifecycle, tagged with the utterance it belongs to.
    UtteranceStarted { seq: u64 },
    UtteranceEnded { seq: u64 },
    UtteranceFailed { seq: u64, message: String },
}

/// Events emitted for an embedding shell (UI, demo driver).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum SessionEvent {
    /// Listening session started
    Started,
    /// The source transcript grew
    TranscriptChanged { text: String },
    /// A translation call was dispatched
    TranslationStarted,
    /// A translation was applied; `delta` is the newly spoken portion
    TranslationUpdated { text: String, delta: String },
    /// Speech playback started or stopped
    SpeakingChanged { speaking: bool, text: String },
    /// Translation failed; previous translated text is preserved
    TranslationError { message: String },
    /// Speech synthesis failed
    SpeechError { message: String },
    /// Listening session ended
    Stopped,
}

/// Read-only view of the session for an embedding shell.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub listening: bool,
    pub transcript: String,
    pub translated_text: String,
    pub previous_translation: String,
    pub is_translating: bool,
    pub is_speaking: bool,
    pub current_speaking_text: String,
    pub error_message: String,
    pub target_language: String,
    pub auto_speak: bool,
}

pub struct SessionController {
    settings: AppSettings,
    target: Language,

    /// Whether a listening session is active.
    active: bool,

    /// Cumulative transcript from the recognizer for this session.
    current_transcript: String,
    /// The transcript that most recently triggered a translation call.
    previous_transcript: String,

    /// Latest applied full translation of the transcript.
    translated_text: String,
    /// User-facing message from the last failure; cleared on success.
    error_message: String,

    /// Translation calls dispatched but not yet resolved.
    pending_calls: u32,
    /// Sequence number of the most recently dispatched call.
    next_seq: u64,
    /// Sequence number of the most recently accepted resolution. Resolutions
    /// at or below this are stale and dropped.
    applied_seq: u64,

    debounce: DebounceTrigger,
    sequencer: SpeechSequencer,

    backend: Arc<dyn TranslationBackend>,
    recognizer: Box<dyn SpeechRecognizer>,

    /// Sender handed to dispatched calls so resolutions come back here.
    events: EventSender,
    session_events: Option<UnboundedSender<SessionEvent>>,
}

impl SessionController {
    pub fn new(
        settings: AppSettings,
        recognizer: Box<dyn SpeechRecognizer>,
        backend: Arc<dyn TranslationBackend>,
        engine: Box<dyn SpeechEngine>,
        events: EventSender,
        session_events: Option<UnboundedSender<SessionEvent>>,
    ) -> Self {
        let target =
            languages::find(&settings.target_language).unwrap_or_else(languages::default_language);
        let debounce = DebounceTrigger::new(Duration::from_millis(settings.debounce_ms));
        let sequencer = SpeechSequencer::new(engine, settings.voice);

        Self {
            settings,
            target,
            active: false,
            current_transcript: String::new(),
            previous_transcript: String::new(),
            translated_text: String::new(),
            error_message: String::new(),
            pending_calls: 0,
            next_seq: 0,
            applied_seq: 0,
            debounce,
            sequencer,
            backend,
            recognizer,
            events,
            session_events,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_translating(&self) -> bool {
        self.pending_calls > 0
    }

    pub fn target_language(&self) -> Language {
        self.target
    }

    /// Deadline of the pending translation attempt, for the session loop's
    /// timer.
    pub fn debounce_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    /// True once the session is stopped with no calls in flight and no
    /// utterance playing; the session loop uses this to finish.
    pub fn is_drained(&self) -> bool {
        !self.active && self.pending_calls == 0 && !self.sequencer.is_speaking()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            listening: self.active,
            transcript: self.current_transcript.clone(),
            translated_text: self.translated_text.clone(),
            previous_translation: self.sequencer.previous_translation().to_string(),
            is_translating: self.is_translating(),
            is_speaking: self.sequencer.is_speaking(),
            current_speaking_text: self.sequencer.current_speaking_text().to_string(),
            error_message: self.error_message.clone(),
            target_language: self.target.code.to_string(),
            auto_speak: self.settings.auto_speak,
        }
    }

    /// Start a listening session with fresh state. Fails when the recognizer
    /// is unavailable, which is fatal for the whole feature.
    pub fn start_listening(&mut self) -> Result<(), String> {
        if !self.recognizer.is_available() {
            return Err("Speech recognition is not available".to_string());
        }
        if self.active {
            debug!("Already listening, ignoring start");
            return Ok(());
        }

        // Fresh state for the new session. Results of calls issued before
        // this point can no longer apply.
        self.current_transcript.clear();
        self.previous_transcript.clear();
        self.translated_text.clear();
        self.error_message.clear();
        self.pending_calls = 0;
        self.applied_seq = self.next_seq;
        self.debounce.cancel();
        self.sequencer.reset();

        self.recognizer.reset_transcript();
        self.recognizer.start(&RecognizerOptions {
            continuous: true,
            source_language_tag: self.settings.source_language_tag.clone(),
        })?;

        self.active = true;
        info!("Listening session started (target: {})", self.target.code);
        self.emit(SessionEvent::Started);
        Ok(())
    }

    /// Stop the listening session: no further translation attempts fire and
    /// any in-progress utterance is cancelled. In-flight translation calls
    /// are not cancelled; their results are dropped at resolution time by
    /// the active-session guard.
    pub fn stop_listening(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.recognizer.stop();
        self.debounce.cancel();
        self.sequencer.cancel_active();
        info!("Listening session stopped");
        self.emit(SessionEvent::Stopped);
    }

    /// Stop listening and clear every piece of session state.
    pub fn reset(&mut self) {
        self.stop_listening();
        self.current_transcript.clear();
        self.previous_transcript.clear();
        self.translated_text.clear();
        self.error_message.clear();
        self.recognizer.reset_transcript();
        self.sequencer.reset();
        info!("Session state cleared");
    }

    /// Switch the translation target. Clears the translated text, forgets the
    /// previously spoken translation, and cancels any active utterance; the
    /// source-language transcript is independent of the target and survives.
    pub fn set_target_language(&mut self, code: &str) -> Result<(), String> {
        let language =
            languages::find(code).ok_or_else(|| format!("Unknown language code: {}", code))?;
        if language == self.target {
            return Ok(());
        }

        self.target = language;
        self.settings.target_language = code.to_string();
        self.translated_text.clear();
        self.sequencer.reset();
        // Calls still in flight were made for the old target; never apply
        // them.
        self.applied_seq = self.next_seq;

        info!("Target language changed to {}", language.display_name);
        Ok(())
    }

    pub fn set_auto_speak(&mut self, auto_speak: bool) {
        self.settings.auto_speak = auto_speak;
    }

    /// Speak the full current translation on demand, bypassing delta
    /// extraction. Returns whether an utterance was dispatched; disabled
    /// while speech is in progress or when there is nothing to speak.
    pub fn speak_translation(&mut self) -> bool {
        if is_blank(&self.translated_text) {
            return false;
        }
        let text = self.translated_text.clone();
        self.sequencer.speak_full(&text, &self.target)
    }

    /// Handle one pipeline event. `now` is passed in so tests can drive the
    /// debounce with a simulated clock.
    pub fn handle_event(&mut self, event: PipelineEvent, now: Instant) {
        match event {
            PipelineEvent::TranscriptChanged { text } => self.on_transcript_changed(text, now),
            PipelineEvent::ListeningChanged { listening } => {
                if !listening && self.active {
                    info!("Recognizer stopped listening");
                    self.stop_listening();
                }
            }
            PipelineEvent::TranslationResolved { seq, result } => {
                self.on_translation_resolved(seq, result)
            }
            PipelineEvent::UtteranceStarted { seq } => {
                if self.sequencer.on_started(seq) {
                    self.emit(SessionEvent::SpeakingChanged {
                        speaking: true,
                        text: self.sequencer.current_speaking_text().to_string(),
                    });
                }
            }
            PipelineEvent::UtteranceEnded { seq } => {
                if self.sequencer.on_ended(seq) {
                    self.emit(SessionEvent::SpeakingChanged {
                        speaking: false,
                        text: String::new(),
                    });
                }
            }
            PipelineEvent::UtteranceFailed { seq, message } => {
                if self.sequencer.on_failed(seq) {
                    error!("Speech synthesis failed: {}", message);
                    self.error_message = message.clone();
                    self.emit(SessionEvent::SpeechError { message });
                    self.emit(SessionEvent::SpeakingChanged {
                        speaking: false,
                        text: String::new(),
                    });
                }
            }
        }
    }

    /// Called by the session loop when the debounce deadline elapses.
    pub fn on_debounce_expired(&mut self, now: Instant) {
        if !self.debounce.fire(now) {
            return;
        }
        self.maybe_translate();
    }

    fn on_transcript_changed(&mut self, text: String, now: Instant) {
        if !self.active {
            debug!("Dropping transcript update after session stop");
            return;
        }
        if text == self.current_transcript {
            return;
        }

        self.current_transcript = text;
        self.debounce.note_update(now);
        self.emit(SessionEvent::TranscriptChanged {
            text: self.current_transcript.clone(),
        });
    }

    fn maybe_translate(&mut self) {
        if !self.active {
            return;
        }
        // A translation is triggered only when the transcript moved since the
        // last trigger.
        if self.current_transcript == self.previous_transcript {
            return;
        }
        if is_blank(&self.current_transcript) {
            debug!("Transcript is blank, skipping translation");
            return;
        }

        // Supersede before dispatch: a repeat of this transcript must not
        // trigger again while the call is in flight.
        self.previous_transcript = self.current_transcript.clone();

        self.next_seq += 1;
        self.pending_calls += 1;

        info!(
            "Dispatching translation call {} ({} chars)",
            self.next_seq,
            self.current_transcript.len()
        );
        self.emit(SessionEvent::TranslationStarted);

        // The whole accumulated transcript goes out every time; translating
        // only the delta would break coherence across sentence boundaries.
        self.backend.dispatch(
            TranslationRequest {
                seq: self.next_seq,
                text: self.current_transcript.clone(),
                target: self.target,
            },
            self.events.clone(),
        );
    }

    fn on_translation_resolved(&mut self, seq: u64, result: Result<String, String>) {
        self.pending_calls = self.pending_calls.saturating_sub(1);

        if !self.active {
            debug!("Dropping translation result {} after session stop", seq);
            return;
        }
        if seq <= self.applied_seq {
            debug!(
                "Dropping stale translation result {} (already applied {})",
                seq, self.applied_seq
            );
            return;
        }

        match result {
            Ok(text) => {
                self.applied_seq = seq;

                if is_blank(&text) {
                    debug!("Translation call {} resolved empty", seq);
                    return;
                }

                self.error_message.clear();
                let delta = if self.settings.auto_speak {
                    self.sequencer.speak_delta(&text, &self.target)
                } else {
                    String::new()
                };
                self.translated_text = text;

                self.emit(SessionEvent::TranslationUpdated {
                    text: self.translated_text.clone(),
                    delta,
                });
            }
            Err(message) => {
                // Accepting the failure keeps older in-flight calls from
                // applying on top of it later; the previous translated text
                // itself is preserved.
                self.applied_seq = seq;
                error!("Translation call {} failed: {}", seq, message);
                self.error_message = message.clone();
                self.emit(SessionEvent::TranslationError { message });
            }
        }
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(tx) = &self.session_events {
            let _ = tx.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::ScriptedRecognizer;
    use crate::speech::UtteranceRequest;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    const WINDOW: Duration = Duration::from_millis(1500);

    #[derive(Default)]
    struct RecordingBackend {
        requests: Mutex<Vec<TranslationRequest>>,
    }

    impl RecordingBackend {
        fn count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        fn last(&self) -> TranslationRequest {
            self.requests.lock().unwrap().last().unwrap().clone()
        }
    }

    impl TranslationBackend for RecordingBackend {
        fn dispatch(&self, request: TranslationRequest, _events: EventSender) {
            self.requests.lock().unwrap().push(request);
        }
    }

    #[derive(Default)]
    struct EngineLog {
        spoken: Vec<UtteranceRequest>,
        cancels: u32,
    }

    struct RecordingEngine {
        log: Arc<Mutex<EngineLog>>,
    }

    impl SpeechEngine for RecordingEngine {
        fn speak(&mut self, request: UtteranceRequest) {
            self.log.lock().unwrap().spoken.push(request);
        }

        fn cancel(&mut self) {
            self.log.lock().unwrap().cancels += 1;
        }
    }

    struct UnavailableRecognizer;

    impl SpeechRecognizer for UnavailableRecognizer {
        fn is_available(&self) -> bool {
            false
        }

        fn start(&mut self, _options: &RecognizerOptions) -> Result<(), String> {
            Err("unavailable".to_string())
        }

        fn stop(&mut self) {}

        fn reset_transcript(&mut self) {}
    }

    struct Harness {
        controller: SessionController,
        backend: Arc<RecordingBackend>,
        engine_log: Arc<Mutex<EngineLog>>,
        t0: Instant,
    }

    impl Harness {
        fn new(settings: AppSettings) -> Self {
            let (tx, _rx) = pipeline_channel();
            let backend = Arc::new(RecordingBackend::default());
            let engine_log = Arc::new(Mutex::new(EngineLog::default()));
            let controller = SessionController::new(
                settings,
                Box::new(ScriptedRecognizer::new(tx.clone())),
                backend.clone(),
                Box::new(RecordingEngine {
                    log: engine_log.clone(),
                }),
                tx,
                None,
            );

            Self {
                controller,
                backend,
                engine_log,
                t0: Instant::now(),
            }
        }

        fn started(settings: AppSettings) -> Self {
            let mut harness = Self::new(settings);
            harness.controller.start_listening().unwrap();
            harness
        }

        fn at(&self, ms: u64) -> Instant {
            self.t0 + Duration::from_millis(ms)
        }

        fn transcript(&mut self, text: &str, ms: u64) {
            let now = self.at(ms);
            self.controller.handle_event(
                PipelineEvent::TranscriptChanged {
                    text: text.to_string(),
                },
                now,
            );
        }

        fn expire_debounce(&mut self, ms: u64) {
            let now = self.at(ms);
            self.controller.on_debounce_expired(now);
        }

        fn resolve(&mut self, seq: u64, result: Result<&str, &str>) {
            self.controller.handle_event(
                PipelineEvent::TranslationResolved {
                    seq,
                    result: result.map(str::to_string).map_err(str::to_string),
                },
                self.at(0),
            );
        }

        fn spoken_texts(&self) -> Vec<String> {
            self.engine_log
                .lock()
                .unwrap()
                .spoken
                .iter()
                .map(|r| r.text.clone())
                .collect()
        }
    }

    #[test]
    fn test_first_phrase_translated_and_spoken() {
        let mut h = Harness::started(AppSettings::default());

        h.transcript("Olá", 0);
        assert_eq!(h.controller.debounce_deadline(), Some(h.at(1500)));

        h.expire_debounce(1500);
        assert_eq!(h.backend.count(), 1);
        let request = h.backend.last();
        assert_eq!(request.seq, 1);
        assert_eq!(request.text, "Olá");
        assert_eq!(request.target.code, "en");
        assert!(h.controller.is_translating());

        h.resolve(1, Ok("Hello"));
        assert!(!h.controller.is_translating());
        let snapshot = h.controller.snapshot();
        assert_eq!(snapshot.translated_text, "Hello");
        assert_eq!(snapshot.previous_translation, "Hello");
        assert_eq!(h.spoken_texts(), vec!["Hello".to_string()]);
    }

    #[test]
    fn test_growing_transcript_speaks_only_the_suffix() {
        let mut h = Harness::started(AppSettings::default());

        h.transcript("Olá", 0);
        h.expire_debounce(1500);
        h.resolve(1, Ok("Hello"));

        h.transcript("Olá, como vai?", 2000);
        h.expire_debounce(3500);
        assert_eq!(h.backend.count(), 2);
        // The whole accumulated transcript goes out, not the delta.
        assert_eq!(h.backend.last().text, "Olá, como vai?");

        h.resolve(2, Ok("Hello, how are you?"));
        assert_eq!(
            h.spoken_texts(),
            vec!["Hello".to_string(), ", how are you?".to_string()]
        );
        assert_eq!(
            h.controller.snapshot().previous_translation,
            "Hello, how are you?"
        );
    }

    #[test]
    fn test_reworded_translation_is_spoken_in_full() {
        let mut h = Harness::started(AppSettings::default());

        h.transcript("Olá", 0);
        h.expire_debounce(1500);
        h.resolve(1, Ok("Hello"));

        h.transcript("Olá, tudo bem?", 2000);
        h.expire_debounce(3500);
        h.resolve(2, Ok("Hi, how's it going?"));

        assert_eq!(
            h.spoken_texts(),
            vec!["Hello".to_string(), "Hi, how's it going?".to_string()]
        );
    }

    #[test]
    fn test_rapid_updates_produce_a_single_call() {
        let mut h = Harness::started(AppSettings::default());

        h.transcript("Olá", 0);
        h.transcript("Olá como", 400);
        h.transcript("Olá como vai", 800);

        // The earlier deadlines never fire; only the last one is live.
        h.expire_debounce(1500);
        h.expire_debounce(1900);
        assert_eq!(h.backend.count(), 0);

        h.expire_debounce(2300);
        assert_eq!(h.backend.count(), 1);
        assert_eq!(h.backend.last().text, "Olá como vai");
    }

    #[test]
    fn test_stop_before_debounce_fires_cancels_the_attempt() {
        let mut h = Harness::started(AppSettings::default());

        h.transcript("Olá", 0);
        h.controller.stop_listening();

        assert_eq!(h.controller.debounce_deadline(), None);
        h.expire_debounce(1500);
        assert_eq!(h.backend.count(), 0);
    }

    #[test]
    fn test_unchanged_transcript_does_not_retrigger() {
        let mut h = Harness::started(AppSettings::default());

        h.transcript("Olá", 0);
        h.expire_debounce(1500);
        assert_eq!(h.backend.count(), 1);

        // The recognizer repeats the same transcript; no new attempt.
        h.transcript("Olá", 2000);
        h.expire_debounce(3500);
        assert_eq!(h.backend.count(), 1);
    }

    #[test]
    fn test_blank_transcript_short_circuits() {
        let mut h = Harness::started(AppSettings::default());

        h.transcript("   ", 0);
        h.expire_debounce(1500);
        assert_eq!(h.backend.count(), 0);
    }

    #[test]
    fn test_out_of_order_resolution_is_dropped() {
        let mut h = Harness::started(AppSettings::default());

        h.transcript("Olá", 0);
        h.expire_debounce(1500);
        h.transcript("Olá, como vai?", 2000);
        h.expire_debounce(3500);
        assert_eq!(h.backend.count(), 2);
        assert!(h.controller.is_translating());

        // The newer call resolves first; the older one is stale.
        h.resolve(2, Ok("Hello, how are you?"));
        h.resolve(1, Ok("Hello"));

        let snapshot = h.controller.snapshot();
        assert_eq!(snapshot.translated_text, "Hello, how are you?");
        assert!(!snapshot.is_translating);
        assert_eq!(h.spoken_texts(), vec!["Hello, how are you?".to_string()]);
    }

    #[test]
    fn test_resolution_after_stop_is_dropped() {
        let mut h = Harness::started(AppSettings::default());

        h.transcript("Olá", 0);
        h.expire_debounce(1500);
        h.controller.stop_listening();

        h.resolve(1, Ok("Hello"));

        let snapshot = h.controller.snapshot();
        assert_eq!(snapshot.translated_text, "");
        assert!(!snapshot.is_translating);
        assert!(h.spoken_texts().is_empty());
    }

    #[test]
    fn test_translation_failure_preserves_previous_text() {
        let mut h = Harness::started(AppSettings::default());

        h.transcript("Olá", 0);
        h.expire_debounce(1500);
        h.resolve(1, Ok("Hello"));

        h.transcript("Olá, como vai?", 2000);
        h.expire_debounce(3500);
        h.resolve(2, Err("API request failed with status 429"));

        let snapshot = h.controller.snapshot();
        assert_eq!(snapshot.translated_text, "Hello");
        assert_eq!(snapshot.error_message, "API request failed with status 429");
        assert!(!snapshot.is_translating);

        // The next cycle succeeds independently and clears the error.
        h.transcript("Olá, como vai? Tudo bem.", 5000);
        h.expire_debounce(6500);
        h.resolve(3, Ok("Hello, how are you? All good."));
        let snapshot = h.controller.snapshot();
        assert_eq!(snapshot.error_message, "");
        assert_eq!(snapshot.translated_text, "Hello, how are you? All good.");
    }

    #[test]
    fn test_language_change_clears_translation_but_not_transcript() {
        let mut h = Harness::started(AppSettings::default());

        h.transcript("Olá", 0);
        h.expire_debounce(1500);
        h.resolve(1, Ok("Hello"));
        h.controller
            .handle_event(PipelineEvent::UtteranceStarted { seq: 1 }, h.at(1600));
        assert!(h.controller.snapshot().is_speaking);

        h.controller.set_target_language("es").unwrap();

        let snapshot = h.controller.snapshot();
        assert_eq!(snapshot.target_language, "es");
        assert_eq!(snapshot.translated_text, "");
        assert_eq!(snapshot.previous_translation, "");
        assert!(!snapshot.is_speaking);
        assert_eq!(snapshot.transcript, "Olá");
        assert_eq!(h.engine_log.lock().unwrap().cancels, 1);
    }

    #[test]
    fn test_language_change_drops_in_flight_results() {
        let mut h = Harness::started(AppSettings::default());

        h.transcript("Olá", 0);
        h.expire_debounce(1500);
        h.controller.set_target_language("fr").unwrap();

        // The call was made for English; it must not apply.
        h.resolve(1, Ok("Hello"));
        assert_eq!(h.controller.snapshot().translated_text, "");
    }

    #[test]
    fn test_unknown_language_code_is_rejected() {
        let mut h = Harness::started(AppSettings::default());
        assert!(h.controller.set_target_language("xx").is_err());
        assert_eq!(h.controller.snapshot().target_language, "en");
    }

    #[test]
    fn test_auto_speak_off_updates_text_without_speaking() {
        let settings = AppSettings {
            auto_speak: false,
            ..AppSettings::default()
        };
        let mut h = Harness::started(settings);

        h.transcript("Olá", 0);
        h.expire_debounce(1500);
        h.resolve(1, Ok("Hello"));

        let snapshot = h.controller.snapshot();
        assert_eq!(snapshot.translated_text, "Hello");
        assert_eq!(snapshot.previous_translation, "");
        assert!(h.spoken_texts().is_empty());
    }

    #[test]
    fn test_manual_speak_uses_the_full_translation() {
        let settings = AppSettings {
            auto_speak: false,
            ..AppSettings::default()
        };
        let mut h = Harness::started(settings);

        h.transcript("Olá, como vai?", 0);
        h.expire_debounce(1500);
        h.resolve(1, Ok("Hello, how are you?"));

        assert!(h.controller.speak_translation());
        assert_eq!(h.spoken_texts(), vec!["Hello, how are you?".to_string()]);

        // Disabled while the utterance is playing.
        h.controller
            .handle_event(PipelineEvent::UtteranceStarted { seq: 1 }, h.at(1600));
        assert!(!h.controller.speak_translation());
    }

    #[test]
    fn test_manual_speak_with_no_translation_is_a_no_op() {
        let mut h = Harness::started(AppSettings::default());
        assert!(!h.controller.speak_translation());
    }

    #[test]
    fn test_speech_failure_clears_speaking_state_only() {
        let mut h = Harness::started(AppSettings::default());

        h.transcript("Olá", 0);
        h.expire_debounce(1500);
        h.resolve(1, Ok("Hello"));
        h.controller
            .handle_event(PipelineEvent::UtteranceStarted { seq: 1 }, h.at(1600));

        h.controller.handle_event(
            PipelineEvent::UtteranceFailed {
                seq: 1,
                message: "synthesis unavailable".to_string(),
            },
            h.at(1700),
        );

        let snapshot = h.controller.snapshot();
        assert!(!snapshot.is_speaking);
        assert_eq!(snapshot.current_speaking_text, "");
        assert_eq!(snapshot.error_message, "synthesis unavailable");
        // The translation pipeline is unaffected.
        assert_eq!(snapshot.translated_text, "Hello");
    }

    #[test]
    fn test_unavailable_recognizer_is_fatal() {
        let (tx, _rx) = pipeline_channel();
        let backend = Arc::new(RecordingBackend::default());
        let engine_log = Arc::new(Mutex::new(EngineLog::default()));
        let mut controller = SessionController::new(
            AppSettings::default(),
            Box::new(UnavailableRecognizer),
            backend.clone(),
            Box::new(RecordingEngine { log: engine_log }),
            tx,
            None,
        );

        assert!(controller.start_listening().is_err());
        assert!(!controller.is_active());
    }

    #[test]
    fn test_recognizer_initiated_stop_tears_the_session_down() {
        let mut h = Harness::started(AppSettings::default());

        h.transcript("Olá", 0);
        h.controller
            .handle_event(PipelineEvent::ListeningChanged { listening: false }, h.at(100));

        assert!(!h.controller.is_active());
        assert_eq!(h.controller.debounce_deadline(), None);
    }

    #[test]
    fn test_restart_drops_results_from_the_previous_session() {
        let mut h = Harness::started(AppSettings::default());

        h.transcript("Olá", 0);
        h.expire_debounce(1500);
        h.controller.stop_listening();
        h.controller.start_listening().unwrap();

        // Call 1 belongs to the dead session.
        h.resolve(1, Ok("Hello"));
        assert_eq!(h.controller.snapshot().translated_text, "");
    }

    #[test]
    fn test_overlapping_calls_keep_busy_flag_until_both_resolve() {
        let mut h = Harness::started(AppSettings::default());

        h.transcript("Olá", 0);
        h.expire_debounce(1500);
        h.transcript("Olá, como vai?", 2000);
        h.expire_debounce(3500);
        assert!(h.controller.is_translating());

        h.resolve(1, Ok("Hello"));
        assert!(h.controller.is_translating());
        h.resolve(2, Ok("Hello, how are you?"));
        assert!(!h.controller.is_translating());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut h = Harness::started(AppSettings::default());

        h.transcript("Olá", 0);
        h.expire_debounce(1500);
        h.resolve(1, Ok("Hello"));
        h.controller.reset();

        let snapshot = h.controller.snapshot();
        assert!(!snapshot.listening);
        assert_eq!(snapshot.transcript, "");
        assert_eq!(snapshot.translated_text, "");
        assert_eq!(snapshot.previous_translation, "");
        assert_eq!(snapshot.error_message, "");
    }

    #[test]
    fn test_is_drained_tracks_outstanding_work() {
        let mut h = Harness::started(AppSettings::default());
        assert!(!h.controller.is_drained());

        h.transcript("Olá", 0);
        h.expire_debounce(1500);
        h.controller.stop_listening();

        // Still waiting on the in-flight call.
        assert!(!h.controller.is_drained());
        h.resolve(1, Ok("Hello"));
        assert!(h.controller.is_drained());
    }
}
