//! Delta speech sequencer.
//!
//! Owns the speech engine handle and the single "currently speaking" slot.
//! Compares each new translation against the last spoken one, dispatches only
//! the unseen suffix, and keeps utterances non-overlapping and non-duplicate.
//! All mutation of the speaking state goes through this type.

use crate::languages::Language;
use crate::settings::VoiceTuning;
use crate::speech::{SpeechEngine, UtteranceRequest};
use crate::text::{extract_delta, is_blank};
use log::debug;

pub struct SpeechSequencer {
    engine: Box<dyn SpeechEngine>,
    tuning: VoiceTuning,
    /// Text of the utterance currently playing; empty when idle.
    current_speaking_text: String,
    is_speaking: bool,
    /// Bumped for every dispatched utterance. Engine callbacks carry the
    /// number they belong to, so a late callback from a cancelled utterance
    /// cannot disturb the one that replaced it.
    utterance_seq: u64,
    /// The last translation for which speech was dispatched.
    previous_translation: String,
}

impl SpeechSequencer {
    pub fn new(engine: Box<dyn SpeechEngine>, tuning: VoiceTuning) -> Self {
        Self {
            engine,
            tuning,
            current_speaking_text: String::new(),
            is_speaking: false,
            utterance_seq: 0,
            previous_translation: String::new(),
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.is_speaking
    }

    pub fn current_speaking_text(&self) -> &str {
        self.current_speaking_text.as_str()
    }

    pub fn previous_translation(&self) -> &str {
        self.previous_translation.as_str()
    }

    /// Speak the unseen portion of `translation`, then record the full string
    /// as the last spoken translation. The record is updated only after the
    /// delta has been computed and dispatched; reordering that would make
    /// every delta empty. Returns the delta for reporting.
    pub fn speak_delta(&mut self, translation: &str, target: &Language) -> String {
        let delta = extract_delta(translation, &self.previous_translation).to_string();

        if !is_blank(&delta) {
            self.speak(&delta, target);
        }

        self.previous_translation = translation.to_string();
        delta
    }

    /// Speak the full text, bypassing delta extraction. Disabled while speech
    /// is already in progress. Returns whether an utterance was dispatched.
    pub fn speak_full(&mut self, text: &str, target: &Language) -> bool {
        if self.is_speaking {
            debug!("Speech in progress, ignoring manual speak request");
            return false;
        }
        self.speak(text, target)
    }

    fn speak(&mut self, text: &str, target: &Language) -> bool {
        if is_blank(text) {
            return false;
        }

        // Idempotence against duplicate triggers: identical content is never
        // played twice concurrently.
        if text == self.current_speaking_text {
            debug!("Already speaking this text, ignoring");
            return false;
        }

        if !self.current_speaking_text.is_empty() {
            self.engine.cancel();
        }

        self.utterance_seq += 1;
        self.current_speaking_text = text.to_string();

        self.engine.speak(UtteranceRequest::new(
            self.utterance_seq,
            text.to_string(),
            target.speech_tag.to_string(),
            self.tuning,
        ));

        true
    }

    /// Engine reported playback start. Stale numbers are ignored.
    pub fn on_started(&mut self, seq: u64) -> bool {
        if seq == self.utterance_seq && !self.current_speaking_text.is_empty() {
            self.is_speaking = true;
            return true;
        }
        debug!("Ignoring start callback for stale utterance {}", seq);
        false
    }

    /// Engine reported playback end. Returns true when this closed the
    /// current utterance; callbacks for superseded utterances are ignored,
    /// so engines that report cancelled utterances and engines that do not
    /// both leave the state machine consistent.
    pub fn on_ended(&mut self, seq: u64) -> bool {
        if seq == self.utterance_seq && !self.current_speaking_text.is_empty() {
            self.is_speaking = false;
            self.current_speaking_text.clear();
            return true;
        }
        debug!("Ignoring end callback for stale utterance {}", seq);
        false
    }

    /// Engine reported a playback failure. Same staleness rules as `on_ended`.
    pub fn on_failed(&mut self, seq: u64) -> bool {
        self.on_ended(seq)
    }

    /// Cancel any in-progress utterance and clear the speaking slot.
    pub fn cancel_active(&mut self) -> bool {
        if self.current_speaking_text.is_empty() && !self.is_speaking {
            return false;
        }
        self.engine.cancel();
        self.is_speaking = false;
        self.current_speaking_text.clear();
        true
    }

    /// Cancel active speech and forget the previously spoken translation.
    /// Used when a session starts or resets and when the target language
    /// changes, since a previous translation in another language must never
    /// seed a delta.
    pub fn reset(&mut self) {
        self.cancel_active();
        self.previous_translation.clear();
    }
}
