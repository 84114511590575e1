//! Speech synthesis collaborator boundary.
//!
//! The pipeline never talks to a synthesis engine directly; it goes through
//! the `SpeechEngine` trait so tests can substitute a fake and the demo
//! binary can print utterances instead of playing audio.

use crate::pipeline::{EventSender, PipelineEvent};
use crate::settings::VoiceTuning;
use serde::Serialize;

/// One unit of speech playback handed to the engine. `seq` ties the engine's
/// lifecycle callbacks back to the utterance they belong to.
#[derive(Debug, Clone, Serialize)]
pub struct UtteranceRequest {
    pub seq: u64,
    pub text: String,
    pub speech_tag: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl UtteranceRequest {
    pub fn new(seq: u64, text: String, speech_tag: String, tuning: VoiceTuning) -> Self {
        Self {
            seq,
            text,
            speech_tag,
            rate: tuning.rate,
            pitch: tuning.pitch,
            volume: tuning.volume,
        }
    }
}

pub trait SpeechEngine: Send {
    /// Begin playback. The engine must report `UtteranceStarted`, then exactly
    /// one of `UtteranceEnded` or `UtteranceFailed`, all carrying the
    /// request's `seq`. Whether a cancelled utterance still reports its end
    /// is engine-dependent; the sequencer tolerates both.
    fn speak(&mut self, request: UtteranceRequest);

    /// Stop any in-progress utterance.
    fn cancel(&mut self);
}

/// Prints utterances to stdout in place of playing audio. Used by the demo
/// binary; playback is instantaneous, so every utterance starts and ends
/// within the same call.
pub struct ConsoleSpeechEngine {
    events: EventSender,
}

impl ConsoleSpeechEngine {
    pub fn new(events: EventSender) -> Self {
        Self { events }
    }
}

impl SpeechEngine for ConsoleSpeechEngine {
    fn speak(&mut self, request: UtteranceRequest) {
        let _ = self
            .events
            .send(PipelineEvent::UtteranceStarted { seq: request.seq });

        println!("[speak {}] {}", request.speech_tag, request.text);

        let _ = self
            .events
            .send(PipelineEvent::UtteranceEnded { seq: request.seq });
    }

    fn cancel(&mut self) {
        // Printed utterances complete immediately; there is never anything
        // in progress to stop.
    }
}
