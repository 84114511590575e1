//! Speech-to-text collaborator boundary.
//!
//! The recognition engine produces one cumulative transcript per listening
//! session. Transcript growth and listening-state changes arrive at the
//! pipeline as events; the trait below only carries the control surface.

use crate::pipeline::{EventSender, PipelineEvent};
use log::{debug, info};
use serde::Serialize;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Serialize)]
pub struct RecognizerOptions {
    pub continuous: bool,
    pub source_language_tag: String,
}

pub trait SpeechRecognizer: Send {
    /// Whether the engine can run at all. A `false` here is fatal for the
    /// whole feature; no pipeline logic runs.
    fn is_available(&self) -> bool {
        true
    }

    fn start(&mut self, options: &RecognizerOptions) -> Result<(), String>;

    fn stop(&mut self);

    fn reset_transcript(&mut self);
}

struct ScriptedInner {
    transcript: String,
    listening: bool,
    events: EventSender,
}

/// A recognizer whose transcript is fed programmatically, one phrase at a
/// time. Each pushed phrase extends the cumulative transcript the way a
/// continuous recognition session would.
pub struct ScriptedRecognizer {
    inner: Arc<Mutex<ScriptedInner>>,
}

/// Cloneable handle for pushing text into a `ScriptedRecognizer` that has
/// been handed off to a session.
#[derive(Clone)]
pub struct TranscriptFeed {
    inner: Arc<Mutex<ScriptedInner>>,
}

impl ScriptedRecognizer {
    pub fn new(events: EventSender) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ScriptedInner {
                transcript: String::new(),
                listening: false,
                events,
            })),
        }
    }

    pub fn feed(&self) -> TranscriptFeed {
        TranscriptFeed {
            inner: self.inner.clone(),
        }
    }
}

impl TranscriptFeed {
    /// Append a phrase to the transcript. Ignored while the recognizer is
    /// not listening, as a real engine hears nothing when stopped.
    pub fn push(&self, phrase: &str) {
        let mut inner = self.inner.lock().unwrap();

        if !inner.listening {
            debug!("Dropping phrase while not listening: '{}'", phrase);
            return;
        }

        let phrase = phrase.trim();
        if phrase.is_empty() {
            return;
        }

        if !inner.transcript.is_empty() {
            inner.transcript.push(' ');
        }
        inner.transcript.push_str(phrase);

        let text = inner.transcript.clone();
        let _ = inner.events.send(PipelineEvent::TranscriptChanged { text });
    }

    /// Report the end of the recognition stream, as when the microphone goes
    /// away. The pipeline sees the same listening-state change a real engine
    /// would emit.
    pub fn finish(&self) {
        let mut inner = self.inner.lock().unwrap();
        if inner.listening {
            inner.listening = false;
            let _ = inner
                .events
                .send(PipelineEvent::ListeningChanged { listening: false });
        }
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn start(&mut self, options: &RecognizerOptions) -> Result<(), String> {
        let mut inner = self.inner.lock().unwrap();
        inner.listening = true;
        info!(
            "Scripted recognizer started ({}, continuous={})",
            options.source_language_tag, options.continuous
        );
        Ok(())
    }

    fn stop(&mut self) {
        self.inner.lock().unwrap().listening = false;
    }

    fn reset_transcript(&mut self) {
        self.inner.lock().unwrap().transcript.clear();
    }
}
