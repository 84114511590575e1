//! Incremental transcript-translation-speech pipeline.
//!
//! Watches the cumulative transcript from a speech recognizer, waits for a
//! quiescence window, translates the whole transcript, and speaks only the
//! newly translated portion.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       SessionController                             │
//! │                                                                     │
//! │  ┌─────────────────┐    ┌──────────────────┐    ┌───────────────┐   │
//! │  │ DebounceTrigger │───▶│ TranslationBackend│──▶│ SpeechSequencer│  │
//! │  │ (quiescence)    │    │ (full transcript) │   │ (delta speech) │  │
//! │  └─────────────────┘    └──────────────────┘    └───────────────┘   │
//! │         ▲                         │                     │           │
//! │         │                         ▼                     ▼           │
//! │  ┌──────────────────────────────────────────────────────────────┐   │
//! │  │                    PipelineEvent channel                     │   │
//! │  │  transcript updates · translation resolutions · speech       │   │
//! │  │  lifecycle callbacks, all handled on one thread              │   │
//! │  └──────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

mod controller;
mod debounce;
mod sequencer;
mod session;

pub use controller::{
    pipeline_channel, EventReceiver, EventSender, PipelineEvent, SessionController, SessionEvent,
    SessionSnapshot,
};
pub use debounce::DebounceTrigger;
pub use sequencer::SpeechSequencer;
pub use session::Session;
