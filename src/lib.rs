//! Parrot - real-time speech translation.
//!
//! Consumes a continuously growing transcript from a speech-to-text engine,
//! translates the accumulated text after each pause in speech, and speaks
//! back only the newly translated portion. The recognition, translation, and
//! synthesis engines are external collaborators behind traits; everything in
//! `pipeline` is deterministic and driven through a single event channel.

pub mod cli;
pub mod languages;
pub mod pipeline;
pub mod recognizer;
pub mod settings;
pub mod speech;
pub mod text;
pub mod translator;

pub use languages::Language;
pub use pipeline::{Session, SessionController, SessionEvent, SessionSnapshot};
pub use settings::AppSettings;
