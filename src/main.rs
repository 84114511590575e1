//! Demo driver for the translation pipeline.
//!
//! Each line typed on stdin is treated as a recognized phrase and appended to
//! the cumulative transcript, the way a continuous recognition session grows
//! it. Translations are printed, and "spoken" output goes through the console
//! speech engine. End the stream with Ctrl-D.

use anyhow::Result;
use clap::Parser;
use log::info;
use parrot::cli::CliArgs;
use parrot::pipeline::{pipeline_channel, Session, SessionController, SessionEvent};
use parrot::recognizer::ScriptedRecognizer;
use parrot::settings::AppSettings;
use parrot::speech::ConsoleSpeechEngine;
use parrot::translator::{ClaudeTranslator, EchoTranslator, TranslationBackend};
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if args.debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    let settings = AppSettings {
        debounce_ms: args.debounce_ms,
        auto_speak: !args.no_speak,
        source_language_tag: args.source.clone(),
        target_language: args.language.clone(),
        ..AppSettings::default()
    };

    let target = parrot::languages::find(&settings.target_language)
        .ok_or_else(|| anyhow::anyhow!("Unknown language code: {}", settings.target_language))?;

    let backend: Arc<dyn TranslationBackend> = if args.offline {
        Arc::new(EchoTranslator)
    } else {
        Arc::new(ClaudeTranslator::new())
    };

    let (tx, rx) = pipeline_channel();
    let recognizer = ScriptedRecognizer::new(tx.clone());
    let feed = recognizer.feed();
    let engine = ConsoleSpeechEngine::new(tx.clone());

    let (session_tx, mut session_rx) = mpsc::unbounded_channel();
    let target_name = target.display_name;
    let printer = tokio::spawn(async move {
        while let Some(event) = session_rx.recv().await {
            match event {
                SessionEvent::TranscriptChanged { text } => println!("[heard] {}", text),
                SessionEvent::TranslationUpdated { text, .. } => {
                    println!("[{}] {}", target_name, text)
                }
                SessionEvent::TranslationError { message } => eprintln!("[error] {}", message),
                SessionEvent::SpeechError { message } => eprintln!("[error] {}", message),
                _ => {}
            }
        }
    });

    let controller = SessionController::new(
        settings,
        Box::new(recognizer),
        backend,
        Box::new(engine),
        tx,
        Some(session_tx),
    );
    let mut session = Session::new(controller, rx);
    session
        .controller_mut()
        .start_listening()
        .map_err(anyhow::Error::msg)?;

    info!(
        "Translating {} speech to {}; type phrases, Ctrl-D to finish",
        args.source, target.display_name
    );

    let reader_feed = feed.clone();
    let reader = tokio::spawn(async move {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();
        while let Ok(Some(line)) = lines.next_line().await {
            reader_feed.push(&line);
        }
        reader_feed.finish();
    });

    session.run().await;
    reader.await?;

    drop(session);
    printer.await?;

    Ok(())
}
