use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "parrot", about = "Parrot - real-time speech translation")]
pub struct CliArgs {
    /// Target language code (en, es, fr, de, ru, it, pt, zh, ja, ar, hi, ko)
    #[arg(long, default_value = "en")]
    pub language: String,

    /// Recognition language tag for the speech-to-text engine
    #[arg(long, default_value = "pt-BR")]
    pub source: String,

    /// Do not speak translations automatically as they arrive
    #[arg(long)]
    pub no_speak: bool,

    /// Quiescence window in milliseconds before a translation attempt fires
    #[arg(long, default_value_t = 1500)]
    pub debounce_ms: u64,

    /// Echo the source text instead of calling the translation API
    #[arg(long)]
    pub offline: bool,

    /// Enable debug mode with verbose logging
    #[arg(long)]
    pub debug: bool,
}
