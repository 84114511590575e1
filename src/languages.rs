//! Supported target languages for translation and speech synthesis.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// A translation target. `speech_tag` is the BCP-47 tag handed to the speech
/// synthesis engine, which is not always derivable from the short code
/// (e.g. `pt` speaks as `pt-BR`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    pub code: &'static str,
    pub display_name: &'static str,
    pub native_name: &'static str,
    pub speech_tag: &'static str,
}

pub static LANGUAGES: &[Language] = &[
    Language { code: "en", display_name: "English", native_name: "English", speech_tag: "en-US" },
    Language { code: "es", display_name: "Spanish", native_name: "Español", speech_tag: "es-ES" },
    Language { code: "fr", display_name: "French", native_name: "Français", speech_tag: "fr-FR" },
    Language { code: "de", display_name: "German", native_name: "Deutsch", speech_tag: "de-DE" },
    Language { code: "ru", display_name: "Russian", native_name: "Русский", speech_tag: "ru-RU" },
    Language { code: "it", display_name: "Italian", native_name: "Italiano", speech_tag: "it-IT" },
    Language { code: "pt", display_name: "Portuguese", native_name: "Português", speech_tag: "pt-BR" },
    Language { code: "zh", display_name: "Chinese", native_name: "中文", speech_tag: "zh-CN" },
    Language { code: "ja", display_name: "Japanese", native_name: "日本語", speech_tag: "ja-JP" },
    Language { code: "ar", display_name: "Arabic", native_name: "العربية", speech_tag: "ar-SA" },
    Language { code: "hi", display_name: "Hindi", native_name: "हिन्दी", speech_tag: "hi-IN" },
    Language { code: "ko", display_name: "Korean", native_name: "한국어", speech_tag: "ko-KR" },
];

static BY_CODE: Lazy<HashMap<&'static str, &'static Language>> =
    Lazy::new(|| LANGUAGES.iter().map(|lang| (lang.code, lang)).collect());

/// Look up a language by its short code.
pub fn find(code: &str) -> Option<Language> {
    BY_CODE.get(code).map(|lang| **lang)
}

/// Default translation target (English).
pub fn default_language() -> Language {
    LANGUAGES[0]
}
