//! Language identification.

use super::integrity::is_devanagari;

/// Identify the language of a text.
///
/// Returns a raw label (ISO 639-1 code) or `None` when no decision can be
/// made. Labels are not restricted; the normalizer maps anything outside
/// the supported set to English.
pub trait LanguageIdentifier: Send + Sync {
    /// Detect the language of `text`.
    fn identify(&self, text: &str) -> Option<String>;
}

/// Words and characters that only Marathi uses among the two Devanagari
/// languages handled here.
const MARATHI_MARKERS: &[&str] = &[
    "आहे", "आहेत", "आणि", "नाही", "च्या", "मध्ये", "होते", "केले", "हे", "या",
];

const HINDI_MARKERS: &[&str] = &[
    "है", "हैं", "और", "के", "की", "में", "नहीं", "था", "थे", "किया", "यह",
];

/// Script-share identifier.
///
/// Latin-majority text is English. Devanagari-majority text is Marathi
/// when Marathi markers (including the letter ळ) outnumber Hindi markers,
/// Hindi otherwise. Text without letters yields `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptIdentifier;

impl ScriptIdentifier {
    /// Create an identifier.
    pub fn new() -> Self {
        Self
    }

    fn devanagari_label(text: &str) -> &'static str {
        let mut marathi = text.chars().filter(|c| *c == 'ळ').count();
        let mut hindi = 0usize;
        for word in text.split(|c: char| !is_devanagari(c) || c == '।' || c == '॥') {
            if word.is_empty() {
                continue;
            }
            if MARATHI_MARKERS.contains(&word) || word.ends_with("च्या") {
                marathi += 1;
            }
            if HINDI_MARKERS.contains(&word) {
                hindi += 1;
            }
        }
        if marathi > hindi {
            "mr"
        } else {
            "hi"
        }
    }
}

impl LanguageIdentifier for ScriptIdentifier {
    fn identify(&self, text: &str) -> Option<String> {
        let mut devanagari = 0usize;
        let mut latin = 0usize;
        let mut other = 0usize;
        for c in text.chars().filter(|c| c.is_alphabetic()) {
            if is_devanagari(c) {
                devanagari += 1;
            } else if c.is_ascii_alphabetic() {
                latin += 1;
            } else {
                other += 1;
            }
        }

        if devanagari == 0 && latin == 0 {
            return None;
        }
        if other > devanagari + latin {
            return None;
        }
        let label = if devanagari >= latin {
            Self::devanagari_label(text)
        } else {
            "en"
        };
        Some(label.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identify(text: &str) -> Option<String> {
        ScriptIdentifier::new().identify(text)
    }

    #[test]
    fn test_english() {
        assert_eq!(identify("Introduction to Methods").as_deref(), Some("en"));
        assert_eq!(identify("INTRODUCTION").as_deref(), Some("en"));
    }

    #[test]
    fn test_hindi() {
        assert_eq!(identify("यह एक परिचय है").as_deref(), Some("hi"));
        assert_eq!(identify("परिचय").as_deref(), Some("hi"));
    }

    #[test]
    fn test_marathi() {
        assert_eq!(identify("हा एक परिचय आहे").as_deref(), Some("mr"));
        assert_eq!(identify("महाराष्ट्राच्या शाळा").as_deref(), Some("mr"));
    }

    #[test]
    fn test_no_letters() {
        assert_eq!(identify("12.5 %"), None);
        assert_eq!(identify(""), None);
    }

    #[test]
    fn test_other_script() {
        assert_eq!(identify("Введение"), None);
    }
}
