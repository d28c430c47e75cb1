//! Unicode-range language detection for synthesis text.

/// Default language when detection is inconclusive.
pub(crate) const DEFAULT_LANGUAGE: &str = "zh";

/// Detects the dominant script of `text`, returning an ISO 639-1 code.
///
/// A script must cover more than 30% of the characters to win; Latin maps
/// to `en`. Anything inconclusive returns `default`.
pub fn detect_language(text: &str, default: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return default.to_string();
    }

    let mut chinese = 0usize;
    let mut japanese = 0usize;
    let mut korean = 0usize;
    let mut latin = 0usize;
    let mut total = 0usize;

    for c in trimmed.chars() {
        let code = c as u32;
        total += 1;

        // CJK Unified Ideographs, Extension A, and the compatibility block.
        if (0x4E00..=0x9FFF).contains(&code)
            || (0x3400..=0x4DBF).contains(&code)
            || (0xF900..=0xFAFF).contains(&code)
        {
            chinese += 1;
        } else if (0x3040..=0x309F).contains(&code) || (0x30A0..=0x30FF).contains(&code) {
            // Hiragana and Katakana.
            japanese += 1;
        } else if (0xAC00..=0xD7AF).contains(&code) {
            // Hangul syllables.
            korean += 1;
        } else if c.is_ascii_alphabetic() {
            latin += 1;
        }
    }

    let threshold = total as f64 * 0.3;
    if japanese as f64 > threshold {
        return "ja".to_string();
    }
    if korean as f64 > threshold {
        return "ko".to_string();
    }
    if chinese as f64 > threshold {
        return "zh".to_string();
    }
    if latin as f64 > threshold {
        return "en".to_string();
    }
    default.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chinese() {
        assert_eq!(detect_language("你好，世界！", DEFAULT_LANGUAGE), "zh");
    }

    #[test]
    fn test_english() {
        assert_eq!(detect_language("Hello, world!", DEFAULT_LANGUAGE), "en");
    }

    #[test]
    fn test_japanese_kana() {
        assert_eq!(detect_language("こんにちは", DEFAULT_LANGUAGE), "ja");
    }

    #[test]
    fn test_korean_hangul() {
        assert_eq!(detect_language("안녕하세요", DEFAULT_LANGUAGE), "ko");
    }

    #[test]
    fn test_empty_and_inconclusive_fall_back() {
        assert_eq!(detect_language("", DEFAULT_LANGUAGE), "zh");
        assert_eq!(detect_language("   ", "en"), "en");
        assert_eq!(detect_language("12345 !!!", DEFAULT_LANGUAGE), "zh");
    }

    #[test]
    fn test_mixed_text_uses_dominant_script() {
        // Mostly Chinese with a little English.
        assert_eq!(detect_language("今天天气真好 ok", DEFAULT_LANGUAGE), "zh");
    }
}
