use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// This module provides functions for validating ISO 639-1 (2-letter) and
/// ISO 639-2 (3-letter) language codes and turning track language tags into
/// the short upper-case form used in file names.
/// Language code type
#[derive(Debug, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-2/T (3-letter) code
    Part2T,
    /// ISO 639-2/B (3-letter) code
    Part2B,
}

/// Marker used by containers for tracks without a language
pub const UNDEFINED_LANGUAGE: &str = "und";

/// Map an ISO 639-2/B code to its ISO 639-2/T equivalent, if the two differ
fn bibliographic_to_terminology(code: &str) -> Option<&'static str> {
    let part2t = match code {
        "fre" => "fra",
        "ger" => "deu",
        "dut" => "nld",
        "gre" => "ell",
        "chi" => "zho",
        "cze" => "ces",
        "ice" => "isl",
        "alb" => "sqi",
        "arm" => "hye",
        "baq" => "eus",
        "bur" => "mya",
        "per" => "fas",
        "geo" => "kat",
        "may" => "msa",
        "mac" => "mkd",
        "rum" => "ron",
        "slo" => "slk",
        "wel" => "cym",
        _ => return None,
    };
    Some(part2t)
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-2 code
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    let normalized_code = code.trim().to_lowercase();

    if normalized_code.len() == 2 {
        if Language::from_639_1(&normalized_code).is_some() {
            return Ok(LanguageCodeType::Part1);
        }
    } else if normalized_code.len() == 3 {
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(LanguageCodeType::Part2T);
        }
        if bibliographic_to_terminology(&normalized_code).is_some() {
            return Ok(LanguageCodeType::Part2B);
        }
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-1 (2-letter) format if possible
/// Falls back to ISO 639-2/T if no ISO 639-1 code exists
pub fn normalize_to_part1_or_part2t(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    if normalized_code.len() == 2 {
        if Language::from_639_1(&normalized_code).is_some() {
            return Ok(normalized_code);
        }
    } else if normalized_code.len() == 3 {
        let part2t = bibliographic_to_terminology(&normalized_code).unwrap_or(&normalized_code);

        if let Some(lang) = Language::from_639_3(part2t) {
            if let Some(code_639_1) = lang.to_639_1() {
                return Ok(code_639_1.to_string());
            }
            return Ok(part2t.to_string());
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Check whether a track language tag means "no language given"
pub fn is_undefined(code: Option<&str>) -> bool {
    match code.map(str::trim) {
        None => true,
        Some(code) => code.is_empty() || code.eq_ignore_ascii_case(UNDEFINED_LANGUAGE),
    }
}

/// Upper-case display form of a track language, e.g. `deu` -> `DE`
///
/// English language names (`english`) are mapped to their code. Other codes
/// that isolang does not know are kept as given, upper-cased, as long as they
/// are two or three letters; anything else yields `None`.
pub fn display_code(code: &str) -> Option<String> {
    let code = code.trim();
    if let Ok(normalized) = normalize_to_part1_or_part2t(code) {
        return Some(normalized.to_uppercase());
    }

    let wanted = code.to_string();
    if let Some(lang) = Language::match_names(move |name| name.eq_ignore_ascii_case(&wanted)).next() {
        let short = lang.to_639_1().unwrap_or_else(|| lang.to_639_3());
        return Some(short.to_uppercase());
    }

    if (2..=3).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Some(code.to_uppercase());
    }
    None
}

/// Resolve a track language, substituting `undefined_language` for missing,
/// `und` or unrecognizable tags
///
/// The fallback goes through the same mapping as track languages, so `deu`
/// and a fallback of `ger` both display as `DE`.
pub fn resolve_display_code(code: Option<&str>, undefined_language: &str) -> String {
    code.filter(|code| !is_undefined(Some(*code)))
        .and_then(display_code)
        .or_else(|| display_code(undefined_language))
        .unwrap_or_else(|| undefined_language.trim().to_uppercase())
}
