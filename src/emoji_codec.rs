//! Maps bytes to invisible zero-width characters and interleaves them with visible
//! emoji cover graphemes, using Unicode extended-grapheme-cluster segmentation so that
//! composite emoji (ZWJ sequences, skin-tone modifiers, flags) are never split apart.

use rand::seq::SliceRandom;
use rand::thread_rng;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::Error;

/// Carries bit value `0`.
pub const ZWSP: char = '\u{200B}';
/// Carries bit value `1`.
pub const ZWNJ: char = '\u{200C}';

const MIN_COVER_GRAPHEMES: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Faces,
    Nature,
    Objects,
    Mixed,
    Custom,
}

const FACES: &[&str] = &["😀", "😂", "🙂", "😎", "🤔", "😴", "🥳", "🫠"];
const NATURE: &[&str] = &["🌲", "🌸", "🐝", "🦊", "🌊", "⛰️", "🌙", "🔥"];
const OBJECTS: &[&str] = &["📦", "🔑", "💡", "🎈", "🧵", "🪙", "🧩", "🛠️"];

fn theme_pool(theme: Theme) -> Vec<&'static str> {
    match theme {
        Theme::Faces => FACES.to_vec(),
        Theme::Nature => NATURE.to_vec(),
        Theme::Objects => OBJECTS.to_vec(),
        Theme::Mixed | Theme::Custom => FACES
            .iter()
            .chain(NATURE.iter())
            .chain(OBJECTS.iter())
            .copied()
            .collect(),
    }
}

fn bytes_to_invisible(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 8);
    for byte in bytes {
        for i in (0..8).rev() {
            let bit = (byte >> i) & 1;
            out.push(if bit == 0 { ZWSP } else { ZWNJ });
        }
    }
    out
}

fn invisible_to_bytes(bits: &[char]) -> Vec<u8> {
    let usable_bits = bits.len() - (bits.len() % 8);
    let mut out = Vec::with_capacity(usable_bits / 8);
    for chunk in bits[..usable_bits].chunks_exact(8) {
        let mut byte = 0u8;
        for &c in chunk {
            byte = (byte << 1) | if c == ZWNJ { 1 } else { 0 };
        }
        out.push(byte);
    }
    out
}

/// Encodes `body` as invisible characters interleaved with cover graphemes from `theme`
/// (or `custom_graphemes`, when non-empty and `theme == Custom`).
pub fn encode(body: &[u8], theme: Theme, custom_graphemes: &[String]) -> String {
    let invisible: Vec<char> = bytes_to_invisible(body).chars().collect();

    let pool: Vec<String> = if theme == Theme::Custom && !custom_graphemes.is_empty() {
        custom_graphemes.to_vec()
    } else {
        theme_pool(theme).into_iter().map(String::from).collect()
    };

    let cover_count = MIN_COVER_GRAPHEMES.max((body.len() + 15) / 16);
    let mut rng = thread_rng();
    let covers: Vec<&String> = (0..cover_count)
        .map(|_| pool.choose(&mut rng).expect("pool is never empty"))
        .collect();

    let chunk_size = if cover_count == 0 {
        invisible.len()
    } else {
        (invisible.len() + cover_count - 1) / cover_count.max(1)
    };

    let mut out = String::new();
    let mut consumed = 0;
    for cover in &covers {
        out.push_str(cover);
        let end = (consumed + chunk_size).min(invisible.len());
        out.extend(&invisible[consumed..end]);
        consumed = end;
    }
    if consumed < invisible.len() {
        out.extend(&invisible[consumed..]);
    }
    out
}

/// Scans `text` for ZWSP/ZWNJ characters, ignoring everything else, and assembles the
/// collected bits MSB-first into bytes. Tolerates any non-invisible character inserted
/// between the invisibles (strip-tolerance) and truncates a short trailing partial byte.
pub fn decode(text: &str) -> Result<Vec<u8>, Error> {
    let bits: Vec<char> = text.chars().filter(|&c| c == ZWSP || c == ZWNJ).collect();
    let bytes = invisible_to_bytes(&bits);
    if bytes.is_empty() {
        return Err(Error::NoHiddenData);
    }
    Ok(bytes)
}

/// Splits `text` into Unicode extended grapheme clusters. Exposed so callers constructing
/// a custom cover theme from user text do the same correct segmentation this module uses
/// internally.
pub fn graphemes(text: &str) -> Vec<&str> {
    text.graphemes(true).collect()
}
