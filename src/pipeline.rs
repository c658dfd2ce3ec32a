//! Hide/reveal orchestration: compress → encrypt → frame → embed, and its inverse,
//! including capacity accounting and depth/channel auto-detection on reveal.

use crate::compression;
use crate::container::emoj;
use crate::container::stegfile::{self, StegFileHeader};
use crate::container::{mime_flags, CryptoParams, FLAG_COMPRESSED, FLAG_ENCRYPTED, PayloadDescriptor};
use crate::crypto::{self, DEFAULT_ITERATIONS, IV_LEN, KDF_PBKDF2_HMAC_SHA256};
use crate::emoji_codec::{self, Theme};
use crate::error::Error;
use crate::image_codec::CarrierImage;

/// Trial order for reveal's auto-detection loop: depth ascends slowest, `use_alpha`
/// toggles fastest, per the canonical `(1,false),(1,true),(2,false)...` sequence.
const DETECTION_ORDER: [(u8, bool); 8] = [
    (1, false),
    (1, true),
    (2, false),
    (2, true),
    (3, false),
    (3, true),
    (4, false),
    (4, true),
];

#[derive(Debug, Clone)]
pub struct HideImageOptions {
    pub encrypt: bool,
    pub compress: bool,
    pub depth: u8,
    pub use_alpha: bool,
}

impl Default for HideImageOptions {
    fn default() -> Self {
        Self {
            encrypt: false,
            compress: true,
            depth: 1,
            use_alpha: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HideEmojiOptions {
    pub encrypt: bool,
    pub theme: Option<Theme>,
    pub custom_graphemes: Vec<String>,
}

/// What `reveal_image`/`reveal_emoji` return on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealedPayload {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
    pub original_size: u64,
    pub was_encrypted: bool,
    pub was_compressed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CapacityEstimate {
    pub header_size: u64,
    pub payload_capacity: u64,
}

/// Hides `payload` inside `image`'s pixel LSBs, returning the mutated image.
pub fn hide_image(
    image: &mut CarrierImage,
    payload: &PayloadDescriptor,
    password: Option<&str>,
    opts: &HideImageOptions,
) -> Result<(), Error> {
    let mut flags = mime_flags(&payload.mime);
    let original_size = payload.bytes.len() as u64;

    let mut current = payload.bytes.clone();
    if opts.compress {
        let compressed = compression::compress(&current);
        if compressed.len() < current.len() {
            current = compressed;
            flags |= FLAG_COMPRESSED;
        }
    }

    let crypto = if opts.encrypt {
        let password = password.ok_or(Error::MissingPassword)?;
        let salt = crypto::salt();
        let key = crypto::derive_key(password, &salt, DEFAULT_ITERATIONS);
        let iv = crypto::iv(IV_LEN);
        current = crypto::seal(&key, &iv, &current)?;
        flags |= FLAG_ENCRYPTED;
        Some(CryptoParams {
            salt: salt.to_vec(),
            kdf_id: KDF_PBKDF2_HMAC_SHA256,
            iterations: DEFAULT_ITERATIONS,
            iv,
        })
    } else {
        None
    };

    let header = StegFileHeader {
        name: payload.name.clone(),
        mime: payload.mime.clone(),
        orig_size: original_size,
        flags,
        crypto,
    };
    let framed = stegfile::build(&header, &current)?;
    image.embed(&framed, opts.depth, opts.use_alpha)
}

/// Reveals a payload previously hidden by [`hide_image`], auto-detecting the
/// `(depth, use_alpha)` combination that was used.
pub fn reveal_image(image: &CarrierImage, password: Option<&str>) -> Result<RevealedPayload, Error> {
    let (result, _log) = detect_stegfile(image);
    let (header, body) = result?;
    finish_reveal_image(header, &body, password)
}

/// One `(depth, use_alpha)` combination the auto-detection loop tried, and what happened.
#[derive(Debug, Clone)]
pub struct DetectionAttempt {
    pub depth: u8,
    pub use_alpha: bool,
    pub outcome: String,
}

/// Same as [`reveal_image`], but also returns the per-attempt trial log the detection
/// loop produced — which `(depth, use_alpha)` combinations were tried and why each one
/// that didn't win was rejected.
pub fn reveal_image_verbose(
    image: &CarrierImage,
    password: Option<&str>,
) -> (Result<RevealedPayload, Error>, Vec<DetectionAttempt>) {
    let (result, log) = detect_stegfile(image);
    let outcome = result.and_then(|(header, body)| finish_reveal_image(header, &body, password));
    (outcome, log)
}

/// Tries every `(depth, use_alpha)` combination in [`DETECTION_ORDER`] against `image`,
/// stopping at the first accepted `STEGFILE` header. Per §7's propagation policy, only
/// `BadMagic` is recoverable within the loop — any other parse error is fatal and stops
/// the trial immediately, though it is still recorded in the returned log.
fn detect_stegfile(
    image: &CarrierImage,
) -> (Result<(StegFileHeader, Vec<u8>), Error>, Vec<DetectionAttempt>) {
    let mut log = Vec::with_capacity(DETECTION_ORDER.len());
    for (depth, use_alpha) in DETECTION_ORDER {
        let stream = image.extract(depth, use_alpha);
        match stegfile::parse(&stream, true) {
            Ok((header, body)) => {
                let body = body.to_vec();
                log.push(DetectionAttempt {
                    depth,
                    use_alpha,
                    outcome: "accepted".to_string(),
                });
                return (Ok((header, body)), log);
            }
            Err(Error::BadMagic) => {
                log.push(DetectionAttempt {
                    depth,
                    use_alpha,
                    outcome: Error::BadMagic.to_string(),
                });
                continue;
            }
            Err(other) => {
                log.push(DetectionAttempt {
                    depth,
                    use_alpha,
                    outcome: other.to_string(),
                });
                return (Err(other), log);
            }
        }
    }
    (Err(Error::BadMagic), log)
}

fn finish_reveal_image(
    header: StegFileHeader,
    body: &[u8],
    password: Option<&str>,
) -> Result<RevealedPayload, Error> {
    let was_encrypted = header.crypto.is_some();
    let was_compressed = header.flags & FLAG_COMPRESSED != 0;

    let mut bytes = body.to_vec();
    if let Some(crypto) = &header.crypto {
        let password = password.ok_or(Error::MissingPassword)?;
        let key = crypto::derive_key(password, &crypto.salt, crypto.iterations);
        bytes = crypto::open(&key, &crypto.iv, &bytes)?;
    }
    if was_compressed {
        bytes = compression::decompress(&bytes)?;
    }

    Ok(RevealedPayload {
        name: header.name,
        mime: header.mime,
        bytes,
        original_size: header.orig_size,
        was_encrypted,
        was_compressed,
    })
}

/// Hides `message` inside a returned string of emoji covers plus invisible characters.
pub fn hide_emoji(message: &str, password: Option<&str>, opts: &HideEmojiOptions) -> Result<String, Error> {
    let mut flags = 0u8;
    let mut body = message.as_bytes().to_vec();

    let crypto = if opts.encrypt {
        let password = password.ok_or(Error::MissingPassword)?;
        let salt = crypto::salt();
        let key = crypto::derive_key(password, &salt, DEFAULT_ITERATIONS);
        let iv = crypto::iv(IV_LEN);
        body = crypto::seal(&key, &iv, &body)?;
        flags |= FLAG_ENCRYPTED;
        Some(CryptoParams {
            salt: salt.to_vec(),
            kdf_id: KDF_PBKDF2_HMAC_SHA256,
            iterations: DEFAULT_ITERATIONS,
            iv,
        })
    } else {
        None
    };

    let framed = emoj::build(flags, crypto.as_ref(), &body)?;
    let theme = opts.theme.unwrap_or(Theme::Mixed);
    Ok(emoji_codec::encode(&framed, theme, &opts.custom_graphemes))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealedText {
    pub text: String,
    pub was_encrypted: bool,
}

/// Reveals a message previously hidden by [`hide_emoji`].
pub fn reveal_emoji(text: &str, password: Option<&str>) -> Result<RevealedText, Error> {
    let framed = emoji_codec::decode(text)?;
    let (flags, crypto, body) = emoj::parse(&framed)?;
    let was_encrypted = flags & FLAG_ENCRYPTED != 0;

    let mut bytes = body.to_vec();
    if let Some(crypto) = crypto {
        let password = password.ok_or(Error::MissingPassword)?;
        let key = crypto::derive_key(password, &crypto.salt, crypto.iterations);
        bytes = crypto::open(&key, &crypto.iv, &bytes)?;
    }

    let text = String::from_utf8(bytes).map_err(|_| Error::MalformedHeader("body is not valid UTF-8".into()))?;
    Ok(RevealedText { text, was_encrypted })
}

/// Reports the header size and remaining payload capacity for a carrier of the given
/// dimensions, without actually embedding anything.
pub fn estimate_capacity(
    w: u32,
    h: u32,
    depth: u8,
    use_alpha: bool,
    encrypt: bool,
    name: &str,
    mime: &str,
) -> CapacityEstimate {
    let header = StegFileHeader {
        name: name.to_string(),
        mime: mime.to_string(),
        orig_size: 0,
        flags: if encrypt { FLAG_ENCRYPTED } else { 0 },
        crypto: if encrypt {
            Some(CryptoParams {
                salt: vec![0; crypto::SALT_LEN],
                kdf_id: KDF_PBKDF2_HMAC_SHA256,
                iterations: DEFAULT_ITERATIONS,
                iv: vec![0; IV_LEN],
            })
        } else {
            None
        },
    };
    // build() appends header_crc(4) + body_size(4); the body-size placeholder itself
    // carries no cost since it's fixed width regardless of the empty body passed here.
    let header_size = stegfile::build(&header, &[]).map(|b| b.len() as u64).unwrap_or(0);

    let image = CarrierImage::new(w, h, vec![0u8; w as usize * h as usize * 4]);
    let bytes_available = image.bytes_available(depth, use_alpha);
    let tag_cost = if encrypt { 16 } else { 0 };
    let payload_capacity = bytes_available.saturating_sub(header_size).saturating_sub(tag_cost);

    CapacityEstimate {
        header_size,
        payload_capacity,
    }
}
