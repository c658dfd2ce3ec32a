use stegano_container::container::PayloadDescriptor;
use stegano_container::emoji_codec::Theme;
use stegano_container::{
    estimate_capacity, hide_emoji, hide_image, reveal_emoji, reveal_image, CarrierImage, Error,
    HideEmojiOptions, HideImageOptions,
};

fn blank_image(w: u32, h: u32) -> CarrierImage {
    CarrierImage::new(w, h, vec![0u8; w as usize * h as usize * 4])
}

/// S1: an empty payload on a tiny carrier, no crypto, no compression.
#[test]
fn s1_empty_payload_roundtrip() {
    let mut image = blank_image(2, 2);
    let payload = PayloadDescriptor {
        name: "a".into(),
        mime: "text/plain".into(),
        bytes: vec![],
    };
    let opts = HideImageOptions {
        encrypt: false,
        compress: false,
        depth: 1,
        use_alpha: false,
    };
    hide_image(&mut image, &payload, None, &opts).unwrap();
    let revealed = reveal_image(&image, None).unwrap();
    assert_eq!(revealed.name, "a");
    assert_eq!(revealed.mime, "text/plain");
    assert!(revealed.bytes.is_empty());
}

/// S2: depth=2, no alpha, no crypto; body bytes survive byte-exact.
#[test]
fn s2_depth_two_roundtrip() {
    let mut image = blank_image(8, 8);
    let payload = PayloadDescriptor {
        name: "n".into(),
        mime: "m".into(),
        bytes: vec![0xDE, 0xAD, 0xBE, 0xEF],
    };
    let opts = HideImageOptions {
        encrypt: false,
        compress: false,
        depth: 2,
        use_alpha: false,
    };
    hide_image(&mut image, &payload, None, &opts).unwrap();
    let revealed = reveal_image(&image, None).unwrap();
    assert_eq!(revealed.bytes, vec![0xDE, 0xAD, 0xBE, 0xEF]);
}

/// S3: encrypted hide/reveal; wrong password must fail authentication, never
/// return spurious plaintext.
#[test]
fn s3_encrypted_roundtrip_and_wrong_password() {
    let mut image = blank_image(16, 16);
    let payload = PayloadDescriptor {
        name: "n".into(),
        mime: "m".into(),
        bytes: (0u8..16).collect(),
    };
    let opts = HideImageOptions {
        encrypt: true,
        compress: false,
        depth: 1,
        use_alpha: false,
    };
    hide_image(&mut image, &payload, Some("pw"), &opts).unwrap();

    let revealed = reveal_image(&image, Some("pw")).unwrap();
    assert_eq!(revealed.bytes, payload.bytes);

    assert!(matches!(
        reveal_image(&image, Some("px")),
        Err(Error::AuthFailed)
    ));
}

/// S4: hiding "hi" in mixed-theme emoji produces exactly 16 invisible characters.
#[test]
fn s4_emoji_hide_hi_has_sixteen_invisibles() {
    let encoded = hide_emoji("hi", None, &HideEmojiOptions::default()).unwrap();
    let invisible_count = encoded
        .chars()
        .filter(|&c| c == '\u{200B}' || c == '\u{200C}')
        .count();
    assert_eq!(invisible_count, 16);
    assert_eq!(reveal_emoji(&encoded, None).unwrap().text, "hi");
}

/// S6 (strict parser variant): a single flipped header bit must surface as one of
/// the documented parse failures, never as silently-accepted garbage.
#[test]
fn s6_single_bit_header_flip_is_detected() {
    let mut image = blank_image(8, 8);
    let payload = PayloadDescriptor {
        name: "n".into(),
        mime: "m".into(),
        bytes: vec![1, 2, 3],
    };
    let opts = HideImageOptions {
        encrypt: false,
        compress: false,
        depth: 1,
        use_alpha: false,
    };
    hide_image(&mut image, &payload, None, &opts).unwrap();

    // Flip the low bit of an early pixel channel, inside the header region.
    image.pixels[0] ^= 0x01;
    let result = reveal_image(&image, None);
    assert!(result.is_err());
}

#[test]
fn compression_opportunism_keeps_plain_when_not_smaller() {
    let mut image = blank_image(8, 8);
    // Small, high-entropy-looking payload: gzip framing overhead makes it larger.
    let payload = PayloadDescriptor {
        name: "n".into(),
        mime: "m".into(),
        bytes: vec![0xAB, 0xCD],
    };
    let opts = HideImageOptions {
        encrypt: false,
        compress: true,
        depth: 1,
        use_alpha: false,
    };
    hide_image(&mut image, &payload, None, &opts).unwrap();
    let revealed = reveal_image(&image, None).unwrap();
    assert!(!revealed.was_compressed);
    assert_eq!(revealed.bytes, payload.bytes);
}

#[test]
fn emoji_strip_tolerance() {
    let encoded = hide_emoji("ok", None, &HideEmojiOptions::default()).unwrap();
    let noisy: String = encoded.chars().flat_map(|c| [c, '*']).collect();
    assert_eq!(reveal_emoji(&noisy, None).unwrap().text, "ok");
}

#[test]
fn capacity_report_matches_actual_embed_limit() {
    let estimate = estimate_capacity(4, 4, 1, false, false, "n", "text/plain");
    let mut image = blank_image(4, 4);
    let payload = PayloadDescriptor {
        name: "n".into(),
        mime: "text/plain".into(),
        bytes: vec![0u8; estimate.payload_capacity as usize + 1],
    };
    let opts = HideImageOptions {
        encrypt: false,
        compress: false,
        depth: 1,
        use_alpha: false,
    };
    assert!(matches!(
        hide_image(&mut image, &payload, None, &opts),
        Err(Error::CapacityExceeded { .. })
    ));
}

#[test]
fn all_depths_and_alpha_modes_round_trip() {
    for depth in 1..=4u8 {
        for use_alpha in [false, true] {
            let mut image = blank_image(16, 16);
            let payload = PayloadDescriptor {
                name: "n".into(),
                mime: "m".into(),
                bytes: b"round trip me".to_vec(),
            };
            let opts = HideImageOptions {
                encrypt: false,
                compress: false,
                depth,
                use_alpha,
            };
            hide_image(&mut image, &payload, None, &opts).unwrap();
            let revealed = reveal_image(&image, None).unwrap();
            assert_eq!(revealed.bytes, payload.bytes, "depth={depth} use_alpha={use_alpha}");
        }
    }
}

#[test]
fn emoji_roundtrip_for_all_themes() {
    for theme in [Theme::Faces, Theme::Nature, Theme::Objects, Theme::Mixed] {
        let opts = HideEmojiOptions {
            encrypt: false,
            theme: Some(theme),
            custom_graphemes: vec![],
        };
        let encoded = hide_emoji("hello there", None, &opts).unwrap();
        assert_eq!(reveal_emoji(&encoded, None).unwrap().text, "hello there");
    }
}
