use tgcore_tl::deserialize::Error;
use tgcore_tl::{enums, types, Cursor, Deserializable, Serializable};

// ── Primitive round-trips ─────────────────────────────────────────────────────

#[test]
fn roundtrip_i32() {
    for v in [0i32, -1, i32::MAX, i32::MIN, 42] {
        let bytes = v.to_bytes();
        assert_eq!(i32::from_bytes(&bytes).unwrap(), v);
    }
}

#[test]
fn roundtrip_u64() {
    for v in [0u64, 1, u64::MAX, 0xCAFE_BABE_DEAD_BEEF] {
        let bytes = v.to_bytes();
        assert_eq!(u64::from_bytes(&bytes).unwrap(), v);
    }
}

#[test]
fn roundtrip_bool() {
    assert_eq!(true.to_bytes(), 0x997275b5u32.to_le_bytes());
    assert_eq!(false.to_bytes(), 0xbc799737u32.to_le_bytes());
    assert!(bool::from_bytes(&true.to_bytes()).unwrap());
    assert!(!bool::from_bytes(&false.to_bytes()).unwrap());
}

// ── String / bytes ────────────────────────────────────────────────────────────

#[test]
fn roundtrip_short_string() {
    let s = "hello world".to_owned();
    let bytes = s.to_bytes();
    assert_eq!(bytes.len() % 4, 0, "must be 4-byte aligned");
    assert_eq!(String::from_bytes(&bytes).unwrap(), s);
}

#[test]
fn string_length_boundary() {
    // 253 bytes stays on the 1-byte header; 254 switches to the sentinel.
    let short = "x".repeat(253);
    let long = "x".repeat(254);
    assert_eq!(short.to_bytes()[0], 253);
    assert_eq!(long.to_bytes()[0], 0xfe);
    assert_eq!(String::from_bytes(&short.to_bytes()).unwrap(), short);
    assert_eq!(String::from_bytes(&long.to_bytes()).unwrap(), long);
}

#[test]
fn roundtrip_bytes_vec() {
    let v: Vec<u8> = (0u8..=255).collect();
    let bytes = v.clone().to_bytes();
    assert_eq!(Vec::<u8>::from_bytes(&bytes).unwrap(), v);
}

// ── Vectors ───────────────────────────────────────────────────────────────────

#[test]
fn roundtrip_vec_i64() {
    let v: Vec<i64> = vec![1, -2, 3];
    assert_eq!(Vec::<i64>::from_bytes(&v.to_bytes()).unwrap(), v);
}

#[test]
fn boxed_vector_requires_header() {
    // A bare count with no 0x1cb5c415 header must be rejected.
    let mut raw = Vec::new();
    2i32.serialize(&mut raw);
    1i64.serialize(&mut raw);
    2i64.serialize(&mut raw);
    assert!(matches!(
        Vec::<i64>::from_bytes(&raw),
        Err(Error::UnexpectedConstructor { offset: 0, .. })
    ));
}

// ── Error offsets ─────────────────────────────────────────────────────────────

#[test]
fn truncated_read_reports_offset() {
    assert_eq!(
        i64::from_bytes(&[1, 2, 3]),
        Err(Error::UnexpectedEof { offset: 0 })
    );
}

#[test]
fn unknown_constructor_reports_tag_and_offset() {
    let mut raw = Vec::new();
    0xdeadbeefu32.serialize(&mut raw);
    assert_eq!(
        enums::Peer::from_bytes(&raw),
        Err(Error::UnexpectedConstructor { id: 0xdeadbeef, offset: 0 })
    );
}

#[test]
fn nested_unknown_constructor_reports_inner_offset() {
    // A valid updateShort header followed by a bogus inner update tag.
    let mut raw = Vec::new();
    0x78d4dec1u32.serialize(&mut raw); // updateShort
    0x11223344u32.serialize(&mut raw); // not a known Update
    assert_eq!(
        enums::Updates::from_bytes(&raw),
        Err(Error::UnexpectedConstructor { id: 0x11223344, offset: 4 })
    );
}

// ── Constructors ──────────────────────────────────────────────────────────────

fn sample_message(media: Option<enums::MessageMedia>) -> types::Message {
    types::Message {
        unread: true,
        out: false,
        id: 100,
        from_id: 7,
        to_id: enums::Peer::User(types::PeerUser { user_id: 42 }),
        fwd_from_id: None,
        fwd_date: None,
        reply_to_msg_id: Some(99),
        date: 1_500_000_000,
        message: "hi".into(),
        media,
    }
}

#[test]
fn roundtrip_message_with_flags() {
    let msg = enums::Message::Message(sample_message(None));
    let decoded = enums::Message::from_bytes(&msg.to_bytes()).unwrap();
    assert_eq!(decoded, msg);
}

#[test]
fn message_flags_encode_presence() {
    let plain = sample_message(None);
    assert_eq!(plain.flags(), 1 | (1 << 3));

    let with_fwd = types::Message {
        fwd_from_id: Some(3),
        fwd_date: Some(4),
        media: Some(enums::MessageMedia::Empty),
        ..plain
    };
    assert_eq!(with_fwd.flags(), 1 | (1 << 2) | (1 << 3) | (1 << 9));

    let decoded = types::Message::from_bytes(&with_fwd.to_bytes()).unwrap();
    assert_eq!(decoded, with_fwd);
}

#[test]
fn roundtrip_res_pq() {
    let v = enums::ResPq::ResPq(types::ResPq {
        nonce: [1; 16],
        server_nonce: [2; 16],
        pq: vec![0x17, 0xED, 0x48, 0x94, 0x1A, 0x08, 0xF9, 0x81],
        server_public_key_fingerprints: vec![0x216be86c022bb4c3u64 as i64],
    });
    assert_eq!(enums::ResPq::from_bytes(&v.to_bytes()).unwrap(), v);
}

#[test]
fn roundtrip_updates_container() {
    let v = enums::Updates::ShortMessage(types::UpdateShortMessage {
        unread: true,
        out: false,
        id: 5,
        user_id: 9,
        message: "ping".into(),
        pts: 101,
        pts_count: 1,
        date: 1_400_000_000,
        fwd_from_id: None,
        fwd_date: None,
        reply_to_msg_id: None,
    });
    assert_eq!(enums::Updates::from_bytes(&v.to_bytes()).unwrap(), v);
}

#[test]
fn roundtrip_difference() {
    let state = types::updates::State {
        pts: 110,
        qts: 1,
        date: 1_500_000_000,
        seq: 3,
        unread_count: 0,
    };
    let v = enums::updates::Difference::Difference(types::updates::Difference {
        new_messages: vec![enums::Message::Empty(types::MessageEmpty { id: 1 })],
        other_updates: vec![],
        chats: vec![],
        users: vec![],
        state,
    });
    assert_eq!(enums::updates::Difference::from_bytes(&v.to_bytes()).unwrap(), v);
}

#[test]
fn roundtrip_dc_option() {
    let v = enums::DcOption::DcOption(types::DcOption {
        id: 2,
        hostname: String::new(),
        ip_address: "149.154.167.51".into(),
        port: 443,
    });
    assert_eq!(enums::DcOption::from_bytes(&v.to_bytes()).unwrap(), v);
}

#[test]
fn cursor_tracks_position_across_fields() {
    let v = types::Pong { msg_id: 1, ping_id: 2 };
    let bytes = v.to_bytes();
    let mut cur = Cursor::from_slice(&bytes);
    types::Pong::deserialize(&mut cur).unwrap();
    assert_eq!(cur.pos(), 16);
    assert_eq!(cur.remaining(), 0);
}
