use tgcore_crypto::{encrypt_data, DequeBuffer, Side};
use tgcore_mtproto::message::parse_plaintext_frame;
use tgcore_mtproto::{EncryptedSession, Session};

#[test]
fn msg_ids_are_strictly_increasing_with_low_bits_clear() {
    let mut s = Session::new();
    let mut prev = s.next_msg_id();
    assert_eq!(prev.0 & 0b11, 0, "client msg_id must have low two bits clear");
    for _ in 0..1000 {
        let id = s.next_msg_id();
        assert!(id > prev, "msg_id must be strictly increasing");
        assert_eq!(id.0 & 0b11, 0);
        prev = id;
    }
}

#[test]
fn msg_id_encodes_wall_clock() {
    let mut s = Session::new();
    let id = s.next_msg_id();
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;
    assert!((id.unix_time() - now).abs() <= 2);
}

#[test]
fn plaintext_frame_layout() {
    let mut s = Session::new();
    let msg = s.pack_body(vec![0xAA, 0xBB]);
    let wire = msg.to_plaintext_bytes();

    // auth_key_id (8) + msg_id (8) + length (4) + body (2)
    assert_eq!(wire.len(), 8 + 8 + 4 + 2);
    assert_eq!(&wire[..8], &[0u8; 8], "plaintext frames carry auth_key_id 0");
    assert_eq!(u32::from_le_bytes(wire[16..20].try_into().unwrap()), 2);
    assert_eq!(&wire[20..], &[0xAA, 0xBB]);

    let (id, body) = parse_plaintext_frame(&wire).unwrap();
    assert_eq!(id, msg.id);
    assert_eq!(body, &[0xAA, 0xBB]);
}

/// Decrypt one of our own outgoing frames the way the server would.
fn open_client_frame(wire: &mut [u8], key: [u8; 256]) -> (i64, i32) {
    let auth_key = tgcore_crypto::AuthKey::from_bytes(key);
    let plain = tgcore_crypto::decrypt_data(wire, &auth_key, Side::Client).unwrap();
    let msg_id = i64::from_le_bytes(plain[16..24].try_into().unwrap());
    let seq_no = i32::from_le_bytes(plain[24..28].try_into().unwrap());
    (msg_id, seq_no)
}

#[test]
fn encrypted_seq_no_parity() {
    let key = [1u8; 256];
    let mut s = EncryptedSession::with_session_id(key, 0x1234, 0, 77);

    let mut seqs = Vec::new();
    let mut ids = Vec::new();
    for content in [true, true, false, true] {
        let (mut wire, id) = s.pack_body(b"abcd", content);
        let (inner_id, seq) = open_client_frame(&mut wire, key);
        assert_eq!(inner_id, id);
        ids.push(id);
        seqs.push(seq);
    }

    // Content-related: 2n+1 and the counter advances; unrelated: 2n, no
    // advance.
    assert_eq!(seqs, vec![1, 3, 4, 5]);
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn unpack_accepts_server_frame_and_checks_session_id() {
    let key = [0x42u8; 256];
    let session = EncryptedSession::with_session_id(key, 0x5151, 0, 0x7777);

    let body = b"server-payload!!".to_vec();
    let build_frame = |session_id: i64| {
        let mut buf = DequeBuffer::with_capacity(32 + body.len(), 24);
        buf.extend(0x5151i64.to_le_bytes());
        buf.extend(session_id.to_le_bytes());
        buf.extend(0x0102030405060701i64.to_le_bytes());
        buf.extend(1i32.to_le_bytes());
        buf.extend((body.len() as u32).to_le_bytes());
        buf.extend(body.iter().copied());
        encrypt_data(&mut buf, &tgcore_crypto::AuthKey::from_bytes(key), Side::Server);
        buf.as_ref().to_vec()
    };

    let mut good = build_frame(0x7777);
    let msg = session.unpack(&mut good).unwrap();
    assert_eq!(msg.salt, 0x5151);
    assert_eq!(msg.seq_no, 1);
    assert_eq!(msg.body, body);

    let mut stolen = build_frame(0x9999);
    assert!(session.unpack(&mut stolen).is_err(), "foreign session_id must be rejected");
}

#[test]
fn clock_resync_follows_server_msg_id() {
    let mut s = EncryptedSession::with_session_id([9; 256], 0, 0, 5);
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;
    // A server msg_id stamped 30 seconds ahead of our clock.
    s.sync_time_from((now + 30) << 32);
    assert!((s.delta_time - 30).abs() <= 2, "delta_time {} not near 30", s.delta_time);
}
