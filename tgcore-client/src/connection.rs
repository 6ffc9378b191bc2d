//! One authenticated channel to one DC.
//!
//! [`Engine`] is the sans-IO half: it owns the encrypted session, the
//! pending-request table and the ack queue, and turns decrypted frames
//! into outcomes. [`Connection`] drives an `Engine` over a TCP stream
//! with the chosen transport framing.

use std::collections::{HashMap, VecDeque};
use std::io::Read;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use tgcore_mtproto::authentication::{Negotiator, StepResult};
use tgcore_mtproto::message::parse_plaintext_frame;
use tgcore_mtproto::session::{EncryptedSession, Session};
use tgcore_mtproto::transport::{Abridged, Framing, Intermediate};
use tgcore_tl::{types, Deserializable, Identifiable, RemoteCall, Serializable};

use crate::errors::{InvocationError, RpcError};
use crate::DcAddress;

const ID_MSG_CONTAINER: u32 = 0x73f1f8dc;
const ID_GZIP_PACKED: u32 = 0x3072cfa1;
const ID_RPC_RESULT: u32 = 0xf35c6d01;

/// Clock-skew codes in `bad_msg_notification`: msg_id too low / too high.
const BAD_MSG_ID_TOO_LOW: i32 = 16;
const BAD_MSG_ID_TOO_HIGH: i32 = 17;

// ─── Transport selection ─────────────────────────────────────────────────────

/// Which transport framing to use for all connections.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransportKind {
    /// 1-byte init, compact length prefix.
    #[default]
    Abridged,
    /// 4-byte init, plain 4-byte length prefix.
    Intermediate,
}

impl TransportKind {
    fn codec(&self) -> Box<dyn Framing> {
        match self {
            Self::Abridged => Box::new(Abridged::new()),
            Self::Intermediate => Box::new(Intermediate::new()),
        }
    }
}

// ─── Auth state ──────────────────────────────────────────────────────────────

/// How far a connection's authorization has progressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthState {
    /// Handshake finished; the DC does not know who we are yet.
    HaveAKey,
    /// An authorization is bound to the key (login or import).
    SignedIn,
}

// ─── Engine ──────────────────────────────────────────────────────────────────

struct PendingRequest {
    body: Vec<u8>,
    content_related: bool,
    acked: bool,
}

/// What a processed server message asks the driver to do.
#[derive(Debug)]
pub(crate) enum Outcome {
    /// A request was answered.
    Reply {
        req_msg_id: i64,
        result: Result<Vec<u8>, RpcError>,
    },
    /// A request must be retransmitted with a fresh message ID.
    Resend { req_msg_id: i64 },
}

/// Sans-IO protocol engine for one encrypted session.
pub(crate) struct Engine {
    pub(crate) enc: EncryptedSession,
    pending: HashMap<i64, PendingRequest>,
    pending_acks: Vec<i64>,
    /// Update payloads the server pushed outside any request/response pair.
    pub(crate) updates: VecDeque<tgcore_tl::enums::Updates>,
}

impl Engine {
    pub(crate) fn new(enc: EncryptedSession) -> Self {
        Self {
            enc,
            pending: HashMap::new(),
            pending_acks: Vec::new(),
            updates: VecDeque::new(),
        }
    }

    /// Encrypt a request and record it for correlation and replay.
    pub(crate) fn pack<R: RemoteCall>(&mut self, req: &R) -> (Vec<u8>, i64) {
        self.pack_request_body(req.to_bytes(), true)
    }

    pub(crate) fn pack_request_body(
        &mut self,
        body: Vec<u8>,
        content_related: bool,
    ) -> (Vec<u8>, i64) {
        let (wire, msg_id) = self.enc.pack_body(&body, content_related);
        self.pending
            .insert(msg_id, PendingRequest { body, content_related, acked: false });
        (wire, msg_id)
    }

    /// Re-encrypt a pending request under a fresh, larger message ID.
    /// Used after `bad_server_salt` and clock-skew notifications.
    pub(crate) fn repack(&mut self, req_msg_id: i64) -> Option<(Vec<u8>, i64)> {
        let entry = self.pending.remove(&req_msg_id)?;
        let (wire, msg_id) = self.enc.pack_body(&entry.body, entry.content_related);
        self.pending.insert(msg_id, entry);
        Some((wire, msg_id))
    }

    /// Drain owed acknowledgements into a ready-to-send frame.
    pub(crate) fn take_acks_frame(&mut self) -> Option<Vec<u8>> {
        if self.pending_acks.is_empty() {
            return None;
        }
        let ack = types::MsgsAck { msg_ids: std::mem::take(&mut self.pending_acks) };
        let mut body = Vec::new();
        types::MsgsAck::CONSTRUCTOR_ID.serialize(&mut body);
        ack.serialize(&mut body);
        let (wire, _) = self.enc.pack_body(&body, false);
        Some(wire)
    }

    /// Un-acked content-related request bodies, for replay after a
    /// reconnect. Clears the pending table.
    pub(crate) fn take_unacked_bodies(&mut self) -> Vec<Vec<u8>> {
        let mut bodies: Vec<_> = std::mem::take(&mut self.pending)
            .into_values()
            .filter(|p| p.content_related && !p.acked)
            .map(|p| p.body)
            .collect();
        bodies.sort();
        bodies
    }

    /// Decrypt one transport frame and process every message inside it.
    pub(crate) fn handle_frame(
        &mut self,
        frame: &mut [u8],
    ) -> Result<Vec<Outcome>, InvocationError> {
        let msg = self.enc.unpack(frame)?;
        if msg.salt != 0 {
            self.enc.salt = msg.salt;
        }
        if msg.seq_no & 1 == 1 {
            self.pending_acks.push(msg.msg_id);
        }
        let mut outcomes = Vec::new();
        self.handle_body(msg.msg_id, &msg.body, &mut outcomes)?;
        Ok(outcomes)
    }

    fn handle_body(
        &mut self,
        server_msg_id: i64,
        body: &[u8],
        outcomes: &mut Vec<Outcome>,
    ) -> Result<(), InvocationError> {
        if body.len() < 4 {
            return Ok(());
        }
        let id = u32::from_le_bytes(body[..4].try_into().unwrap());

        match id {
            ID_MSG_CONTAINER => {
                let mut cur = tgcore_tl::Cursor::from_slice(&body[4..]);
                let count = u32::deserialize(&mut cur)?;
                for _ in 0..count {
                    let inner_msg_id = i64::deserialize(&mut cur)?;
                    let inner_seq = i32::deserialize(&mut cur)?;
                    let len = u32::deserialize(&mut cur)? as usize;
                    let start = 4 + cur.pos();
                    if start + len > body.len() {
                        return Err(tgcore_tl::deserialize::Error::UnexpectedEof {
                            offset: start,
                        }
                        .into());
                    }
                    if inner_seq & 1 == 1 {
                        self.pending_acks.push(inner_msg_id);
                    }
                    let inner = body[start..start + len].to_vec();
                    self.handle_body(inner_msg_id, &inner, outcomes)?;
                    // Advance the cursor past the payload.
                    let mut skip = vec![0u8; len];
                    cur.read_exact(&mut skip)?;
                }
            }
            ID_GZIP_PACKED => {
                let inflated = inflate(&body[4..])?;
                self.handle_body(server_msg_id, &inflated, outcomes)?;
            }
            ID_RPC_RESULT => {
                if body.len() < 12 {
                    return Ok(());
                }
                let req_msg_id = i64::from_le_bytes(body[4..12].try_into().unwrap());
                self.pending.remove(&req_msg_id);
                let payload = &body[12..];
                let result = self.decode_rpc_payload(payload)?;
                outcomes.push(Outcome::Reply { req_msg_id, result });
            }
            types::Pong::CONSTRUCTOR_ID => {
                let pong = types::Pong::from_bytes(&body[4..])?;
                self.pending.remove(&pong.msg_id);
                outcomes.push(Outcome::Reply {
                    req_msg_id: pong.msg_id,
                    result: Ok(body.to_vec()),
                });
            }
            types::BadServerSalt::CONSTRUCTOR_ID => {
                let bad = types::BadServerSalt::from_bytes(&body[4..])?;
                log::debug!("bad_server_salt for {}: new salt", bad.bad_msg_id);
                self.enc.salt = bad.new_server_salt;
                outcomes.push(Outcome::Resend { req_msg_id: bad.bad_msg_id });
            }
            types::BadMsgNotification::CONSTRUCTOR_ID => {
                let bad = types::BadMsgNotification::from_bytes(&body[4..])?;
                match bad.error_code {
                    BAD_MSG_ID_TOO_LOW | BAD_MSG_ID_TOO_HIGH => {
                        self.enc.sync_time_from(server_msg_id);
                        outcomes.push(Outcome::Resend { req_msg_id: bad.bad_msg_id });
                    }
                    code => {
                        log::warn!("bad_msg_notification code {code} for {}", bad.bad_msg_id);
                        self.pending.remove(&bad.bad_msg_id);
                        outcomes.push(Outcome::Reply {
                            req_msg_id: bad.bad_msg_id,
                            result: Err(RpcError {
                                code,
                                name: "BAD_MSG_NOTIFICATION".into(),
                                value: Some(code as u32),
                            }),
                        });
                    }
                }
            }
            types::NewSessionCreated::CONSTRUCTOR_ID => {
                let created = types::NewSessionCreated::from_bytes(&body[4..])?;
                self.enc.salt = created.server_salt;
                self.pending_acks.clear();
            }
            types::MsgsAck::CONSTRUCTOR_ID => {
                let ack = types::MsgsAck::from_bytes(&body[4..])?;
                for id in ack.msg_ids {
                    if let Some(p) = self.pending.get_mut(&id) {
                        p.acked = true;
                    }
                }
            }
            _ if is_updates_constructor(id) => {
                let parsed = tgcore_tl::enums::Updates::from_bytes(body)?;
                self.updates.push_back(parsed);
            }
            other => {
                log::debug!("ignoring unhandled constructor {other:#010x}");
            }
        }
        Ok(())
    }

    fn decode_rpc_payload(&self, payload: &[u8]) -> Result<Result<Vec<u8>, RpcError>, InvocationError> {
        if payload.len() >= 4 {
            let id = u32::from_le_bytes(payload[..4].try_into().unwrap());
            if id == types::RpcError::CONSTRUCTOR_ID {
                let err = types::RpcError::from_bytes(&payload[4..])?;
                return Ok(Err(RpcError::from_telegram(err.error_code, &err.error_message)));
            }
            if id == ID_GZIP_PACKED {
                return Ok(Ok(inflate(&payload[4..])?));
            }
        }
        Ok(Ok(payload.to_vec()))
    }
}

fn is_updates_constructor(id: u32) -> bool {
    matches!(
        id,
        0xe317af7e // updatesTooLong
            | 0x313bc7f8 // updateShortMessage
            | 0x4d6deea5 // updateShortChatMessage
            | 0x78d4dec1 // updateShort
            | 0x725b04c3 // updatesCombined
            | 0x74ae4240 // updates
    )
}

/// Inflate a `gzip_packed` payload (a TL bytes field holding a gzip
/// stream).
fn inflate(tl_bytes: &[u8]) -> Result<Vec<u8>, InvocationError> {
    let packed = Vec::<u8>::from_bytes(tl_bytes)?;
    let mut out = Vec::new();
    flate2::read::GzDecoder::new(packed.as_slice())
        .read_to_end(&mut out)
        .map_err(InvocationError::Io)?;
    Ok(out)
}

// ─── Connection ──────────────────────────────────────────────────────────────

/// An authenticated TCP channel to one DC.
pub(crate) struct Connection {
    stream: TcpStream,
    codec: Box<dyn Framing>,
    read_buf: Vec<u8>,
    pub(crate) engine: Engine,
    pub(crate) dc: DcAddress,
    pub(crate) auth_state: AuthState,
    next_ping_id: i64,
}

impl Connection {
    /// Open a TCP connection and run the full key handshake.
    pub(crate) async fn connect(
        dc: DcAddress,
        kind: TransportKind,
        delta_time: i32,
    ) -> Result<Self, InvocationError> {
        log::info!("connecting to DC{} at {}:{}", dc.id, dc.host, dc.port);
        let stream = TcpStream::connect((dc.host.as_str(), dc.port)).await?;
        let mut this = Self {
            stream,
            codec: kind.codec(),
            read_buf: Vec::new(),
            // Placeholder session; replaced once the handshake finishes.
            engine: Engine::new(EncryptedSession::with_session_id([0; 256], 0, 0, 1)),
            dc,
            auth_state: AuthState::HaveAKey,
            next_ping_id: 1,
        };

        let mut plain = Session::with_delta_time(delta_time);
        let mut negotiator = Negotiator::new();
        let first = negotiator.begin();
        this.send_frame(&plain.pack_body(first).to_plaintext_bytes()).await?;

        let finished = loop {
            let frame = this.recv_frame().await?;
            let (_, resp) = parse_plaintext_frame(&frame).ok_or_else(|| {
                InvocationError::Decode(tgcore_tl::deserialize::Error::UnexpectedEof {
                    offset: 0,
                })
            })?;
            match negotiator.step(resp)? {
                StepResult::Send(next) => {
                    this.send_frame(&plain.pack_body(next).to_plaintext_bytes()).await?;
                }
                StepResult::Done(done) => break done,
            }
        };
        log::info!(
            "auth key ready for DC{} (delta_time {}s)",
            this.dc.id,
            finished.time_offset
        );

        this.engine = Engine::new(EncryptedSession::new(
            finished.auth_key,
            finished.first_salt,
            finished.time_offset,
        ));
        Ok(this)
    }

    /// Open a TCP connection reusing a previously negotiated key.
    pub(crate) async fn connect_with_key(
        dc: DcAddress,
        kind: TransportKind,
        auth_key: [u8; 256],
        server_salt: i64,
        delta_time: i32,
    ) -> Result<Self, InvocationError> {
        log::info!("reconnecting to DC{} with saved key", dc.id);
        let stream = TcpStream::connect((dc.host.as_str(), dc.port)).await?;
        Ok(Self {
            stream,
            codec: kind.codec(),
            read_buf: Vec::new(),
            engine: Engine::new(EncryptedSession::new(auth_key, server_salt, delta_time)),
            dc,
            auth_state: AuthState::HaveAKey,
            next_ping_id: 1,
        })
    }

    pub(crate) async fn send_frame(&mut self, payload: &[u8]) -> Result<(), InvocationError> {
        let mut wire = Vec::with_capacity(payload.len() + 8);
        self.codec.pack(payload, &mut wire);
        self.stream.write_all(&wire).await?;
        Ok(())
    }

    pub(crate) async fn recv_frame(&mut self) -> Result<Vec<u8>, InvocationError> {
        loop {
            if let Some((consumed, frame)) = self.codec.unpack(&self.read_buf)? {
                self.read_buf.drain(..consumed);
                return Ok(frame);
            }
            let mut chunk = [0u8; 4096];
            let n = self.stream.read(&mut chunk).await?;
            if n == 0 {
                return Err(InvocationError::Dropped);
            }
            self.read_buf.extend_from_slice(&chunk[..n]);
        }
    }

    /// Send a request and wait for its reply, servicing every protocol
    /// message that arrives in between.
    pub(crate) async fn invoke_raw<R: RemoteCall>(
        &mut self,
        req: &R,
    ) -> Result<Vec<u8>, InvocationError> {
        if let Some(acks) = self.engine.take_acks_frame() {
            self.send_frame(&acks).await?;
        }
        let (wire, msg_id) = self.engine.pack(req);
        self.send_frame(&wire).await?;
        self.wait_for_reply(msg_id).await
    }

    async fn wait_for_reply(&mut self, mut wait_for: i64) -> Result<Vec<u8>, InvocationError> {
        loop {
            let mut frame = self.recv_frame().await?;
            for outcome in self.engine.handle_frame(&mut frame)? {
                match outcome {
                    Outcome::Reply { req_msg_id, result } if req_msg_id == wait_for => {
                        return result.map_err(|e| InvocationError::Rpc(e).classify());
                    }
                    Outcome::Reply { .. } => {}
                    Outcome::Resend { req_msg_id } => {
                        if let Some((wire, new_id)) = self.engine.repack(req_msg_id) {
                            if req_msg_id == wait_for {
                                wait_for = new_id;
                            }
                            self.send_frame(&wire).await?;
                        }
                    }
                }
            }
        }
    }

    /// Decode the reply into the call's return type.
    pub(crate) async fn invoke<R: RemoteCall>(
        &mut self,
        req: &R,
    ) -> Result<R::Return, InvocationError> {
        let body = self.invoke_raw(req).await?;
        Ok(R::Return::from_bytes(&body)?)
    }

    /// One keepalive round trip. The caller applies the timeout.
    pub(crate) async fn ping(&mut self) -> Result<(), InvocationError> {
        let ping_id = self.next_ping_id;
        self.next_ping_id += 1;
        let _ = self
            .invoke_raw(&tgcore_tl::functions::Ping { ping_id })
            .await?;
        Ok(())
    }

    /// Wait for server-pushed updates until `timeout` elapses. Returns
    /// everything queued so far.
    pub(crate) async fn recv_updates(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<Vec<tgcore_tl::enums::Updates>, InvocationError> {
        if self.engine.updates.is_empty() {
            match tokio::time::timeout(timeout, self.recv_frame()).await {
                Ok(frame) => {
                    let mut frame = frame?;
                    let _ = self.engine.handle_frame(&mut frame)?;
                }
                Err(_) => return Ok(Vec::new()),
            }
        }
        Ok(self.engine.updates.drain(..).collect())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tgcore_crypto::{encrypt_data, AuthKey, DequeBuffer, Side};
    use tgcore_tl::functions;

    const KEY: [u8; 256] = [0x42; 256];
    const SESSION_ID: i64 = 0x1020_3040_5060_7080;

    fn engine() -> Engine {
        Engine::new(EncryptedSession::with_session_id(KEY, 0x1111, 0, SESSION_ID))
    }

    fn server_frame(msg_id: i64, seq_no: i32, body: &[u8]) -> Vec<u8> {
        let mut buf = DequeBuffer::with_capacity(32 + body.len(), 24);
        buf.extend(0x1111i64.to_le_bytes());
        buf.extend(SESSION_ID.to_le_bytes());
        buf.extend(msg_id.to_le_bytes());
        buf.extend(seq_no.to_le_bytes());
        buf.extend((body.len() as u32).to_le_bytes());
        buf.extend(body.iter().copied());
        encrypt_data(&mut buf, &AuthKey::from_bytes(KEY), Side::Server);
        buf.as_ref().to_vec()
    }

    fn rpc_result(req_msg_id: i64, payload: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        ID_RPC_RESULT.serialize(&mut body);
        req_msg_id.serialize(&mut body);
        body.extend_from_slice(payload);
        body
    }

    #[test]
    fn rpc_result_resolves_pending_request() {
        let mut engine = engine();
        let (_, msg_id) = engine.pack(&functions::updates::GetState {});

        let mut frame = server_frame(msg_id + 1, 1, &rpc_result(msg_id, b"\x01\x02\x03\x04"));
        let outcomes = engine.handle_frame(&mut frame).unwrap();

        assert!(matches!(
            &outcomes[..],
            [Outcome::Reply { req_msg_id, result: Ok(body) }]
                if *req_msg_id == msg_id && body == &vec![1, 2, 3, 4]
        ));
        // The content-related server message owes an ack.
        assert!(engine.take_acks_frame().is_some());
    }

    #[test]
    fn rpc_error_is_parsed() {
        let mut engine = engine();
        let (_, msg_id) = engine.pack(&functions::updates::GetState {});

        let mut payload = Vec::new();
        types::RpcError::CONSTRUCTOR_ID.serialize(&mut payload);
        types::RpcError { error_code: 303, error_message: "PHONE_MIGRATE_4".into() }
            .serialize(&mut payload);

        let mut frame = server_frame(msg_id + 1, 1, &rpc_result(msg_id, &payload));
        let outcomes = engine.handle_frame(&mut frame).unwrap();
        match &outcomes[..] {
            [Outcome::Reply { result: Err(e), .. }] => {
                assert_eq!(e.migrate(), Some((crate::errors::MigrateKind::Phone, 4)));
            }
            other => panic!("unexpected outcomes: {other:?}"),
        }
    }

    #[test]
    fn bad_server_salt_updates_salt_and_requests_one_resend() {
        let mut engine = engine();
        let (_, msg_id) = engine.pack(&functions::updates::GetState {});

        let mut body = Vec::new();
        types::BadServerSalt::CONSTRUCTOR_ID.serialize(&mut body);
        types::BadServerSalt {
            bad_msg_id: msg_id,
            bad_msg_seqno: 1,
            error_code: 48,
            new_server_salt: 0xBEEF,
        }
        .serialize(&mut body);

        let mut frame = server_frame(msg_id + 1, 0, &body);
        let outcomes = engine.handle_frame(&mut frame).unwrap();

        assert_eq!(engine.enc.salt, 0xBEEF);
        let [Outcome::Resend { req_msg_id }] = &outcomes[..] else {
            panic!("expected a single resend");
        };
        let (_, new_id) = engine.repack(*req_msg_id).unwrap();
        assert!(new_id > msg_id, "retried message must have a larger msg_id");
        // The request was re-registered only once.
        assert!(engine.repack(*req_msg_id).is_none());
    }

    #[test]
    fn clock_skew_notification_resyncs_delta_time() {
        let mut engine = engine();
        let (_, msg_id) = engine.pack(&functions::updates::GetState {});

        let mut body = Vec::new();
        types::BadMsgNotification::CONSTRUCTOR_ID.serialize(&mut body);
        types::BadMsgNotification { bad_msg_id: msg_id, bad_msg_seqno: 1, error_code: 16 }
            .serialize(&mut body);

        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        let server_msg_id = (now + 25) << 32;
        let mut frame = server_frame(server_msg_id, 0, &body);
        let outcomes = engine.handle_frame(&mut frame).unwrap();

        assert!(matches!(outcomes[..], [Outcome::Resend { .. }]));
        assert!((engine.enc.delta_time - 25).abs() <= 2);
    }

    #[test]
    fn container_processes_submessages_in_order() {
        let mut engine = engine();
        let (_, id_a) = engine.pack(&functions::updates::GetState {});
        let (_, id_b) = engine.pack(&functions::help::GetConfig {});

        let sub_a = rpc_result(id_a, b"aaaa");
        let sub_b = rpc_result(id_b, b"bbbb");

        let mut body = Vec::new();
        ID_MSG_CONTAINER.serialize(&mut body);
        2u32.serialize(&mut body);
        for (i, sub) in [&sub_a, &sub_b].into_iter().enumerate() {
            ((1000 + i as i64) << 2).serialize(&mut body);
            1i32.serialize(&mut body);
            (sub.len() as u32).serialize(&mut body);
            body.extend_from_slice(sub);
        }

        let mut frame = server_frame(0x500 << 32, 0, &body);
        let outcomes = engine.handle_frame(&mut frame).unwrap();
        let ids: Vec<i64> = outcomes
            .iter()
            .map(|o| match o {
                Outcome::Reply { req_msg_id, .. } => *req_msg_id,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(ids, vec![id_a, id_b]);
    }

    #[test]
    fn gzip_packed_bodies_are_inflated() {
        let mut engine = engine();
        let (_, msg_id) = engine.pack(&functions::updates::GetState {});

        let inner = rpc_result(msg_id, b"zzzz");
        let mut enc = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        enc.write_all(&inner).unwrap();
        let packed = enc.finish().unwrap();

        let mut body = Vec::new();
        ID_GZIP_PACKED.serialize(&mut body);
        packed.serialize(&mut body);

        let mut frame = server_frame(0x600 << 32, 0, &body);
        let outcomes = engine.handle_frame(&mut frame).unwrap();
        assert!(matches!(
            &outcomes[..],
            [Outcome::Reply { result: Ok(b), .. }] if b == b"zzzz"
        ));
    }

    #[test]
    fn msgs_ack_marks_requests_not_replayable() {
        let mut engine = engine();
        let (_, msg_id) = engine.pack(&functions::updates::GetState {});

        let mut body = Vec::new();
        types::MsgsAck::CONSTRUCTOR_ID.serialize(&mut body);
        types::MsgsAck { msg_ids: vec![msg_id] }.serialize(&mut body);

        let mut frame = server_frame(0x700 << 32, 0, &body);
        engine.handle_frame(&mut frame).unwrap();
        assert!(engine.take_unacked_bodies().is_empty());
    }

    #[test]
    fn unacked_requests_are_replayable_after_disconnect() {
        let mut engine = engine();
        let (_, _) = engine.pack(&functions::updates::GetState {});
        let bodies = engine.take_unacked_bodies();
        assert_eq!(bodies.len(), 1);
        assert_eq!(
            bodies[0],
            functions::updates::GetState {}.to_bytes(),
        );
    }

    #[test]
    fn new_session_created_rotates_salt_and_clears_acks() {
        let mut engine = engine();

        // Owe an ack first.
        let mut frame = server_frame(0x800 << 32, 1, &rpc_result(1, b"xxxx"));
        engine.handle_frame(&mut frame).unwrap();

        let mut body = Vec::new();
        types::NewSessionCreated::CONSTRUCTOR_ID.serialize(&mut body);
        types::NewSessionCreated { first_msg_id: 1, unique_id: 2, server_salt: 0xD00D }
            .serialize(&mut body);
        let mut frame = server_frame(0x900 << 32, 0, &body);
        engine.handle_frame(&mut frame).unwrap();

        assert_eq!(engine.enc.salt, 0xD00D);
        assert!(engine.take_acks_frame().is_none(), "pending acks must be cleared");
    }

    #[test]
    fn pushed_updates_are_queued() {
        let mut engine = engine();
        let container = tgcore_tl::enums::Updates::TooLong;
        let mut frame = server_frame(0xA00 << 32, 1, &container.to_bytes());
        let outcomes = engine.handle_frame(&mut frame).unwrap();
        assert!(outcomes.is_empty());
        assert_eq!(engine.updates.len(), 1);
    }
}
