//! Update-stream reconciliation.
//!
//! The server stamps every message-bearing update with `(pts, pts_count)`.
//! The local state advances only when an update exactly closes the gap;
//! anything else schedules a difference fetch and locks the state so
//! out-of-order arrivals cannot interleave a regression while recovery is
//! in flight.

use tgcore_tl::{enums, types};

/// Debounce before a scheduled `updates.getDifference` fires.
pub const GET_DIFFERENCE_DEBOUNCE_MS: u64 = 10;

// ─── Public message flags ─────────────────────────────────────────────────────

/// Flags exposed to the embedding application for a message.
pub mod message_flags {
    /// The message has been read. Note the polarity: the wire carries an
    /// *unread* bit, absent means read.
    pub const READ: u32 = 1 << 0;
    /// The message is outgoing.
    pub const OUT: u32 = 1 << 1;
    /// The message was forwarded.
    pub const FORWARDED: u32 = 1 << 2;
    /// The message replies to another message.
    pub const IS_REPLY: u32 = 1 << 3;
}

/// Convert wire-level message flags to the public set, inverting the
/// unread bit.
pub fn public_message_flags(message: &types::Message) -> u32 {
    let mut flags = 0;
    if !message.unread {
        flags |= message_flags::READ;
    }
    if message.out {
        flags |= message_flags::OUT;
    }
    if message.fwd_from_id.is_some() {
        flags |= message_flags::FORWARDED;
    }
    if message.reply_to_msg_id.is_some() {
        flags |= message_flags::IS_REPLY;
    }
    flags
}

// ─── UpdateState ─────────────────────────────────────────────────────────────

/// Verdict on an incoming `(pts, pts_count)` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PtsCheck {
    /// The update exactly closes the gap; apply it.
    Apply,
    /// Any other value, ahead or behind; fetch the difference.
    Gap {
        /// What `pts` we expected to see.
        expected: u32,
        /// What actually arrived.
        got: u32,
    },
}

/// The dispatcher-wide `(pts, qts, seq, date)` counters.
///
/// All four advance monotonically. While `locked`, ordinary updates may
/// not advance them; only a difference response (which sets then unlocks)
/// may.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateState {
    /// Main message sequence counter.
    pub pts: u32,
    /// Secondary counter (secret-chat events; tracked, never produced).
    pub qts: u32,
    /// Combined-updates sequence.
    pub seq: u32,
    /// Date of the last known update.
    pub date: u32,
    locked: bool,
}

impl Default for UpdateState {
    fn default() -> Self {
        Self { pts: 1, qts: 1, seq: 0, date: 1, locked: false }
    }
}

impl UpdateState {
    /// Fresh state as used before the first server sync.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a recovery fetch currently owns the state.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Block ordinary advances until [`UpdateState::unlock`].
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Release the recovery lock.
    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// Classify an incoming `(pts, pts_count)` pair. Only an exact gap
    /// closure is applied; every other value, stale ones included, takes
    /// the recovery path.
    pub fn check_pts(&self, pts: u32, pts_count: u32) -> PtsCheck {
        let expected = self.pts + pts_count;
        if pts == expected {
            PtsCheck::Apply
        } else {
            PtsCheck::Gap { expected, got: pts }
        }
    }

    /// Monotone advance honoring the lock. Regressions are ignored.
    pub fn ensure(&mut self, pts: u32, seq: u32, date: u32) {
        if self.locked {
            log::debug!("update state locked; dropping advance to pts={pts}");
            return;
        }
        self.set(pts, seq, date);
    }

    /// Monotone advance regardless of the lock (used when applying a
    /// difference response).
    pub fn set(&mut self, pts: u32, seq: u32, date: u32) {
        if pts > self.pts {
            self.pts = pts;
        }
        if seq > self.seq {
            self.seq = seq;
        }
        if date > self.date {
            self.date = date;
        }
    }

    /// Monotone advance of `qts`.
    pub fn set_qts(&mut self, qts: u32) {
        if qts > self.qts {
            self.qts = qts;
        }
    }

    /// Adopt a server-reported state (still monotone) and release the
    /// lock.
    pub fn apply_server_state(&mut self, state: &types::updates::State) {
        self.set(state.pts, state.seq, state.date);
        self.set_qts(state.qts);
        self.unlock();
    }
}

// ─── Short-update expansion ──────────────────────────────────────────────────

/// Rebuild a full `updateNewMessage` from `updateShortMessage`.
///
/// The short form omits the peers: for outgoing messages the counterpart
/// is the recipient, otherwise the sender, and the other side is always
/// the signed-in user.
pub fn expand_short_message(short: &types::UpdateShortMessage, self_id: i32) -> types::UpdateNewMessage {
    let (from_id, to_user) = if short.out {
        (self_id, short.user_id)
    } else {
        (short.user_id, self_id)
    };
    types::UpdateNewMessage {
        message: enums::Message::Message(types::Message {
            unread: short.unread,
            out: short.out,
            id: short.id,
            from_id,
            to_id: enums::Peer::User(types::PeerUser { user_id: to_user }),
            fwd_from_id: short.fwd_from_id,
            fwd_date: short.fwd_date,
            reply_to_msg_id: short.reply_to_msg_id,
            date: short.date,
            message: short.message.clone(),
            media: None,
        }),
        pts: short.pts,
        pts_count: short.pts_count,
    }
}

/// Rebuild a full `updateNewMessage` from `updateShortChatMessage`.
pub fn expand_short_chat_message(short: &types::UpdateShortChatMessage) -> types::UpdateNewMessage {
    types::UpdateNewMessage {
        message: enums::Message::Message(types::Message {
            unread: short.unread,
            out: short.out,
            id: short.id,
            from_id: short.from_id,
            to_id: enums::Peer::Chat(types::PeerChat { chat_id: short.chat_id }),
            fwd_from_id: short.fwd_from_id,
            fwd_date: short.fwd_date,
            reply_to_msg_id: short.reply_to_msg_id,
            date: short.date,
            message: short.message.clone(),
            media: None,
        }),
        pts: short.pts,
        pts_count: short.pts_count,
    }
}

/// The `(pts, pts_count)` pair of an update, for the ones that carry it.
pub fn pts_of(update: &enums::Update) -> Option<(u32, u32)> {
    match update {
        enums::Update::NewMessage(u) => Some((u.pts, u.pts_count)),
        enums::Update::ReadHistoryInbox(u) => Some((u.pts, u.pts_count)),
        enums::Update::ReadHistoryOutbox(u) => Some((u.pts, u.pts_count)),
        enums::Update::DeleteMessages(u) => Some((u.pts, u.pts_count)),
        enums::Update::ReadMessagesContents(u) => Some((u.pts, u.pts_count)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_gap_closure_applies() {
        let state = UpdateState { pts: 100, ..Default::default() };
        assert_eq!(state.check_pts(101, 1), PtsCheck::Apply);
        assert_eq!(state.check_pts(103, 3), PtsCheck::Apply);
    }

    #[test]
    fn jumped_pts_is_a_gap() {
        let state = UpdateState { pts: 100, ..Default::default() };
        assert_eq!(state.check_pts(103, 1), PtsCheck::Gap { expected: 101, got: 103 });
    }

    #[test]
    fn stale_pts_also_triggers_recovery() {
        let state = UpdateState { pts: 100, ..Default::default() };
        assert_eq!(state.check_pts(99, 1), PtsCheck::Gap { expected: 101, got: 99 });
    }

    #[test]
    fn lock_blocks_ordinary_advance_but_not_server_state() {
        let mut state = UpdateState { pts: 100, ..Default::default() };
        state.lock();
        state.ensure(105, 2, 10);
        assert_eq!(state.pts, 100, "locked state must not advance");

        state.apply_server_state(&types::updates::State {
            pts: 110,
            qts: 5,
            date: 20,
            seq: 3,
            unread_count: 0,
        });
        assert_eq!(state.pts, 110);
        assert_eq!(state.qts, 5);
        assert!(!state.is_locked());
    }

    #[test]
    fn advances_never_regress() {
        let mut state = UpdateState { pts: 100, qts: 7, seq: 4, date: 50, locked: false };
        state.set(90, 1, 10);
        state.set_qts(3);
        assert_eq!((state.pts, state.qts, state.seq, state.date), (100, 7, 4, 50));
    }

    #[test]
    fn short_message_expansion_orients_peers() {
        let short = types::UpdateShortMessage {
            unread: true,
            out: false,
            id: 10,
            user_id: 77,
            message: "hey".into(),
            pts: 5,
            pts_count: 1,
            date: 1000,
            fwd_from_id: None,
            fwd_date: None,
            reply_to_msg_id: None,
        };
        let full = expand_short_message(&short, 900);
        let enums::Message::Message(msg) = &full.message else { panic!() };
        assert_eq!(msg.from_id, 77);
        assert_eq!(msg.to_id, enums::Peer::User(types::PeerUser { user_id: 900 }));
        assert_eq!(msg.media, None);
        assert_eq!((full.pts, full.pts_count), (5, 1));

        let outgoing = types::UpdateShortMessage { out: true, ..short };
        let full = expand_short_message(&outgoing, 900);
        let enums::Message::Message(msg) = &full.message else { panic!() };
        assert_eq!(msg.from_id, 900);
        assert_eq!(msg.to_id, enums::Peer::User(types::PeerUser { user_id: 77 }));
    }

    #[test]
    fn read_flag_polarity_is_inverted() {
        let mut msg = types::Message {
            unread: true,
            out: true,
            id: 1,
            from_id: 2,
            to_id: enums::Peer::User(types::PeerUser { user_id: 3 }),
            fwd_from_id: Some(4),
            fwd_date: Some(5),
            reply_to_msg_id: None,
            date: 6,
            message: String::new(),
            media: None,
        };
        let flags = public_message_flags(&msg);
        assert_eq!(flags & message_flags::READ, 0, "unread on wire means READ absent");
        assert_ne!(flags & message_flags::OUT, 0);
        assert_ne!(flags & message_flags::FORWARDED, 0);

        msg.unread = false;
        assert_ne!(public_message_flags(&msg) & message_flags::READ, 0);
    }
}
