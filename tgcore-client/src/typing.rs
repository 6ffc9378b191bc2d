//! Chat-action (typing) tracking.
//!
//! One repeating timer drains two lists: actions received from contacts
//! (shown in the UI until their TTL runs out) and actions we emitted
//! ourselves (kept to suppress re-sending while one is still live).

use std::time::Duration;

use tgcore_tl::enums::{InputPeer, SendMessageAction};

/// How long a received contact action stays alive.
pub const REMOTE_ACTION_TTL: Duration = Duration::from_millis(6000);

/// How long a locally emitted action is considered live.
pub const LOCAL_ACTION_TTL: Duration = Duration::from_millis(5000);

/// Recommended interval for the embedding application to re-emit a
/// still-ongoing action: half the slack between the two TTLs, minus a
/// safety margin.
pub const RECOMMENDED_REPEAT_INTERVAL: Duration = Duration::from_millis(400);

/// A contact action still counting down.
#[derive(Clone, Debug)]
pub struct RemoteAction {
    /// Who is acting.
    pub user_id: i32,
    /// The chat the action happens in, `None` for a direct chat.
    pub chat_id: Option<i32>,
    /// What they are doing.
    pub action: SendMessageAction,
    remaining: Duration,
}

#[derive(Clone, Debug)]
struct LocalAction {
    peer: InputPeer,
    remaining: Duration,
}

/// An action that just timed out, reported so the UI can clear it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpiredAction {
    /// Who stopped acting.
    pub user_id: i32,
    /// The chat it happened in, `None` for a direct chat.
    pub chat_id: Option<i32>,
}

/// Tracks both direction's live chat actions.
#[derive(Debug, Default)]
pub struct ActionTracker {
    remote: Vec<RemoteAction>,
    local: Vec<LocalAction>,
}

impl ActionTracker {
    /// An empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or refresh) an action received from a contact.
    pub fn note_remote(&mut self, user_id: i32, chat_id: Option<i32>, action: SendMessageAction) {
        match self
            .remote
            .iter_mut()
            .find(|a| a.user_id == user_id && a.chat_id == chat_id)
        {
            Some(existing) => {
                existing.action = action;
                existing.remaining = REMOTE_ACTION_TTL;
            }
            None => self.remote.push(RemoteAction {
                user_id,
                chat_id,
                action,
                remaining: REMOTE_ACTION_TTL,
            }),
        }
    }

    /// Drop a contact's action immediately (a message from them arrived).
    pub fn clear_remote(&mut self, user_id: i32, chat_id: Option<i32>) -> bool {
        let before = self.remote.len();
        self.remote.retain(|a| !(a.user_id == user_id && a.chat_id == chat_id));
        self.remote.len() != before
    }

    /// Whether we may emit an action to `peer` without flooding. Records
    /// the emission when allowed.
    pub fn note_local(&mut self, peer: &InputPeer) -> bool {
        if self.local.iter().any(|a| &a.peer == peer) {
            return false;
        }
        self.local.push(LocalAction { peer: peer.clone(), remaining: LOCAL_ACTION_TTL });
        true
    }

    /// The currently live contact actions.
    pub fn remote_actions(&self) -> &[RemoteAction] {
        &self.remote
    }

    /// Advance both lists by `elapsed`; returns the remote actions that
    /// just expired.
    pub fn tick(&mut self, elapsed: Duration) -> Vec<ExpiredAction> {
        let mut expired = Vec::new();
        self.remote.retain_mut(|a| {
            if let Some(left) = a.remaining.checked_sub(elapsed) {
                if left > Duration::ZERO {
                    a.remaining = left;
                    return true;
                }
            }
            expired.push(ExpiredAction { user_id: a.user_id, chat_id: a.chat_id });
            false
        });
        self.local.retain_mut(|a| {
            match a.remaining.checked_sub(elapsed) {
                Some(left) if left > Duration::ZERO => {
                    a.remaining = left;
                    true
                }
                _ => false,
            }
        });
        expired
    }

    /// Time until the next entry expires, for scheduling the timer.
    /// `None` when both lists are empty.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.remote
            .iter()
            .map(|a| a.remaining)
            .chain(self.local.iter().map(|a| a.remaining))
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_action_expires_after_ttl() {
        let mut t = ActionTracker::new();
        t.note_remote(1, None, SendMessageAction::Typing);
        assert!(t.tick(Duration::from_millis(5900)).is_empty());
        let expired = t.tick(Duration::from_millis(200));
        assert_eq!(expired, vec![ExpiredAction { user_id: 1, chat_id: None }]);
        assert!(t.remote_actions().is_empty());
    }

    #[test]
    fn refreshed_action_restarts_its_ttl() {
        let mut t = ActionTracker::new();
        t.note_remote(1, Some(10), SendMessageAction::Typing);
        t.tick(Duration::from_millis(5000));
        t.note_remote(1, Some(10), SendMessageAction::Typing);
        assert!(t.tick(Duration::from_millis(2000)).is_empty());
        assert_eq!(t.remote_actions().len(), 1);
    }

    #[test]
    fn message_arrival_clears_action() {
        let mut t = ActionTracker::new();
        t.note_remote(7, None, SendMessageAction::Typing);
        assert!(t.clear_remote(7, None));
        assert!(!t.clear_remote(7, None));
    }

    #[test]
    fn local_emissions_are_rate_limited() {
        let mut t = ActionTracker::new();
        let peer = InputPeer::Contact(tgcore_tl::types::InputPeerContact { user_id: 3 });
        assert!(t.note_local(&peer));
        assert!(!t.note_local(&peer), "second emission within TTL is suppressed");
        t.tick(LOCAL_ACTION_TTL);
        assert!(t.note_local(&peer), "after expiry the action may be re-sent");
    }

    #[test]
    fn ttl_constants_match_protocol_expectations() {
        assert_eq!(REMOTE_ACTION_TTL.as_millis(), 6000);
        assert_eq!(LOCAL_ACTION_TTL.as_millis(), 5000);
        assert_eq!(RECOMMENDED_REPEAT_INTERVAL.as_millis(), 400);
        assert!(RECOMMENDED_REPEAT_INTERVAL < REMOTE_ACTION_TTL - LOCAL_ACTION_TTL);
    }

    #[test]
    fn deadline_tracks_soonest_expiry() {
        let mut t = ActionTracker::new();
        assert_eq!(t.next_deadline(), None);
        t.note_remote(1, None, SendMessageAction::Typing);
        let peer = InputPeer::PeerSelf;
        t.note_local(&peer);
        assert_eq!(t.next_deadline(), Some(LOCAL_ACTION_TTL));
    }
}
