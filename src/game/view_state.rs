use std::time::Duration;

use crate::game::diff::DiffTracker;
use crate::game::flow::{DefenseFlow, InviteFlow};
use crate::game::notifications::Notifier;
use crate::models::snapshot::{GameSnapshot, Phase};

/// Who the local player is in the current room.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientIdentity {
    pub game_id: Option<String>,
    pub player_id: Option<String>,
    pub player_name: String,
}

/// Everything the client knows for one session of use.
///
/// Owned by exactly one `ClientInstance` and handed to the reconciler, gate and
/// renderer by reference.
#[derive(Debug)]
pub struct ClientViewState {
    pub snapshot: Option<GameSnapshot>,
    pub identity: ClientIdentity,
    pub last_phase: Option<Phase>,
    pub tracker: DiffTracker,
    pub defense: DefenseFlow,
    pub invite: InviteFlow,
    pub name_prompt: bool,
    pub invite_link: Option<String>,
    pub chat_watermark: usize,
    pub notifications: Notifier,
}

impl ClientViewState {
    pub fn new(notification_ttl: Duration) -> Self {
        Self {
            snapshot: None,
            identity: ClientIdentity::default(),
            last_phase: None,
            tracker: DiffTracker::default(),
            defense: DefenseFlow::Idle,
            invite: InviteFlow::Inactive,
            name_prompt: false,
            invite_link: None,
            chat_watermark: 0,
            notifications: Notifier::new(notification_ttl),
        }
    }

    pub fn player_id(&self) -> Option<&str> {
        self.identity.player_id.as_deref()
    }

    pub fn phase(&self) -> Option<Phase> {
        self.snapshot.as_ref().map(|s| s.phase)
    }

    /// Drops everything tied to the current room before another one is opened.
    /// The display name, invite state and notification survive.
    pub fn leave_room(&mut self) {
        self.snapshot = None;
        self.identity.player_id = None;
        self.last_phase = None;
        self.tracker.reset();
        self.defense.cancel();
        self.chat_watermark = 0;
    }

    /// Back to the entry screen: forgets the game, the seat and every flow.
    pub fn reset(&mut self) {
        self.snapshot = None;
        self.identity = ClientIdentity::default();
        self.last_phase = None;
        self.tracker.reset();
        self.defense.cancel();
        self.invite.cancel();
        self.name_prompt = false;
        self.chat_watermark = 0;
        self.notifications.clear();
    }
}
