use crate::game::diff::Appeared;
use crate::game::view_state::ClientViewState;
use crate::logger;
use crate::models::snapshot::{GameSnapshot, Phase};

/// What changed with the last applied snapshot, for presentation only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub phase_entered: Option<Phase>,
    pub appeared: Appeared,
    pub new_chat: usize,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.phase_entered.is_none() && self.appeared == Appeared::default() && self.new_chat == 0
    }
}

pub struct SnapshotReconciler;

impl SnapshotReconciler {
    /// Applies an authoritative snapshot to the view.
    ///
    /// - Replaces the stored snapshot wholesale.
    /// - On a phase change records the new phase; entering `playing` resets the
    ///   membership trackers so a fresh round shows every card as new.
    /// - Diffs the local hand and the table against the trackers.
    /// - Advances the chat watermark, leaves waiting mode once the lobby is over
    ///   and re-targets an open defense selection.
    ///
    /// Applying the same snapshot twice yields an empty change set the second time.
    ///
    /// # Arguments
    /// * `view` - The view state to update.
    /// * `snapshot` - The snapshot just received.
    ///
    /// # Returns
    /// The change set the renderer uses to decide what to animate.
    pub fn apply(view: &mut ClientViewState, snapshot: GameSnapshot) -> ChangeSet {
        let mut changes = ChangeSet::default();
        let phase = snapshot.phase;
        view.snapshot = Some(snapshot);

        if view.last_phase != Some(phase) {
            logger!(INFO, "[RECONCILER] Phase changed to {phase}");
            if phase == Phase::Playing {
                view.tracker.reset();
            }
            view.last_phase = Some(phase);
            changes.phase_entered = Some(phase);
        }

        let Some(snapshot) = view.snapshot.as_ref() else {
            return changes;
        };

        let hand = snapshot.own_hand(view.identity.player_id.as_deref());
        changes.appeared = view.tracker.track(hand, &snapshot.table);

        let chat_len = snapshot.chat.len();
        changes.new_chat = chat_len.saturating_sub(view.chat_watermark);
        view.chat_watermark = chat_len;

        view.invite.on_phase(phase);
        view.defense.refresh(snapshot);

        logger!(
            DEBUG,
            "[RECONCILER] Applied snapshot for `{}` {{ new hand: {}, new table: {}, new chat: {} }}",
            snapshot.id,
            changes.appeared.hand.len(),
            changes.appeared.table.len(),
            changes.new_chat
        );
        changes
    }
}
