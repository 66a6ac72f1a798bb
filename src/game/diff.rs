use std::collections::BTreeSet;

use crate::models::card::Card;
use crate::models::snapshot::TableSlot;

pub type MembershipSet = BTreeSet<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRole {
    Attack,
    Defense,
}

impl TableRole {
    fn marker(self) -> char {
        match self {
            TableRole::Attack => 'A',
            TableRole::Defense => 'D',
        }
    }
}

/// Splits `current` into the next membership set and the keys absent from `previous`.
///
/// Pure and order-independent: any permutation of `current` gives the same result.
pub fn diff<I>(previous: &MembershipSet, current: I) -> (MembershipSet, MembershipSet)
where
    I: IntoIterator<Item = String>,
{
    let next: MembershipSet = current.into_iter().collect();
    let appeared = next.difference(previous).cloned().collect();
    (next, appeared)
}

pub fn hand_key(card: &Card) -> String {
    card.code()
}

/// Table entities are keyed by card, role and slot so equal cards in different places stay distinct.
pub fn table_key(card: &Card, role: TableRole, index: usize) -> String {
    format!("{}-{}{}", card.code(), role.marker(), index)
}

pub fn hand_keys(hand: &[Card]) -> Vec<String> {
    hand.iter().map(hand_key).collect()
}

pub fn table_keys(table: &[TableSlot]) -> Vec<String> {
    let mut keys = Vec::with_capacity(table.len() * 2);
    for (index, slot) in table.iter().enumerate() {
        keys.push(table_key(&slot.attack, TableRole::Attack, index));
        if let Some(defense) = &slot.defense {
            keys.push(table_key(defense, TableRole::Defense, index));
        }
    }
    keys
}

/// Newly appeared entities since the previous tracked render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Appeared {
    pub hand: MembershipSet,
    pub table: MembershipSet,
}

/// Membership trackers for the local hand and the table.
#[derive(Debug, Clone, Default)]
pub struct DiffTracker {
    hand: MembershipSet,
    table: MembershipSet,
}

impl DiffTracker {
    /// Forgets everything, so the next `track` reports every entity as new.
    pub fn reset(&mut self) {
        self.hand.clear();
        self.table.clear();
    }

    pub fn track(&mut self, hand: &[Card], table: &[TableSlot]) -> Appeared {
        let (next_hand, new_hand) = diff(&self.hand, hand_keys(hand));
        let (next_table, new_table) = diff(&self.table, table_keys(table));
        self.hand = next_hand;
        self.table = next_table;
        Appeared {
            hand: new_hand,
            table: new_table,
        }
    }

    pub fn hand(&self) -> &MembershipSet {
        &self.hand
    }

    pub fn table(&self) -> &MembershipSet {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::card::{Rank, Suit};

    fn card(code: &str) -> Card {
        code.parse().unwrap()
    }

    fn set(keys: &[&str]) -> MembershipSet {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_diff_reports_only_new_keys() {
        let previous = set(&["6C", "10S"]);
        let (next, appeared) = diff(&previous, vec!["10S".to_string(), "AH".to_string()]);
        assert_eq!(next, set(&["10S", "AH"]));
        assert_eq!(appeared, set(&["AH"]));
    }

    #[test]
    fn test_diff_is_order_independent() {
        let previous = set(&["7D"]);
        let forward = vec!["6C".to_string(), "7D".to_string(), "QS".to_string()];
        let mut backward = forward.clone();
        backward.reverse();
        assert_eq!(diff(&previous, forward), diff(&previous, backward));
    }

    #[test]
    fn test_table_keys_distinguish_role_and_slot() {
        let table = vec![
            TableSlot {
                attack: card("7D"),
                defense: Some(card("9D")),
            },
            TableSlot {
                attack: card("9D"),
                defense: None,
            },
        ];
        assert_eq!(table_keys(&table), vec!["7D-A0", "9D-D0", "9D-A1"]);
    }

    #[test]
    fn test_tracker_second_pass_is_empty() {
        let mut tracker = DiffTracker::default();
        let hand = vec![Card::new(Rank::Six, Suit::Clubs), Card::new(Rank::Ace, Suit::Hearts)];
        let first = tracker.track(&hand, &[]);
        assert_eq!(first.hand, set(&["6C", "AH"]));

        let second = tracker.track(&hand, &[]);
        assert_eq!(second, Appeared::default());
    }

    #[test]
    fn test_reset_makes_everything_new_again() {
        let mut tracker = DiffTracker::default();
        let hand = vec![card("KS")];
        tracker.track(&hand, &[]);
        tracker.reset();
        assert!(tracker.hand().is_empty());
        assert_eq!(tracker.track(&hand, &[]).hand, set(&["KS"]));
    }

    #[test]
    fn test_card_may_reappear_after_leaving() {
        let mut tracker = DiffTracker::default();
        tracker.track(&[card("QH")], &[]);
        tracker.track(&[], &[]);
        assert_eq!(tracker.track(&[card("QH")], &[]).hand, set(&["QH"]));
    }
}
