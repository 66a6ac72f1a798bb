use std::cmp::Ordering;

use crate::models::card::{Card, Suit};

// Added to trump weights so the whole trump block sorts after every other card.
const TRUMP_OFFSET: u32 = 1000;

fn weight(card: &Card, trump: Option<Suit>) -> u32 {
    let base = card.rank.index() * 10 + card.suit.index();
    if trump == Some(card.suit) {
        base + TRUMP_OFFSET
    } else {
        base
    }
}

fn compare(a: &Card, b: &Card, trump: Option<Suit>) -> Ordering {
    weight(a, trump)
        .cmp(&weight(b, trump))
        .then_with(|| a.code().cmp(&b.code()))
}

/// Display order for a hand: rank, then suit, with trumps last.
///
/// Returns a sorted copy; the snapshot's own order is left alone.
pub fn sort_hand(hand: &[Card], trump: Option<Suit>) -> Vec<Card> {
    let mut sorted = hand.to_vec();
    sorted.sort_by(|a, b| compare(a, b, trump));
    sorted
}
