use crate::utils::errors::InputError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Card ranks in ascending order. The discriminant is the rank index used for sorting.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "6")]
    Six = 0,
    #[serde(rename = "7")]
    Seven = 1,
    #[serde(rename = "8")]
    Eight = 2,
    #[serde(rename = "9")]
    Nine = 3,
    #[serde(rename = "10")]
    Ten = 4,
    #[serde(rename = "J")]
    Jack = 5,
    #[serde(rename = "Q")]
    Queen = 6,
    #[serde(rename = "K")]
    King = 7,
    #[serde(rename = "A")]
    Ace = 8,
}

impl Rank {
    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn code(self) -> &'static str {
        match self {
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

impl TryFrom<&str> for Rank {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_uppercase().as_str() {
            "6" => Ok(Rank::Six),
            "7" => Ok(Rank::Seven),
            "8" => Ok(Rank::Eight),
            "9" => Ok(Rank::Nine),
            "10" => Ok(Rank::Ten),
            "J" => Ok(Rank::Jack),
            "Q" => Ok(Rank::Queen),
            "K" => Ok(Rank::King),
            "A" => Ok(Rank::Ace),
            _ => Err(()),
        }
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    #[serde(rename = "C")]
    Clubs = 0,
    #[serde(rename = "D")]
    Diamonds = 1,
    #[serde(rename = "H")]
    Hearts = 2,
    #[serde(rename = "S")]
    Spades = 3,
}

impl Suit {
    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn code(self) -> char {
        match self {
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
            Suit::Hearts => 'H',
            Suit::Spades => 'S',
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        }
    }
}

impl TryFrom<char> for Suit {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value.to_ascii_uppercase() {
            'C' | '♣' => Ok(Suit::Clubs),
            'D' | '♦' => Ok(Suit::Diamonds),
            'H' | '♥' => Ok(Suit::Hearts),
            'S' | '♠' => Ok(Suit::Spades),
            _ => Err(()),
        }
    }
}

/// A playing card. Two cards with the same rank and suit are the same card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Canonical code, rank followed by suit letter (`10S`, `AH`).
    pub fn code(&self) -> String {
        format!("{}{}", self.rank.code(), self.suit.code())
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank.code(), self.suit.symbol())
    }
}

impl FromStr for Card {
    type Err = InputError;

    /// Accepts the canonical code or the rank followed by a suit symbol (`10♠`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let invalid = || InputError::InvalidCard(trimmed.to_string());

        let suit_char = trimmed.chars().last().ok_or_else(invalid)?;
        let rank_part = &trimmed[..trimmed.len() - suit_char.len_utf8()];
        let suit = Suit::try_from(suit_char).map_err(|_| invalid())?;
        let rank = Rank::try_from(rank_part).map_err(|_| invalid())?;
        Ok(Card { rank, suit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_wire_format() {
        let card = Card::new(Rank::Ten, Suit::Spades);
        let json = serde_json::to_value(card).unwrap();
        assert_eq!(json, serde_json::json!({"rank": "10", "suit": "S"}));

        let parsed: Card = serde_json::from_value(serde_json::json!({"rank": "A", "suit": "H"})).unwrap();
        assert_eq!(parsed, Card::new(Rank::Ace, Suit::Hearts));
    }

    #[test]
    fn test_card_parse_from_code() {
        assert_eq!("10s".parse::<Card>().unwrap(), Card::new(Rank::Ten, Suit::Spades));
        assert_eq!("QD".parse::<Card>().unwrap(), Card::new(Rank::Queen, Suit::Diamonds));
        assert_eq!("6♣".parse::<Card>().unwrap(), Card::new(Rank::Six, Suit::Clubs));
    }

    #[test]
    fn test_card_parse_rejects_garbage() {
        assert_eq!("".parse::<Card>(), Err(InputError::InvalidCard(String::new())));
        assert!("5H".parse::<Card>().is_err());
        assert!("AX".parse::<Card>().is_err());
    }

    #[test]
    fn test_card_code_and_display() {
        let card = Card::new(Rank::Ten, Suit::Hearts);
        assert_eq!(card.code(), "10H");
        assert_eq!(card.to_string(), "10♥");
    }
}
