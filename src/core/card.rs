//! Playing card primitives.
//!
//! Cards are immutable values: a rank (1-13, ace low in encoding but
//! playing high in most hand comparisons) and a suit (0-3). The engine
//! never interprets suits beyond equality - flush detection only needs
//! "same suit".

use serde::{Deserialize, Serialize};

/// Number of distinct ranks.
pub const RANK_COUNT: u8 = 13;

/// Number of distinct suits.
pub const SUIT_COUNT: u8 = 4;

/// An immutable playing card.
///
/// Rank 1 is the ace (it compares high in hand evaluation and may
/// complete a wheel straight). Suits are opaque identifiers 0-3.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    rank: u8,
    suit: u8,
}

impl Card {
    /// Create a card. Panics on out-of-range rank or suit.
    #[must_use]
    pub fn new(rank: u8, suit: u8) -> Self {
        assert!((1..=RANK_COUNT).contains(&rank), "rank out of range: {rank}");
        assert!(suit < SUIT_COUNT, "suit out of range: {suit}");
        Self { rank, suit }
    }

    /// The card's rank, 1-13 with 1 = ace.
    #[must_use]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    /// The card's suit, 0-3.
    #[must_use]
    pub const fn suit(self) -> u8 {
        self.suit
    }

    /// Rank for high-card comparison: ace maps to 14, others unchanged.
    #[must_use]
    pub const fn high_rank(self) -> u8 {
        if self.rank == 1 { 14 } else { self.rank }
    }

    /// Build the full 52-card deck in rank-major order.
    #[must_use]
    pub fn full_deck() -> Vec<Card> {
        let mut deck = Vec::with_capacity(52);
        for rank in 1..=RANK_COUNT {
            for suit in 0..SUIT_COUNT {
                deck.push(Card { rank, suit });
            }
        }
        deck
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rank = match self.rank {
            1 => "A".to_string(),
            11 => "J".to_string(),
            12 => "Q".to_string(),
            13 => "K".to_string(),
            r => r.to_string(),
        };
        let suit = ["s", "h", "d", "c"][self.suit as usize];
        write!(f, "{rank}{suit}")
    }
}
