//! Five-card hand evaluation.
//!
//! Produces a `HandRank`: a category (0-9, high card through royal
//! flush) plus a five-slot tiebreak vector, totally ordered so two
//! hands compare with plain `>`/`==`. `evaluate_best` picks the best
//! five-card hand out of up to seven cards (hole + board).
//!
//! Aces compare high everywhere except the wheel (A-2-3-4-5), where
//! the straight is ranked by its five.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use super::card::Card;

/// Hand evaluation failure.
///
/// Simulation loops treat these as skipped trials, never as fatal
/// errors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalError {
    /// A hand needs at least five cards to evaluate.
    #[error("need at least 5 cards to evaluate, got {0}")]
    TooFewCards(usize),
}

/// Hand category, ranked 0 (weakest) through 9 (strongest).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl HandCategory {
    /// Category rank as an index 0-9.
    #[must_use]
    pub const fn rank(self) -> usize {
        self as usize
    }

    /// Descriptive name for presentation layers.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            HandCategory::HighCard => "High Card",
            HandCategory::OnePair => "One Pair",
            HandCategory::TwoPair => "Two Pair",
            HandCategory::ThreeOfAKind => "Three of a Kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full House",
            HandCategory::FourOfAKind => "Four of a Kind",
            HandCategory::StraightFlush => "Straight Flush",
            HandCategory::RoyalFlush => "Royal Flush",
        }
    }
}

/// A fully ordered hand strength: category first, then tiebreaks.
///
/// Tiebreak slots hold high-comparison ranks (ace = 14) in
/// significance order; unused slots are zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HandRank {
    /// The hand category.
    pub category: HandCategory,
    /// Ranks in decreasing significance.
    pub tiebreak: [u8; 5],
}

/// Evaluate exactly five cards.
pub fn evaluate_five(cards: &[Card; 5]) -> HandRank {
    // High-comparison ranks, descending.
    let mut ranks: [u8; 5] = [0; 5];
    for (slot, card) in ranks.iter_mut().zip(cards.iter()) {
        *slot = card.high_rank();
    }
    ranks.sort_unstable_by(|a, b| b.cmp(a));

    let flush = cards.iter().all(|c| c.suit() == cards[0].suit());
    let straight_high = straight_high(&ranks);

    // Rank multiplicities, grouped as (count, rank) descending.
    let mut counts: SmallVec<[(u8, u8); 5]> = SmallVec::new();
    for &r in &ranks {
        match counts.iter_mut().find(|(_, rank)| *rank == r) {
            Some((count, _)) => *count += 1,
            None => counts.push((1, r)),
        }
    }
    counts.sort_unstable_by(|a, b| b.cmp(a));

    if let Some(high) = straight_high {
        if flush {
            let category = if high == 14 {
                HandCategory::RoyalFlush
            } else {
                HandCategory::StraightFlush
            };
            return HandRank { category, tiebreak: [high, 0, 0, 0, 0] };
        }
    }

    match counts.as_slice() {
        [(4, quad), (1, kicker)] => HandRank {
            category: HandCategory::FourOfAKind,
            tiebreak: [*quad, *kicker, 0, 0, 0],
        },
        [(3, trips), (2, pair)] => HandRank {
            category: HandCategory::FullHouse,
            tiebreak: [*trips, *pair, 0, 0, 0],
        },
        _ if flush => HandRank {
            category: HandCategory::Flush,
            tiebreak: ranks,
        },
        _ if straight_high.is_some() => HandRank {
            category: HandCategory::Straight,
            tiebreak: [straight_high.unwrap_or(0), 0, 0, 0, 0],
        },
        [(3, trips), (1, k1), (1, k2)] => HandRank {
            category: HandCategory::ThreeOfAKind,
            tiebreak: [*trips, *k1, *k2, 0, 0],
        },
        [(2, hi), (2, lo), (1, kicker)] => HandRank {
            category: HandCategory::TwoPair,
            tiebreak: [*hi, *lo, *kicker, 0, 0],
        },
        [(2, pair), (1, k1), (1, k2), (1, k3)] => HandRank {
            category: HandCategory::OnePair,
            tiebreak: [*pair, *k1, *k2, *k3, 0],
        },
        _ => HandRank {
            category: HandCategory::HighCard,
            tiebreak: ranks,
        },
    }
}

/// Evaluate the best five-card hand from 5-7 cards.
pub fn evaluate_best(cards: &[Card]) -> Result<HandRank, EvalError> {
    let n = cards.len();
    if n < 5 {
        return Err(EvalError::TooFewCards(n));
    }
    if n == 5 {
        let five: [Card; 5] = [cards[0], cards[1], cards[2], cards[3], cards[4]];
        return Ok(evaluate_five(&five));
    }

    let mut best: Option<HandRank> = None;
    let mut indices = [0usize; 5];
    choose_five(n, &mut indices, 0, 0, &mut |idx| {
        let five = [
            cards[idx[0]],
            cards[idx[1]],
            cards[idx[2]],
            cards[idx[3]],
            cards[idx[4]],
        ];
        let rank = evaluate_five(&five);
        if best.map_or(true, |b| rank > b) {
            best = Some(rank);
        }
    });

    // n >= 5 guarantees at least one combination was visited.
    best.ok_or(EvalError::TooFewCards(n))
}

/// Detect a straight in descending high-ranks. Returns the high card.
fn straight_high(ranks_desc: &[u8; 5]) -> Option<u8> {
    let mut distinct: SmallVec<[u8; 5]> = SmallVec::new();
    for &r in ranks_desc {
        if !distinct.contains(&r) {
            distinct.push(r);
        }
    }
    if distinct.len() != 5 {
        return None;
    }

    if distinct.windows(2).all(|w| w[0] == w[1] + 1) {
        return Some(distinct[0]);
    }
    // The wheel: A-5-4-3-2 sorts as [14, 5, 4, 3, 2].
    if distinct.as_slice() == [14, 5, 4, 3, 2] {
        return Some(5);
    }
    None
}

/// Visit every 5-combination of `0..n` in lexicographic order.
fn choose_five<F: FnMut(&[usize; 5])>(
    n: usize,
    indices: &mut [usize; 5],
    depth: usize,
    start: usize,
    visit: &mut F,
) {
    if depth == 5 {
        visit(indices);
        return;
    }
    for i in start..n {
        indices[depth] = i;
        choose_five(n, indices, depth + 1, i + 1, visit);
    }
}
