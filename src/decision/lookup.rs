//! Rough equity lookup for the weakest tier.
//!
//! No sampling: preflop strength comes from a hole-card chart, postflop
//! strength from the made-hand category. Deliberately coarse - tier-3
//! actors misjudge marginal spots, which is the point.

use crate::core::{evaluate_best, Card, HandCategory};

/// Heads-up preflop strength from the hole-card chart.
fn preflop_heads_up(hole: &[Card]) -> f64 {
    let (a, b) = (hole[0], hole[1]);
    let (high, low) = {
        let (h, l) = (a.high_rank().max(b.high_rank()), a.high_rank().min(b.high_rank()));
        (f64::from(h), f64::from(l))
    };

    if a.high_rank() == b.high_rank() {
        // 22 ~ 0.50 up to AA ~ 0.80.
        return 0.50 + 0.025 * (high - 2.0);
    }

    let mut strength = 0.18 + 0.018 * (high + low);
    if a.suit() == b.suit() {
        strength += 0.03;
    }
    if (high - low) <= 2.0 {
        strength += 0.02;
    }
    strength
}

/// Rough made-hand strength per category.
fn category_strength(category: HandCategory) -> f64 {
    match category {
        HandCategory::HighCard => 0.15,
        HandCategory::OnePair => 0.38,
        HandCategory::TwoPair => 0.58,
        HandCategory::ThreeOfAKind => 0.68,
        HandCategory::Straight => 0.76,
        HandCategory::Flush => 0.81,
        HandCategory::FullHouse => 0.88,
        HandCategory::FourOfAKind => 0.95,
        HandCategory::StraightFlush => 0.98,
        HandCategory::RoyalFlush => 0.99,
    }
}

/// Chart-based equity estimate; no randomness involved.
#[must_use]
pub fn rough_equity(hole: &[Card], board: &[Card], opponent_count: usize) -> f64 {
    if hole.len() < 2 {
        return 0.0;
    }

    let heads_up = if board.is_empty() {
        preflop_heads_up(hole)
    } else {
        let mut cards: Vec<Card> = hole.to_vec();
        cards.extend_from_slice(board);
        match evaluate_best(&cards) {
            Ok(rank) => category_strength(rank.category),
            Err(_) => 0.15,
        }
    };

    // Each extra opponent compounds the chance of being outdrawn.
    let exponent = 1.0 + 0.6 * (opponent_count.max(1) - 1) as f64;
    heads_up.powf(exponent).clamp(0.02, 0.95)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aces_beat_junk_preflop() {
        let aces = [Card::new(1, 0), Card::new(1, 1)];
        let junk = [Card::new(7, 0), Card::new(2, 1)];
        let aces_eq = rough_equity(&aces, &[], 1);
        let junk_eq = rough_equity(&junk, &[], 1);
        assert!(aces_eq > 0.7);
        assert!(junk_eq < 0.45);
    }

    #[test]
    fn test_suited_and_connected_add_value() {
        let offsuit = [Card::new(13, 0), Card::new(12, 1)];
        let suited = [Card::new(13, 0), Card::new(12, 0)];
        assert!(rough_equity(&suited, &[], 1) > rough_equity(&offsuit, &[], 1));
    }

    #[test]
    fn test_more_opponents_shrink_equity() {
        let hand = [Card::new(1, 0), Card::new(13, 0)];
        let heads_up = rough_equity(&hand, &[], 1);
        let full_table = rough_equity(&hand, &[], 5);
        assert!(full_table < heads_up);
    }

    #[test]
    fn test_made_flush_reads_strong() {
        let hole = [Card::new(9, 1), Card::new(4, 1)];
        let board = [Card::new(2, 1), Card::new(7, 1), Card::new(11, 1)];
        assert!(rough_equity(&hole, &board, 1) > 0.7);
    }

    #[test]
    fn test_equity_bounded() {
        let hole = [Card::new(1, 0), Card::new(1, 1)];
        for n in 1..9 {
            let eq = rough_equity(&hole, &[], n);
            assert!((0.02..=0.95).contains(&eq));
        }
    }
}
