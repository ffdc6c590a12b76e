//! Fate-weighted card selection.
//!
//! For every card still in the deck, the engine simulates the reveal
//! (a "universe"), scores it by how well it serves the active forces,
//! and picks one universe - either the best outright or a weighted
//! random draw over min-shifted scores. Whenever no force qualifies,
//! a dominant blank override is present, or no universe is evaluable,
//! selection falls back to a uniform draw: it never fails while the
//! deck is non-empty.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::config::TuningConfig;
use crate::core::{ActorId, ActorState, Card, EngineRng, HandCategory};
use crate::force::{Force, ForceKind};

use super::opposition::{has_dominant_null, resolve_force_opposition};
use super::scoring::{score_universe, Contribution, StyleHistory};
use super::universe::{generate_universe, Universe};

/// How the winning universe is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionMode {
    /// Take the maximum-destiny universe.
    Best,
    /// Weighted random draw over min-shifted destiny scores.
    Weighted,
}

/// Per-call selection options.
#[derive(Clone, Copy, Debug)]
pub struct SelectOptions {
    pub mode: SelectionMode,
    /// Style intensity multiplier for this call.
    pub intensity: f64,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self { mode: SelectionMode::Weighted, intensity: 1.0 }
    }
}

/// Why a selection fell back to a uniform draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallbackReason {
    /// No force with deal-biasing power was active.
    NoQualifyingForce,
    /// A dominant null field blanked the selection.
    DominantNull,
    /// No candidate produced an evaluable universe.
    NoEvaluableUniverse,
    /// All destiny weights collapsed to zero.
    DegenerateWeights,
}

/// A compact view of one active force, for presentation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForceSummary {
    pub owner: ActorId,
    pub kind: ForceKind,
    pub power: f64,
}

/// Selection metadata - consumed only by presentation, never fed back
/// into engine logic.
#[derive(Clone, Debug)]
pub struct SelectionMeta {
    /// Uniform-draw fallback, if one fired.
    pub fallback: Option<FallbackReason>,
    /// Active forces after opposition resolution.
    pub forces: Vec<ForceSummary>,
    /// Destiny score of the selected universe.
    pub destiny: f64,
    /// Style bonus component.
    pub style_bonus: f64,
    /// Per-force contribution breakdown.
    pub contributions: Vec<Contribution>,
    /// Winner set of the selected universe.
    pub winners: SmallVec<[ActorId; 4]>,
    /// The selected universe's winning category.
    pub winning_category: Option<HandCategory>,
    /// Set when the pick lands far from the median outcome.
    pub dramatic_shift: bool,
}

impl SelectionMeta {
    fn uniform(reason: FallbackReason) -> Self {
        Self {
            fallback: Some(reason),
            forces: Vec::new(),
            destiny: 0.0,
            style_bonus: 0.0,
            contributions: Vec::new(),
            winners: SmallVec::new(),
            winning_category: None,
            dramatic_shift: false,
        }
    }
}

/// One selection result.
#[derive(Clone, Debug)]
pub struct Selection {
    pub card: Card,
    pub meta: SelectionMeta,
}

/// A foresight candidate: card and its destiny.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForesightCandidate {
    pub card: Card,
    pub destiny: f64,
}

/// Best/median/worst preview of the next reveal.
///
/// Scores carry fresh jitter on every call, so repeated previews at
/// the same decision point may disagree.
#[derive(Clone, Debug, PartialEq)]
pub struct Foresight {
    pub best: ForesightCandidate,
    pub median: ForesightCandidate,
    pub worst: ForesightCandidate,
}

/// The fate-weighted card selector.
#[derive(Debug)]
pub struct DestinyEngine {
    cfg: TuningConfig,
    history: StyleHistory,
}

impl DestinyEngine {
    /// Create an engine with the given tuning.
    #[must_use]
    pub fn new(cfg: TuningConfig) -> Self {
        Self { cfg, history: StyleHistory::new() }
    }

    /// Select and remove one card from the deck.
    ///
    /// Never fails while the deck is non-empty; every degenerate path
    /// collapses to a uniform draw.
    ///
    /// Panics if `deck` is empty - an empty deck is a caller bug, not
    /// an engine state.
    pub fn select_card(
        &mut self,
        deck: &mut Vec<Card>,
        board: &[Card],
        actors: &[ActorState],
        forces: &[Force],
        options: SelectOptions,
        rng: &mut EngineRng,
    ) -> Selection {
        assert!(!deck.is_empty(), "select_card called with an empty deck");

        if has_dominant_null(forces, &self.cfg.opposition) {
            return self.uniform_pick(deck, rng, FallbackReason::DominantNull);
        }
        if !has_qualifying_force(forces) {
            return self.uniform_pick(deck, rng, FallbackReason::NoQualifyingForce);
        }

        let resolved = resolve_force_opposition(forces, &self.cfg.opposition);
        if !has_qualifying_force(&resolved) {
            // Opposition cancelled everything out.
            return self.uniform_pick(deck, rng, FallbackReason::NoQualifyingForce);
        }

        let mut universes: Vec<(usize, Universe, Vec<Contribution>)> = Vec::new();
        for (idx, &candidate) in deck.iter().enumerate() {
            let Some(mut universe) =
                generate_universe(candidate, board, actors, &self.cfg.jitter, rng)
            else {
                continue;
            };
            let contributions = score_universe(
                &mut universe,
                &resolved,
                forces,
                board,
                &self.cfg.style,
                &self.history,
                options.intensity * self.cfg.style.intensity,
            );
            universes.push((idx, universe, contributions));
        }

        if universes.is_empty() {
            return self.uniform_pick(deck, rng, FallbackReason::NoEvaluableUniverse);
        }

        let chosen = match options.mode {
            SelectionMode::Best => universes
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.1.destiny.total_cmp(&b.1.destiny))
                .map(|(i, _)| i),
            SelectionMode::Weighted => {
                let min = universes
                    .iter()
                    .map(|(_, u, _)| u.destiny)
                    .fold(f64::INFINITY, f64::min);
                let weights: Vec<f64> =
                    universes.iter().map(|(_, u, _)| u.destiny - min).collect();
                rng.choose_weighted(&weights)
            }
        };

        let Some(chosen) = chosen else {
            return self.uniform_pick(deck, rng, FallbackReason::DegenerateWeights);
        };

        let destinies: Vec<f64> = universes.iter().map(|(_, u, _)| u.destiny).collect();
        let dramatic = dramatic_shift(&destinies, chosen);

        let (deck_idx, universe, contributions) = universes.swap_remove(chosen);
        let card = deck.remove(deck_idx);

        self.history
            .record(universe.winning_category, self.cfg.style.monotony_history);

        debug!(%card, destiny = universe.destiny, dramatic, "destiny selection");

        Selection {
            card,
            meta: SelectionMeta {
                fallback: None,
                forces: summarize(&resolved),
                destiny: universe.destiny,
                style_bonus: universe.style_bonus,
                contributions,
                winners: universe.winners,
                winning_category: Some(universe.winning_category),
                dramatic_shift: dramatic,
            },
        }
    }

    /// Preview best/median/worst candidates without mutating anything.
    ///
    /// `None` when no candidate is evaluable or the deck is empty.
    pub fn foresight(
        &self,
        deck: &[Card],
        board: &[Card],
        actors: &[ActorState],
        forces: &[Force],
        rng: &mut EngineRng,
    ) -> Option<Foresight> {
        let resolved = resolve_force_opposition(forces, &self.cfg.opposition);

        let mut candidates: Vec<ForesightCandidate> = Vec::new();
        for &candidate in deck {
            let Some(mut universe) =
                generate_universe(candidate, board, actors, &self.cfg.jitter, rng)
            else {
                continue;
            };
            score_universe(
                &mut universe,
                &resolved,
                forces,
                board,
                &self.cfg.style,
                &self.history,
                self.cfg.style.intensity,
            );
            candidates.push(ForesightCandidate { card: candidate, destiny: universe.destiny });
        }

        if candidates.is_empty() {
            return None;
        }
        candidates.sort_by(|a, b| b.destiny.total_cmp(&a.destiny));

        Some(Foresight {
            best: candidates[0],
            median: candidates[candidates.len() / 2],
            worst: candidates[candidates.len() - 1],
        })
    }

    /// Clear the style history at a session boundary.
    pub fn reset(&mut self) {
        self.history.clear();
    }

    fn uniform_pick(
        &self,
        deck: &mut Vec<Card>,
        rng: &mut EngineRng,
        reason: FallbackReason,
    ) -> Selection {
        let idx = rng.gen_range(0..deck.len());
        let card = deck.remove(idx);
        debug!(%card, ?reason, "uniform fallback selection");
        Selection { card, meta: SelectionMeta::uniform(reason) }
    }
}

/// A force qualifies when it can actually bias the deal.
fn has_qualifying_force(forces: &[Force]) -> bool {
    forces.iter().any(|f| f.kind.is_dealing() && f.power > 0.0)
}

fn summarize(forces: &[Force]) -> Vec<ForceSummary> {
    forces
        .iter()
        .filter(|f| f.power > 0.0 || f.kind.is_informational())
        .map(|f| ForceSummary { owner: f.owner, kind: f.kind, power: f.power })
        .collect()
}

/// A pick is dramatic when it lands in the top decile of the spread.
fn dramatic_shift(destinies: &[f64], chosen: usize) -> bool {
    let min = destinies.iter().copied().fold(f64::INFINITY, f64::min);
    let max = destinies.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(min.is_finite() && max.is_finite()) || max - min <= f64::EPSILON {
        return false;
    }
    (destinies[chosen] - min) / (max - min) >= 0.9
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ActorState;

    fn actors() -> Vec<ActorState> {
        vec![
            ActorState::new(ActorId::new(0), [Card::new(1, 0), Card::new(1, 1)]),
            ActorState::new(ActorId::new(1), [Card::new(7, 2), Card::new(2, 3)]),
        ]
    }

    fn board() -> Vec<Card> {
        vec![Card::new(5, 1), Card::new(9, 2), Card::new(12, 3)]
    }

    fn small_deck() -> Vec<Card> {
        vec![
            Card::new(1, 2),
            Card::new(3, 0),
            Card::new(7, 0),
            Card::new(10, 1),
            Card::new(13, 2),
        ]
    }

    #[test]
    fn test_empty_forces_uniform_fallback() {
        let mut engine = DestinyEngine::new(TuningConfig::default());
        let mut deck = small_deck();
        let mut rng = EngineRng::new(42);

        let selection = engine.select_card(
            &mut deck,
            &board(),
            &actors(),
            &[],
            SelectOptions::default(),
            &mut rng,
        );

        assert_eq!(selection.meta.fallback, Some(FallbackReason::NoQualifyingForce));
        assert_eq!(deck.len(), 4);
        assert!(!deck.contains(&selection.card));
    }

    #[test]
    fn test_deck_shrinks_by_exactly_one_matching_card() {
        let mut engine = DestinyEngine::new(TuningConfig::default());
        let mut deck = small_deck();
        let original = deck.clone();
        let forces = vec![Force::fortune(ActorId::new(0), "a", 40.0, 2)];
        let mut rng = EngineRng::new(7);

        let selection = engine.select_card(
            &mut deck,
            &board(),
            &actors(),
            &forces,
            SelectOptions::default(),
            &mut rng,
        );

        assert!(original.contains(&selection.card));
        assert_eq!(deck.len(), original.len() - 1);
        let mut rebuilt = deck.clone();
        rebuilt.push(selection.card);
        rebuilt.sort_by_key(|c| (c.rank(), c.suit()));
        let mut sorted_original = original;
        sorted_original.sort_by_key(|c| (c.rank(), c.suit()));
        assert_eq!(rebuilt, sorted_original);
    }

    #[test]
    fn test_best_mode_favors_fortune_owner() {
        // Actor 0 holds pocket aces; the ace of diamonds in the deck
        // makes trips. With a strong fortune, Best mode must pick a
        // universe actor 0 wins.
        let mut engine = DestinyEngine::new(TuningConfig::default());
        let mut deck = small_deck();
        let forces = vec![Force::fortune(ActorId::new(0), "a", 80.0, 1)];
        let mut rng = EngineRng::new(3);

        let selection = engine.select_card(
            &mut deck,
            &board(),
            &actors(),
            &forces,
            SelectOptions { mode: SelectionMode::Best, intensity: 1.0 },
            &mut rng,
        );

        assert!(selection.meta.fallback.is_none());
        assert!(selection.meta.winners.contains(&ActorId::new(0)));
        assert!(selection.meta.destiny > 0.0);
    }

    #[test]
    fn test_dominant_null_short_circuits() {
        let mut engine = DestinyEngine::new(TuningConfig::default());
        let mut deck = small_deck();
        let forces = vec![
            Force::fortune(ActorId::new(0), "a", 80.0, 1),
            Force {
                owner: ActorId::new(1),
                owner_name: "b".into(),
                kind: ForceKind::NullField,
                power: 10.0,
                tier: 1,
                activation: crate::force::ActivationMode::Active,
                target: None,
                attribute: crate::force::Attribute::Null,
                suppresses_lower: false,
            },
        ];
        let mut rng = EngineRng::new(3);

        let selection = engine.select_card(
            &mut deck,
            &board(),
            &actors(),
            &forces,
            SelectOptions::default(),
            &mut rng,
        );
        assert_eq!(selection.meta.fallback, Some(FallbackReason::DominantNull));
    }

    #[test]
    fn test_fully_cancelled_forces_fall_back() {
        let mut engine = DestinyEngine::new(TuningConfig::default());
        let mut deck = small_deck();
        let forces = vec![
            Force::fortune(ActorId::new(0), "a", 30.0, 2),
            Force::fortune(ActorId::new(1), "b", 30.0, 2),
        ];
        let mut rng = EngineRng::new(3);

        let selection = engine.select_card(
            &mut deck,
            &board(),
            &actors(),
            &forces,
            SelectOptions::default(),
            &mut rng,
        );
        assert_eq!(selection.meta.fallback, Some(FallbackReason::NoQualifyingForce));
    }

    #[test]
    fn test_foresight_is_non_mutating() {
        let engine = DestinyEngine::new(TuningConfig::default());
        let deck = small_deck();
        let forces = vec![Force::fortune(ActorId::new(0), "a", 40.0, 2)];
        let mut rng = EngineRng::new(11);

        let preview = engine
            .foresight(&deck, &board(), &actors(), &forces, &mut rng)
            .unwrap();

        assert_eq!(deck.len(), 5, "foresight must not consume cards");
        assert!(preview.best.destiny >= preview.median.destiny);
        assert!(preview.median.destiny >= preview.worst.destiny);
        assert!(deck.contains(&preview.best.card));
    }

    #[test]
    fn test_foresight_empty_deck() {
        let engine = DestinyEngine::new(TuningConfig::default());
        let mut rng = EngineRng::new(11);
        assert!(engine
            .foresight(&[], &board(), &actors(), &[], &mut rng)
            .is_none());
    }
}
