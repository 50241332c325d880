//! Randomizer - seedable 7-bag piece generation
//!
//! Each bag holds one copy of each of the seven kinds, shuffled with
//! Fisher-Yates; the bag refills synchronously when exhausted, so a draw can
//! never fail. The generator is owned by its session - no shared or global
//! bag state between sessions.

use crate::types::PieceKind;

/// Small LCG (Numerical Recipes constants), enough for piece shuffling and
/// fully deterministic per seed.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    pub fn new(seed: u32) -> Self {
        // A zero state would only ever produce zeros.
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Random value in [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Fisher-Yates shuffle
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// 7-bag piece generator: within one bag fill, each kind appears exactly once.
#[derive(Debug, Clone)]
pub struct SevenBag {
    bag: [PieceKind; 7],
    next_index: usize,
    rng: SimpleRng,
}

impl SevenBag {
    pub fn new(seed: u32) -> Self {
        let mut bag = Self {
            bag: PieceKind::ALL,
            next_index: 0,
            rng: SimpleRng::new(seed),
        };
        bag.refill();
        bag
    }

    fn refill(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.next_index = 0;
    }

    /// Draw the next piece kind, refilling the bag if needed.
    pub fn draw(&mut self) -> PieceKind {
        if self.next_index >= self.bag.len() {
            self.refill();
        }
        let kind = self.bag[self.next_index];
        self.next_index += 1;
        kind
    }

    /// The kind the next `draw` will return, refilling first if the bag is
    /// spent so the answer is always definite.
    pub fn peek(&mut self) -> PieceKind {
        if self.next_index >= self.bag.len() {
            self.refill();
        }
        self.bag[self.next_index]
    }

    /// Current RNG state, usable as a seed to replay the remaining sequence
    /// (restart-with-same-stream semantics).
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rng_deterministic() {
        let mut a = SimpleRng::new(12345);
        let mut b = SimpleRng::new(12345);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed_guard() {
        let mut rng = SimpleRng::new(0);
        assert_ne!(rng.next_u32(), 0);
    }

    #[test]
    fn test_bag_contains_each_kind_once() {
        let mut bag = SevenBag::new(42);
        let drawn: HashSet<PieceKind> = (0..7).map(|_| bag.draw()).collect();
        assert_eq!(drawn.len(), 7);
    }

    #[test]
    fn test_two_bags_yield_each_kind_twice() {
        let mut bag = SevenBag::new(7);
        let mut counts = std::collections::HashMap::new();
        for _ in 0..14 {
            *counts.entry(bag.draw()).or_insert(0u32) += 1;
        }
        assert!(PieceKind::ALL.iter().all(|k| counts[k] == 2));
    }

    #[test]
    fn test_peek_matches_draw() {
        let mut bag = SevenBag::new(99);
        for _ in 0..20 {
            let peeked = bag.peek();
            assert_eq!(bag.draw(), peeked);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SevenBag::new(2024);
        let mut b = SevenBag::new(2024);
        for _ in 0..21 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn test_seed_replays_remaining_stream() {
        let mut bag = SevenBag::new(555);
        for _ in 0..7 {
            bag.draw();
        }
        // A new bag seeded from the current state produces the same next bag.
        let mut replay = SevenBag::new(bag.seed());
        for _ in 0..7 {
            assert_eq!(bag.draw(), replay.draw());
        }
    }
}
