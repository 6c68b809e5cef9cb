//! RNG module - 7-bag piece generation
//!
//! Each bag holds one of each kind, shuffled; pieces are drawn until the bag is
//! empty and a fresh bag is shuffled. Any 7 consecutive draws starting at a bag
//! boundary contain every kind exactly once.
//!
//! The queue owns its own seeded `StdRng`, separate from the game's roll
//! stream, so charged-block and rising-row rolls never change the piece order.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::types::{PieceKind, NEXT_PREVIEW_LEN};

#[derive(Debug, Clone)]
pub struct PieceQueue {
    bag: [PieceKind; 7],
    /// Index of the next piece in `bag`
    bag_index: usize,
    rng: StdRng,
}

impl PieceQueue {
    pub fn new(seed: u64) -> Self {
        let mut queue = Self {
            bag: PieceKind::ALL,
            bag_index: 0,
            rng: StdRng::seed_from_u64(seed),
        };
        queue.refill_bag();
        queue
    }

    fn refill_bag(&mut self) {
        self.bag = PieceKind::ALL;
        self.bag.shuffle(&mut self.rng);
        self.bag_index = 0;
    }

    pub fn draw(&mut self) -> PieceKind {
        if self.bag_index >= self.bag.len() {
            self.refill_bag();
        }
        let piece = self.bag[self.bag_index];
        self.bag_index += 1;
        piece
    }

    /// Upcoming pieces in draw order.
    ///
    /// Previews past the current bag run the shuffle on a cloned RNG, so they
    /// match the pieces a later `draw` yields.
    pub fn peek_n<const N: usize>(&self) -> [PieceKind; N] {
        let mut preview = self.clone();
        std::array::from_fn(|_| preview.draw())
    }

    pub fn peek_preview(&self) -> [PieceKind; NEXT_PREVIEW_LEN] {
        self.peek_n::<NEXT_PREVIEW_LEN>()
    }
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_full_bag(pieces: &[PieceKind]) {
        for kind in PieceKind::ALL {
            assert_eq!(
                pieces.iter().filter(|&&k| k == kind).count(),
                1,
                "expected exactly one {kind:?} in {pieces:?}"
            );
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = PieceQueue::new(12345);
        let mut b = PieceQueue::new(12345);
        for _ in 0..50 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn consecutive_bags_are_complete() {
        let mut queue = PieceQueue::new(7);
        for _ in 0..5 {
            let bag: Vec<_> = (0..7).map(|_| queue.draw()).collect();
            assert_full_bag(&bag);
        }
    }

    #[test]
    fn peek_matches_draw_across_bag_boundary() {
        let mut queue = PieceQueue::new(99);
        for _ in 0..5 {
            queue.draw();
        }
        let preview = queue.peek_preview();
        for expected in preview {
            assert_eq!(queue.draw(), expected);
        }
    }

    #[test]
    fn peek_does_not_consume() {
        let mut queue = PieceQueue::new(3);
        let peeked = queue.peek_preview();
        assert_eq!(queue.peek_preview(), peeked);
        assert_eq!(queue.draw(), peeked[0]);
    }
}
