//! Cell permutation used for the scramble/restore transition.

use std::time::{Duration, Instant};

use rand::Rng;

/// Mapping from logical cell to color-grid index. Always a bijection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation(Vec<usize>);

impl Permutation {
    pub fn identity(len: usize) -> Self {
        Self((0..len).collect())
    }

    /// Color-grid index shown at logical `cell`.
    pub fn get(&self, cell: usize) -> Option<usize> {
        self.0.get(cell).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(i, &v)| i == v)
    }

    /// True if every index in `0..len` appears exactly once.
    pub fn is_bijection(&self) -> bool {
        let mut seen = vec![false; self.0.len()];
        for &v in &self.0 {
            match seen.get_mut(v) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }
}

/// Uniformly random permutation of `0..len` (Fisher–Yates).
pub fn scramble<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Permutation {
    let mut cells: Vec<usize> = (0..len).collect();
    for i in (1..len).rev() {
        let j = rng.random_range(0..=i);
        cells.swap(i, j);
    }
    Permutation(cells)
}

/// The identity permutation of `0..len`.
pub fn restore(len: usize) -> Permutation {
    Permutation::identity(len)
}

/// Holds the live permutation and at most one transition in flight.
///
/// A transition is in flight from a scramble until its scheduled
/// auto-restore is applied. Without a hold duration a scramble completes
/// immediately and nothing is ever in flight.
#[derive(Debug, Clone)]
pub struct Scrambler {
    positions: Permutation,
    hold: Option<Duration>,
    restore_at: Option<Instant>,
}

impl Scrambler {
    pub fn new(len: usize, hold: Option<Duration>) -> Self {
        Self {
            positions: Permutation::identity(len),
            hold,
            restore_at: None,
        }
    }

    pub fn positions(&self) -> &Permutation {
        &self.positions
    }

    pub fn in_flight(&self) -> bool {
        self.restore_at.is_some()
    }

    /// Scramble (`encrypt == true`) or restore the grid.
    ///
    /// Returns `false` and leaves everything untouched if a transition is
    /// already in flight.
    pub fn animate<R: Rng + ?Sized>(&mut self, now: Instant, encrypt: bool, rng: &mut R) -> bool {
        if self.in_flight() {
            return false;
        }
        let len = self.positions.len();
        if encrypt {
            self.positions = scramble(len, rng);
            self.restore_at = self.hold.map(|hold| now + hold);
        } else {
            self.positions = restore(len);
        }
        true
    }

    /// Apply a due auto-restore. Returns `true` if the grid was restored.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.restore_at {
            Some(at) if now >= at => {
                self.positions = restore(self.positions.len());
                self.restore_at = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn scramble_is_always_a_bijection() {
        let mut rng = StdRng::seed_from_u64(0xfeed);
        for _ in 0..100 {
            let p = scramble(256, &mut rng);
            assert_eq!(p.len(), 256);
            assert!(p.is_bijection());
        }
    }

    #[test]
    fn scramble_actually_moves_cells() {
        let mut rng = StdRng::seed_from_u64(9);
        let p = scramble(256, &mut rng);
        assert!(!p.is_identity());
    }

    #[test]
    fn tiny_permutations() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(scramble(0, &mut rng).is_empty());
        assert_eq!(scramble(1, &mut rng).as_slice(), &[0]);
    }

    #[test]
    fn every_position_is_reachable() {
        // Over many shuffles of 4 elements, each value should land in each slot.
        let mut rng = StdRng::seed_from_u64(123);
        let mut hits = [[0u32; 4]; 4];
        for _ in 0..4000 {
            let p = scramble(4, &mut rng);
            for (slot, &v) in p.as_slice().iter().enumerate() {
                hits[slot][v] += 1;
            }
        }
        for row in hits {
            for count in row {
                assert!(count > 700, "skewed shuffle: {hits:?}");
            }
        }
    }

    #[test]
    fn restore_is_identity_regardless_of_state() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut s = Scrambler::new(256, None);
        let now = Instant::now();
        assert!(s.animate(now, true, &mut rng));
        assert!(!s.positions().is_identity());
        assert!(s.animate(now, false, &mut rng));
        assert!(s.positions().is_identity());
        assert!(s.animate(now, false, &mut rng));
        assert_eq!(s.positions(), &restore(256));
    }

    #[test]
    fn bijection_check_catches_duplicates() {
        assert!(!Permutation(vec![0, 0, 2]).is_bijection());
        assert!(!Permutation(vec![0, 3, 1]).is_bijection());
        assert!(Permutation(vec![2, 0, 1]).is_bijection());
    }

    #[test]
    fn second_request_while_in_flight_is_ignored() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut s = Scrambler::new(256, Some(Duration::from_secs(2)));
        let t0 = Instant::now();

        assert!(s.animate(t0, true, &mut rng));
        assert!(s.in_flight());
        let scrambled = s.positions().clone();

        assert!(!s.animate(t0 + Duration::from_secs(1), true, &mut rng));
        assert!(!s.animate(t0 + Duration::from_secs(1), false, &mut rng));
        assert_eq!(s.positions(), &scrambled);

        assert!(!s.tick(t0 + Duration::from_millis(1999)));
        assert!(s.tick(t0 + Duration::from_secs(2)));
        assert!(s.positions().is_identity());
        assert!(!s.in_flight());
        assert!(s.animate(t0 + Duration::from_secs(3), true, &mut rng));
    }

    #[test]
    fn without_hold_nothing_stays_in_flight() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut s = Scrambler::new(256, None);
        let t0 = Instant::now();
        assert!(s.animate(t0, true, &mut rng));
        assert!(!s.in_flight());
        assert!(!s.tick(t0 + Duration::from_secs(60)));
        assert!(!s.positions().is_identity());
    }
}
