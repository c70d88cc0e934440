use serde::Serialize;
use std::fmt;

/// Closed interval `[lo, hi]` of frequency slot indices on one core.
///
/// Slot indices are 1-based: a core with `n` slots spans `[1, n]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SpectrumBand {
    pub lo: u32,
    pub hi: u32,
}

impl SpectrumBand {
    pub fn new(lo: u32, hi: u32) -> Self {
        debug_assert!(lo <= hi, "Spectrum band [{}, {}] is inverted", lo, hi);
        SpectrumBand { lo, hi }
    }

    /// Band of `slots` contiguous slots starting at `lo`.
    pub fn starting_at(lo: u32, slots: u32) -> Self {
        SpectrumBand::new(lo, lo + slots - 1)
    }

    /// Band of `slots` contiguous slots ending at `hi`.
    pub fn ending_at(hi: u32, slots: u32) -> Self {
        SpectrumBand::new(hi + 1 - slots, hi)
    }

    pub fn num_slots(&self) -> u32 {
        self.hi - self.lo + 1
    }

    pub fn contains(&self, other: &SpectrumBand) -> bool {
        self.lo <= other.lo && other.hi <= self.hi
    }

    pub fn intersects(&self, other: &SpectrumBand) -> bool {
        self.lo <= other.hi && other.lo <= self.hi
    }

    /// Number of slots shared by both bands.
    pub fn overlap(&self, other: &SpectrumBand) -> u32 {
        let lo = self.lo.max(other.lo);
        let hi = self.hi.min(other.hi);
        if lo > hi { 0 } else { hi - lo + 1 }
    }

    /// The band widened by `guard_band` slots on both sides, clamped at slot 1.
    pub fn widened(&self, guard_band: u32) -> SpectrumBand {
        SpectrumBand { lo: self.lo.saturating_sub(guard_band).max(1), hi: self.hi + guard_band }
    }
}

impl fmt::Display for SpectrumBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}

/// Intersection of two free lists.
///
/// Both inputs must be sorted by `lo` and internally disjoint. The result is
/// again sorted and disjoint and contains exactly the slots present in both.
pub fn merge(first: &[SpectrumBand], second: &[SpectrumBand]) -> Vec<SpectrumBand> {
    let mut result = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < first.len() && j < second.len() {
        let a = first[i];
        let b = second[j];

        let lo = a.lo.max(b.lo);
        let hi = a.hi.min(b.hi);
        if lo <= hi {
            result.push(SpectrumBand { lo, hi });
        }

        // Advance whichever interval ends first; the other may still overlap the next one.
        if a.hi < b.hi {
            i += 1;
        } else {
            j += 1;
        }
    }

    result
}

/// Total number of slots in a free list.
pub fn total_slots(bands: &[SpectrumBand]) -> u32 {
    bands.iter().map(SpectrumBand::num_slots).sum()
}

/// The free band whose upper end touches `band` from below, leaving exactly
/// `guard_band` slots between them.
pub fn band_adjacent_down(band: &SpectrumBand, free_bands: &[SpectrumBand], guard_band: u32) -> Option<SpectrumBand> {
    let target = band.lo.checked_sub(1 + guard_band)?;
    free_bands.iter().find(|free| free.hi == target).copied()
}

/// The free band whose lower end touches `band` from above, leaving exactly
/// `guard_band` slots between them.
pub fn band_adjacent_upper(band: &SpectrumBand, free_bands: &[SpectrumBand], guard_band: u32) -> Option<SpectrumBand> {
    let target = band.hi + 1 + guard_band;
    free_bands.iter().find(|free| free.lo == target).copied()
}

/// Size of the free band directly below `band`, or 0.
pub fn free_slots_down(band: &SpectrumBand, free_bands: &[SpectrumBand], guard_band: u32) -> u32 {
    band_adjacent_down(band, free_bands, guard_band).map_or(0, |free| free.num_slots())
}

/// Size of the free band directly above `band`, or 0.
pub fn free_slots_upper(band: &SpectrumBand, free_bands: &[SpectrumBand], guard_band: u32) -> u32 {
    band_adjacent_upper(band, free_bands, guard_band).map_or(0, |free| free.num_slots())
}

/// Subtracts `removed` from a sorted disjoint free list.
pub fn subtract(free_bands: &[SpectrumBand], removed: &SpectrumBand) -> Vec<SpectrumBand> {
    let mut result = Vec::with_capacity(free_bands.len() + 1);

    for free in free_bands {
        if !free.intersects(removed) {
            result.push(*free);
            continue;
        }
        if free.lo < removed.lo {
            result.push(SpectrumBand::new(free.lo, removed.lo - 1));
        }
        if free.hi > removed.hi {
            result.push(SpectrumBand::new(removed.hi + 1, free.hi));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn bands(raw: &[(u32, u32)]) -> Vec<SpectrumBand> {
        raw.iter().map(|&(lo, hi)| SpectrumBand::new(lo, hi)).collect()
    }

    fn random_free_list(rng: &mut StdRng, num_slots: u32) -> Vec<SpectrumBand> {
        let mut result = Vec::new();
        let mut cursor = 1;
        while cursor <= num_slots {
            let gap = rng.random_range(0..4);
            let lo = cursor + gap;
            if lo > num_slots {
                break;
            }
            let hi = (lo + rng.random_range(0..6)).min(num_slots);
            result.push(SpectrumBand::new(lo, hi));
            cursor = hi + 2;
        }
        result
    }

    fn as_slot_set(list: &[SpectrumBand], num_slots: u32) -> Vec<bool> {
        let mut set = vec![false; num_slots as usize + 1];
        for band in list {
            for slot in band.lo..=band.hi {
                set[slot as usize] = true;
            }
        }
        set
    }

    #[test]
    fn test_merge_overlapping_lists() {
        let first = bands(&[(1, 10), (20, 30)]);
        let second = bands(&[(5, 25), (28, 40)]);

        assert_eq!(merge(&first, &second), bands(&[(5, 10), (20, 25), (28, 30)]));
    }

    #[test]
    fn test_merge_with_empty_list_is_empty() {
        let first = bands(&[(1, 10)]);
        assert!(merge(&first, &[]).is_empty());
        assert!(merge(&[], &first).is_empty());
    }

    #[test]
    fn test_merge_is_set_intersection() {
        let num_slots = 80;
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let first = random_free_list(&mut rng, num_slots);
            let second = random_free_list(&mut rng, num_slots);
            let merged = merge(&first, &second);

            let expected: Vec<bool> =
                as_slot_set(&first, num_slots).iter().zip(as_slot_set(&second, num_slots)).map(|(a, b)| *a && b).collect();

            assert_eq!(as_slot_set(&merged, num_slots), expected, "merge({:?}, {:?}) = {:?}", first, second, merged);
            assert!(merged.windows(2).all(|w| w[0].hi < w[1].lo), "Merged list {:?} is not sorted and disjoint", merged);
        }
    }

    #[test]
    fn test_adjacent_bands_respect_guard_band() {
        let free = bands(&[(1, 4), (10, 20)]);
        let band = SpectrumBand::new(6, 8);

        assert_eq!(band_adjacent_down(&band, &free, 1), Some(SpectrumBand::new(1, 4)));
        assert_eq!(band_adjacent_upper(&band, &free, 1), Some(SpectrumBand::new(10, 20)));
        assert_eq!(band_adjacent_down(&band, &free, 0), None);
        assert_eq!(free_slots_down(&band, &free, 1), 4);
        assert_eq!(free_slots_upper(&band, &free, 1), 11);
        assert_eq!(free_slots_upper(&band, &free, 2), 0);
    }

    #[test]
    fn test_adjacent_down_at_first_slot() {
        let free = bands(&[(5, 9)]);
        assert_eq!(band_adjacent_down(&SpectrumBand::new(1, 2), &free, 0), None);
    }

    #[test]
    fn test_subtract_splits_band() {
        let free = bands(&[(1, 20)]);
        assert_eq!(subtract(&free, &SpectrumBand::new(5, 8)), bands(&[(1, 4), (9, 20)]));
        assert_eq!(subtract(&free, &SpectrumBand::new(1, 20)), Vec::new());
        assert_eq!(subtract(&free, &SpectrumBand::new(18, 25)), bands(&[(1, 17)]));
    }

    #[test]
    fn test_overlap_and_widening() {
        let a = SpectrumBand::new(3, 8);
        assert_eq!(a.overlap(&SpectrumBand::new(7, 12)), 2);
        assert_eq!(a.overlap(&SpectrumBand::new(9, 12)), 0);
        assert_eq!(a.widened(2), SpectrumBand::new(1, 10));
        assert_eq!(a.widened(5), SpectrumBand::new(1, 13));
    }
}
