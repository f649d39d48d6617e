//! Pitch statistics
//!
//! Features:
//! - Overall totals and strike percentage
//! - Groups of five for incremental feedback
//! - Per-pitch-type breakdown
//! - Personal-best group

use super::pitch::{PitchRecord, PitchType};
use rustc_hash::FxHashMap;

/// Pitches per group
pub const GROUP_SIZE: usize = 5;

/// Aggregate counts for a run of pitches
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PitchStats {
    pub total: u32,
    pub strikes: u32,
    pub balls: u32,
    /// Pitches flagged as hitting the location
    pub hits: u32,
    /// round(strikes / total * 100), 0 for an empty run
    pub strike_pct: u32,
}

impl PitchStats {
    /// Count a slice of pitches
    pub fn from_pitches(pitches: &[PitchRecord]) -> Self {
        let mut stats = PitchStats::default();
        for pitch in pitches {
            stats.add(pitch);
        }
        stats.finish()
    }

    fn add(&mut self, pitch: &PitchRecord) {
        self.total += 1;
        if pitch.is_strike() {
            self.strikes += 1;
        } else {
            self.balls += 1;
        }
        if pitch.hit_location {
            self.hits += 1;
        }
    }

    fn finish(mut self) -> Self {
        self.strike_pct = strike_percentage(self.strikes, self.total);
        self
    }
}

/// Whole-number strike percentage, halves rounded up
pub fn strike_percentage(strikes: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let (strikes, total) = (strikes as u64, total as u64);
    ((200 * strikes + total) / (2 * total)) as u32
}

/// A contiguous batch of up to five pitches
#[derive(Clone, Debug, PartialEq)]
pub struct PitchGroup<'a> {
    /// 1-based group number
    pub index: usize,
    pub pitches: &'a [PitchRecord],
    pub stats: PitchStats,
}

impl PitchGroup<'_> {
    /// First pitch number covered (1-based)
    pub fn first_pitch(&self) -> usize {
        (self.index - 1) * GROUP_SIZE + 1
    }

    /// Last pitch number covered (1-based, inclusive)
    pub fn last_pitch(&self) -> usize {
        self.first_pitch() + self.pitches.len() - 1
    }
}

/// Split pitches into groups of five; the last may be shorter
pub fn group_in_fives(pitches: &[PitchRecord]) -> Vec<PitchGroup<'_>> {
    pitches
        .chunks(GROUP_SIZE)
        .enumerate()
        .map(|(i, chunk)| PitchGroup {
            index: i + 1,
            pitches: chunk,
            stats: PitchStats::from_pitches(chunk),
        })
        .collect()
}

/// Group with the highest strike percentage; earliest wins ties
pub fn best_group(groups: &[PitchGroup<'_>]) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for group in groups {
        match best {
            Some((_, pct)) if group.stats.strike_pct <= pct => {}
            _ => best = Some((group.index, group.stats.strike_pct)),
        }
    }
    best.map(|(index, _)| index)
}

/// Stats for one pitch type
#[derive(Clone, Debug, PartialEq)]
pub struct TypeStats {
    pub pitch_type: PitchType,
    pub stats: PitchStats,
}

/// One row per known type in display order, then unknown types as first seen
pub fn by_type(pitches: &[PitchRecord]) -> Vec<TypeStats> {
    let mut rows: Vec<(PitchType, PitchStats)> = PitchType::KNOWN
        .iter()
        .map(|t| (t.clone(), PitchStats::default()))
        .collect();
    let mut index: FxHashMap<PitchType, usize> = rows
        .iter()
        .enumerate()
        .map(|(i, (t, _))| (t.clone(), i))
        .collect();

    for pitch in pitches {
        let row = match index.get(&pitch.pitch_type) {
            Some(&row) => row,
            None => {
                rows.push((pitch.pitch_type.clone(), PitchStats::default()));
                index.insert(pitch.pitch_type.clone(), rows.len() - 1);
                rows.len() - 1
            }
        };
        rows[row].1.add(pitch);
    }

    rows.into_iter()
        .map(|(pitch_type, stats)| TypeStats {
            pitch_type,
            stats: stats.finish(),
        })
        .collect()
}

/// Most recent pitches for the running display
pub fn last_five(pitches: &[PitchRecord]) -> &[PitchRecord] {
    &pitches[pitches.len().saturating_sub(GROUP_SIZE)..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::pitch::PitchResult;
    use chrono::{TimeZone, Utc};

    fn pitch(n: u32, pitch_type: PitchType, result: PitchResult, hit: bool) -> PitchRecord {
        PitchRecord {
            n,
            at: Utc.with_ymd_and_hms(2024, 5, 1, 17, 0, 0).unwrap(),
            pitch_type,
            result,
            hit_location: hit,
            note: None,
        }
    }

    fn results(seq: &[PitchResult]) -> Vec<PitchRecord> {
        seq.iter()
            .enumerate()
            .map(|(i, &r)| pitch(i as u32 + 1, PitchType::Fastball, r, false))
            .collect()
    }

    #[test]
    fn test_overall_example() {
        use PitchResult::*;
        let pitches = results(&[Strike, Strike, Ball, Strike, Ball]);
        let stats = PitchStats::from_pitches(&pitches);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.strikes, 3);
        assert_eq!(stats.balls, 2);
        assert_eq!(stats.strike_pct, 60);
    }

    #[test]
    fn test_empty_is_zero_percent() {
        assert_eq!(PitchStats::from_pitches(&[]), PitchStats::default());
        assert_eq!(strike_percentage(0, 0), 0);
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(strike_percentage(1, 3), 33);
        assert_eq!(strike_percentage(2, 3), 67);
        assert_eq!(strike_percentage(1, 8), 13);
        assert_eq!(strike_percentage(1, 200), 1);
        assert_eq!(strike_percentage(7, 7), 100);
    }

    #[test]
    fn test_grouping_sizes() {
        for n in 0..23usize {
            let pitches = results(&vec![PitchResult::Ball; n]);
            let groups = group_in_fives(&pitches);
            assert_eq!(groups.len(), n.div_ceil(GROUP_SIZE));
            for (i, group) in groups.iter().enumerate() {
                assert_eq!(group.index, i + 1);
                if i + 1 < groups.len() {
                    assert_eq!(group.pitches.len(), GROUP_SIZE);
                }
            }
            let covered: usize = groups.iter().map(|g| g.pitches.len()).sum();
            assert_eq!(covered, n);
        }
    }

    #[test]
    fn test_group_ranges() {
        let pitches = results(&vec![PitchResult::Strike; 12]);
        let groups = group_in_fives(&pitches);
        assert_eq!((groups[1].first_pitch(), groups[1].last_pitch()), (6, 10));
        assert_eq!((groups[2].first_pitch(), groups[2].last_pitch()), (11, 12));
    }

    #[test]
    fn test_best_group_prefers_earliest() {
        use PitchResult::*;
        let pitches = results(&[
            Strike, Ball, Ball, Ball, Ball, // 20%
            Strike, Strike, Strike, Ball, Ball, // 60%
            Strike, Strike, Strike, Ball, Ball, // 60%
        ]);
        let groups = group_in_fives(&pitches);
        assert_eq!(groups[2].stats.strike_pct, 60);
        assert_eq!(groups[0].stats.strike_pct, 20);
        assert_eq!(best_group(&groups), Some(2));
        assert_eq!(best_group(&[]), None);
    }

    #[test]
    fn test_by_type_keeps_known_order_and_appends_unknown() {
        let pitches = vec![
            pitch(1, PitchType::Curve, PitchResult::Strike, true),
            pitch(2, PitchType::Other("Knuckle".into()), PitchResult::Ball, false),
            pitch(3, PitchType::Curve, PitchResult::Ball, false),
            pitch(4, PitchType::Fastball, PitchResult::Strike, false),
        ];
        let rows = by_type(&pitches);
        let labels: Vec<&str> = rows.iter().map(|r| r.pitch_type.label()).collect();
        assert_eq!(labels, ["FB", "CH", "Drop", "Rise", "Screw", "Curve", "Knuckle"]);

        let curve = &rows[5].stats;
        assert_eq!((curve.total, curve.strikes, curve.hits, curve.strike_pct), (2, 1, 1, 50));
        assert_eq!(rows[1].stats, PitchStats::default());
        assert_eq!(rows[6].stats.balls, 1);
    }

    #[test]
    fn test_last_five() {
        let pitches = results(&vec![PitchResult::Strike; 7]);
        let tail = last_five(&pitches);
        assert_eq!(tail.len(), 5);
        assert_eq!(tail[0].n, 3);
        assert_eq!(last_five(&pitches[..2]).len(), 2);
    }
}
