//! Coaching feedback: streaks, group cheers and report banners
//!
//! Detects:
//! - Three strikes in a row (fires, then starts counting again)
//! - A finished group of five and whether it beat 50% strikes
//! - Which group earns the personal-best banner

use super::pitch::{PitchRecord, PitchResult};
use super::stats::{PitchGroup, PitchStats, GROUP_SIZE};

/// Strikes in a row needed for a streak cheer
const STREAK_LENGTH: u32 = 3;

/// Strike percentage a group has to beat to count as good
const GOOD_GROUP_PCT: u32 = 50;

/// Counts consecutive strikes
#[derive(Clone, Debug, Default)]
pub struct StreakTracker {
    current: u32,
}

impl StreakTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a result; true when it completes a streak
    pub fn record(&mut self, result: PitchResult) -> bool {
        match result {
            PitchResult::Strike => {
                self.current += 1;
                if self.current == STREAK_LENGTH {
                    self.current = 0;
                    return true;
                }
                false
            }
            PitchResult::Ball => {
                self.current = 0;
                false
            }
        }
    }

    /// Forget the current run (after undo or a new session)
    pub fn reset(&mut self) {
        self.current = 0;
    }
}

/// Outcome of a just-completed group
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupCheer {
    /// Beat 50% strikes
    Hot { index: usize, strike_pct: u32 },
    /// Finished, needs more strikes next time
    Done { index: usize },
}

/// Cheer for the group completed by the latest pitch, if any
pub fn group_cheer(pitches: &[PitchRecord]) -> Option<GroupCheer> {
    let total = pitches.len();
    if total == 0 || total % GROUP_SIZE != 0 {
        return None;
    }

    let index = total / GROUP_SIZE;
    let stats = PitchStats::from_pitches(&pitches[total - GROUP_SIZE..]);
    if stats.strike_pct > GOOD_GROUP_PCT {
        Some(GroupCheer::Hot {
            index,
            strike_pct: stats.strike_pct,
        })
    } else {
        Some(GroupCheer::Done { index })
    }
}

/// Banner shown above a group in the report
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Banner {
    PersonalBest,
    Good,
    KeepGoing,
}

impl Banner {
    /// Pick the banner for `group` given the personal-best group index
    pub fn for_group(group: &PitchGroup<'_>, best: Option<usize>) -> Self {
        if best == Some(group.index) {
            Banner::PersonalBest
        } else if group.stats.strike_pct > GOOD_GROUP_PCT {
            Banner::Good
        } else {
            Banner::KeepGoing
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            Banner::PersonalBest => "Personal best 🏅",
            Banner::Good => "Nice! ✅",
            Banner::KeepGoing => "Keep going 💪",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::pitch::PitchType;
    use crate::session::stats::{best_group, group_in_fives};
    use chrono::Utc;

    fn seq(results: &[PitchResult]) -> Vec<PitchRecord> {
        results
            .iter()
            .enumerate()
            .map(|(i, &result)| PitchRecord {
                n: i as u32 + 1,
                at: Utc::now(),
                pitch_type: PitchType::Drop,
                result,
                hit_location: false,
                note: None,
            })
            .collect()
    }

    #[test]
    fn test_streak_fires_every_third_strike() {
        let mut streak = StreakTracker::new();
        assert!(!streak.record(PitchResult::Strike));
        assert!(!streak.record(PitchResult::Strike));
        assert!(streak.record(PitchResult::Strike));
        assert_eq!(streak.current, 0);
        assert!(!streak.record(PitchResult::Strike));
        assert!(!streak.record(PitchResult::Ball));
        assert!(!streak.record(PitchResult::Strike));
        assert!(!streak.record(PitchResult::Strike));
        assert!(streak.record(PitchResult::Strike));
    }

    #[test]
    fn test_group_cheer_only_on_boundaries() {
        use PitchResult::*;
        assert_eq!(group_cheer(&[]), None);
        assert_eq!(group_cheer(&seq(&[Strike, Strike])), None);

        let hot = seq(&[Strike, Strike, Strike, Ball, Ball]);
        assert_eq!(
            group_cheer(&hot),
            Some(GroupCheer::Hot {
                index: 1,
                strike_pct: 60
            })
        );

        let mut ten = hot.clone();
        ten.extend(seq(&[Ball, Ball, Ball, Strike, Ball]));
        assert_eq!(group_cheer(&ten), Some(GroupCheer::Done { index: 2 }));
    }

    #[test]
    fn test_exactly_half_is_not_good() {
        use PitchResult::*;
        let pitches = seq(&[Strike, Ball, Strike, Ball, Strike, Ball, Ball, Ball, Ball, Ball]);
        let groups = group_in_fives(&pitches);
        let best = best_group(&groups);
        assert_eq!(Banner::for_group(&groups[0], best), Banner::PersonalBest);
        assert_eq!(Banner::for_group(&groups[1], best), Banner::KeepGoing);

        let two = seq(&[Strike, Ball]);
        let groups = group_in_fives(&two);
        assert_eq!(groups[0].stats.strike_pct, 50);
        assert_eq!(Banner::for_group(&groups[0], None), Banner::KeepGoing);
    }
}
