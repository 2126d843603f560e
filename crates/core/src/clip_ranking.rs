//! Clip slot assignment for the public feed and the admin dashboard.
//!
//! Admins pin clips to a 1-based display slot through `priority`. Every
//! other position is filled with the remaining clips ranked by remix count
//! (descending, missing counts last) and then by age (oldest first).
//!
//! The functions here are pure: the caller loads both record sets, calls
//! [`assign_slots`], and logs the returned [`SlotWarning`]s.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Losers of a priority collision are moved into the fallback ranking.
pub const POLICY_DEMOTE: &str = "demote";
/// Losers of a priority collision are removed from the output.
pub const POLICY_DROP: &str = "drop";

/// All valid collision policy strings.
pub const VALID_COLLISION_POLICIES: &[&str] = &[POLICY_DEMOTE, POLICY_DROP];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The ordering-relevant view of a clip row.
///
/// Implemented by every row type that goes through slot assignment so the
/// admin listing and the public feed share one algorithm.
pub trait RankedClip {
    fn id(&self) -> DbId;
    fn priority(&self) -> Option<i32>;
    fn remix_count(&self) -> Option<i32>;
    fn created_at(&self) -> Timestamp;
}

/// What happens to a clip whose requested slot is taken by a later clip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Move the displaced clip into the unprioritized ranking.
    #[default]
    Demote,
    /// Discard the displaced clip.
    Drop,
}

impl CollisionPolicy {
    /// Convert from a configuration string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            POLICY_DEMOTE => Ok(Self::Demote),
            POLICY_DROP => Ok(Self::Drop),
            _ => Err(format!(
                "Invalid collision policy '{s}'. Must be one of: {}",
                VALID_COLLISION_POLICIES.join(", ")
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Demote => POLICY_DEMOTE,
            Self::Drop => POLICY_DROP,
        }
    }
}

/// A non-fatal anomaly found while assigning slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotWarning {
    /// The clip sat in the prioritized set with a null, zero or negative
    /// priority and was ranked with the unprioritized clips instead.
    InvalidPriority {
        clip_id: DbId,
        priority: Option<i32>,
    },
    /// Two clips requested the same slot. `winner` holds it.
    PriorityCollision {
        slot: u32,
        displaced: DbId,
        winner: DbId,
        policy: CollisionPolicy,
    },
}

/// Result of [`assign_slots`].
#[derive(Debug)]
pub struct SlotAssignment<T> {
    /// Clips in final display order, without gaps.
    pub clips: Vec<T>,
    pub warnings: Vec<SlotWarning>,
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Fallback ranking for clips without a usable slot request.
///
/// Higher remix counts first, a missing count after any number, then older
/// clips first.
pub fn compare_fallback<T: RankedClip>(a: &T, b: &T) -> Ordering {
    let by_remix = match (a.remix_count(), b.remix_count()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_remix.then_with(|| a.created_at().cmp(&b.created_at()))
}

/// Map a stored priority to a 1-based slot, or `None` if it requests none.
pub fn requested_slot(priority: Option<i32>) -> Option<u32> {
    priority
        .filter(|p| *p > 0)
        .and_then(|p| u32::try_from(p).ok())
}

// ---------------------------------------------------------------------------
// Assignment
// ---------------------------------------------------------------------------

/// Merge pinned and ranked clips into one display order.
///
/// `prioritized` must be in ascending priority order and `unprioritized` in
/// [`compare_fallback`] order; both come that way from the repository
/// queries. Later entries in `prioritized` win slot collisions.
///
/// Positions are filled from slot 1 upwards: a pinned clip takes its slot,
/// every other slot takes the next ranked clip. When the ranked clips run
/// out before a pinned slot is reached the gap closes up, and ranked clips
/// left over after the last pinned slot are appended. Memory use is bounded
/// by the number of clips, not by the largest requested slot.
pub fn assign_slots<T: RankedClip>(
    prioritized: Vec<T>,
    unprioritized: Vec<T>,
    policy: CollisionPolicy,
) -> SlotAssignment<T> {
    let mut warnings = Vec::new();
    let mut ranked = unprioritized;
    let mut needs_resort = false;
    let mut pinned: BTreeMap<u32, T> = BTreeMap::new();

    for clip in prioritized {
        let Some(slot) = requested_slot(clip.priority()) else {
            warnings.push(SlotWarning::InvalidPriority {
                clip_id: clip.id(),
                priority: clip.priority(),
            });
            ranked.push(clip);
            needs_resort = true;
            continue;
        };

        let winner = clip.id();
        if let Some(displaced) = pinned.insert(slot, clip) {
            warnings.push(SlotWarning::PriorityCollision {
                slot,
                displaced: displaced.id(),
                winner,
                policy,
            });
            if policy == CollisionPolicy::Demote {
                ranked.push(displaced);
                needs_resort = true;
            }
        }
    }

    // Stable, so clips with equal keys keep their arrival order.
    if needs_resort {
        ranked.sort_by(compare_fallback);
    }

    let mut clips = Vec::with_capacity(pinned.len() + ranked.len());
    let mut pinned = pinned.into_iter().peekable();
    let mut ranked = ranked.into_iter();
    let mut position: u32 = 1;

    while let Some(next_slot) = pinned.peek().map(|(slot, _)| *slot) {
        if next_slot == position {
            if let Some((_, clip)) = pinned.next() {
                clips.push(clip);
            }
            position += 1;
        } else if let Some(clip) = ranked.next() {
            clips.push(clip);
            position += 1;
        } else {
            position = next_slot;
        }
    }
    clips.extend(ranked);

    SlotAssignment { clips, warnings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: DbId,
        priority: Option<i32>,
        remix_count: Option<i32>,
        created_at: Timestamp,
    }

    impl RankedClip for Row {
        fn id(&self) -> DbId {
            self.id
        }
        fn priority(&self) -> Option<i32> {
            self.priority
        }
        fn remix_count(&self) -> Option<i32> {
            self.remix_count
        }
        fn created_at(&self) -> Timestamp {
            self.created_at
        }
    }

    fn at(minute: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, minute, 0).unwrap()
    }

    fn pinned(id: DbId, priority: i32) -> Row {
        Row {
            id,
            priority: Some(priority),
            remix_count: Some(0),
            created_at: at(0),
        }
    }

    fn ranked(id: DbId, remix_count: Option<i32>, minute: u32) -> Row {
        Row {
            id,
            priority: None,
            remix_count,
            created_at: at(minute),
        }
    }

    fn ids(rows: &[Row]) -> Vec<DbId> {
        rows.iter().map(|r| r.id).collect()
    }

    // -- CollisionPolicy ------------------------------------------------------

    #[test]
    fn collision_policy_from_str() {
        assert_eq!(
            CollisionPolicy::from_str_value("demote").unwrap(),
            CollisionPolicy::Demote
        );
        assert_eq!(
            CollisionPolicy::from_str_value("drop").unwrap(),
            CollisionPolicy::Drop
        );
        let err = CollisionPolicy::from_str_value("retry").unwrap_err();
        assert!(err.contains("Invalid collision policy"));
    }

    #[test]
    fn collision_policy_defaults_to_demote() {
        assert_eq!(CollisionPolicy::default(), CollisionPolicy::Demote);
        assert_eq!(CollisionPolicy::default().as_str(), "demote");
    }

    // -- requested_slot -------------------------------------------------------

    #[test]
    fn requested_slot_rejects_non_positive() {
        assert_eq!(requested_slot(None), None);
        assert_eq!(requested_slot(Some(0)), None);
        assert_eq!(requested_slot(Some(-3)), None);
        assert_eq!(requested_slot(Some(4)), Some(4));
    }

    // -- compare_fallback -----------------------------------------------------

    #[test]
    fn fallback_prefers_higher_remix_count() {
        let a = ranked(1, Some(1), 0);
        let b = ranked(2, Some(7), 5);
        assert_eq!(compare_fallback(&b, &a), Ordering::Less);
    }

    #[test]
    fn fallback_sorts_missing_remix_count_last() {
        let a = ranked(1, None, 0);
        let b = ranked(2, Some(0), 9);
        assert_eq!(compare_fallback(&a, &b), Ordering::Greater);
    }

    #[test]
    fn fallback_breaks_ties_by_age() {
        let older = ranked(1, Some(2), 1);
        let newer = ranked(2, Some(2), 2);
        assert_eq!(compare_fallback(&older, &newer), Ordering::Less);
    }

    // -- Scenarios ------------------------------------------------------------

    #[test]
    fn pinned_clip_takes_its_slot_between_ranked_clips() {
        let result = assign_slots(
            vec![pinned(1, 2)],
            vec![ranked(2, Some(5), 1), ranked(3, Some(1), 2)],
            CollisionPolicy::default(),
        );
        assert_eq!(ids(&result.clips), vec![2, 1, 3]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn duplicate_priority_drop_keeps_last_writer() {
        let result = assign_slots(
            vec![pinned(1, 1), pinned(2, 1)],
            vec![],
            CollisionPolicy::Drop,
        );
        assert_eq!(ids(&result.clips), vec![2]);
        assert_eq!(result.warnings.len(), 1);
        assert_matches!(
            result.warnings[0],
            SlotWarning::PriorityCollision {
                slot: 1,
                displaced: 1,
                winner: 2,
                policy: CollisionPolicy::Drop,
            }
        );
    }

    #[test]
    fn duplicate_priority_demote_ranks_the_loser() {
        let mut loser = pinned(1, 1);
        loser.remix_count = Some(3);
        let result = assign_slots(
            vec![loser, pinned(2, 1)],
            vec![ranked(3, Some(9), 1), ranked(4, Some(0), 2)],
            CollisionPolicy::Demote,
        );
        // Slot 1 is held by 2; the loser (3 remixes) ranks between 3 and 4.
        assert_eq!(ids(&result.clips), vec![2, 3, 1, 4]);
        assert_matches!(
            result.warnings.as_slice(),
            [SlotWarning::PriorityCollision { slot: 1, displaced: 1, winner: 2, .. }]
        );
    }

    #[test]
    fn negative_priority_is_ranked_not_pinned() {
        let invalid = Row {
            id: 1,
            priority: Some(-1),
            remix_count: Some(4),
            created_at: at(3),
        };
        let result = assign_slots(
            vec![invalid],
            vec![ranked(2, Some(10), 1), ranked(3, Some(2), 2)],
            CollisionPolicy::default(),
        );
        assert_eq!(ids(&result.clips), vec![2, 1, 3]);
        assert_matches!(
            result.warnings.as_slice(),
            [SlotWarning::InvalidPriority { clip_id: 1, priority: Some(-1) }]
        );
    }

    #[test]
    fn zero_and_null_priorities_are_demoted() {
        let zero = Row {
            id: 1,
            priority: Some(0),
            remix_count: None,
            created_at: at(0),
        };
        let null = Row {
            id: 2,
            priority: None,
            remix_count: Some(1),
            created_at: at(1),
        };
        let result = assign_slots(vec![zero, null], vec![], CollisionPolicy::default());
        assert_eq!(ids(&result.clips), vec![2, 1]);
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn null_remix_count_sorts_after_numbers() {
        let result = assign_slots(
            vec![],
            vec![ranked(2, Some(3), 2), ranked(1, None, 1)],
            CollisionPolicy::default(),
        );
        assert_eq!(ids(&result.clips), vec![2, 1]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let result: SlotAssignment<Row> =
            assign_slots(vec![], vec![], CollisionPolicy::default());
        assert!(result.clips.is_empty());
        assert!(result.warnings.is_empty());
    }

    // -- Gaps and overflow ----------------------------------------------------

    #[test]
    fn slot_beyond_available_clips_closes_the_gap() {
        let result = assign_slots(
            vec![pinned(1, 10)],
            vec![ranked(2, Some(2), 1), ranked(3, Some(1), 2)],
            CollisionPolicy::default(),
        );
        assert_eq!(ids(&result.clips), vec![2, 3, 1]);
    }

    #[test]
    fn huge_slot_does_not_allocate_the_gap() {
        let result = assign_slots(
            vec![pinned(1, i32::MAX)],
            vec![ranked(2, Some(1), 1)],
            CollisionPolicy::default(),
        );
        assert_eq!(ids(&result.clips), vec![2, 1]);
    }

    #[test]
    fn leftover_ranked_clips_are_appended_in_order() {
        let result = assign_slots(
            vec![pinned(1, 1), pinned(2, 3)],
            vec![
                ranked(3, Some(9), 1),
                ranked(4, Some(5), 2),
                ranked(5, Some(5), 3),
                ranked(6, None, 4),
            ],
            CollisionPolicy::default(),
        );
        assert_eq!(ids(&result.clips), vec![1, 3, 2, 4, 5, 6]);
    }

    #[test]
    fn adjacent_pinned_slots_stay_contiguous() {
        let result = assign_slots(
            vec![pinned(1, 2), pinned(2, 3)],
            vec![ranked(3, Some(1), 1), ranked(4, Some(0), 2)],
            CollisionPolicy::default(),
        );
        assert_eq!(ids(&result.clips), vec![3, 1, 2, 4]);
    }

    // -- Properties -----------------------------------------------------------

    fn fixture() -> (Vec<Row>, Vec<Row>) {
        let prioritized = vec![
            pinned(10, 1),
            pinned(11, 4),
            pinned(12, 4),
            Row {
                id: 13,
                priority: Some(0),
                remix_count: Some(6),
                created_at: at(7),
            },
            pinned(14, 9),
        ];
        let unprioritized = vec![
            ranked(20, Some(8), 1),
            ranked(21, Some(6), 2),
            ranked(22, Some(6), 3),
            ranked(23, Some(1), 4),
            ranked(24, None, 5),
        ];
        (prioritized, unprioritized)
    }

    #[test]
    fn assignment_is_deterministic() {
        let (p, u) = fixture();
        let first = assign_slots(p.clone(), u.clone(), CollisionPolicy::default());
        let second = assign_slots(p, u, CollisionPolicy::default());
        assert_eq!(first.clips, second.clips);
        assert_eq!(first.warnings, second.warnings);
    }

    #[test]
    fn demote_keeps_every_clip_exactly_once() {
        let (p, u) = fixture();
        let mut expected: Vec<DbId> = p.iter().chain(u.iter()).map(|r| r.id).collect();
        expected.sort_unstable();

        let result = assign_slots(p, u, CollisionPolicy::Demote);
        let mut got = ids(&result.clips);
        got.sort_unstable();
        assert_eq!(got, expected);
    }

    #[test]
    fn drop_loses_only_collision_losers() {
        let (p, u) = fixture();
        let total = p.len() + u.len();
        let result = assign_slots(p, u, CollisionPolicy::Drop);
        assert_eq!(result.clips.len(), total - 1);
        assert!(!result.clips.iter().any(|r| r.id == 11));
    }

    #[test]
    fn unique_valid_priorities_land_on_their_index() {
        let (p, u) = fixture();
        let result = assign_slots(p, u, CollisionPolicy::Demote);
        let got = ids(&result.clips);
        assert_eq!(got[0], 10);
        assert_eq!(got[3], 12);
        assert_eq!(got[8], 14);
    }

    #[test]
    fn ranked_clips_keep_fallback_order_around_pins() {
        let (p, u) = fixture();
        let result = assign_slots(p, u, CollisionPolicy::Demote);
        let ranked_only: Vec<&Row> = result
            .clips
            .iter()
            .filter(|r| ![10, 12, 14].contains(&r.id))
            .collect();
        for pair in ranked_only.windows(2) {
            assert_ne!(
                compare_fallback(pair[0], pair[1]),
                Ordering::Greater,
                "{} should not precede {}",
                pair[0].id,
                pair[1].id
            );
        }
    }
}
