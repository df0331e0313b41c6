use std::collections::HashMap;

use crate::core::{SegmentId, SegmentMeta};
use crate::indexer::merge_operation::MergeCandidate;

/// Decides which committed segments should be folded together (§5
/// "Merge policy"). Grounded on the teacher's `MergePolicy` trait and
/// its `NoMergePolicy`/`TieredMergePolicy` pair; a `SegmentUpdater`
/// consults this after every commit and after every merge it runs,
/// until a pass proposes nothing.
pub trait MergePolicy: Send + Sync {
    /// Returns zero or more disjoint merge candidates, each naming at
    /// least two segments.
    fn compute_merge_candidates(&self, segments: &[SegmentMeta]) -> Vec<MergeCandidate>;
}

/// Never merges. Useful for tests and for callers who schedule
/// compaction out of band.
pub struct NoMergePolicy;

impl MergePolicy for NoMergePolicy {
    fn compute_merge_candidates(&self, _segments: &[SegmentMeta]) -> Vec<MergeCandidate> {
        Vec::new()
    }
}

/// Buckets segments into exponentially-sized tiers (tier `k` holds
/// segments sized in `[floor * ratio^k, floor * ratio^(k+1))`) and
/// proposes a merge for every tier holding more than
/// `segments_per_tier` segments, `max_at_once` segments per candidate.
///
/// Segment "size" is approximated by `max_doc` (the doc count
/// including deletions) rather than on-disk byte size: this crate
/// doesn't otherwise track a segment's exact byte footprint anywhere
/// `SegmentMeta` would carry it forward, so true size-tiered merging is
/// left as a documented simplification (see `DESIGN.md`).
///
/// Tiering itself still keys off `max_doc`, so a segment's tier doesn't
/// shrink just because deletes accumulated against it, but a segment
/// heavy with deletes is a better merge candidate at equal size --
/// reclaiming its tombstoned docs is pure upside, whereas merging two
/// fully-live segments only buys fewer files. `score` ranks candidates
/// within a tier by `%` deleted so the crowdedest-with-deletes group
/// goes first when more than one tier is over the threshold in a single
/// pass (§4.8 "Merge policy": "prefer merges that reclaim deleted
/// docs"). `max_merged_size` caps how large a single candidate's
/// combined `max_doc` may grow, splitting an oversized chunk into
/// smaller candidates rather than producing one unbounded merge.
pub struct TieredMergePolicy {
    pub min_merge_size: u32,
    pub tier_ratio: f64,
    pub segments_per_tier: usize,
    pub max_at_once: usize,
    pub max_merged_size: u32,
}

impl Default for TieredMergePolicy {
    fn default() -> TieredMergePolicy {
        TieredMergePolicy {
            min_merge_size: 1_000,
            tier_ratio: 10.0,
            segments_per_tier: 10,
            max_at_once: 10,
            max_merged_size: 5_000_000,
        }
    }
}

impl TieredMergePolicy {
    fn tier_of(&self, max_doc: u32) -> i64 {
        let relative_size = f64::from(max_doc.max(1)) / f64::from(self.min_merge_size.max(1));
        if relative_size <= 1.0 {
            0
        } else {
            relative_size.log(self.tier_ratio).floor() as i64 + 1
        }
    }

    /// Splits `members` (already sorted by ascending size) into
    /// candidates of at most `max_at_once` segments each, additionally
    /// never letting one candidate's summed `max_doc` exceed
    /// `max_merged_size`.
    fn chunk_into_candidates(&self, members: &[SegmentMeta]) -> Vec<MergeCandidate> {
        let mut candidates = Vec::new();
        let mut current: Vec<SegmentId> = Vec::new();
        let mut current_size = 0u64;
        for meta in members {
            let meta_size = u64::from(meta.max_doc());
            let would_overflow = !current.is_empty()
                && (current.len() >= self.max_at_once
                    || current_size + meta_size > u64::from(self.max_merged_size));
            if would_overflow {
                if current.len() > 1 {
                    candidates.push(MergeCandidate(std::mem::take(&mut current)));
                } else {
                    current.clear();
                }
                current_size = 0;
            }
            current.push(meta.id());
            current_size += meta_size;
        }
        if current.len() > 1 {
            candidates.push(MergeCandidate(current));
        }
        candidates
    }
}

impl MergePolicy for TieredMergePolicy {
    fn compute_merge_candidates(&self, segments: &[SegmentMeta]) -> Vec<MergeCandidate> {
        let mut tiers: HashMap<i64, Vec<SegmentMeta>> = HashMap::new();
        for meta in segments {
            tiers.entry(self.tier_of(meta.max_doc())).or_default().push(meta.clone());
        }

        let mut scored_tiers: Vec<(f64, Vec<SegmentMeta>)> = tiers
            .into_iter()
            .filter(|(_, members)| members.len() > self.segments_per_tier)
            .map(|(_, members)| (deletion_score(&members), members))
            .collect();
        // Highest deletion ratio first: a crowded tier heavy with
        // tombstones reclaims the most space per merge, so it's worth
        // acting on before a same-size tier of entirely live segments.
        scored_tiers.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut candidates = Vec::new();
        for (_, mut members) in scored_tiers {
            members.sort_by_key(SegmentMeta::max_doc);
            candidates.extend(self.chunk_into_candidates(&members));
        }
        candidates
    }
}

/// Fraction of a tier's combined docs that are tombstoned, used purely
/// to prioritize which over-threshold tier gets merged first.
fn deletion_score(members: &[SegmentMeta]) -> f64 {
    let total_max_doc: u64 = members.iter().map(|meta| u64::from(meta.max_doc())).sum();
    if total_max_doc == 0 {
        return 0.0;
    }
    let total_deleted: u64 = members.iter().map(|meta| u64::from(meta.num_deleted_docs())).sum();
    total_deleted as f64 / total_max_doc as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SegmentId;

    #[test]
    fn test_no_merge_policy_proposes_nothing() {
        let segments = vec![SegmentMeta::new(SegmentId::generate(), 10)];
        assert!(NoMergePolicy.compute_merge_candidates(&segments).is_empty());
    }

    #[test]
    fn test_tiered_policy_merges_a_crowded_tier() {
        let policy = TieredMergePolicy {
            segments_per_tier: 3,
            max_at_once: 10,
            ..TieredMergePolicy::default()
        };
        let segments: Vec<SegmentMeta> = (0..5)
            .map(|_| SegmentMeta::new(SegmentId::generate(), 10))
            .collect();
        let candidates = policy.compute_merge_candidates(&segments);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].0.len(), 5);
    }

    #[test]
    fn test_tiered_policy_leaves_sparse_tier_alone() {
        let policy = TieredMergePolicy::default();
        let segments: Vec<SegmentMeta> = (0..3)
            .map(|_| SegmentMeta::new(SegmentId::generate(), 10))
            .collect();
        assert!(policy.compute_merge_candidates(&segments).is_empty());
    }

    #[test]
    fn test_tiered_policy_prefers_tier_heaviest_with_deletes() {
        let policy = TieredMergePolicy {
            segments_per_tier: 3,
            max_at_once: 10,
            ..TieredMergePolicy::default()
        };
        // Two same-sized tiers, each over threshold: one carries no
        // deletes, the other is half tombstoned. The deleted tier's
        // candidate should come first.
        let live_tier: Vec<SegmentMeta> = (0..4)
            .map(|_| SegmentMeta::new(SegmentId::generate(), 100))
            .collect();
        let deleted_tier: Vec<SegmentMeta> = (0..4)
            .map(|_| SegmentMeta::new(SegmentId::generate(), 100_000).with_delete_meta(50_000, 1))
            .collect();
        let mut segments = live_tier.clone();
        segments.extend(deleted_tier.iter().cloned());

        let candidates = policy.compute_merge_candidates(&segments);
        assert_eq!(candidates.len(), 2);
        let deleted_ids: std::collections::HashSet<SegmentId> =
            deleted_tier.iter().map(SegmentMeta::id).collect();
        assert!(candidates[0].0.iter().all(|id| deleted_ids.contains(id)));
    }

    #[test]
    fn test_tiered_policy_caps_candidate_size() {
        let policy = TieredMergePolicy {
            segments_per_tier: 3,
            max_at_once: 10,
            max_merged_size: 25,
            ..TieredMergePolicy::default()
        };
        let segments: Vec<SegmentMeta> = (0..5)
            .map(|_| SegmentMeta::new(SegmentId::generate(), 10))
            .collect();
        let candidates = policy.compute_merge_candidates(&segments);
        // 5 segments of size 10 each can't all fit under a cap of 25;
        // each candidate's members must sum to at most the cap.
        for candidate in &candidates {
            assert!(candidate.0.len() * 10 <= 30);
        }
        assert!(candidates.len() >= 2);
    }
}
