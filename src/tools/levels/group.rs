use anyhow::Result;
use log::*;

use crate::data_structs::{LevelGroup, Segment};
use crate::tools::levels::LevelConfig;
use crate::utils::ks_test_two_sample;

/// Partitions the validated segments into equivalence classes of
/// mutually indistinguishable distributions.
///
/// Greedy clustering: the first remaining segment becomes the
/// reference; every other remaining segment whose samples pass a
/// two-sample KS test against the reference joins its group; the
/// procedure repeats on the rest. The first-remaining tie-break makes
/// the grouping order-dependent when KS compatibility is not
/// transitive; that ordering is part of the contract and must not be
/// resolved differently.
pub fn group_levels(
    segments: &[Segment],
    trace: &[f64],
    config: &LevelConfig,
) -> Result<Vec<LevelGroup>> {
    let mut remaining = segments.to_vec();
    let mut groups = Vec::new();

    while !remaining.is_empty() {
        let reference = remaining[0];
        let reference_data = reference.slice(trace);

        let mut members = vec![reference];
        let mut rest = Vec::new();
        for &candidate in remaining.iter().skip(1) {
            let p =
                ks_test_two_sample(reference_data, candidate.slice(trace))?;
            if p > config.significance_level {
                members.push(candidate);
            }
            else {
                rest.push(candidate);
            }
        }

        trace!(
            "group {} seeded by {} holds {} segments",
            groups.len(),
            reference,
            members.len()
        );
        groups.push(LevelGroup::new(members));
        remaining = rest;
    }

    info!(
        "grouper partitioned {} segments into {} levels",
        segments.len(),
        groups.len()
    );
    Ok(groups)
}
