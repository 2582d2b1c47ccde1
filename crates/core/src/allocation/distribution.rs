use crate::domain::plan::{FundedInstrument, InstrumentCandidate};

/// Splits `fund` proportionally to scores, flooring each share.
///
/// Whatever the floors leave over goes to the first (highest-ranked) instrument, so the
/// allocations always add up to `fund` exactly.
pub fn distribute(candidates: Vec<InstrumentCandidate>, fund: i64) -> Vec<FundedInstrument> {
    let shares: Vec<u32> = candidates.iter().map(|c| c.score).collect();
    let allocations = split_by_weight(&shares, fund);

    candidates
        .into_iter()
        .zip(allocations)
        .map(|(candidate, allocation)| FundedInstrument {
            candidate,
            allocation,
        })
        .collect()
}

/// Floor-proportional split with the remainder assigned to index 0.
pub fn split_by_weight(weights: &[u32], fund: i64) -> Vec<i64> {
    if weights.is_empty() {
        return Vec::new();
    }

    let total: i128 = match weights.iter().map(|w| *w as i128).sum::<i128>() {
        0 => 1,
        t => t,
    };

    let mut out: Vec<i64> = weights
        .iter()
        .map(|w| ((fund as i128 * *w as i128).div_euclid(total)) as i64)
        .collect();

    let assigned: i64 = out.iter().sum();
    out[0] += fund - assigned;
    out
}
