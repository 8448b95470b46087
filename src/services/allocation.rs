use crate::error::PipelineError;
use crate::models::{rank_by_allocation, Match};

/// Turn pixel counts into whole-percent shares summing to exactly 100.
///
/// Each share is truncated, not rounded. Colors whose share truncates to
/// zero are dropped. The survivors are ranked largest first (stable), then
/// what truncation lost goes entirely to the last of them. That entry can
/// end up larger than its neighbours: `[7, 7, 7]` comes back as
/// `[33, 33, 34]` and only a later ranking moves the 34 to the front.
pub fn allocate(mut matches: Vec<Match>) -> Result<Vec<Match>, PipelineError> {
    let total: u128 = matches.iter().map(|m| u128::from(m.count())).sum();
    if total == 0 {
        return Err(PipelineError::EmptyAllocation);
    }

    for m in &mut matches {
        // Cannot exceed 100 since count <= total
        m.allocation = (u128::from(m.count()) * 100 / total) as u32;
    }

    let before = matches.len();
    matches.retain(|m| {
        if m.allocation == 0 {
            tracing::debug!(color = %m.sample.rgb, count = m.count(), "Dropping color below 1%");
        }
        m.allocation > 0
    });

    let assigned: u32 = matches.iter().map(|m| m.allocation).sum();
    rank_by_allocation(&mut matches);
    let smallest = matches.last_mut().ok_or(PipelineError::EmptyAllocation)?;
    let remainder = 100 - assigned;
    smallest.allocation += remainder;

    tracing::info!(
        colors = matches.len(),
        dropped = before - matches.len(),
        remainder,
        "Allocated grid shares"
    );
    Ok(matches)
}
