/// Club points awarded for a finishing position in one category

/// Points for ranks 1 through 16; index 0 is rank 1.
pub const POINTS_TABLE: [u32; 16] = [30, 23, 18, 15, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1];

/// Lowest rank that still earns points
pub const LAST_SCORING_RANK: u32 = POINTS_TABLE.len() as u32;

/// Points earned by a finishing rank. Ranks outside 1..=16 score nothing.
pub fn points_for(rank: u32) -> u32 {
    match rank {
        1..=LAST_SCORING_RANK => POINTS_TABLE[(rank - 1) as usize],
        _ => 0,
    }
}

/// Points for a rank that may be missing or unreadable in the source sheet
pub fn points_for_rank(rank: Option<u32>) -> u32 {
    rank.map(points_for).unwrap_or(0)
}
