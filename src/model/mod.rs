pub mod record;
pub mod scoring;

pub use record::{CategoryStandings, ClubTotal, PlayerRecord};
pub use scoring::{points_for, points_for_rank, LAST_SCORING_RANK, POINTS_TABLE};
