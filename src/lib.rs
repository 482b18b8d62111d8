pub mod aggregate;
pub mod batch;
pub mod category;
pub mod error;
pub mod model;
pub mod podium;
pub mod render;
pub mod session;
pub mod sheet;
pub mod xlsx;

pub use aggregate::aggregate;
pub use batch::{run_batch, BatchReport, FileOutcome, PodiumState, ProcessOptions};
pub use category::{process_file, process_sheet, ColumnLabels};
pub use error::{Result, StandingsError};
pub use model::*;
pub use podium::{rank_available, rank_podium, Podium, PodiumEntry, Tier};
