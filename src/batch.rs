//! One processing run over a batch of category files

use crate::aggregate::aggregate;
use crate::category::{process_file, ColumnLabels};
use crate::error::StandingsError;
use crate::model::{CategoryStandings, ClubTotal};
use crate::podium::{rank_available, rank_podium, Podium, MAX_PODIUM};
use crate::session::SessionContext;
use std::path::{Path, PathBuf};

/// Settings for a batch run
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    pub labels: ColumnLabels,
    pub podium_size: usize,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            labels: ColumnLabels::default(),
            podium_size: MAX_PODIUM,
        }
    }
}

/// Result of processing one input file
#[derive(Debug)]
pub enum FileOutcome {
    Processed {
        path: PathBuf,
        standings: CategoryStandings,
    },
    Failed {
        path: PathBuf,
        error: StandingsError,
    },
}

impl FileOutcome {
    pub fn path(&self) -> &Path {
        match self {
            FileOutcome::Processed { path, .. } | FileOutcome::Failed { path, .. } => path,
        }
    }

    pub fn standings(&self) -> Option<&CategoryStandings> {
        match self {
            FileOutcome::Processed { standings, .. } => Some(standings),
            FileOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&StandingsError> {
        match self {
            FileOutcome::Failed { error, .. } => Some(error),
            FileOutcome::Processed { .. } => None,
        }
    }
}

/// What the podium view can show for this batch
#[derive(Debug)]
pub enum PodiumState {
    /// Every tier is filled
    Full(Podium),
    /// Too few clubs; `podium` holds only the tiers that exist
    Degraded {
        podium: Podium,
        reason: StandingsError,
    },
    /// No file was processed, so there is nothing to rank
    Unavailable,
}

impl PodiumState {
    pub fn podium(&self) -> Option<&Podium> {
        match self {
            PodiumState::Full(podium) | PodiumState::Degraded { podium, .. } => Some(podium),
            PodiumState::Unavailable => None,
        }
    }
}

/// Everything derived from one batch of files
#[derive(Debug)]
pub struct BatchReport {
    pub session: SessionContext,
    pub outcomes: Vec<FileOutcome>,
    pub totals: Vec<ClubTotal>,
    pub podium: PodiumState,
}

impl BatchReport {
    /// Standings of every file that processed, in input order
    pub fn categories(&self) -> Vec<&CategoryStandings> {
        self.outcomes.iter().filter_map(FileOutcome::standings).collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &StandingsError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.error().map(|e| (o.path(), e)))
    }

    pub fn processed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.standings().is_some()).count()
    }
}

/// Process each file independently, then aggregate whatever succeeded.
///
/// A file that fails is recorded in `outcomes` and skipped; it never stops
/// the rest of the batch.
pub fn run_batch(paths: &[PathBuf], options: &ProcessOptions, session: SessionContext) -> BatchReport {
    let outcomes: Vec<FileOutcome> = paths
        .iter()
        .map(|path| match process_file(path, &options.labels) {
            Ok(standings) => {
                log::info!("Processed '{}' ({} players)", path.display(), standings.len());
                FileOutcome::Processed {
                    path: path.clone(),
                    standings,
                }
            }
            Err(error) => {
                log::warn!("Error reading '{}': {}", path.display(), error);
                FileOutcome::Failed {
                    path: path.clone(),
                    error,
                }
            }
        })
        .collect();

    summarize(outcomes, options, session)
}

/// Aggregate already-processed outcomes and build the podium
pub fn summarize(outcomes: Vec<FileOutcome>, options: &ProcessOptions, session: SessionContext) -> BatchReport {
    let categories: Vec<CategoryStandings> = outcomes
        .iter()
        .filter_map(FileOutcome::standings)
        .cloned()
        .collect();

    if categories.is_empty() {
        return BatchReport {
            session,
            outcomes,
            totals: Vec::new(),
            podium: PodiumState::Unavailable,
        };
    }

    let totals = aggregate(&categories);
    let podium = match rank_podium(&totals, options.podium_size) {
        Ok(podium) => PodiumState::Full(podium),
        Err(reason) => {
            log::warn!("Showing partial podium: {}", reason);
            PodiumState::Degraded {
                podium: rank_available(&totals, options.podium_size),
                reason,
            }
        }
    };

    BatchReport {
        session,
        outcomes,
        totals,
        podium,
    }
}
