use thiserror::Error;

#[derive(Error, Debug)]
pub enum StandingsError {
    #[error("{category}: could not find a header row containing {}", join_labels(.labels))]
    HeaderNotFound {
        category: String,
        labels: Vec<String>,
    },

    #[error(
        "{category}: missing required columns {} (found: {})",
        join_labels(.missing),
        join_labels(.found)
    )]
    MissingColumns {
        category: String,
        found: Vec<String>,
        missing: Vec<String>,
    },

    #[error("The {field} column label must not be blank")]
    BlankLabel { field: &'static str },

    #[error("podium needs at least {required} clubs, only {available} available")]
    InsufficientData { available: usize, required: usize },

    #[error("Audit log error: {0}")]
    AuditLog(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Workbook has no worksheets: {0}")]
    EmptyWorkbook(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Excel error: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),
}

impl StandingsError {
    /// True for errors that belong to a single input file rather than the batch.
    pub fn is_per_file(&self) -> bool {
        !matches!(
            self,
            StandingsError::InsufficientData { .. }
                | StandingsError::AuditLog(_)
                | StandingsError::BlankLabel { .. }
        )
    }
}

fn join_labels(labels: &[String]) -> String {
    if labels.is_empty() {
        "none".to_string()
    } else {
        labels.join(", ")
    }
}

pub type Result<T> = std::result::Result<T, StandingsError>;
