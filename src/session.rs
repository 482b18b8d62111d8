//! Session admission and the visit audit log

use crate::error::{Result, StandingsError};
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Name recorded when the user leaves it blank
pub const DEFAULT_NAME: &str = "Pengguna";
/// Affiliation recorded when the user leaves it blank
pub const DEFAULT_AFFILIATION: &str = "-";

/// Identity of an admitted session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub name: String,
    pub affiliation: String,
}

impl SessionContext {
    pub fn new(name: Option<&str>, affiliation: Option<&str>) -> Self {
        Self {
            name: non_blank(name).unwrap_or(DEFAULT_NAME).to_string(),
            affiliation: non_blank(affiliation)
                .unwrap_or(DEFAULT_AFFILIATION)
                .to_string(),
        }
    }

    pub fn welcome(&self) -> String {
        format!("Selamat datang, {} dari {}!", self.name, self.affiliation)
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(None, None)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Outcome of presenting credentials to the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Admitted(SessionContext),
    Rejected,
}

/// Admits a session only when the shared password matches.
///
/// A gate built without a password admits everyone.
#[derive(Debug, Clone, Default)]
pub struct SessionGate {
    password: Option<String>,
}

impl SessionGate {
    pub fn new(password: Option<String>) -> Self {
        Self {
            password: password.filter(|p| !p.is_empty()),
        }
    }

    pub fn is_open(&self) -> bool {
        self.password.is_none()
    }

    pub fn admit(&self, name: Option<&str>, affiliation: Option<&str>, password: Option<&str>) -> Admission {
        match &self.password {
            Some(expected) if password != Some(expected.as_str()) => Admission::Rejected,
            _ => Admission::Admitted(SessionContext::new(name, affiliation)),
        }
    }
}

/// One row of the visit log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    pub timestamp: String,
    pub name: String,
    pub affiliation: String,
}

impl AuditEntry {
    /// Entry for `session` stamped with the local time, to the second
    pub fn now(session: &SessionContext) -> Self {
        Self {
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            name: session.name.clone(),
            affiliation: session.affiliation.clone(),
        }
    }
}

/// Append-only store of admitted sessions
pub trait AuditLog {
    fn append(&mut self, entry: &AuditEntry) -> Result<()>;
}

/// Audit log kept as a headerless CSV file: timestamp,name,affiliation
pub struct CsvAuditLog {
    path: PathBuf,
}

impl CsvAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditLog for CsvAuditLog {
    fn append(&mut self, entry: &AuditEntry) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StandingsError::AuditLog(format!("{}: {}", self.path.display(), e)))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer
            .serialize(entry)
            .map_err(|e| StandingsError::AuditLog(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| StandingsError::AuditLog(e.to_string()))?;
        Ok(())
    }
}

/// Record a visit without letting a logging failure stop the run.
///
/// Returns a warning message when the entry could not be written.
pub fn record_visit(audit: &mut dyn AuditLog, session: &SessionContext) -> Option<String> {
    let entry = AuditEntry::now(session);
    match audit.append(&entry) {
        Ok(()) => {
            log::debug!("Recorded visit for {} ({})", entry.name, entry.affiliation);
            None
        }
        Err(e) => {
            let message = format!("Failed to record visit: {}", e);
            log::warn!("{}", message);
            Some(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingLog;

    impl AuditLog for FailingLog {
        fn append(&mut self, _entry: &AuditEntry) -> Result<()> {
            Err(StandingsError::AuditLog("store unavailable".to_string()))
        }
    }

    #[derive(Default)]
    struct MemoryLog {
        entries: Vec<AuditEntry>,
    }

    impl AuditLog for MemoryLog {
        fn append(&mut self, entry: &AuditEntry) -> Result<()> {
            self.entries.push(entry.clone());
            Ok(())
        }
    }

    #[test]
    fn test_gate_rejects_wrong_password() {
        let gate = SessionGate::new(Some("catur2025".to_string()));
        assert_eq!(gate.admit(Some("Ali"), Some("SMK Ipoh"), Some("wrong")), Admission::Rejected);
        assert_eq!(gate.admit(Some("Ali"), Some("SMK Ipoh"), None), Admission::Rejected);

        match gate.admit(Some("Ali"), Some("SMK Ipoh"), Some("catur2025")) {
            Admission::Admitted(session) => {
                assert_eq!(session.welcome(), "Selamat datang, Ali dari SMK Ipoh!");
            }
            Admission::Rejected => panic!("correct password rejected"),
        }
    }

    #[test]
    fn test_open_gate_and_defaults() {
        let gate = SessionGate::new(None);
        assert!(gate.is_open());
        assert_eq!(
            gate.admit(Some("  "), None, None),
            Admission::Admitted(SessionContext {
                name: "Pengguna".to_string(),
                affiliation: "-".to_string(),
            })
        );
        assert!(SessionGate::new(Some(String::new())).is_open());
    }

    #[test]
    fn test_record_visit_failure_is_a_warning() {
        let warning = record_visit(&mut FailingLog, &SessionContext::default());
        assert!(warning.unwrap().contains("store unavailable"));
    }

    #[test]
    fn test_record_visit_appends_entry() {
        let mut log = MemoryLog::default();
        let session = SessionContext::new(Some("Siti"), Some("Kelab Catur Taiping"));
        assert!(record_visit(&mut log, &session).is_none());
        assert_eq!(log.entries.len(), 1);
        assert_eq!(log.entries[0].name, "Siti");
        // YYYY-MM-DD HH:MM:SS
        assert_eq!(log.entries[0].timestamp.len(), 19);
    }

    #[test]
    fn test_csv_audit_log_appends_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("visits.csv");
        let mut log = CsvAuditLog::new(&path);

        let session = SessionContext::new(Some("Ali"), Some("SMK, Ipoh"));
        log.append(&AuditEntry::now(&session)).unwrap();
        log.append(&AuditEntry::now(&session)).unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(log.path())
            .unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "Ali");
        assert_eq!(&rows[0][2], "SMK, Ipoh");
    }

    #[test]
    fn test_csv_audit_log_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = CsvAuditLog::new(dir.path().join("missing").join("visits.csv"));
        let warning = record_visit(&mut log, &SessionContext::default());
        assert!(warning.is_some());
    }
}
