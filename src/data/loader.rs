use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::models::AssignmentTask;

/// Error reading or writing a task file.
#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "cannot access task file: {}", e),
            LoadError::Json(e) => write!(f, "invalid task file: {}", e),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Json(e) => Some(e),
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::Io(err)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Json(err)
    }
}

/// Read a JSON array of tasks.
pub fn load_tasks_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<AssignmentTask>, LoadError> {
    let json_content = fs::read_to_string(path)?;
    let tasks = serde_json::from_str(&json_content)?;
    Ok(tasks)
}

/// Write tasks back as pretty-printed JSON, replacing the file.
pub fn write_tasks_to_json<P: AsRef<Path>>(
    path: P,
    tasks: &[AssignmentTask],
) -> Result<(), LoadError> {
    let json_content = serde_json::to_string_pretty(tasks)?;
    fs::write(path, json_content)?;
    Ok(())
}
