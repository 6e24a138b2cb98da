use std::fmt;

#[derive(Debug)]
pub enum PlanError {
    Parse(String),
    Input(String),
    Serialization(serde_json::Error),
    Io(std::io::Error),
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::Parse(e) => write!(f, "Parse error: {}", e),
            PlanError::Input(e) => write!(f, "Invalid input: {}", e),
            PlanError::Serialization(e) => write!(f, "Serialization error: {}", e),
            PlanError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for PlanError {}

impl From<serde_json::Error> for PlanError {
    fn from(err: serde_json::Error) -> Self {
        PlanError::Serialization(err)
    }
}

impl From<std::io::Error> for PlanError {
    fn from(err: std::io::Error) -> Self {
        PlanError::Io(err)
    }
}

impl From<std::num::ParseIntError> for PlanError {
    fn from(err: std::num::ParseIntError) -> Self {
        PlanError::Parse(err.to_string())
    }
}
