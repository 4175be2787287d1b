use std::fmt;

#[derive(Debug)]
pub enum AutopilotError {
    /// Node.js sidecar failed to spawn
    SubprocessSpawn { script: String, source: std::io::Error },

    /// I/O failure on the sidecar's stdin/stdout pipes
    SessionIo(String),

    /// Sidecar answered a command with ok=false or a malformed payload
    SessionProtocol { command: String, error: String },

    /// JSON parsing failed (sidecar output or extraction payload)
    JsonParse { context: String, source: serde_json::Error },

    /// JSON serialization failed (command to the sidecar)
    JsonSerialize { context: String, source: serde_json::Error },

    /// Browser-side action reported failure
    BrowserAction(String),

    /// Oracle HTTP round-trip failed
    OracleTransport { endpoint: String, source: reqwest::Error },

    /// Oracle answered, but the answer is not a parseable plan
    OraclePlan { context: String, source: serde_json::Error },

    /// Profile file could not be read
    ProfileIo { path: String, source: std::io::Error },

    /// Profile file is not valid profile JSON
    ProfileParse { path: String, source: serde_json::Error },
}

impl fmt::Display for AutopilotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutopilotError::SubprocessSpawn { script, source } => {
                write!(f, "Failed to spawn {} (is Node.js installed?): {}", script, source)
            }
            AutopilotError::SessionIo(msg) => {
                write!(f, "Browser session I/O error: {}", msg)
            }
            AutopilotError::SessionProtocol { command, error } => {
                write!(f, "Browser session command '{}' failed: {}", command, error)
            }
            AutopilotError::JsonParse { context, source } => {
                write!(f, "JSON parse error ({}): {}", context, source)
            }
            AutopilotError::JsonSerialize { context, source } => {
                write!(f, "JSON serialize error ({}): {}", context, source)
            }
            AutopilotError::BrowserAction(msg) => {
                write!(f, "Browser action failed: {}", msg)
            }
            AutopilotError::OracleTransport { endpoint, source } => {
                write!(f, "Oracle call to {} failed: {}", endpoint, source)
            }
            AutopilotError::OraclePlan { context, source } => {
                write!(f, "Oracle returned an unparseable plan ({}): {}", context, source)
            }
            AutopilotError::ProfileIo { path, source } => {
                write!(f, "Could not read profile '{}': {}", path, source)
            }
            AutopilotError::ProfileParse { path, source } => {
                write!(f, "Profile '{}' is not valid JSON: {}", path, source)
            }
        }
    }
}

impl std::error::Error for AutopilotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AutopilotError::SubprocessSpawn { source, .. } => Some(source),
            AutopilotError::JsonParse { source, .. } => Some(source),
            AutopilotError::JsonSerialize { source, .. } => Some(source),
            AutopilotError::OracleTransport { source, .. } => Some(source),
            AutopilotError::OraclePlan { source, .. } => Some(source),
            AutopilotError::ProfileIo { source, .. } => Some(source),
            AutopilotError::ProfileParse { source, .. } => Some(source),
            _ => None,
        }
    }
}
