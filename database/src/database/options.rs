use std::{path::PathBuf, time::Duration};

use crate::consts::consts::{DEFAULT_DATA_FILE, DEFAULT_REQUEST_TIMEOUT};

#[derive(Debug, Clone)]
pub struct DatabaseOptions {
    pub data_file: PathBuf,
    pub request_timeout: Duration,
}

// Implements: https://rust-unofficial.github.io/patterns/patterns/creational/builder.html
impl DatabaseOptions {
    /// JSON document holding the persons, fire stations and medical records loaded on startup
    pub fn set_data_file(mut self, data_file: PathBuf) -> Self {
        self.data_file = data_file;
        self
    }

    /// How long a request manager waits for the database to answer a command
    pub fn set_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let options = DatabaseOptions::default()
            .set_data_file(PathBuf::from("/tmp/safetynet/data.json"))
            .set_request_timeout(Duration::from_millis(250));

        assert_eq!(options.data_file, PathBuf::from("/tmp/safetynet/data.json"));
        assert_eq!(options.request_timeout, Duration::from_millis(250));
        assert_eq!(DatabaseOptions::default().request_timeout, Duration::from_secs(2));
    }
}
