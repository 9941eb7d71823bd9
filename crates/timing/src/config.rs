use std::path::Path;

use serde::Deserialize;

/// Location of the JobHistory Server REST endpoint.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct HistoryServerConfig {
    pub host: String,
    pub port: u16,
    /// Timeout of a single request, in seconds.
    pub timeout_secs: u64,
}

impl Default for HistoryServerConfig {
    fn default() -> Self {
        HistoryServerConfig {
            host: "localhost".to_string(),
            port: 19888,
            timeout_secs: 10,
        }
    }
}

impl HistoryServerConfig {
    /// Read [HistoryServerConfig] from YAML file. Panic on error.
    pub fn from_yaml<P: AsRef<Path>>(file: P) -> Self {
        serde_yaml::from_str(
            &std::fs::read_to_string(&file).unwrap_or_else(|_| panic!("Can't read file {}", file.as_ref().display())),
        )
        .unwrap_or_else(|e| panic!("Can't parse YAML from file {}: {e:?}", file.as_ref().display()))
    }

    /// Base path of the MapReduce history REST API.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}/ws/v1/history/mapreduce", self.host, self.port)
    }
}
