use std::path::PathBuf;

/// Errors raised while loading or querying the shared data sets
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to render recommendation record {id}: {source}")]
    Yaml {
        id: String,
        #[source]
        source: serde_yaml::Error,
    },
}
