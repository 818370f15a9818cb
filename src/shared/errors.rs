#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to create state path {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to resolve home directory for state root")]
    HomeDirectoryUnavailable,
    #[error("failed to encode receipt {path}: {source}")]
    EncodeReceipt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write receipt {path}: {source}")]
    WriteReceipt {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
