use thiserror::Error;

/// A rejected editor command. Rejections never mutate the document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("flow edge needs both a source and a target scene")]
    MissingEndpoint,
    #[error("flow edge cannot connect scene '{0}' to itself")]
    SelfLoop(String),
    #[error("a {kind} edge from '{from}' to '{to}' already exists")]
    DuplicateEdge {
        from: String,
        to: String,
        kind: &'static str,
    },
    #[error("no scene with id '{0}'")]
    UnknownScene(String),
    #[error("no flow edge with id '{0}'")]
    UnknownEdge(String),
    #[error("no NPC with id '{0}'")]
    UnknownNpc(String),
    #[error("nothing to undo")]
    NothingToUndo,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read or write scenario file: {0}")]
    Io(#[from] std::io::Error),
    #[error("scenario JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scenario document must be a JSON object")]
    NotAnObject,
    #[error("scenario is missing meta.title")]
    MissingTitle,
    #[error("scenario has no usable scenes")]
    NoScenes,
}
