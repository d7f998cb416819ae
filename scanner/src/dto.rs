use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The DLLs one file imports, as printed by `copydlls imports --json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub file: PathBuf,
    pub imports: Vec<String>,
}
