use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("failed to copy {} to {}", .from.display(), .to.display())]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} file(s) could not be scanned")]
    ScanFailed(usize),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
