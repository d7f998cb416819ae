use crate::error::{Error, Result};
use log::{debug, info, warn};
use std::{fmt, fs, path::PathBuf};

pub use directory::Directory;

mod directory;

#[derive(Debug, Clone)]
pub struct CopyOptions {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    AlreadyPresent,
    Copied,
    WouldCopy,
    ProvidedBySystem,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::AlreadyPresent => write!(f, "(already present)"),
            Resolution::Copied => write!(f, "(copied)"),
            Resolution::WouldCopy => write!(f, "(would be copied)"),
            Resolution::ProvidedBySystem => {
                write!(f, "(assumed to be provided by operating system)")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImport {
    pub library: String,
    pub resolution: Resolution,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub name: String,
    pub imports: Vec<ResolvedImport>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct DeployReport {
    pub scanned: Vec<ScannedFile>,
    pub skipped: Vec<SkippedFile>,
}

impl DeployReport {
    pub fn copied(&self) -> impl Iterator<Item = &str> {
        self.scanned
            .iter()
            .flat_map(|file| &file.imports)
            .filter(|import| {
                matches!(
                    import.resolution,
                    Resolution::Copied | Resolution::WouldCopy
                )
            })
            .map(|import| import.library.as_str())
    }
}

/// A file waiting to be scanned. Copies made during a dry run are scanned
/// from the source directory.
#[derive(Debug, Clone)]
struct Candidate {
    name: String,
    path: PathBuf,
}

/// Copies the DLLs found in the source directory that the PE files of the
/// destination directory import, including the imports of those DLLs.
pub struct Deployer {
    options: CopyOptions,
}

impl Deployer {
    pub fn new(options: CopyOptions) -> Self {
        Self { options }
    }

    pub fn run(&self) -> Result<DeployReport> {
        let source = Directory::list(&self.options.source)?;
        let mut destination = Directory::list(&self.options.destination)?;

        let mut pending: Vec<Candidate> = destination
            .names()
            .iter()
            .map(|name| Candidate {
                name: name.clone(),
                path: destination.join(name),
            })
            .collect();

        let mut report = DeployReport::default();
        let mut next = 0;

        while next < pending.len() {
            let candidate = pending[next].clone();
            next += 1;

            if !candidate.path.is_file() {
                continue;
            }

            let libraries = match scan(&candidate) {
                Ok(Some(libraries)) => libraries,
                Ok(None) => {
                    debug!("{} is not a portable executable", candidate.name);
                    continue;
                }
                Err(err) => {
                    warn!("skipping {}: {}", candidate.name, err);
                    report.skipped.push(SkippedFile {
                        name: candidate.name,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            let mut scanned = ScannedFile {
                name: candidate.name,
                imports: Vec::with_capacity(libraries.len()),
            };

            for library in libraries {
                let resolution = if destination.contains(&library) {
                    Resolution::AlreadyPresent
                } else if let Some(name) = source.find(&library).map(str::to_owned) {
                    let copy = self.copy(&source, &destination, &name)?;

                    destination.insert(name.clone());
                    pending.push(copy);

                    if self.options.dry_run {
                        Resolution::WouldCopy
                    } else {
                        Resolution::Copied
                    }
                } else {
                    Resolution::ProvidedBySystem
                };

                scanned.imports.push(ResolvedImport {
                    library,
                    resolution,
                });
            }

            report.scanned.push(scanned);
        }

        Ok(report)
    }

    fn copy(&self, source: &Directory, destination: &Directory, name: &str) -> Result<Candidate> {
        let from = source.join(name);

        if self.options.dry_run {
            info!("would copy {} to {}", name, destination.path().display());

            return Ok(Candidate {
                name: name.to_owned(),
                path: from,
            });
        }

        let to = destination.join(name);

        info!("copying {} to {}", name, destination.path().display());

        fs::copy(&from, &to).map_err(|source| Error::CopyFailed {
            from,
            to: to.clone(),
            source,
        })?;

        Ok(Candidate {
            name: name.to_owned(),
            path: to,
        })
    }
}

/// `None` when the file is not a PE image.
fn scan(candidate: &Candidate) -> scanner::Result<Option<Vec<String>>> {
    let image = scanner::Image::open(&candidate.path)?;

    if !image.is_portable_executable()? {
        return Ok(None);
    }

    image.imported_libraries().map(Some)
}
