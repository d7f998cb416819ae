use log::{error, warn};
use scanner::{Image, ImportReport};
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct Inspection {
    pub reports: Vec<ImportReport>,
    pub failures: usize,
}

/// Lists the imports of each file. Files that are not PE images are
/// reported and left out; files that fail to scan are counted.
pub fn inspect(files: &[PathBuf]) -> Inspection {
    let mut inspection = Inspection::default();

    for file in files {
        let scanned = Image::open(file).and_then(|image| {
            if image.is_portable_executable()? {
                image.imported_libraries().map(Some)
            } else {
                Ok(None)
            }
        });

        match scanned {
            Ok(Some(imports)) => inspection.reports.push(ImportReport {
                file: file.clone(),
                imports,
            }),
            Ok(None) => warn!("{} is not a portable executable", file.display()),
            Err(err) => {
                error!("failed to scan {}: {}", file.display(), err);
                inspection.failures += 1;
            }
        }
    }

    inspection
}
