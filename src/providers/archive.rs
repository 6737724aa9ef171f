//! Zip packaging of the build output.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::core::error::AppError;
use crate::utils::fs::walk_files;

/// Writes every file under `source_dir` into a deflated zip at `target`.
/// Entry names are relative to `source_dir` with `/` separators.
/// Returns the number of entries written.
pub fn zip_directory(source_dir: &Path, target: &Path) -> Result<usize, AppError> {
    let files = walk_files(source_dir)?;

    let file = File::create(target).map_err(|e| {
        AppError::Archive(format!("Failed to create {}: {}", target.display(), e))
    })?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (relative, absolute) in &files {
        zip.start_file(relative.as_str(), options)
            .map_err(|e| AppError::Archive(format!("Failed to add {}: {}", relative, e)))?;
        let mut input = File::open(absolute)?;
        io::copy(&mut input, &mut zip)?;
    }

    let mut file = zip
        .finish()
        .map_err(|e| AppError::Archive(format!("Failed to finish archive: {}", e)))?;
    file.flush()?;

    Ok(files.len())
}
