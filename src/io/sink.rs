use std::path::{Path, PathBuf};

use super::{write_ply, Geometry, LoadError};

/// Destination of the evaluation artifacts.
pub trait ArtifactSink {
    fn write_point_cloud(&self, name: &str, geometry: &Geometry) -> Result<(), LoadError>;
    fn write_report(&self, name: &str, html: &str) -> Result<(), LoadError>;
}

/// Writes artifacts as files of a directory.
pub struct DirectorySink {
    outdir: PathBuf,
}

impl DirectorySink {
    /// Creates the sink, and the directory if it doesn't exist.
    pub fn create<P: AsRef<Path>>(outdir: P) -> Result<Self, LoadError> {
        let outdir = outdir.as_ref();
        if !outdir.is_dir() {
            log::info!("Creating output directory {}", outdir.display());
            std::fs::create_dir_all(outdir).map_err(|err| LoadError::file(outdir, err))?;
        }
        Ok(Self {
            outdir: outdir.to_path_buf(),
        })
    }

    pub fn outdir(&self) -> &Path {
        &self.outdir
    }
}

impl ArtifactSink for DirectorySink {
    fn write_point_cloud(&self, name: &str, geometry: &Geometry) -> Result<(), LoadError> {
        let filepath = self.outdir.join(name);
        write_ply(&filepath, geometry)?;
        log::info!(
            "Wrote {} points to {}",
            geometry.len_vertices(),
            filepath.display()
        );
        Ok(())
    }

    fn write_report(&self, name: &str, html: &str) -> Result<(), LoadError> {
        let filepath = self.outdir.join(name);
        std::fs::write(&filepath, html).map_err(|err| LoadError::file(&filepath, err))?;
        log::info!("Wrote report to {}", filepath.display());
        Ok(())
    }
}
