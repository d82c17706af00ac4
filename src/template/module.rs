//! Pool-backed handles for generated modules.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{AsgenError, Result};
use crate::pool::{Block, MemoryPool};

/// An open generated module.
///
/// Every handle holds a block of the engine's [`MemoryPool`] while it is
/// open; [`OutputModule::finish`] or [`OutputModule::abandon`] hands the
/// block back.
pub struct OutputModule {
    path: PathBuf,
    writer: BufWriter<File>,
    block: Block,
}

impl OutputModule {
    /// Create `path` and write the generated-file header.
    pub fn create(pool: &mut MemoryPool, path: &Path, header: &str) -> Result<Self> {
        let block = pool.allocate_for::<OutputModule>()?;

        let file = match File::create(path) {
            Ok(file) => file,
            Err(e) => {
                pool.release(block);
                return Err(AsgenError::CannotCreate {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
            }
        };

        let mut module = Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            block,
        };
        if let Err(e) = module.writer.write_all(header.as_bytes()) {
            let path = module.abandon(pool);
            return Err(AsgenError::CannotCreate {
                path,
                message: e.to_string(),
            });
        }
        Ok(module)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn writer(&mut self) -> &mut BufWriter<File> {
        &mut self.writer
    }

    /// Flush, close and release the handle.
    pub fn finish(mut self, pool: &mut MemoryPool) -> Result<PathBuf> {
        let flushed = self.writer.flush();
        let path = self.close(pool);
        flushed.map_err(|e| AsgenError::CannotCreate {
            path: path.clone(),
            message: e.to_string(),
        })?;
        Ok(path)
    }

    /// Release the handle without reporting write errors.
    pub fn abandon(self, pool: &mut MemoryPool) -> PathBuf {
        self.close(pool)
    }

    fn close(self, pool: &mut MemoryPool) -> PathBuf {
        let Self { path, writer, block } = self;
        drop(writer);
        pool.release(block);
        path
    }
}
