//! Output root preparation and per-file copying
//!
//! Copies are streamed so read failures (source side, recoverable) can be
//! told apart from write failures (output side, fatal).

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use xxhash_rust::xxh3::Xxh3;

use crate::core::error::FlattenError;

const CHUNK_SIZE: usize = 64 * 1024;

/// Written into an output root that lives inside the source tree. Only a
/// nested directory carrying it may be cleared or written into.
pub const OUTPUT_MARKER: &str = ".repoflat";

/// Which side of a copy failed
#[derive(Debug)]
pub enum CopyError {
    Read(io::Error),
    Write(io::Error),
}

/// Bytes written and their XXH3 hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Copied {
    pub size: u64,
    pub hash: String,
}

/// Create the output root, or empty it when `clean` is set
pub fn prepare_output_root(output: &Path, clean: bool) -> Result<(), FlattenError> {
    if output.exists() && !output.is_dir() {
        return Err(FlattenError::output_write(
            output,
            io::Error::new(io::ErrorKind::AlreadyExists, "exists and is not a directory"),
        ));
    }

    fs::create_dir_all(output).map_err(|e| FlattenError::output_write(output, e))?;

    if clean {
        clear_dir(output).map_err(|e| FlattenError::output_write(output, e))?;
    }

    Ok(())
}

/// Whether `output` was created by a previous run
pub fn is_marked(output: &Path) -> bool {
    output.join(OUTPUT_MARKER).is_file()
}

pub fn mark_output_root(output: &Path) -> Result<(), FlattenError> {
    let marker = output.join(OUTPUT_MARKER);
    fs::write(&marker, "").map_err(|e| FlattenError::output_write(marker, e))
}

/// Remove everything inside `dir`, keeping `dir` itself
fn clear_dir(dir: &Path) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Copy `src` to `dest` byte for byte, overwriting `dest`. A partial
/// `dest` is removed when reading fails midway.
pub fn copy_file(src: &Path, dest: &Path) -> Result<Copied, CopyError> {
    let reader = BufReader::new(File::open(src).map_err(CopyError::Read)?);
    let writer = BufWriter::new(File::create(dest).map_err(CopyError::Write)?);

    let result = stream(reader, writer);
    if let Err(CopyError::Read(_)) = &result {
        let _ = fs::remove_file(dest);
    }
    result
}

fn stream<R: Read, W: Write>(mut reader: R, mut writer: W) -> Result<Copied, CopyError> {
    let mut hasher = Xxh3::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut size = 0u64;

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyError::Read(e)),
        };
        writer.write_all(&buffer[..n]).map_err(CopyError::Write)?;
        hasher.update(&buffer[..n]);
        size += n as u64;
    }

    writer.flush().map_err(CopyError::Write)?;

    Ok(Copied {
        size,
        hash: format!("{:016x}", hasher.digest()),
    })
}
