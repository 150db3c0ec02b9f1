use std::fs::File;
use std::ops::Deref;

use crate::trace::{parse_trace, AccessEvent, TraceError};

#[cfg(not(unix))]
fn map_file(mut file: File) -> Result<impl Deref<Target = [u8]>, TraceError> {
    use std::io::Read;
    // Compatibility on other systems
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)?;
    Ok(buf)
}

// Memory map the file for speed on unix systems; traces recorded from real
// programs easily run to hundreds of megabytes
#[cfg(unix)]
fn map_file(file: File) -> Result<impl Deref<Target = [u8]>, TraceError> {
    use memmap2::{Advice, Mmap};
    unsafe {
        let m = Mmap::map(&file)?;
        // The parser walks the trace front to back exactly once
        m.advise(Advice::Sequential)?;
        Ok(m)
    }
}

/// Reads and parses a trace file in one step
///
/// # Arguments
///
/// * `path`: Path to a valgrind trace file
///
/// returns: Result<Vec<AccessEvent>, TraceError>
pub fn read_trace(path: &str) -> Result<Vec<AccessEvent>, TraceError> {
    let file = File::open(path)?;
    let bytes = map_file(file)?;
    let text = std::str::from_utf8(&bytes)?;
    parse_trace(text)
}
