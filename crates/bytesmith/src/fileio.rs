//! Whole-file helpers bridging [`Buffer`] and the filesystem.
//!
//! These are deliberately thin: a read loop that grows a buffer until
//! end-of-file and a write that refuses partial output. Failures keep their
//! phase: opening, reading, and writing surface the underlying
//! [`std::io::Error`], while an allocation failure while growing the buffer
//! maps to [`std::io::ErrorKind::OutOfMemory`].

use std::{
    fs::File,
    io::{self, Read, Write},
    path::Path,
};

use crate::{Buffer, error::Error};

/// Bytes requested from the file per read call.
const READ_CHUNK: usize = 1000;

/// Reads the entire file at `path` into a new [`Buffer`], growing it
/// chunk by chunk until end-of-file.
///
/// # Examples
///
/// ```rust,no_run
/// use bytesmith::fileio;
///
/// # fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let config = fileio::read_to_buffer("app.conf")?;
/// for line in config.split(b"\n")?.iter() {
///     println!("{line}");
/// }
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Any open or read failure from the operating system; allocation failure
/// surfaces as [`io::ErrorKind::OutOfMemory`].
pub fn read_to_buffer<P: AsRef<Path>>(path: P) -> io::Result<Buffer> {
    let mut file = File::open(path)?;
    let mut buf = Buffer::new();
    let mut chunk = [0u8; READ_CHUNK];
    loop {
        match file.read(&mut chunk) {
            Ok(0) => return Ok(buf),
            Ok(n) => buf.concat(&chunk[..n]).map_err(out_of_memory)?,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
}

/// Writes `buf`'s content verbatim to the file at `path`, creating or
/// truncating it. The write either covers the full length or fails.
///
/// # Errors
///
/// Any create or write failure from the operating system, including
/// [`io::ErrorKind::WriteZero`] when the full length cannot be written.
pub fn write_buffer<P: AsRef<Path>>(path: P, buf: &Buffer) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(buf.as_bytes())?;
    file.flush()
}

fn out_of_memory(err: Error) -> io::Error {
    io::Error::new(io::ErrorKind::OutOfMemory, err)
}
