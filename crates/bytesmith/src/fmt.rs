use core::fmt;

use crate::{
    Buffer,
    error::{Error, Result},
};

/// Forwards formatted text into a buffer while remembering the real reason
/// a write failed. `fmt::Write` can only report `fmt::Error`, so the sink
/// stashes the allocation error out of band and the caller recovers it
/// after `fmt::write` returns.
struct FmtSink {
    buf: Buffer,
    err: Option<Error>,
}

impl fmt::Write for FmtSink {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buf.concat(s.as_bytes()).map_err(|e| {
            self.err = Some(e);
            fmt::Error
        })
    }
}

impl Buffer {
    /// Appends formatted text, built with [`format_args!`].
    ///
    /// The text is rendered into a scratch buffer first and appended in one
    /// step, so a failure part-way through formatting leaves `self` exactly
    /// as it was. The scratch inherits this buffer's allocation policy.
    /// Output is never truncated; the scratch grows as far as the arguments
    /// render.
    ///
    /// The [`bformat!`](crate::bformat) macro wraps this for the common
    /// "format into a fresh buffer" case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bytesmith::Buffer;
    ///
    /// # fn demo() -> bytesmith::Result<()> {
    /// let mut line = Buffer::from_slice(b"status: ")?;
    /// line.format_into(format_args!("{} of {}", 3, 10))?;
    /// assert_eq!(line, "status: 3 of 10");
    /// # Ok(())
    /// # }
    /// # demo().unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`] if growing the scratch or appending it fails;
    /// [`Error::Format`] if a formatting trait implementation fails on its
    /// own (allocation failure is never misreported as [`Error::Format`]).
    pub fn format_into(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        // A literal-only pattern needs no interpolation pass.
        if let Some(lit) = args.as_str() {
            return self.concat(lit.as_bytes());
        }
        let mut sink = FmtSink {
            buf: Buffer::new().with_alloc_policy(self.alloc_policy()),
            err: None,
        };
        match fmt::write(&mut sink, args) {
            Ok(()) => self.concat_buffer(&sink.buf),
            Err(fmt::Error) => Err(sink.err.take().unwrap_or(Error::Format)),
        }
    }
}

impl fmt::Write for Buffer {
    /// Lets `write!` and `writeln!` target a buffer directly. Allocation
    /// failure collapses to `fmt::Error` here; use
    /// [`format_into`](Buffer::format_into) when the distinction matters.
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.concat(s.as_bytes()).map_err(|_| fmt::Error)
    }
}
