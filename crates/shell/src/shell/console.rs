use std::fmt::Display;
use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

/// Shared line writer. Chat replies, toasts and speech all print through one handle
/// so their lines never interleave.
#[derive(Clone)]
pub struct Console {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Console {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn line(&self, text: impl Display) -> io::Result<()> {
        let mut out = self.out.lock();
        writeln!(out, "{text}")?;
        out.flush()
    }

    pub fn lines<I, T>(&self, lines: I) -> io::Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let mut out = self.out.lock();
        for line in lines {
            writeln!(out, "{line}")?;
        }
        out.flush()
    }

    /// Run `f` against the underlying writer, for multi-line renderers.
    pub fn with_writer<R>(&self, f: impl FnOnce(&mut dyn Write) -> io::Result<R>) -> io::Result<R> {
        let mut out = self.out.lock();
        let result = f(&mut **out)?;
        out.flush()?;
        Ok(result)
    }
}
