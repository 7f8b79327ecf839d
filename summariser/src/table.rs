use std::fs::File;
use std::io::{self, BufWriter, Write};

use crate::aggregator::Report;
use crate::model::{to_line, ResultRow};

/// A [`Report`] implementation that writes rows as comma delimited lines.
///
/// The header line is written before the first row, or by [`CsvTableWriter::finish`] if no row
/// was reported.
pub struct CsvTableWriter<W>
where
    W: Write,
{
    writer: W,
    header_written: bool,
}

impl<W> CsvTableWriter<W>
where
    W: Write,
{
    /// Creates a new [`CsvTableWriter`] with the specified [`Write`]r.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header_written: false,
        }
    }

    /// Write the header if nothing was reported, flush and hand back the writer.
    pub fn finish(mut self) -> Result<W, io::Error> {
        self.ensure_header()?;
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn ensure_header(&mut self) -> Result<(), io::Error> {
        if !self.header_written {
            writeln!(self.writer, "{}", to_line(&ResultRow::header()))?;
            self.header_written = true;
        }
        Ok(())
    }
}

impl CsvTableWriter<BufWriter<File>> {
    /// Creates a new [`CsvTableWriter`] that truncates the file at the specified path.
    pub fn from_file<P>(path: P) -> Result<Self, io::Error>
    where
        P: AsRef<std::path::Path>,
    {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W> Report for CsvTableWriter<W>
where
    W: Write,
{
    type Error = io::Error;

    fn report(&mut self, row: &ResultRow) -> Result<(), Self::Error> {
        self.ensure_header()?;
        let line = to_line(&row.to_record());
        debug!("Writing row: {line}");
        writeln!(self.writer, "{line}")?;
        Ok(())
    }
}
