pub mod nodes;
pub mod relations;
pub mod ways;

use std::io::BufRead;
use std::path::Path;
use std::time::Instant;

use log::{error, info};

use crate::data::element::ElementNode;
use crate::errors::Result;
use crate::reader::ElementReader;

/// One forward scan over the source, keeping only elements called `target_element()`.
///
/// A pass is built from the finished output of the pass before it, so a later pass cannot
/// start until the earlier one has completed.
pub trait Pass {
    type Output;

    fn pass_name(&self) -> &str;
    fn target_element(&self) -> &str;

    fn accept(&mut self, element: ElementNode) -> Result<()>;

    /// (elements scanned, elements retained)
    fn counts(&self) -> (usize, usize);

    /// Ids this pass hands on to the next one, when that differs from what it retained.
    fn referenced(&self) -> Option<usize> {
        None
    }

    fn finish(self) -> Self::Output;

    fn scan<R: BufRead>(&mut self, reader: &mut ElementReader<R>) -> Result<()> {
        let target = self.target_element().to_string();
        while let Some(element) = reader.next_element(&target)? {
            self.accept(element)?;
        }
        Ok(())
    }

    /// Opens a fresh stream over `source`, scans it to the end and closes it again.
    fn process(mut self, source: &Path) -> Result<Self::Output>
    where
        Self: Sized,
    {
        info!(pass_name = self.pass_name(); "Starting pass");
        let started = Instant::now();

        let scanned = ElementReader::open(source).and_then(|mut reader| self.scan(&mut reader));
        if let Err(err) = scanned {
            error!(pass_name = self.pass_name(), err = err.to_string().as_str(); "Pass failed with error");
            return Err(err);
        }

        let (scanned, retained) = self.counts();
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match self.referenced() {
            Some(referenced) => info!(
                pass_name = self.pass_name(),
                scanned = scanned,
                retained = retained,
                referenced = referenced,
                elapsed_ms = elapsed_ms;
                "Pass finished"
            ),
            None => info!(
                pass_name = self.pass_name(),
                scanned = scanned,
                retained = retained,
                elapsed_ms = elapsed_ms;
                "Pass finished"
            ),
        }
        Ok(self.finish())
    }
}
