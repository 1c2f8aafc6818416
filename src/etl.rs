pub mod assemble;
pub mod kml;
pub mod marked_paths;
pub mod passes;

use std::time::Instant;

use log::{error, info};

use crate::errors::Result;

pub trait Etl {
    type Input;
    type Output;

    fn etl_name(&self) -> &str;

    fn extract(&mut self) -> Result<Self::Input>;
    fn transform(&mut self, input: Self::Input) -> Result<Self::Output>;
    fn load(&mut self, output: Self::Output) -> Result<()>;

    /// Runs the three stages in order. Nothing is loaded unless both earlier stages succeeded.
    fn process(&mut self) -> Result<()> {
        let started = Instant::now();
        info!(etl_name = self.etl_name(); "Starting ETL process");

        info!(etl_name = self.etl_name(); "Extracting");
        let input = match self.extract() {
            Ok(input) => Ok(input),
            Err(err) => {
                error!(etl_name = self.etl_name(), err = err.to_string().as_str(); "Extraction failed with error");
                Err(err)
            },
        }?;

        info!(etl_name = self.etl_name(); "Transforming");
        let output = match self.transform(input) {
            Ok(output) => Ok(output),
            Err(err) => {
                error!(etl_name = self.etl_name(), err = err.to_string().as_str(); "Transformation failed with error");
                Err(err)
            },
        }?;

        info!(etl_name = self.etl_name(); "Loading");
        match self.load(output) {
            Ok(_) => Ok(()),
            Err(err) => {
                error!(etl_name = self.etl_name(), err = err.to_string().as_str(); "Loading failed with error");
                Err(err)
            },
        }?;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(etl_name = self.etl_name(), elapsed_ms = elapsed_ms; "Process finished");
        Ok(())
    }
}
