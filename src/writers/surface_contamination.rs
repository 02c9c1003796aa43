/*
    Copyright 2023 github.com/programaquatic

   Licensed under the Apache License, Version 2.0 (the "License");
   you may not use this file except in compliance with the License.
   You may obtain a copy of the License at

       http://www.apache.org/licenses/LICENSE-2.0

   Unless required by applicable law or agreed to in writing, software
   distributed under the License is distributed on an "AS IS" BASIS,
   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
   See the License for the specific language governing permissions and
   limitations under the License.
*/

use std::fs::File;

use crate::error::SimResult;
use crate::sim_utils::config::Config;
use crate::writers::writer::open_csv;

/// Per-surface contamination rows with the surface class tag.
pub struct SurfaceContaminationWriter {
    writer: csv::Writer<File>,
    precision: usize,
}

impl SurfaceContaminationWriter {
    pub const FILE_NAME: &'static str = "surface_contamination.csv";

    pub fn open(config: &Config) -> SimResult<Self> {
        let writer = open_csv(&config.output, Self::FILE_NAME, &[
            "Name", "Type", "Tick", "X", "Y", "Contamination",
        ])?;
        Ok(SurfaceContaminationWriter {
            writer,
            precision: config.output.SurfaceContaminationPrecision,
        })
    }

    pub fn write(
        &mut self,
        name: &str,
        class_tag: &str,
        tick: u64,
        x: usize,
        y: usize,
        contamination: f64,
    ) -> SimResult<()> {
        self.writer.write_record(&[
            name.to_string(),
            class_tag.to_string(),
            tick.to_string(),
            x.to_string(),
            y.to_string(),
            format!("{:.*}", self.precision, contamination),
        ])?;
        Ok(())
    }

    pub fn close(&mut self) -> SimResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
