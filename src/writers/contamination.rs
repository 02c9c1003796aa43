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

/// Per-air-cell contamination rows for one layer, values rounded to a
/// configured number of decimals.
struct CellContaminationWriter {
    writer: csv::Writer<File>,
    precision: usize,
}

impl CellContaminationWriter {
    fn open(config: &Config, file_name: &str, precision: usize) -> SimResult<Self> {
        let writer = open_csv(&config.output, file_name, &["Tick", "X", "Y", "Contamination"])?;
        Ok(CellContaminationWriter { writer, precision })
    }

    fn write(&mut self, tick: u64, x: usize, y: usize, contamination: f64) -> SimResult<()> {
        self.writer.write_record(&[
            tick.to_string(),
            x.to_string(),
            y.to_string(),
            format!("{:.*}", self.precision, contamination),
        ])?;
        Ok(())
    }

    fn close(&mut self) -> SimResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

pub struct AerosolContaminationWriter(CellContaminationWriter);

impl AerosolContaminationWriter {
    pub const FILE_NAME: &'static str = "aerosol_contamination.csv";

    pub fn open(config: &Config) -> SimResult<Self> {
        Ok(AerosolContaminationWriter(CellContaminationWriter::open(
            config,
            Self::FILE_NAME,
            config.output.AerosolContaminationPrecision,
        )?))
    }

    pub fn write(&mut self, tick: u64, x: usize, y: usize, contamination: f64) -> SimResult<()> {
        self.0.write(tick, x, y, contamination)
    }

    pub fn close(&mut self) -> SimResult<()> {
        self.0.close()
    }
}

pub struct DropletContaminationWriter(CellContaminationWriter);

impl DropletContaminationWriter {
    pub const FILE_NAME: &'static str = "droplet_contamination.csv";

    pub fn open(config: &Config) -> SimResult<Self> {
        Ok(DropletContaminationWriter(CellContaminationWriter::open(
            config,
            Self::FILE_NAME,
            config.output.DropletContaminationPrecision,
        )?))
    }

    pub fn write(&mut self, tick: u64, x: usize, y: usize, contamination: f64) -> SimResult<()> {
        self.0.write(tick, x, y, contamination)
    }

    pub fn close(&mut self) -> SimResult<()> {
        self.0.close()
    }
}
