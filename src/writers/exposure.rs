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

/// Per-active-agent, per-tick exposure rows.
pub struct AgentExposureWriter {
    writer: csv::Writer<File>,
}

impl AgentExposureWriter {
    pub const FILE_NAME: &'static str = "agent_exposure.csv";

    pub fn open(config: &Config) -> SimResult<Self> {
        let writer = open_csv(&config.output, Self::FILE_NAME, &[
            "Agent",
            "Tick",
            "Contamination Load Aerosol",
            "Contamination Load Droplet",
            "Accumulated Contamination Load Surface",
            "Contamination Load Face",
        ])?;
        Ok(AgentExposureWriter { writer })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn write(
        &mut self,
        name: &str,
        tick: u64,
        contamination_load_aerosol: f64,
        contamination_load_droplet: f64,
        accumulated_contamination_load_surface: f64,
        contamination_load_face: f64,
    ) -> SimResult<()> {
        self.writer.write_record(&[
            name.to_string(),
            tick.to_string(),
            contamination_load_aerosol.to_string(),
            contamination_load_droplet.to_string(),
            accumulated_contamination_load_surface.to_string(),
            contamination_load_face.to_string(),
        ])?;
        Ok(())
    }

    pub fn close(&mut self) -> SimResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
