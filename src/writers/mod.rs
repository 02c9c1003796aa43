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

pub mod writer;
pub mod exposure;
pub mod contamination;
pub mod surface_contamination;

pub use contamination::{AerosolContaminationWriter, DropletContaminationWriter};
pub use exposure::AgentExposureWriter;
pub use surface_contamination::SurfaceContaminationWriter;

use crate::error::SimResult;
use crate::sim_utils::config::Config;

/// The full set of observation sinks a run writes to.
pub struct OutputWriters {
    pub agent_exposure: AgentExposureWriter,
    pub aerosol: AerosolContaminationWriter,
    pub droplet: DropletContaminationWriter,
    pub surface: SurfaceContaminationWriter,
}

impl OutputWriters {
    pub fn open(config: &Config) -> SimResult<Self> {
        Ok(OutputWriters {
            agent_exposure: AgentExposureWriter::open(config)?,
            aerosol: AerosolContaminationWriter::open(config)?,
            droplet: DropletContaminationWriter::open(config)?,
            surface: SurfaceContaminationWriter::open(config)?,
        })
    }

    /// Flush and close every sink.
    pub fn close(&mut self) -> SimResult<()> {
        self.agent_exposure.close()?;
        self.aerosol.close()?;
        self.droplet.close()?;
        self.surface.close()?;
        Ok(())
    }
}
