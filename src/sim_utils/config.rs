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

use serde::{Serialize, Deserialize};
use std::fs;
use std::path::Path;

use crate::error::SimResult;

/// Simulation constants as they appear in the configuration file. Field
/// names are the literal JSON keys.
#[allow(non_snake_case)] // allow those constants to be uppercase var names
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EnvConfig {
    pub AirCellSize: f64,
    pub MobilityCellSize: f64,
    pub AgentReach: f64,
    pub SimulationTimeStep: f64,

    pub HandwashingContaminationFraction: f64,
    pub HandwashingEffectDuration: f64,

    pub MaskEmissionAerosolReductionEfficiency: f64,
    pub MaskEmissionDropletReductionEfficiency: f64,
    pub MaskAerosolProtectionEfficiency: f64,
    pub MaskDropletProtectionEfficiency: f64,

    pub CleaningInterval: f64,
    pub Diffusivity: f64,
    pub WallAbsorbingProportion: f64,

    pub CoughingRate: f64,
    pub CoughingFactor: f64,
    pub CoughingAerosolPercentage: f64,
    pub CoughingDropletPercentage: f64,

    #[serde(default)]
    pub SurfaceExposureRatio: f64,
}

#[allow(non_snake_case)]
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OutputConfig {
    pub Suppress: bool,
    pub Path: String,

    pub AerosolContaminationWriteInterval: u64,
    pub AerosolContaminationPrecision: usize,
    pub DropletContaminationWriteInterval: u64,
    pub DropletContaminationPrecision: usize,
    pub SurfaceContaminationWriteInterval: u64,
    pub SurfaceContaminationPrecision: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Config {
    pub env: EnvConfig,
    pub output: OutputConfig,
}

impl Config {
    /// MobilityCellSize / AirCellSize, the factor that converts mobility
    /// coordinates to air-grid coordinates.
    pub fn mobility_ratio(&self) -> f64 {
        self.env.MobilityCellSize / self.env.AirCellSize
    }
}

/// Read any deserializable structure from a JSON file. Lines starting with
/// "//" are stripped so config files can carry comments.
pub fn read_json<T>(file: &Path) -> SimResult<T>
    where
        T: for<'de> Deserialize<'de>
{
    let cfg_content_iter = fs::read_to_string(file)?;
    let rem_lines = cfg_content_iter.lines().filter(|l| ! l.trim_start().starts_with("//") );

    let mut cfg_json = String::from("");
    rem_lines.for_each(|l| cfg_json.push_str(l) );

    let data: T = serde_json::from_str(&cfg_json)?;
    Ok(data)
}

#[cfg(test)]
pub fn test_config() -> Config {
    serde_json::from_value(serde_json::json!({
        "env": {
            "AirCellSize": 50,
            "MobilityCellSize": 10,
            "AgentReach": 50,
            "SimulationTimeStep": 0.00834,
            "HandwashingContaminationFraction": 0.3,
            "HandwashingEffectDuration": 0.5,
            "MaskEmissionAerosolReductionEfficiency": 0.4,
            "MaskEmissionDropletReductionEfficiency": 0.04,
            "MaskAerosolProtectionEfficiency": 0.4,
            "MaskDropletProtectionEfficiency": 0.04,
            "CleaningInterval": 1,
            "Diffusivity": 23,
            "WallAbsorbingProportion": 0.0,
            "CoughingRate": 0,
            "CoughingFactor": 1000000,
            "CoughingAerosolPercentage": 0.01,
            "CoughingDropletPercentage": 0.99,
            "SurfaceExposureRatio": 0.079
        },
        "output": {
            "Suppress": true,
            "Path": "output",
            "AerosolContaminationWriteInterval": 15,
            "AerosolContaminationPrecision": 17,
            "DropletContaminationWriteInterval": 15,
            "DropletContaminationPrecision": 17,
            "SurfaceContaminationWriteInterval": 15,
            "SurfaceContaminationPrecision": 17
        }
    })).unwrap()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_config_mobility_ratio() {
        let cfg = test_config();
        assert_eq!(cfg.mobility_ratio(), 0.2);
    }

    #[test]
    fn test_read_json_skips_comment_lines() {
        use std::io::Write;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "// generated for a unit test").unwrap();
        writeln!(f, "{}", serde_json::to_string_pretty(&test_config()).unwrap()).unwrap();
        drop(f);

        let cfg: Config = read_json(&path).unwrap();
        assert_eq!(cfg.env.AirCellSize, 50.0);
        assert!(cfg.output.Suppress);
    }
}
