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

use std::fs;
use std::path::Path;

use crate::error::SimResult;
use crate::sim_utils::config::OutputConfig;

/// Open a CSV sink under the configured output directory (created if
/// missing) and write the header row.
pub fn open_csv(
    output: &OutputConfig,
    file_name: &str,
    headers: &[&str],
) -> SimResult<csv::Writer<fs::File>> {
    let dir = Path::new(&output.Path);
    if !dir.is_dir() {
        fs::create_dir_all(dir)?;
    }
    let mut writer = csv::Writer::from_path(dir.join(file_name))?;
    writer.write_record(headers)?;
    Ok(writer)
}
