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

/// A modifier an agent is currently under. Mask and coughing are
/// indefinite; handwashing runs out after a fixed number of ticks and
/// then restores the captured pre-wash surface load.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Effect {
    WearingMask,
    Coughing,
    Handwash {
        remaining_ticks: u32,
        restore_load: f64,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EffectKind {
    WearingMask,
    Coughing,
    Handwash,
}

impl Effect {
    pub fn kind(&self) -> EffectKind {
        match self {
            Effect::WearingMask => EffectKind::WearingMask,
            Effect::Coughing => EffectKind::Coughing,
            Effect::Handwash { .. } => EffectKind::Handwash,
        }
    }
}

/// Handwash duration in ticks, at least one.
pub fn handwash_ticks(duration: f64, time_step: f64) -> u32 {
    (duration / time_step).ceil().max(1.0) as u32
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_handwash_ticks_rounds_up() {
        assert_eq!(handwash_ticks(0.5, 0.00834), 60);
        assert_eq!(handwash_ticks(1.0, 0.5), 2);
        // shorter than a tick still lasts one tick
        assert_eq!(handwash_ticks(0.1, 1.0), 1);
    }
}
