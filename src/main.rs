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
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use miasim::air::barrier::Void;
use miasim::model::{Model, ModelSpec};
use miasim::sim_utils::config::{read_json, Config};
use miasim::world::action::{Action, Script};
use miasim::world::agent::Agent;
use miasim::world::environment::Environment;
use miasim::world::facing::Facing;
use miasim::world::surface::Surface;
use miasim::SimResult;

/// Indoor airborne/fomite transmission simulator
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Model description file
    #[arg(long, default_value = "model.json")]
    model: PathBuf,

    /// Simulation constants and output settings
    #[arg(long, default_value = "assets/default_config.json")]
    config: PathBuf,

    /// Seed for the coughing rolls; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Write a small ready-to-run model file before running it
    #[arg(long)]
    demo: bool,
}

/// A cafe scene: one infected waiter, two guests, a menu and a fork to
/// pass around, a table and a chair that collect droplets.
fn create_demo_model() -> SimResult<Model> {
    let walls = vec![Void::new(4, 0), Void::new(4, 1)];
    let env = Environment::new(25, 25, 1.51, 0.3, 0.262, 0.2, 18.18, vec![], walls);

    let mut waiter_script = Script::new();
    waiter_script.insert(1, Action::Enter { x: 0, y: 0, facing: Facing::North });
    waiter_script.insert(2, Action::Move { x: 2, y: 2, facing: None });
    waiter_script.insert(4, Action::Pickup { target: "Menu".into() });
    waiter_script.insert(5, Action::Putdown { target: "Menu".into() });
    waiter_script.insert(6, Action::Move { x: -1, y: -1, facing: None });
    waiter_script.insert(7, Action::Handwash);
    waiter_script.insert(9, Action::Move { x: 0, y: 1, facing: None });
    waiter_script.insert(11, Action::DoffMask);
    waiter_script.insert(13, Action::Move { x: 1, y: 1, facing: None });
    let waiter = Agent::new("Mara", 1.0, 0.0, 0.0, 1.0, 0.53, 0.47, 2.3, 2.3,
                            waiter_script, false, true);

    let mut guest_script = Script::new();
    guest_script.insert(0, Action::Enter { x: 0, y: 0, facing: Facing::North });
    guest_script.insert(1, Action::Move { x: 1, y: 1, facing: None });
    guest_script.insert(20, Action::Leave);
    let guest = Agent::new("Onno", 0.0, 0.0, 0.0, 0.0, 0.53, 0.47, 30.0, 30.0,
                           guest_script, false, false);

    let mut late_guest_script = Script::new();
    late_guest_script.insert(1, Action::Enter { x: 0, y: 0, facing: Facing::North });
    late_guest_script.insert(2, Action::Move { x: 0, y: 1, facing: None });
    late_guest_script.insert(3, Action::Move { x: 0, y: 1, facing: None });
    late_guest_script.insert(4, Action::Move { x: 1, y: 0, facing: None });
    late_guest_script.insert(30, Action::Leave);
    let late_guest = Agent::new("Vera", 0.0, 0.0, 0.0, 0.0, 0.53, 0.47, 30.0, 30.0,
                                late_guest_script, false, false);

    let surfaces = vec![
        Surface::item("Menu", 2, 2, 0.7, 0.2, 0.274),
        Surface::item("Fork", 1, 2, 0.3, 0.05, 0.2),
        Surface::fixture("Table", 1, 1, 0.5, 0.8, 15.0, 0.969),
        Surface::fixture("Chair", 1, 2, 0.5, 0.4, 15.0, 0.969),
    ];

    Model::new(60, env, vec![waiter, guest, late_guest], surfaces, "cafe-demo")
}

fn run(args: &Args) -> SimResult<()> {
    if args.demo {
        let model = create_demo_model()?;
        fs::write(&args.model, serde_json::to_string_pretty(&model.to_spec())?)?;
        info!("demo model written to {}", args.model.display());
    }

    let config: Config = read_json(&args.config)?;
    let spec: ModelSpec = read_json(&args.model)?;
    let mut model = Model::from_spec(spec)?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!("running model '{}' for {} ticks", model.name, model.ticks);
    model.run_with(&config, &mut rng, None)?;

    println!("{}", serde_json::to_string(&model.air_exposure())?);
    println!("{}", serde_json::to_string(&model.droplet_exposure())?);
    println!("{}", serde_json::to_string(&model.surface_exposure())?);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("simulation aborted: {err}");
            ExitCode::from(99)
        }
    }
}
