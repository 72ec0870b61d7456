//! simple — smallest scenario for the rust_cosim framework.
//!
//! A setpoint writer (three cron processes) and a replayed setpoint profile
//! feed the inputs of an integrator model wrapped as entity `C`.  A sensor
//! samples inputs and outputs every minute; a reader logs the whole store.
//!
//! ```text
//! cargo run -p simple -- demos/simple/sim.toml
//! RUST_LOG=debug cargo run -p simple
//! ```

mod model;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cs_core::{RunConfig, SimRng, StartAt, Tick, Value, ValueMap};
use cs_entity::{
    Entity, EntityEnv, FmuEntity, GenericProcess, Input, Measurement, Process, ProcessResult,
    StateObserver, cron,
};
use cs_output::{CsvWriter, MemoryWriter, ObservationRecorder, OutputWriter};
use cs_schedule::{CronSchedule, Interval};
use cs_sim::{SimBuilder, SimulationRunner};

use model::Integrator;

// ── Constants ─────────────────────────────────────────────────────────────────

const FMU:              &str = "C";
const INPUTS:           &str = "C:inputs";
const ENGINE_STEP:      i64  = 15;
const SYNC_STEP:        i64  = 60;
const PROFILE_POINTS:   i64  = 12;
const PROFILE_INTERVAL: i64  = 600;

// ── Setpoint writer ───────────────────────────────────────────────────────────

/// Three cron processes writing `C:inputs`: an integer setpoint every two
/// minutes, a toggled boolean every three, and a gain every five.
struct SetpointWriter {
    seed: u64,
}

impl Entity for SetpointWriter {
    fn name(&self) -> &str {
        "writer"
    }

    fn initialize(self: Box<Self>, _env: &EntityEnv) -> ProcessResult<Vec<Box<dyn Process>>> {
        let mut rng = SimRng::for_entity(self.seed, "writer");
        let int_sp = cron("*/2 * * * *".parse::<CronSchedule>()?, move |ctx| {
            let v: i64 = rng.gen_range(0..100);
            ctx.store_mut().set(Some(INPUTS), [("int_setpoint", v)])?;
            Ok(())
        });

        let bool_sp = cron("*/3 * * * *".parse::<CronSchedule>()?, |ctx| {
            let current = ctx.store().get_in(Some(INPUTS), "bool_setpoint").and_then(Value::as_bool);
            ctx.store_mut().set(Some(INPUTS), [("bool_setpoint", !current.unwrap_or(false))])?;
            Ok(())
        });

        let mut gain_rng = SimRng::for_entity(self.seed, "writer:gain");
        let gain = cron("*/5 * * * *".parse::<CronSchedule>()?, move |ctx| {
            let g: f64 = gain_rng.gen_range(0.5..2.0);
            ctx.store_mut().set(Some(INPUTS), [("gain", g)])?;
            Ok(())
        });

        Ok(vec![Box::new(int_sp), Box::new(bool_sp), Box::new(gain)])
    }
}

// ── Scenario ──────────────────────────────────────────────────────────────────

fn setpoint_profile(seed: u64, start: Tick) -> Input {
    let mut rng = SimRng::for_entity(seed, "profile");
    let points: Vec<(Tick, f64)> = (0..PROFILE_POINTS)
        .map(|i| (start + i * PROFILE_INTERVAL, rng.gen_range(0.0..10.0)))
        .collect();
    Input::series("profile", "real_setpoint", points).namespace(INPUTS)
}

fn sensor() -> Result<StateObserver<Interval>> {
    let measurements = [
        Measurement::new("C:inputs:int_setpoint").store_as("int_setpoint_input"),
        Measurement::new("C:inputs:real_setpoint").store_as("real_setpoint_input"),
        Measurement::new("C:inputs:bool_setpoint").store_as("bool_setpoint_input"),
        Measurement::from("C:outputs:int_output"),
        Measurement::from("C:outputs:real_output"),
        Measurement::from("C:outputs:bool_output"),
    ];
    Ok(StateObserver::new("sensor", Interval::minutes(1)?, measurements))
}

fn build(config: &RunConfig) -> Result<SimulationRunner> {
    let start = config.start_tick()?;
    let start_values = ValueMap::from([("y_start".to_owned(), Value::Float(0.0))]);

    let reader = GenericProcess::every("reader", Interval::minutes(1)?, |ctx| {
        info!(time = %ctx.datetime()?, state = ?ctx.store().flatten(None), "store");
        Ok(())
    });

    let sim = SimBuilder::from_config(config)?
        .entity(SetpointWriter { seed: config.seed })
        .entity(setpoint_profile(config.seed, start))
        .entity(FmuEntity::new(FMU, Integrator::new(), ENGINE_STEP, SYNC_STEP).start_values(start_values))
        .entity(sensor()?)
        .entity(reader)
        .build()?;
    Ok(sim)
}

fn run<W: OutputWriter>(sim: &mut SimulationRunner, writer: W, config: &RunConfig) -> Result<ObservationRecorder<W>> {
    let mut recorder = ObservationRecorder::new(writer, *sim.calendar());
    sim.run_for(config.duration_secs, &mut recorder)?;
    if let Some(e) = recorder.take_error() {
        eprintln!("output error: {e}");
    }
    Ok(recorder)
}

// ── Config ────────────────────────────────────────────────────────────────────

fn load_config() -> Result<RunConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            let config: RunConfig = toml::from_str(&text).with_context(|| format!("parsing {path}"))?;
            Ok(config)
        }
        None => Ok(RunConfig {
            start:         StartAt::Text("2021-01-01T00:00:00Z".into()),
            duration_secs: 7_200,
            ..RunConfig::default()
        }),
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let config = load_config()?;
    config.validate()?;
    println!("=== simple — rust_cosim co-simulation ===");
    println!(
        "Start: {}  |  Timezone: {}  |  Duration: {} s  |  Seed: {}",
        config.start_datetime()?,
        config.timezone,
        config.duration_secs,
        config.seed
    );
    println!();

    let mut sim = build(&config)?;
    println!("Entities: {}", sim.entity_names().join(", "));

    let t0 = Instant::now();
    match &config.output_dir {
        Some(dir) => {
            let recorder = run(&mut sim, CsvWriter::new(Path::new(dir))?, &config)?;
            println!("Wrote {} observations to {}", recorder.written(), dir.display());
        }
        None => {
            let recorder = run(&mut sim, MemoryWriter::new(), &config)?;
            let memory = recorder.into_writer();
            println!("Recorded {} observations", memory.len());
            for name in ["real_setpoint_input", "C:outputs:real_output"] {
                if let Some(v) = memory.last_value_at(name, sim.now()) {
                    println!("  {name:<24} {v}");
                }
            }
        }
    }
    println!("Simulation complete in {:.3} s, clock at {}", t0.elapsed().as_secs_f64(), sim.datetime()?);

    Ok(())
}
