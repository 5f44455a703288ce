//! Billiard Sim entry point
//!
//! Racks a table, breaks, and runs the shot to rest at the fixed timestep.
//!
//! Usage: `billiard-sim [pool|snooker|settings.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library only on wasm; the host page drives the table directly
}

/// Ten simulated minutes
#[cfg(not(target_arch = "wasm32"))]
const MAX_TICKS: usize = 120 * 60 * 10;

#[cfg(not(target_arch = "wasm32"))]
fn run() -> Result<(), Box<dyn std::error::Error>> {
    use billiard_sim::consts::SIM_DT;
    use billiard_sim::sim::{Outcome, Table, rack};
    use billiard_sim::{TablePreset, TableSettings};

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(arg) if arg.ends_with(".json") => TableSettings::load(&arg)?,
        Some(arg) => {
            let preset = TablePreset::from_str(&arg).ok_or_else(|| format!("unknown preset: {arg}"))?;
            TableSettings::from_preset(preset)
        }
        None => TableSettings::default(),
    };
    let seed = match args.next() {
        Some(s) => s.parse::<u64>()?,
        None => 0,
    };

    log::info!("Billiard Sim starting ({} table, seed {seed})", settings.preset.as_str());

    let balls = match settings.preset {
        TablePreset::Pool => rack::diamond(&settings, seed),
        TablePreset::Snooker => rack::triangle(&settings, seed),
    };
    let mut table = Table::from_settings(balls, &settings);

    table.cue.adjust_power(settings.max_power);
    table.cue.adjust_spin(0.0, -0.2);
    table.hit();

    let mut ticks = 0;
    while !table.all_stationary() && ticks < MAX_TICKS {
        table.advance(SIM_DT)?;
        ticks += 1;
    }
    if table.all_stationary() {
        log::info!("Table at rest after {:.2}s", ticks as f32 * SIM_DT);
    } else {
        log::warn!("Still moving after {MAX_TICKS} ticks");
    }

    let outcomes = table.outcomes();
    log::info!(
        "{} outcomes, {} cushions, potted {:?}",
        outcomes.len(),
        Outcome::cushion_count(outcomes),
        Outcome::pots(outcomes)
    );

    println!("{}", serde_json::to_string_pretty(outcomes)?);
    println!("{}", serde_json::to_string(&table.short_serialise())?);
    Ok(())
}
