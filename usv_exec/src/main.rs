//! Main USV-side executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Telecommand processing and handling (platform state changes,
//!           velocity setpoints, simulated navigation inputs)
//!         - Thrust control processing
//!         - Demand publication
//!
//! Telecommands are read from a script file given as the single CLI
//! argument, which stands in for the transport layer during bench testing.
//!
//! # Modules
//!
//! All modules (e.g. `thrust_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use usv_lib::{
    data_store::DataStore,
    dems_sink::{DemsSink, LogSink},
    tc_processor,
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use comms_if::eqpt::usv::ThrustDemsResponse;
use log::{debug, info, warn};
use std::env;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    script_interpreter::{PendingTcs, ScriptInterpreter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one cycle.
const CYCLE_PERIOD_S: f64 = 0.01;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("usv_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Naiad USV Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- INITIALISE TC SOURCE ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    // A single argument giving the script path is required
    if args.len() != 2 {
        return Err(eyre!(
            "Expected exactly one argument (the script path), found {}",
            args.len() - 1
        ));
    }

    info!("Loading script from \"{}\"", &args[1]);

    // Load the script interpreter
    let mut script_interpreter =
        ScriptInterpreter::new(&args[1]).wrap_err("Failed to load script")?;

    // Display some info
    info!(
        "Loaded script lasts {:.02} s and contains {} TCs\n",
        script_interpreter.get_duration(),
        script_interpreter.get_num_tcs()
    );

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    // ---- INITIALISE MODULES ----

    ds.thrust_ctrl
        .init("thrust_ctrl.toml", &session)
        .wrap_err("Failed to initialise ThrustCtrl")?;
    info!("ThrustCtrl init complete");

    info!("Module initialisation complete\n");

    // ---- INITIALISE DEMAND SINK ----

    let mut dems_sink = LogSink::default();

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    // Start instant of the previous cycle, used to measure the true cycle
    // period. None on the first cycle since there is no previous cycle to
    // measure against.
    let mut prev_cycle_start: Option<Instant> = None;

    loop {
        // Get cycle start time and the measured time since the last cycle,
        // nominal on the first cycle
        let cycle_start_instant = Instant::now();
        let dt_s = match prev_cycle_start {
            Some(t) => (cycle_start_instant - t).as_secs_f64(),
            None => CYCLE_PERIOD_S,
        };
        prev_cycle_start = Some(cycle_start_instant);

        // ---- TELECOMMAND PROCESSING ----

        match script_interpreter.get_pending_tcs() {
            PendingTcs::None => (),
            PendingTcs::Some(tc_vec) => {
                for tc in tc_vec.iter() {
                    tc_processor::exec(&mut ds, tc);
                }
            }
            // Exit if end of script reached
            PendingTcs::EndOfScript => {
                info!("End of TC script reached, stopping");
                break;
            }
        }

        // ---- CONTROL ALGORITHM PROCESSING ----

        // ThrustCtrl processing. A demand (live or neutral) is produced on
        // every cycle.
        let thrust_ctrl_input = ds.thrust_ctrl_input(dt_s);
        match ds.thrust_ctrl.proc(&thrust_ctrl_input) {
            Ok((o, r)) => {
                ds.thrust_ctrl_output = o;
                ds.thrust_ctrl_status_rpt = r;
            }
            Err(e) => {
                // ThrustCtrl errors usually just mean you sent the wrong TC,
                // so just issue the warning and continue.
                warn!("Error during ThrustCtrl processing: {}", e)
            }
        };

        // ---- DEMAND PUBLICATION ----

        match dems_sink.publish(&ds.thrust_ctrl_output) {
            ThrustDemsResponse::DemsOk => (),
            r => warn!("Non-nominal response from the demand sink: {:?}", r),
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(CYCLE_PERIOD_S).checked_sub(cycle_dur) {
            Some(d) => thread::sleep(d),
            None => {
                warn!("Cycle overran by {:.06} s", cycle_dur.as_secs_f64() - CYCLE_PERIOD_S);
            }
        }

        // Increment cycle counter
        ds.num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    info!("End of execution");

    Ok(())
}
