//! # Thrust Control Benchmark
//!
//! Times one full live control cycle, which bounds the processing margin
//! available inside the cyclic executive.

use criterion::{criterion_group, criterion_main, Criterion};

use comms_if::mode::{AltitudeMode, ControlMode, ReferenceFrame, YawMode};
use comms_if::tc::VelCmd;
use usv_lib::plat_state::ArmingState;
use usv_lib::thrust_ctrl::{InputData, ThrustCtrl};
use util::module::State;

fn thrust_ctrl_benchmark(c: &mut Criterion) {
    let mut thrust_ctrl = ThrustCtrl::default();

    // A fully live input: armed offboard, supported mode, fresh setpoint in
    // the earth frame so the rotation is exercised too
    let input = InputData {
        arming: ArmingState::ArmedOffboard,
        control_mode: Some(ControlMode {
            frame: ReferenceFrame::EarthEnu,
            yaw_mode: YawMode::Rate,
            altitude_mode: AltitudeMode::None,
        }),
        vel_cmd: Some(VelCmd {
            linear_ms: [0.8, 0.3, 0.0],
            yaw_rads: 0.2,
            frame: ReferenceFrame::EarthEnu,
        }),
        cmd_age_s: 0.0,
        heading_rad: 0.7,
        heading_received: true,
        dt_s: 0.01,
    };

    c.bench_function("ThrustCtrl::proc", |b| {
        b.iter(|| thrust_ctrl.proc(&input).unwrap())
    });
}

criterion_group!(benches, thrust_ctrl_benchmark);
criterion_main!(benches);
