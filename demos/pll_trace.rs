use std::{collections::BTreeMap, f32::consts::TAU, fs::File, io::BufWriter, sync::Arc};

use regul::{park_clarke, trigo, Controller, Pll, PllAngleParams, PllSinusParams, Pr, PrParams};
use serde::Serialize;

#[derive(Serialize)]
struct Values {
    time_ns: u64,
    grid_angle_rad: f32,
    grid_voltage: [f32; 3],
    grid_frequency_hz: f32,
    alpha: f32,
    beta: f32,
    sinus_w: f32,
    sinus_angle: f32,
    angle_w: f32,
    angle_angle: f32,
    d: f32,
    q: f32,
    current_reference: f32,
    current_command: f32,
}

fn main() -> Result<(), anyhow::Error> {
    let mut writer = mcap::Writer::new(BufWriter::new(File::create("out.mcap")?))?;
    let my_channel = mcap::Channel {
        topic: String::from("pll"),
        schema: Some(Arc::new(mcap::Schema {
            name: "".to_owned(),
            encoding: "".to_owned(),
            data: std::borrow::Cow::default(),
        })),
        message_encoding: "cbor".to_owned(),
        metadata: BTreeMap::default(),
    };
    let channel_id = writer.add_channel(&my_channel)?;

    let dt_ns: u64 = 100_000;
    let ts = dt_ns as f32 / 1e9;
    let f0 = 50.0;

    let mut sinus_pll: Pll = Pll::new_sinus(PllSinusParams {
        ts,
        amplitude: 1.0,
        f0,
        rise_time: 0.05,
    })?;
    let mut angle_pll: Pll = Pll::new_angle(PllAngleParams {
        ts,
        f0,
        rise_time: 0.02,
    })?;
    sinus_pll.reset_to(0.9 * f0);
    angle_pll.reset_to(0.9 * f0);

    // current loop on the alpha axis, tuned on the grid pulsation
    let mut current_controller = Pr::new(PrParams {
        ts,
        kp: 0.2,
        kr: 300.0,
        w0: TAU * f0,
        phi_prime: 0.0,
        lower_bound: -1.0,
        upper_bound: 1.0,
    })?;

    let mut time_ns = 0;
    let mut grid_angle_rad: f32 = 0.;
    let mut current: f32 = 0.;

    while time_ns <= 1_000_000_000 {
        // Grid with a 1Hz frequency step after 500ms
        let grid_frequency_hz = if time_ns < 500_000_000 { f0 } else { f0 + 1.0 };
        let grid_voltage = park_clarke::ThreePhase {
            a: trigo::sin(grid_angle_rad),
            b: trigo::sin(grid_angle_rad - TAU / 3.0),
            c: trigo::sin(grid_angle_rad - 2.0 * TAU / 3.0),
        };
        let orthogonal_voltage = park_clarke::clarke(grid_voltage);

        // Phase locked loops
        let sinus = sinus_pll.calculate_with_return(grid_voltage.a);
        let measured_angle =
            trigo::modulo_2pi(libm::atan2f(orthogonal_voltage.beta, orthogonal_voltage.alpha));
        let angle = angle_pll.calculate_with_return(measured_angle);
        let rotating_voltage = park_clarke::rotation_to_dqo(orthogonal_voltage, angle.angle);

        // Current in phase with the grid through a first order plant
        let current_reference = 0.5 * trigo::sin(angle.angle);
        let current_command = current_controller.calculate_with_return(current_reference, current);
        current += (current_command - current) * ts / 1e-3;

        // Write to file
        let mut buffer = Vec::with_capacity(256);
        ciborium::into_writer(
            &Values {
                time_ns,
                grid_angle_rad,
                grid_voltage: [grid_voltage.a, grid_voltage.b, grid_voltage.c],
                grid_frequency_hz,
                alpha: orthogonal_voltage.alpha,
                beta: orthogonal_voltage.beta,
                sinus_w: sinus.w,
                sinus_angle: sinus.angle,
                angle_w: angle.w,
                angle_angle: angle.angle,
                d: rotating_voltage.d,
                q: rotating_voltage.q,
                current_reference,
                current_command,
            },
            &mut buffer,
        )?;
        writer.write_to_known_channel(
            &mcap::records::MessageHeader {
                channel_id,
                sequence: 0,
                log_time: time_ns,
                publish_time: time_ns,
            },
            &buffer,
        )?;

        // Update state
        grid_angle_rad = trigo::modulo_2pi(grid_angle_rad + TAU * grid_frequency_hz * ts);
        time_ns += dt_ns;
    }

    writer.finish()?;

    Ok(())
}
