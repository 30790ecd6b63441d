//! Discrete-time regulation building blocks for power converters and motor
//! drives.
//!
//! Every block works on `f32` samples, keeps its state inline and never
//! allocates, so the crate runs on `no_std` targets:
//!
//! * [`Fir`] filters and the [`LowPassFirstOrderFilter`] and [`NotchFilter`],
//! * the [`Pid`], [`Pr`] and [`Rst`] regulators behind the [`Controller`] trait,
//! * the [`Pll`] phase locked loops,
//! * the [`park_clarke`] reference frame transforms.
//!
//! Trigonometry goes through the [`Trigonometry`] trait, with a [`Libm`] and a
//! fixed point [`Cordic`] implementation.
//!
//! ```
//! use regul::{Controller, Pid, PidParams};
//!
//! let mut pid = Pid::new(PidParams {
//!     ts: 1e-4,
//!     kp: 0.5,
//!     ti: 2e-3,
//!     td: 0.0,
//!     n: 0.0,
//!     lower_bound: -1.0,
//!     upper_bound: 1.0,
//! })?;
//! let u = pid.calculate_with_return(0.3, 0.1);
//! assert!((-1.0..=1.0).contains(&u));
//! # Ok::<(), regul::ControlError>(())
//! ```

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]

pub mod controller;
pub mod error;
pub mod filters;
pub mod fir;
pub mod park_clarke;
pub mod pid;
pub mod pll;
pub mod pr;
pub mod rst;
pub mod trigo;

pub use controller::{AnyController, Bounds, Controller, ControllerParams, Ports};
pub use error::ControlError;
pub use filters::{LowPassFirstOrderFilter, NotchFilter};
pub use fir::{Fir, FIR_CAPACITY};
pub use park_clarke::{Clarke, Dqo, ThreePhase};
pub use pid::{Pid, PidParams};
pub use pll::{Pll, PllAngleParams, PllData, PllSinusParams, Strategy};
pub use pr::{Pr, PrParams};
pub use rst::{Rst, RstParams};
pub use trigo::{Cordic, Libm, Trigonometry};

/// √3
pub const SQRT_3: f32 = 1.732_050_8;
/// 1/√3
pub const FRAC_1_SQRT_3: f32 = 0.577_350_26;
/// √3/2
pub const SQRT_3_DIV_2: f32 = 0.866_025_4;
