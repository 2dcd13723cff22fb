//! Embassy async tasks

pub mod eyes;

pub use eyes::{eyes_task, EyesDisplay, FirmwareEyes};
