//! Node subsystems

pub mod magnetometer;
