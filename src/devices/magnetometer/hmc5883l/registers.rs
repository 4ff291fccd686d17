//! HMC5883L Register Definitions
//!
//! The device auto-increments its register pointer, so the three
//! configuration registers are written and read back as one block and the
//! six data registers are read in a single transaction.

// =============================================================================
// I2C Address
// =============================================================================

/// HMC5883L 7-bit I2C address
pub const HMC5883L_ADDR: u8 = 0x1E;

// =============================================================================
// Register Map
// =============================================================================

/// Configuration register A (averaging, output rate, measurement bias)
pub const CONFIG_A: u8 = 0x00;

/// Configuration register B (gain)
pub const CONFIG_B: u8 = 0x01;

/// Mode register
pub const MODE: u8 = 0x02;

/// First data register; the block is X MSB/LSB, Z MSB/LSB, Y MSB/LSB
pub const DATA_OUT_X_MSB: u8 = 0x03;

/// Length of the data block in bytes
pub const DATA_LEN: usize = 6;

// =============================================================================
// Register Values
// =============================================================================

/// CRA: temperature compensation, 8-sample averaging, 15 Hz, positive bias
pub const CRA_SELF_TEST_POSITIVE: u8 = 0b1111_0001;

/// CRA: temperature compensation, 8-sample averaging, 15 Hz, negative bias
pub const CRA_SELF_TEST_NEGATIVE: u8 = 0b1111_0010;

/// CRB: gain 7 (highest range), used for self-test
pub const CRB_GAIN_7: u8 = 0b1110_0000;

/// CRA: temperature compensation, 8-sample averaging, 75 Hz, normal measurement
pub const CRA_NORMAL: u8 = 0b1111_1000;

/// CRB: default gain (1090 LSB/Ga)
pub const CRB_GAIN_DEFAULT: u8 = 0b0010_0000;

/// MODE: continuous-measurement mode
pub const MODE_CONTINUOUS: u8 = 0b0000_0000;
