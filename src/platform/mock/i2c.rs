//! Mock I2C bus with a simulated HMC5883L behind it
//!
//! Configuration writes land in a register file that readback returns,
//! data-block reads pop a scripted queue of samples, and failures can be
//! injected per transaction. Clones share the same simulated device, so a
//! test can keep one handle while the driver owns another.

use crate::devices::magnetometer::hmc5883l::registers;
use core::cell::RefCell;
use embedded_hal_async::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use mag_node_core::magnetometer::RawReading;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

/// I2C transaction type for logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I2cTransaction {
    /// Write transaction
    Write { addr: u8, data: Vec<u8> },
    /// Read transaction
    Read { addr: u8, len: usize },
    /// Write-Read transaction
    WriteRead {
        addr: u8,
        write_data: Vec<u8>,
        read_len: usize,
    },
}

#[derive(Debug)]
struct DeviceState {
    address: u8,
    config: [u8; 3],
    samples: VecDeque<RawReading>,
    default_sample: RawReading,
    readback_xor: u8,
    fail_all: bool,
    fail_next: u32,
    fail_after: Option<u32>,
    transactions: Vec<I2cTransaction>,
}

/// Mock I2C implementation
#[derive(Debug, Clone)]
pub struct MockI2c {
    state: Rc<RefCell<DeviceState>>,
}

impl MockI2c {
    /// Simulated device at the default HMC5883L address
    pub fn new() -> Self {
        Self::with_address(registers::HMC5883L_ADDR)
    }

    /// Simulated device answering at `address`
    pub fn with_address(address: u8) -> Self {
        Self {
            state: Rc::new(RefCell::new(DeviceState {
                address,
                config: [0; 3],
                samples: VecDeque::new(),
                default_sample: RawReading::default(),
                readback_xor: 0,
                fail_all: false,
                fail_next: 0,
                fail_after: None,
                transactions: Vec::new(),
            })),
        }
    }

    /// Queue a sample for the next data-block read
    pub fn push_sample(&self, sample: RawReading) {
        self.state.borrow_mut().samples.push_back(sample);
    }

    /// Queue several samples in order
    pub fn push_samples(&self, samples: &[RawReading]) {
        self.state.borrow_mut().samples.extend(samples.iter().copied());
    }

    /// Sample returned once the queue is empty
    pub fn set_default_sample(&self, sample: RawReading) {
        self.state.borrow_mut().default_sample = sample;
    }

    /// Number of queued samples not read yet
    pub fn pending_samples(&self) -> usize {
        self.state.borrow().samples.len()
    }

    /// Fail every transaction until cleared
    pub fn set_fail_all(&self, fail: bool) {
        self.state.borrow_mut().fail_all = fail;
    }

    /// Fail the next `count` transactions
    pub fn fail_next(&self, count: u32) {
        self.state.borrow_mut().fail_next = count;
    }

    /// Let `successes` transactions through, then fail exactly one
    pub fn fail_after(&self, successes: u32) {
        self.state.borrow_mut().fail_after = Some(successes);
    }

    /// XOR mask applied to the first byte of every configuration readback
    pub fn corrupt_readback(&self, xor_mask: u8) {
        self.state.borrow_mut().readback_xor = xor_mask;
    }

    /// Current CRA, CRB, MODE register contents
    pub fn config_registers(&self) -> [u8; 3] {
        self.state.borrow().config
    }

    /// Get transaction log (for test verification)
    pub fn transactions(&self) -> Vec<I2cTransaction> {
        self.state.borrow().transactions.clone()
    }

    /// Clear transaction log
    pub fn clear_transactions(&self) {
        self.state.borrow_mut().transactions.clear();
    }

    /// Number of data-block reads seen so far
    pub fn data_reads(&self) -> usize {
        self.state
            .borrow()
            .transactions
            .iter()
            .filter(|t| {
                matches!(t, I2cTransaction::WriteRead { write_data, .. }
                    if write_data.first() == Some(&registers::DATA_OUT_X_MSB))
            })
            .count()
    }
}

impl Default for MockI2c {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceState {
    fn record(&mut self, address: u8, operations: &[Operation<'_>]) {
        let transaction = match operations {
            [Operation::Write(data)] => I2cTransaction::Write {
                addr: address,
                data: data.to_vec(),
            },
            [Operation::Write(data), Operation::Read(buf)] => I2cTransaction::WriteRead {
                addr: address,
                write_data: data.to_vec(),
                read_len: buf.len(),
            },
            [Operation::Read(buf)] => I2cTransaction::Read {
                addr: address,
                len: buf.len(),
            },
            _ => return,
        };
        self.transactions.push(transaction);
    }

    fn write_registers(&mut self, data: &[u8]) {
        if let Some((&start, values)) = data.split_first() {
            for (offset, value) in values.iter().enumerate() {
                if let Some(slot) = self.config.get_mut(start as usize + offset) {
                    *slot = *value;
                }
            }
        }
    }

    fn read_registers(&mut self, start: u8, buf: &mut [u8]) {
        if start == registers::DATA_OUT_X_MSB {
            let sample = self.samples.pop_front().unwrap_or(self.default_sample);
            let wire = sample.to_wire();
            let n = buf.len().min(wire.len());
            buf[..n].copy_from_slice(&wire[..n]);
            return;
        }

        for (offset, byte) in buf.iter_mut().enumerate() {
            *byte = self
                .config
                .get(start as usize + offset)
                .copied()
                .unwrap_or(0);
        }
        if start == registers::CONFIG_A {
            if let Some(first) = buf.first_mut() {
                *first ^= self.readback_xor;
            }
        }
    }
}

impl ErrorType for MockI2c {
    type Error = ErrorKind;
}

impl I2c for MockI2c {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        state.record(address, operations);

        if state.fail_all {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        if state.fail_next > 0 {
            state.fail_next -= 1;
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        let fail_after = state.fail_after;
        match fail_after {
            Some(0) => {
                state.fail_after = None;
                return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
            }
            Some(n) => state.fail_after = Some(n - 1),
            None => {}
        }
        if address != state.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        match operations {
            [Operation::Write(data)] => state.write_registers(data),
            [Operation::Write(pointer), Operation::Read(buf)] => {
                let start = pointer.first().copied().unwrap_or(0);
                state.read_registers(start, buf);
            }
            _ => return Err(ErrorKind::Other),
        }
        Ok(())
    }
}
