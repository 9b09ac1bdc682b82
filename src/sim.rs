//! In-memory stand-in for an 8-Angle or 8-Encoder unit.
//!
//! Implements the async I2C trait over a 256-byte register file with the
//! same auto-increment, read-clear, reset-flag and address-change behaviour
//! as the real firmware. Clones share state, so a test can hand one clone
//! to a driver and keep another to inspect the traffic.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embassy_time::Instant;
use embedded_hal_async::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

use crate::registers::{ADDRESS, CHANNEL_COUNT, ENCODER_COUNT, ENCODER_INCREMENT, ENCODER_RESET};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Model {
    Angle,
    Encoder,
}

/// One bus operation as seen by the unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Write { address: u8, bytes: Vec<u8> },
    Read { address: u8, len: usize },
}

#[derive(Debug, Clone, Copy)]
enum Fault {
    /// Fail the next transaction outright.
    Transaction(ErrorKind),
    /// Fail the next read operation.
    Read(ErrorKind),
}

struct State {
    model: Model,
    address: u8,
    regs: [u8; 256],
    pointer: u8,
    faults: VecDeque<Fault>,
    log: Vec<(Access, Instant)>,
}

#[derive(Clone)]
pub struct SimUnit {
    state: Rc<RefCell<State>>,
}

impl SimUnit {
    fn with_model(model: Model, address: u8) -> Self {
        let mut regs = [0u8; 256];
        regs[ADDRESS as usize] = address;
        Self {
            state: Rc::new(RefCell::new(State {
                model,
                address,
                regs,
                pointer: 0,
                faults: VecDeque::new(),
                log: Vec::new(),
            })),
        }
    }

    pub fn angle(address: u8) -> Self {
        Self::with_model(Model::Angle, address)
    }

    pub fn encoder(address: u8) -> Self {
        Self::with_model(Model::Encoder, address)
    }

    pub fn set_bytes(&self, register: u8, bytes: &[u8]) {
        let mut state = self.state.borrow_mut();
        for (i, b) in bytes.iter().enumerate() {
            state.regs[register.wrapping_add(i as u8) as usize] = *b;
        }
    }

    pub fn bytes(&self, register: u8, len: usize) -> Vec<u8> {
        let state = self.state.borrow();
        (0..len)
            .map(|i| state.regs[register.wrapping_add(i as u8) as usize])
            .collect()
    }

    pub fn set_i32(&self, register: u8, value: i32) {
        self.set_bytes(register, &value.to_le_bytes());
    }

    /// Fail the next transaction with `kind`.
    pub fn fail_next(&self, kind: ErrorKind) {
        self.state.borrow_mut().faults.push_back(Fault::Transaction(kind));
    }

    /// Accept the next register select but refuse the data read.
    pub fn fail_read(&self, kind: ErrorKind) {
        self.state.borrow_mut().faults.push_back(Fault::Read(kind));
    }

    pub fn log(&self) -> Vec<Access> {
        self.state.borrow().log.iter().map(|(a, _)| a.clone()).collect()
    }

    /// Timestamps of every access, in log order.
    pub fn access_times(&self) -> Vec<Instant> {
        self.state.borrow().log.iter().map(|(_, at)| *at).collect()
    }

    /// Timestamps of every non-empty write.
    pub fn write_times(&self) -> Vec<Instant> {
        self.state
            .borrow()
            .log
            .iter()
            .filter_map(|(a, at)| match a {
                Access::Write { bytes, .. } if !bytes.is_empty() => Some(*at),
                _ => None,
            })
            .collect()
    }

    pub fn clear_log(&self) {
        self.state.borrow_mut().log.clear();
    }
}

impl State {
    fn take_fault(&mut self, read: bool) -> Option<ErrorKind> {
        match self.faults.front().copied() {
            Some(Fault::Transaction(kind)) => {
                self.faults.pop_front();
                Some(kind)
            }
            Some(Fault::Read(kind)) if read => {
                self.faults.pop_front();
                Some(kind)
            }
            _ => None,
        }
    }

    fn store(&mut self, register: u8, value: u8) {
        let reset_flags = ENCODER_RESET..ENCODER_RESET + CHANNEL_COUNT as u8;
        if self.model == Model::Encoder && reset_flags.contains(&register) {
            if value != 0 {
                let base = (ENCODER_COUNT + 4 * (register - ENCODER_RESET)) as usize;
                self.regs[base..base + 4].fill(0);
            }
            return;
        }
        self.regs[register as usize] = value;
    }

    fn load(&mut self, register: u8) -> u8 {
        let value = self.regs[register as usize];
        let increments = ENCODER_INCREMENT..ENCODER_RESET;
        if self.model == Model::Encoder && increments.contains(&register) {
            self.regs[register as usize] = 0;
        }
        value
    }
}

impl ErrorType for SimUnit {
    type Error = ErrorKind;
}

impl I2c for SimUnit {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        let now = Instant::now();

        for op in operations.iter_mut() {
            let access = match op {
                Operation::Write(bytes) => Access::Write { address, bytes: bytes.to_vec() },
                Operation::Read(buf) => Access::Read { address, len: buf.len() },
            };
            state.log.push((access, now));

            if address != state.address {
                return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
            }
            let is_read = matches!(op, Operation::Read(_));
            if let Some(kind) = state.take_fault(is_read) {
                return Err(kind);
            }

            match op {
                Operation::Write(bytes) => {
                    let Some((&register, payload)) = bytes.split_first() else {
                        continue;
                    };
                    state.pointer = register;
                    for (i, &b) in payload.iter().enumerate() {
                        state.store(register.wrapping_add(i as u8), b);
                    }
                    if !payload.is_empty() && register == ADDRESS {
                        state.address = state.regs[ADDRESS as usize];
                    }
                }
                Operation::Read(buf) => {
                    let start = state.pointer;
                    for (i, slot) in buf.iter_mut().enumerate() {
                        *slot = state.load(start.wrapping_add(i as u8));
                    }
                }
            }
        }
        Ok(())
    }
}
