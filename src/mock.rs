//! Simulated IS31FL3731 for tests

use alloc::vec::Vec;

use crate::interface::MatrixInterface;
use crate::register::{COMMAND_REGISTER, CONTROL_PAGE, FRAME_STATE, field};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MockError {
    Nack,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Transaction {
    Write(Vec<u8>),
    Read { register: u8, len: usize },
}

/// Register-level model of the chip
///
/// Tracks the selected page, applies auto-incrementing writes, and clears the
/// frame interrupt flag when the frame state register is read.
#[derive(Debug)]
pub(crate) struct MockChip {
    pub memory: [[u8; 256]; 12],
    pub page: u8,
    pub transactions: Vec<Transaction>,
    pub fail_writes: bool,
    pub delay_ms_total: u32,
}

impl MockChip {
    pub fn new() -> Self {
        Self {
            memory: [[0; 256]; 12],
            page: 0,
            transactions: Vec::new(),
            fail_writes: false,
            delay_ms_total: 0,
        }
    }

    pub fn control(&self, register: u8) -> u8 {
        self.memory[CONTROL_PAGE as usize][register as usize]
    }

    pub fn set_control(&mut self, register: u8, value: u8) {
        self.memory[CONTROL_PAGE as usize][register as usize] = value;
    }

    pub fn frame(&self, frame: u8) -> &[u8; 256] {
        &self.memory[frame as usize]
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.transactions
            .iter()
            .filter_map(|transaction| match transaction {
                Transaction::Write(bytes) => Some(bytes.clone()),
                Transaction::Read { .. } => None,
            })
            .collect()
    }

    pub fn page_selects(&self) -> usize {
        self.writes()
            .iter()
            .filter(|bytes| bytes.first() == Some(&COMMAND_REGISTER))
            .count()
    }

    pub fn clear_log(&mut self) {
        self.transactions.clear();
    }
}

impl MatrixInterface for MockChip {
    type Error = MockError;

    fn write(&mut self, _address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(MockError::Nack);
        }
        self.transactions.push(Transaction::Write(bytes.to_vec()));

        match bytes {
            [COMMAND_REGISTER, page] => self.page = *page,
            [register, data @ ..] => {
                let memory = &mut self.memory[self.page as usize];
                for (index, value) in data.iter().enumerate() {
                    memory[(*register as usize + index) & 0xFF] = *value;
                }
            }
            [] => {}
        }
        Ok(())
    }

    fn read(&mut self, _address: u8, register: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.transactions.push(Transaction::Read {
            register,
            len: buffer.len(),
        });

        let page = self.page as usize;
        for (index, value) in buffer.iter_mut().enumerate() {
            *value = self.memory[page][(register as usize + index) & 0xFF];
        }

        if self.page == CONTROL_PAGE && register == FRAME_STATE {
            let state = &mut self.memory[page][FRAME_STATE as usize];
            *state = field::FRAME_INTERRUPT.insert(*state, 0);
        }
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay_ms_total += ms;
    }
}
