use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

pub const ADDRESS: u8 = 0x44;

const REG_DEVICE_ID: usize = 0x00;
const REG_STATUS: usize = 0x08;
const REGISTER_COUNT: usize = 0x0F;
const DEVICE_ID: u8 = 0x7D;
const RESET_COMMAND: u8 = 0x46;

/// Register-level stand-in for an ISL29125.  Reading STATUS clears the interrupt flag, writing
/// the reset command to the ID register restores power-on contents, and every transaction is
/// counted whether it succeeds or not.
pub struct SimulatedIsl29125 {
    registers: [u8; REGISTER_COUNT],
    pointer: usize,
    pub transactions: usize,
    pub fail: bool,
}

impl SimulatedIsl29125 {
    pub fn new() -> Self {
        let mut registers = [0; REGISTER_COUNT];
        registers[REG_DEVICE_ID] = DEVICE_ID;
        Self {
            registers,
            pointer: 0,
            transactions: 0,
            fail: false,
        }
    }

    pub fn register(&self, register: u8) -> u8 {
        self.registers[usize::from(register)]
    }

    pub fn set_register(&mut self, register: u8, value: u8) {
        self.registers[usize::from(register)] = value;
    }

    pub fn raise_interrupt(&mut self) {
        self.registers[REG_STATUS] |= 0b0000_0001;
    }

    pub fn complete_conversion(&mut self, green: u16, red: u16, blue: u16) {
        for (register, value) in [(0x09, green), (0x0B, red), (0x0D, blue)] {
            let [low, high] = value.to_le_bytes();
            self.registers[register] = low;
            self.registers[register + 1] = high;
        }
        self.registers[REG_STATUS] |= 0b0000_0010;
    }

    fn store(&mut self, value: u8) {
        match self.pointer {
            REG_DEVICE_ID if value == RESET_COMMAND => {
                self.registers = [0; REGISTER_COUNT];
                self.registers[REG_DEVICE_ID] = DEVICE_ID;
            }
            REG_DEVICE_ID => {}
            register if register < REGISTER_COUNT => self.registers[register] = value,
            _ => {}
        }
        self.pointer += 1;
    }

    fn load(&mut self) -> u8 {
        let value = self.registers.get(self.pointer).copied().unwrap_or(0);
        if self.pointer == REG_STATUS {
            self.registers[REG_STATUS] &= !0b0000_0001;
        }
        self.pointer += 1;
        value
    }
}

impl ErrorType for SimulatedIsl29125 {
    type Error = ErrorKind;
}

impl I2c for SimulatedIsl29125 {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.transactions += 1;
        if self.fail || address != ADDRESS {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    if let Some((register, values)) = bytes.split_first() {
                        self.pointer = usize::from(*register);
                        for value in values {
                            self.store(*value);
                        }
                    }
                }
                Operation::Read(buffer) => {
                    for byte in buffer.iter_mut() {
                        *byte = self.load();
                    }
                }
            }
        }
        Ok(())
    }
}
