use super::registers::REG_DEVICE_ID;
use crate::{isl29125::Isl29125, WhoAmI};
use embedded_hal::i2c::I2c;

impl<I2C: I2c, TRIGGER> WhoAmI<I2C, u8> for Isl29125<I2C, TRIGGER> {
    const EXPECTED_WHOAMI: u8 = 0x7D;

    /// A single read of the device ID register.  Not retried.
    fn whoami(&mut self) -> Result<u8, I2C::Error> {
        let mut data: [u8; 1] = [0];
        self.i2c
            .write_read(self.address, &[REG_DEVICE_ID], &mut data)?;
        Ok(data[0])
    }
}
