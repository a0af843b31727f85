#![no_std]
#![doc = include_str!("../README.md")]

#[macro_use]
mod log;

use embedded_hal::i2c::I2c;

pub trait WhoAmI<I2C: I2c, T: core::cmp::Eq> {
    const EXPECTED_WHOAMI: T;

    fn whoami(&mut self) -> Result<T, I2C::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfRange;

pub trait Driver<I2C: I2c, TRIGGER, T> {
    fn address_check(address: u8) -> Result<(), OutOfRange> {
        if (0x08..=0x77).contains(&address) {
            Ok(())
        } else {
            Err(OutOfRange)
        }
    }

    fn new_inner(i2c: I2C, address: u8, trigger: TRIGGER) -> Self;

    /// The entry point for a [`Driver`].  Expects [`I2c`] (obtainable from target platform HAL),
    /// an I2C device address in the range `0x08..=0x77` and the trigger resources that fix how
    /// conversions are signalled for the lifetime of the handle.  This provides a handle that
    /// does not touch the hardware.  Initialization is deferred to [`Driver::init`].
    ///
    /// # Errors
    ///
    /// [`OutOfRange`]: address is ouside of the allowed range `0x08..=0x77`
    fn new(i2c: I2C, address: u8, trigger: TRIGGER) -> Result<Self, OutOfRange>
    where
        Self: Sized,
    {
        Self::address_check(address)?;
        Ok(Self::new_inner(i2c, address, trigger))
    }

    fn init_inner(self) -> Result<Self, T>
    where
        Self: Sized,
    {
        Ok(self)
    }

    /// Initializes the hardware.  This initialization is usually required prior to interacting
    /// with the device.
    ///
    /// # Errors
    ///
    /// [`T`]: a device dependent error type for any problems encountered during initialization.
    fn init(self) -> Result<Self, T>
    where
        Self: Sized,
    {
        self.init_inner()
    }
}

pub mod isl29125;
pub mod relay;
