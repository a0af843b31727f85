//! # Rust Driver for the ISL29125 RGB Ambient Light Sensor
//!
//! The device is entirely register driven: three control bytes select which channels convert,
//! at what range and resolution, and how the interrupt line behaves.  The driver never retries
//! a failed transaction and never blocks waiting for a conversion.
//!
//! ## External Links
//!
//! - [Datasheet]
//!
//! [Datasheet]: https://www.renesas.com/us/en/products/sensor-products/light-sensors/isl29125-digital-red-green-and-blue-color-light-sensor-ir-blocking-filter

use crate::{Driver, WhoAmI};
use embedded_hal::digital::ErrorKind as PinErrorKind;
use embedded_hal::i2c::I2c;
use fixed::types::U32F32;

use registers::{
    REG_BLUE, REG_CONFIG1, REG_DEVICE_ID, REG_GREEN, REG_HIGH_THRESHOLD, REG_LOW_THRESHOLD,
    REG_RED, REG_STATUS, RESET_COMMAND, STATUS_ACTIVE_CHANNEL, STATUS_BROWNOUT,
    STATUS_CONVERSION_DONE, STATUS_IRQ, SYNC,
};

pub use config::{
    Configuration, ConversionInterrupt, IrCompensation, IrqColor, OperatingMode, Persistence,
    Range, Resolution,
};
pub use trigger::{Flag, InterruptTrigger, IrqHandler, NoTrigger, SyncTrigger, TriggerMode};

/// Fixed 7-bit bus address.
pub const DEFAULT_ADDRESS: u8 = 0x44;

pub struct Isl29125<I2C, TRIGGER = NoTrigger> {
    i2c: I2C,
    address: u8,
    trigger: TRIGGER,
    configuration: Configuration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The bus transaction failed (NAK, arbitration loss, timeout...).
    I2cError(E),
    /// A setting or buffer was rejected before any bus transaction.
    ArgumentError,
    /// The device did not identify itself as an ISL29125.
    UnexpectedDevice,
    /// [`Isl29125::run`] was called on a handle that was not constructed with a
    /// [`SyncTrigger`].
    NotSyncMode,
    /// The interrupt or sync line could not be accessed.
    PinError(PinErrorKind),
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::I2cError(error)
    }
}

/// Channel selection for [`Isl29125::read_channels`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channels {
    Green,
    Red,
    Blue,
    /// Green, Red and Blue in one burst, in that (register) order.
    All,
}

impl Channels {
    const fn register(self) -> u8 {
        match self {
            Self::Green | Self::All => REG_GREEN,
            Self::Red => REG_RED,
            Self::Blue => REG_BLUE,
        }
    }

    #[must_use]
    pub const fn count(self) -> usize {
        match self {
            Self::All => 3,
            _ => 1,
        }
    }
}

/// The channel the ADC is converting, or has just converted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveChannel {
    Inactive,
    Green,
    Red,
    Blue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    pub active_channel: ActiveChannel,
    /// The supply dipped or the device restarted since the flag was last cleared.  Earlier
    /// configuration may have been lost.
    pub brownout: bool,
    pub conversion_done: bool,
    pub interrupt: bool,
}

impl From<u8> for Status {
    fn from(register: u8) -> Self {
        Self {
            active_channel: match STATUS_ACTIVE_CHANNEL.get(register) {
                1 => ActiveChannel::Green,
                2 => ActiveChannel::Red,
                3 => ActiveChannel::Blue,
                _ => ActiveChannel::Inactive,
            },
            brownout: STATUS_BROWNOUT.is_set(register),
            conversion_done: STATUS_CONVERSION_DONE.is_set(register),
            interrupt: STATUS_IRQ.is_set(register),
        }
    }
}

/// One reading of all three channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    pub green: u16,
    pub red: u16,
    pub blue: u16,
}

/// Access to the interrupt threshold registers.  Writes carry the new value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Threshold {
    ReadLow,
    ReadHigh,
    WriteLow(u16),
    WriteHigh(u16),
}

impl<I2C: I2c, TRIGGER: TriggerMode> Driver<I2C, TRIGGER, Error<I2C::Error>>
    for Isl29125<I2C, TRIGGER>
{
    fn new_inner(i2c: I2C, address: u8, trigger: TRIGGER) -> Self {
        Self {
            i2c,
            address,
            trigger,
            configuration: Configuration::UNKNOWN,
        }
    }

    fn init_inner(mut self) -> Result<Self, Error<I2C::Error>> {
        if self.whoami()? != <Self as WhoAmI<I2C, u8>>::EXPECTED_WHOAMI {
            return Err(Error::UnexpectedDevice);
        }
        self.trigger.prepare::<I2C::Error>()?;
        self.reset()?;
        debug!("isl29125 initialised at {=u8:#x}", self.address);
        Ok(self)
    }
}

impl<I2C: I2c, TRIGGER> Isl29125<I2C, TRIGGER> {
    fn read_register(&mut self, register: u8) -> Result<u8, Error<I2C::Error>> {
        let mut data: [u8; 1] = [0];
        self.i2c.write_read(self.address, &[register], &mut data)?;
        trace!("read {=u8:#x} = {=u8:#b}", register, data[0]);
        Ok(data[0])
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Error<I2C::Error>> {
        trace!("write {=u8:#x} = {=u8:#b}", register, value);
        self.i2c.write(self.address, &[register, value])?;
        Ok(())
    }

    /// Read-modify-write of a single register.
    fn modify(
        &mut self,
        register: u8,
        f: impl FnOnce(u8) -> u8,
    ) -> Result<(), Error<I2C::Error>> {
        let current = self.read_register(register)?;
        self.write_register(register, f(current))
    }

    fn read_u16(&mut self, register: u8) -> Result<u16, Error<I2C::Error>> {
        let mut data: [u8; 2] = [0; 2];
        self.i2c.write_read(self.address, &[register], &mut data)?;
        Ok(u16::from_le_bytes(data))
    }

    fn write_u16(&mut self, register: u8, value: u16) -> Result<(), Error<I2C::Error>> {
        let bytes: [u8; 2] = u16::to_le_bytes(value);
        self.i2c
            .write(self.address, &[register, bytes[0], bytes[1]])?;
        Ok(())
    }

    /// Reads and decodes the status register.
    ///
    /// Reading the register clears the interrupt flag on the device, so a second call only
    /// reports `interrupt` again if a new interrupt condition arose in between.  Anything that
    /// depends on the interrupt flag must use the value returned by the first read.
    ///
    /// A reported brownout discards the configuration mirror.  The device is not
    /// reconfigured.
    ///
    /// # Errors
    pub fn status(&mut self) -> Result<Status, Error<I2C::Error>> {
        let status = Status::from(self.read_register(REG_STATUS)?);
        if status.brownout {
            warn!("isl29125 reported a brownout");
            self.configuration = Configuration::UNKNOWN;
        }
        Ok(status)
    }

    /// Clears the brownout flag.  Like any status read this also clears the interrupt flag,
    /// and the pending interrupt consumed by the read is not written back.
    ///
    /// # Errors
    pub fn clear_brownout(&mut self) -> Result<(), Error<I2C::Error>> {
        self.modify(REG_STATUS, |current| {
            STATUS_IRQ.set(STATUS_BROWNOUT.set(current, 0), 0)
        })
    }

    /// Reads `channels` into `data` if a conversion has completed.
    ///
    /// The status register is read first and its interrupt flag is cleared as a side effect.
    /// When no conversion has completed `Ok(false)` is returned and `data` is left untouched.
    /// Otherwise `data` receives one value per channel; for [`Channels::All`] the order is
    /// always Green, Red, Blue.
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentError`]: `data` is shorter than [`Channels::count`].  No bus transaction
    /// takes place.
    pub fn read_channels(
        &mut self,
        channels: Channels,
        data: &mut [u16],
    ) -> Result<bool, Error<I2C::Error>> {
        let count = channels.count();
        if data.len() < count {
            return Err(Error::ArgumentError);
        }
        if !self.status()?.conversion_done {
            return Ok(false);
        }

        let mut buffer: [u8; 6] = [0; 6];
        let raw = &mut buffer[..count * 2];
        self.i2c
            .write_read(self.address, &[channels.register()], raw)?;
        for (value, bytes) in data.iter_mut().zip(raw.chunks_exact(2)) {
            *value = u16::from_le_bytes([bytes[0], bytes[1]]);
        }
        Ok(true)
    }

    /// All three channels, or `None` when no new conversion is available.
    ///
    /// # Errors
    pub fn read_rgb(&mut self) -> Result<Option<Sample>, Error<I2C::Error>> {
        let mut data: [u16; 3] = [0; 3];
        if !self.read_channels(Channels::All, &mut data)? {
            return Ok(None);
        }
        Ok(Some(Sample {
            green: data[0],
            red: data[1],
            blue: data[2],
        }))
    }

    /// Reads or writes one of the interrupt thresholds.  The returned value is the one now
    /// held by the register.  Thresholds are only compared while [`Self::set_irq_color`]
    /// assigns a channel.
    ///
    /// # Errors
    pub fn threshold(&mut self, access: Threshold) -> Result<u16, Error<I2C::Error>> {
        match access {
            Threshold::ReadLow => self.read_u16(REG_LOW_THRESHOLD),
            Threshold::ReadHigh => self.read_u16(REG_HIGH_THRESHOLD),
            Threshold::WriteLow(value) => {
                self.write_u16(REG_LOW_THRESHOLD, value)?;
                Ok(value)
            }
            Threshold::WriteHigh(value) => {
                self.write_u16(REG_HIGH_THRESHOLD, value)?;
                Ok(value)
            }
        }
    }

    /// Converts a channel count to lux with the current range and resolution.  Mirrored
    /// settings are used where known; otherwise they are read back from the device.
    ///
    /// # Errors
    pub fn lux(&mut self, count: u16) -> Result<U32F32, Error<I2C::Error>> {
        let range = match self.configuration.range {
            Some(range) => range,
            None => self.get_range()?,
        };
        let resolution = match self.configuration.resolution {
            Some(resolution) => resolution,
            None => self.get_resolution()?,
        };
        Ok(helper::lux_from(count, range, resolution))
    }

    /// Gives back the bus and the trigger resources.
    pub fn release(self) -> (I2C, TRIGGER) {
        (self.i2c, self.trigger)
    }
}

impl<I2C: I2c, TRIGGER: TriggerMode> Isl29125<I2C, TRIGGER> {
    /// Resets every register to its power-on value.  The sync bit is restored straight away
    /// when the handle owns a [`SyncTrigger`].
    ///
    /// # Errors
    pub fn reset(&mut self) -> Result<(), Error<I2C::Error>> {
        self.write_register(REG_DEVICE_ID, RESET_COMMAND)?;
        self.configuration = Configuration::POWER_ON;
        if TRIGGER::SYNC {
            self.write_register(REG_CONFIG1, SYNC.set(0, 1))?;
        }
        Ok(())
    }

    /// Starts a single conversion.  Only a handle constructed with a [`SyncTrigger`] can do
    /// this; the call returns once the start edge is issued and does not wait for the result.
    /// Poll [`Self::status`] or [`Self::read_channels`] afterwards.
    ///
    /// # Errors
    ///
    /// [`Error::NotSyncMode`]: the handle has no sync line.  Nothing is sent.
    pub fn run(&mut self) -> Result<(), Error<I2C::Error>> {
        self.trigger.start_conversion()
    }
}

#[cfg(all(test, not(all(target_arch = "arm", target_os = "none"))))]
pub(crate) fn test_driver<I2C: I2c>(i2c: I2C) -> Isl29125<I2C> {
    Isl29125 {
        i2c,
        address: DEFAULT_ADDRESS,
        trigger: NoTrigger,
        configuration: Configuration::UNKNOWN,
    }
}


pub mod config;
pub mod helper;
pub mod registers;
pub mod trigger;
pub mod whoami;
