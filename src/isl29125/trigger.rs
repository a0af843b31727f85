//! How conversions are signalled between host and device.  The choice is made once, by the
//! trigger value passed to [`Driver::new`](crate::Driver::new), and cannot change for the
//! lifetime of the handle:
//!
//! - [`NoTrigger`]: the host polls.
//! - [`InterruptTrigger`]: the device pulls its INT line low and the platform edge interrupt
//!   calls [`Isl29125::on_edge`], which hands off to an [`IrqHandler`].
//! - [`SyncTrigger`]: the host drives INT and every rising edge starts one conversion.
//!
//! Handlers run in interrupt context and must not touch the bus.  Raise a [`Flag`] and do the
//! status or channel read from the main loop instead.  The driver does not serialize interrupt
//! context against normal context.

use core::cell::Cell;

use critical_section::Mutex;
use embedded_hal::digital::{Error as _, InputPin, OutputPin};
use embedded_hal::i2c::I2c;

use super::{Error, Isl29125};

pub trait TriggerMode {
    /// Whether the device must have its CONFIG1 sync bit set.
    const SYNC: bool = false;

    /// Puts the host side of the line into its idle state before the device is configured.
    ///
    /// # Errors
    fn prepare<E>(&mut self) -> Result<(), Error<E>> {
        Ok(())
    }

    /// # Errors
    ///
    /// [`Error::NotSyncMode`]: this trigger cannot start conversions.
    fn start_conversion<E>(&mut self) -> Result<(), Error<E>> {
        warn!("conversion start requested without a sync line");
        Err(Error::NotSyncMode)
    }
}

/// Pure polling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NoTrigger;

impl TriggerMode for NoTrigger {}

/// Invoked once per qualifying interrupt edge, in interrupt context.
pub trait IrqHandler {
    fn on_interrupt(&mut self);
}

impl IrqHandler for fn() {
    fn on_interrupt(&mut self) {
        (*self)();
    }
}

impl IrqHandler for &'static Flag {
    fn on_interrupt(&mut self) {
        self.raise();
    }
}

/// A boolean shared between interrupt and normal context.
pub struct Flag(Mutex<Cell<bool>>);

impl Flag {
    #[must_use]
    pub const fn new() -> Self {
        Self(Mutex::new(Cell::new(false)))
    }

    pub fn raise(&self) {
        critical_section::with(|cs| self.0.borrow(cs).set(true));
    }

    #[must_use]
    pub fn is_raised(&self) -> bool {
        critical_section::with(|cs| self.0.borrow(cs).get())
    }

    /// Lowers the flag, returning whether it was raised.
    pub fn take(&self) -> bool {
        critical_section::with(|cs| self.0.borrow(cs).replace(false))
    }
}

impl Default for Flag {
    fn default() -> Self {
        Self::new()
    }
}

/// The device drives its active-low INT line; `PIN` reads it.
pub struct InterruptTrigger<PIN, H> {
    pin: PIN,
    handler: H,
}

impl<PIN: InputPin, H: IrqHandler> InterruptTrigger<PIN, H> {
    pub const fn new(pin: PIN, handler: H) -> Self {
        Self { pin, handler }
    }

    pub fn release(self) -> (PIN, H) {
        (self.pin, self.handler)
    }
}

impl<PIN: InputPin, H: IrqHandler> TriggerMode for InterruptTrigger<PIN, H> {}

/// The host drives INT; a rising edge on `PIN` starts one conversion.
pub struct SyncTrigger<PIN> {
    pin: PIN,
}

impl<PIN: OutputPin> SyncTrigger<PIN> {
    pub const fn new(pin: PIN) -> Self {
        Self { pin }
    }

    pub fn release(self) -> PIN {
        self.pin
    }
}

impl<PIN: OutputPin> TriggerMode for SyncTrigger<PIN> {
    const SYNC: bool = true;

    fn prepare<E>(&mut self) -> Result<(), Error<E>> {
        self.pin
            .set_low()
            .map_err(|error| Error::PinError(error.kind()))
    }

    fn start_conversion<E>(&mut self) -> Result<(), Error<E>> {
        self.pin
            .set_high()
            .map_err(|error| Error::<E>::PinError(error.kind()))?;
        self.pin
            .set_low()
            .map_err(|error| Error::PinError(error.kind()))
    }
}

impl<I2C: I2c, PIN: InputPin, H: IrqHandler> Isl29125<I2C, InterruptTrigger<PIN, H>> {
    /// Interrupt service path, to be called from the platform's falling edge interrupt for the
    /// INT line.  Samples the line and, if the device is asserting it, invokes the handler
    /// exactly once.  Never touches the bus.
    ///
    /// # Errors
    ///
    /// [`Error::PinError`]: the INT line could not be read.
    pub fn on_edge(&mut self) -> Result<bool, Error<I2C::Error>> {
        let asserted = self
            .trigger
            .pin
            .is_low()
            .map_err(|error| Error::<I2C::Error>::PinError(error.kind()))?;
        if asserted {
            self.trigger.handler.on_interrupt();
        }
        Ok(asserted)
    }
}
