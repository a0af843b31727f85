//! Republishes ISL29125 samples as three notify-only 16 bit characteristics (red, green,
//! blue) of an RGB service.  The wireless stack itself sits behind [`CharacteristicSink`]; the
//! relay only decides what to publish and when.

use embedded_hal::i2c::I2c;

use crate::isl29125::{self, Channels, Isl29125};

pub const RGB_SERVICE_UUID: &str = "12345678-1234-5678-1234-56789abcdef0";

/// Name the peripheral advertises under.
pub const DEVICE_NAME: &str = "RGBSensor";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Characteristic {
    Red,
    Green,
    Blue,
}

impl Characteristic {
    #[must_use]
    pub const fn uuid(self) -> &'static str {
        match self {
            Self::Red => "12345678-1234-5678-1234-56789abcdef1",
            Self::Green => "12345678-1234-5678-1234-56789abcdef2",
            Self::Blue => "12345678-1234-5678-1234-56789abcdef3",
        }
    }
}

/// Receives characteristic values.  Payloads are the raw channel value, little-endian.
pub trait CharacteristicSink {
    type Error;

    /// # Errors
    fn notify(
        &mut self,
        characteristic: Characteristic,
        payload: [u8; 2],
    ) -> Result<(), Self::Error>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E, S> {
    Sensor(isl29125::Error<E>),
    Sink(S),
}

pub struct RgbRelay<SINK> {
    sink: SINK,
    connected: bool,
}

impl<SINK: CharacteristicSink> RgbRelay<SINK> {
    pub const fn new(sink: SINK) -> Self {
        Self {
            sink,
            connected: false,
        }
    }

    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn on_connection_complete(&mut self) {
        self.connected = true;
    }

    pub fn on_disconnection_complete(&mut self) {
        self.connected = false;
    }

    /// Reads all three channels and publishes them when a central is connected and the sample
    /// is fresh.  Returns whether anything was published.
    ///
    /// The device delivers Green, Red, Blue; each value is routed to the characteristic of its
    /// own colour, in the order Red, Green, Blue.  Publishing stops at the first sink failure,
    /// so characteristics before the failing one already carry the new sample while the rest
    /// keep the previous one.
    ///
    /// # Errors
    pub fn update<I2C: I2c, TRIGGER>(
        &mut self,
        sensor: &mut Isl29125<I2C, TRIGGER>,
    ) -> Result<bool, Error<I2C::Error, SINK::Error>> {
        if !self.connected {
            return Ok(false);
        }
        let mut grb: [u16; 3] = [0; 3];
        if !sensor
            .read_channels(Channels::All, &mut grb)
            .map_err(Error::<I2C::Error, SINK::Error>::Sensor)?
        {
            return Ok(false);
        }
        debug!("R: {=u16}, G: {=u16}, B: {=u16}", grb[1], grb[0], grb[2]);
        for (characteristic, value) in [
            (Characteristic::Red, grb[1]),
            (Characteristic::Green, grb[0]),
            (Characteristic::Blue, grb[2]),
        ] {
            self.sink
                .notify(characteristic, value.to_le_bytes())
                .map_err(Error::<I2C::Error, SINK::Error>::Sink)?;
        }
        Ok(true)
    }

    pub fn release(self) -> SINK {
        self.sink
    }
}
