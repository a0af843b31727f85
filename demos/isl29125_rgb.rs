#![no_std]
#![no_main]

#[cfg(not(target_os = "none"))]
mod other {
    extern crate std;
    use std::println;
    #[no_mangle]
    pub extern "C" fn main() {
        loop {
            println!("unsupported target");
        }
    }
}

#[cfg(all(target_arch = "arm", target_os = "none"))]
mod arm {
    use defmt::*;
    use defmt_rtt as _;
    use fugit::RateExtU32;
    use panic_probe as _;
    use rp2040_hal::{
        clocks::{init_clocks_and_plls, Clock},
        entry,
        i2c::I2C,
        pac,
        sio::Sio,
        watchdog::Watchdog,
    };

    use isl29125::{
        isl29125::{Isl29125, NoTrigger, OperatingMode, Range, DEFAULT_ADDRESS},
        relay::{Characteristic, CharacteristicSink, RgbRelay, DEVICE_NAME, RGB_SERVICE_UUID},
        Driver, WhoAmI,
    };

    /// Stands in for the GATT server: prints what would be notified.
    struct ConsoleSink;

    impl CharacteristicSink for ConsoleSink {
        type Error = core::convert::Infallible;

        fn notify(
            &mut self,
            characteristic: Characteristic,
            payload: [u8; 2],
        ) -> Result<(), Self::Error> {
            println!(
                "{} {} {}",
                characteristic,
                characteristic.uuid(),
                u16::from_le_bytes(payload)
            );
            Ok(())
        }
    }

    #[link_section = ".boot2"]
    #[used]
    pub static BOOT2: [u8; 256] = rp2040_boot2::BOOT_LOADER_GENERIC_03H;

    #[entry]
    fn main() -> ! {
        let mut pac = pac::Peripherals::take().unwrap();
        let core = pac::CorePeripherals::take().unwrap();
        let mut watchdog = Watchdog::new(pac.WATCHDOG);
        let sio = Sio::new(pac.SIO);

        let external_xtal_freq_hz = 12_000_000u32;
        let clocks = init_clocks_and_plls(
            external_xtal_freq_hz,
            pac.XOSC,
            pac.CLOCKS,
            pac.PLL_SYS,
            pac.PLL_USB,
            &mut pac.RESETS,
            &mut watchdog,
        )
        .ok()
        .unwrap();

        let pins = rp2040_hal::gpio::Pins::new(
            pac.IO_BANK0,
            pac.PADS_BANK0,
            sio.gpio_bank0,
            &mut pac.RESETS,
        );

        let i2c = I2C::i2c0(
            pac.I2C0,
            pins.gpio8.into_function(), // sda
            pins.gpio9.into_function(), // scl
            400.kHz(),
            &mut pac.RESETS,
            clocks.system_clock.freq(),
        );

        let mut isl29125 = Isl29125::new(i2c, DEFAULT_ADDRESS, NoTrigger)
            .unwrap()
            .init()
            .unwrap();
        info!("device id {=u8:#x}", isl29125.whoami().unwrap());
        isl29125.set_range(Range::Lux10000).unwrap();
        isl29125.set_operating_mode(OperatingMode::GreenRedBlue).unwrap();

        info!(
            "advertising {} with service {}",
            DEVICE_NAME,
            RGB_SERVICE_UUID
        );
        let mut relay = RgbRelay::new(ConsoleSink);
        relay.on_connection_complete();

        let mut delay = cortex_m::delay::Delay::new(core.SYST, clocks.system_clock.freq().to_Hz());

        loop {
            if relay.update(&mut isl29125).unwrap() {
                if let Some(sample) = isl29125.read_rgb().unwrap() {
                    println!(
                        "{} lux green",
                        isl29125.lux(sample.green).unwrap().to_num::<u32>()
                    );
                }
            }
            delay.delay_ms(1000);
        }
    }
}
