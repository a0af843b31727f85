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
        isl29125::{
            Channels, IrqColor, Isl29125, OperatingMode, Persistence, SyncTrigger, Threshold,
            DEFAULT_ADDRESS,
        },
        Driver,
    };

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

        // host-clocked conversions: gpio10 drives the sensor's INT pin
        let sync = SyncTrigger::new(pins.gpio10.into_push_pull_output());
        let mut isl29125 = Isl29125::new(i2c, DEFAULT_ADDRESS, sync)
            .unwrap()
            .init()
            .unwrap();
        isl29125.set_operating_mode(OperatingMode::Blue).unwrap();
        isl29125.set_irq_color(IrqColor::Blue).unwrap();
        isl29125.set_persistence(Persistence::Two).unwrap();
        isl29125.threshold(Threshold::WriteHigh(0x8000)).unwrap();

        let mut delay = cortex_m::delay::Delay::new(core.SYST, clocks.system_clock.freq().to_Hz());

        loop {
            isl29125.run().unwrap();
            delay.delay_ms(110);
            let status = isl29125.status().unwrap();
            if status.brownout {
                warn!("brownout, reconfigure");
            }
            let mut blue = [0u16; 1];
            if isl29125.read_channels(Channels::Blue, &mut blue).unwrap() {
                println!("blue {} above threshold: {}", blue[0], status.interrupt);
            }
            delay.delay_ms(1000);
        }
    }
}
