//! Bench wiring for an Uno-style board: bring the controller up, paint the rainbow test pattern
//! and dump row 10 of GRAM over the serial port, for comparison with what the camera captures.
//! Pins follow `BoardVariant::Standard`: D9 chip-select, D13 clock, D11 data, D12 pulled-up
//! MISO, D8 D/C and D10 reset.

#![no_std]
#![no_main]

use core::convert::Infallible;

use arduino_hal::port::{mode, Pin};
use gram_reader::{
    consts::ROW_WIDTH, BitBangInterface, BoardVariant, Config, DataPin, Direction, GramReader,
};
use panic_halt as _;

/// D11 as the 3-wire data line. The pin is moved between its output and pulled-up input modes
/// as the bus turns around.
enum Sda {
    Out(Pin<mode::Output>),
    In(Pin<mode::Input<mode::PullUp>>),
}

struct SdaPin(Option<Sda>);

impl DataPin for SdaPin {
    type Error = Infallible;

    fn set_direction(&mut self, direction: Direction) -> Result<(), Infallible> {
        self.0 = match (self.0.take(), direction) {
            (Some(Sda::In(pin)), Direction::Output) => Some(Sda::Out(pin.into_output())),
            (Some(Sda::Out(pin)), Direction::Input) => Some(Sda::In(pin.into_pull_up_input())),
            (unchanged, _) => unchanged,
        };
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        if let Some(Sda::Out(pin)) = &mut self.0 {
            pin.set_high();
        }
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Infallible> {
        if let Some(Sda::Out(pin)) = &mut self.0 {
            pin.set_low();
        }
        Ok(())
    }

    fn is_high(&self) -> Result<bool, Infallible> {
        Ok(match &self.0 {
            Some(Sda::In(pin)) => pin.is_high(),
            _ => false,
        })
    }
}

#[arduino_hal::entry]
fn main() -> ! {
    let dp = arduino_hal::Peripherals::take().unwrap();
    let pins = arduino_hal::pins!(dp);
    let mut serial = arduino_hal::default_serial!(dp, pins, 115200);
    let mut delay = arduino_hal::Delay::new();

    // Never sampled, but must not float.
    let _miso = pins.d12.into_pull_up_input();

    let iface = BitBangInterface::new(
        pins.d9.into_output().downgrade(),
        pins.d13.into_output().downgrade(),
        SdaPin(Some(Sda::Out(pins.d11.into_output().downgrade()))),
        pins.d8.into_output().downgrade(),
        pins.d10.into_output().downgrade(),
    );
    let mut gram = GramReader::new(iface, Config::new(BoardVariant::Standard));

    gram.init(&mut delay).unwrap();
    let id = gram.read_id().unwrap();
    ufmt::uwriteln!(&mut serial, "ID {} {} {}", id.0[0], id.0[1], id.0[2]).unwrap();

    gram.fill_rainbow().unwrap();

    let mut row = [0u32; ROW_WIDTH];
    gram.read_row(&mut row, 10).unwrap();
    for word in row.iter() {
        ufmt::uwrite!(&mut serial, "{}, ", *word).unwrap();
    }
    ufmt::uwriteln!(&mut serial, "...End").unwrap();

    loop {
        arduino_hal::delay_ms(1000);
    }
}
