//! The link between the driver and the controller's serial lines.
//!
//! `DisplayInterface` exposes the handful of line-level primitives the GRAM framing is built from
//! (chip-select, the data/command line, single byte shifts in either direction and a bare clock
//! pulse). `send_command` and `send_data` are provided on top of them, each wrapping one byte in
//! its own chip-select frame.

/// Level of the data/command select line while a byte is shifted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// D/C driven low; the byte is an opcode.
    Command,
    /// D/C driven high; the byte is a parameter or pixel data.
    Data,
}

/// Direction of the shared data line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// The host drives the line.
    Output,
    /// The controller drives the line and the host samples it, with the pull-up enabled.
    Input,
}

/// A single GPIO used as the bidirectional serial data line. The controller is wired in 3-wire
/// mode, so the same pin carries host-to-controller bytes and the GRAM read-back.
pub trait DataPin {
    type Error;

    /// Reconfigure the pin as a push-pull output or as a pulled-up input.
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error>;
    fn set_high(&mut self) -> Result<(), Self::Error>;
    fn set_low(&mut self) -> Result<(), Self::Error>;
    fn is_high(&self) -> Result<bool, Self::Error>;
}

pub trait DisplayInterface {
    type Error;

    /// Put every line in its idle state: chip-select released, clock low, data line driven by
    /// the host, reset released.
    fn setup_lines(&mut self) -> Result<(), Self::Error>;

    /// Assert chip-select (drive it low).
    fn select(&mut self) -> Result<(), Self::Error>;

    /// Release chip-select (drive it high).
    fn deselect(&mut self) -> Result<(), Self::Error>;

    fn set_mode(&mut self, mode: Mode) -> Result<(), Self::Error>;

    /// Shift one byte out, most significant bit first.
    fn transmit_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Shift one byte in, most significant bit first.
    fn receive_byte(&mut self) -> Result<u8, Self::Error>;

    /// A single clock cycle without data, used as a turnaround slot by some read commands.
    fn pulse_clock(&mut self) -> Result<(), Self::Error>;

    /// Send an opcode in its own chip-select frame.
    fn send_command(&mut self, cmd: u8) -> Result<(), Self::Error> {
        self.select()?;
        self.set_mode(Mode::Command)?;
        self.transmit_byte(cmd)?;
        self.deselect()
    }

    /// Send one parameter byte in its own chip-select frame.
    fn send_data(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.select()?;
        self.set_mode(Mode::Data)?;
        self.transmit_byte(byte)?;
        self.deselect()
    }
}

pub mod bitbang {
    //! Software-driven serial bus. Every bit is produced by toggling GPIOs directly, with no
    //! hardware SPI peripheral involved. The clock idles low and the controller latches data on
    //! the rising edge. The pins are fully owned by the bus, which is what keeps any SPI
    //! peripheral of the MCU from claiming them.

    use hal::digital::v2::OutputPin;
    use log::trace;

    use super::{DataPin, Direction, DisplayInterface, Mode};

    pub struct BitBangInterface<CS, SCK, SDA, DC, RST> {
        /// Chip-select output, active low.
        cs: CS,
        /// Serial clock output.
        sck: SCK,
        /// The bidirectional data line.
        sda: SDA,
        /// Data/command select output (low for command, high for data).
        dc: DC,
        /// Controller reset output, active low.
        rst: RST,
        /// Current direction of `sda`, or `None` until the bus first configures it.
        direction: Option<Direction>,
    }

    impl<CS, SCK, SDA, DC, RST> BitBangInterface<CS, SCK, SDA, DC, RST> {
        /// Build the bus from its five lines. No line is touched until `setup_lines` or the first
        /// transfer.
        pub fn new(cs: CS, sck: SCK, sda: SDA, dc: DC, rst: RST) -> Self {
            Self {
                cs,
                sck,
                sda,
                dc,
                rst,
                direction: None,
            }
        }

        /// Give the pins back.
        pub fn release(self) -> (CS, SCK, SDA, DC, RST) {
            (self.cs, self.sck, self.sda, self.dc, self.rst)
        }

        /// The direction the data line was last configured for.
        pub fn direction(&self) -> Option<Direction> {
            self.direction
        }
    }

    impl<CS, SCK, SDA, DC, RST, E> BitBangInterface<CS, SCK, SDA, DC, RST>
    where
        CS: OutputPin<Error = E>,
        SCK: OutputPin<Error = E>,
        SDA: DataPin<Error = E>,
        DC: OutputPin<Error = E>,
        RST: OutputPin<Error = E>,
    {
        /// Switch the data line to `direction`. The pin is only reconfigured on an actual
        /// turnaround.
        fn turn(&mut self, direction: Direction) -> Result<(), E> {
            if self.direction != Some(direction) {
                trace!("data line turnaround to {:?}", direction);
                self.sda.set_direction(direction)?;
                self.direction = Some(direction);
            }
            Ok(())
        }

        fn clock(&mut self) -> Result<(), E> {
            self.sck.set_high()?;
            self.sck.set_low()
        }
    }

    impl<CS, SCK, SDA, DC, RST, E> DisplayInterface for BitBangInterface<CS, SCK, SDA, DC, RST>
    where
        CS: OutputPin<Error = E>,
        SCK: OutputPin<Error = E>,
        SDA: DataPin<Error = E>,
        DC: OutputPin<Error = E>,
        RST: OutputPin<Error = E>,
    {
        type Error = E;

        fn setup_lines(&mut self) -> Result<(), E> {
            self.cs.set_high()?;
            self.sck.set_low()?;
            self.turn(Direction::Output)?;
            self.rst.set_high()
        }

        fn select(&mut self) -> Result<(), E> {
            self.cs.set_low()
        }

        fn deselect(&mut self) -> Result<(), E> {
            self.cs.set_high()
        }

        fn set_mode(&mut self, mode: Mode) -> Result<(), E> {
            match mode {
                Mode::Command => self.dc.set_low(),
                Mode::Data => self.dc.set_high(),
            }
        }

        fn transmit_byte(&mut self, byte: u8) -> Result<(), E> {
            self.turn(Direction::Output)?;
            let mut bits = byte;
            for _ in 0..8 {
                if bits & 0x80 != 0 {
                    self.sda.set_high()?;
                } else {
                    self.sda.set_low()?;
                }
                self.clock()?;
                bits <<= 1;
            }
            Ok(())
        }

        fn receive_byte(&mut self) -> Result<u8, E> {
            self.turn(Direction::Input)?;
            let mut byte = 0u8;
            for _ in 0..8 {
                byte <<= 1;
                // Sampled before the rising edge; the controller shifts the next bit out on the
                // falling edge.
                if self.sda.is_high()? {
                    byte |= 1;
                }
                self.clock()?;
            }
            Ok(byte)
        }

        fn pulse_clock(&mut self) -> Result<(), E> {
            self.clock()
        }
    }

}
