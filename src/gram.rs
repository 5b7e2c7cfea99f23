//! Reading back and painting the controller's graphics RAM.
//!
//! `GramReader` sits on top of a `DisplayInterface` and sequences the bring-up commands, the
//! address windows and the long single-frame memory bursts. It is a bench tool for checking what
//! the controller actually holds, so nothing here tries to be fast.

use core::fmt;

use hal::blocking::delay::DelayMs;
use itertools::iproduct;
use log::{debug, error, info, trace};

use crate::command::consts::*;
use crate::command::{set_address_window, Command};
use crate::config::Config;
use crate::interface::{DisplayInterface, Mode};

/// One pixel as the controller takes it on a memory write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// The three identification bytes returned by `ReadDisplayId`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayId(pub [u8; 3]);

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{:02X}{:02X}{:02X}", self.0[0], self.0[1], self.0[2])
    }
}

/// Pack the three bytes read back for one pixel into a word, first byte most significant.
///
/// Each byte is shifted left by one bit *within the byte* before it is packed, so the channel's
/// top bit is dropped. This is what the pass-through validation firmware has always compared
/// against; it looks like a leftover bit-depth adjustment and may be wrong for this controller,
/// but it is kept until checked on hardware.
pub fn pack_pixel(channels: [u8; 3]) -> u32 {
    channels
        .iter()
        .fold(0u32, |acc, &byte| (acc << 8) | u32::from(byte << 1))
}

/// The test pattern written by `GramReader::fill_rainbow`, in raster order.
///
/// The first two rows ramp all channels together by 2 per pixel. After that, each pixel sets red
/// to twice the row, green to twice the column and blue to their sum, all truncated to a byte.
/// A pixel's colour is computed after the previous one has been emitted, so every value shows up
/// one pixel later than the coordinates it was computed from.
pub fn rainbow_gradient() -> impl Iterator<Item = Rgb> {
    iproduct!(0..COLUMN_HEIGHT, 0..ROW_WIDTH).scan(Rgb(0, 0, 0), |next, (row, column)| {
        let emitted = *next;
        *next = if row < 2 {
            Rgb(
                next.0.wrapping_add(2),
                next.1.wrapping_add(2),
                next.2.wrapping_add(2),
            )
        } else {
            Rgb((row * 2) as u8, (column * 2) as u8, (row + column) as u8)
        };
        Some(emitted)
    })
}

/// Bench driver for GRAM read-back.
pub struct GramReader<DI>
where
    DI: DisplayInterface,
{
    iface: DI,
    config: Config,
}

impl<DI> GramReader<DI>
where
    DI: DisplayInterface,
{
    /// Construct a reader on `iface`. Nothing is sent until `init`.
    pub fn new(iface: DI, config: Config) -> Self {
        GramReader { iface, config }
    }

    /// Give the interface back.
    pub fn release(self) -> DI {
        self.iface
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Bring the controller up: idle all lines, release reset, then software reset, sleep-out and
    /// display-on, each followed by the configured settle delay. Calling it again repeats the
    /// whole sequence.
    pub fn init<D>(&mut self, delay: &mut D) -> Result<(), DI::Error>
    where
        D: DelayMs<u16>,
    {
        info!(
            "initializing GRAM reader on {:?} board: {:?}",
            self.config.board(),
            self.config.pins()
        );
        self.iface.setup_lines()?;
        for &cmd in &[
            Command::SoftwareReset,
            Command::SleepOut,
            Command::DisplayOn,
        ] {
            cmd.send(&mut self.iface)?;
            delay.delay_ms(self.config.delay_ms());
        }
        Ok(())
    }

    /// Read the display identification bytes.
    pub fn read_id(&mut self) -> Result<DisplayId, DI::Error> {
        self.begin_burst(Command::ReadDisplayId)?;
        self.iface.pulse_clock()?;
        let mut id = [0u8; 3];
        for byte in id.iter_mut() {
            *byte = self.iface.receive_byte()?;
        }
        self.iface.deselect()?;
        let id = DisplayId(id);
        info!("Read ID cmd: {}", id);
        Ok(id)
    }

    /// Set the window that the next memory read or write applies to.
    pub fn set_address_window(&mut self, x0: u8, x1: u8, y0: u8, y1: u8) -> Result<(), DI::Error> {
        set_address_window(&mut self.iface, x0, x1, y0, y1)
    }

    /// Read one GRAM row into the first `ROW_WIDTH` entries of `buf`, one packed word per pixel
    /// (see `pack_pixel`).
    ///
    /// Panics if `buf` is shorter than `ROW_WIDTH`.
    pub fn read_row(&mut self, buf: &mut [u32], row: u8) -> Result<(), DI::Error> {
        check_buffer(buf, ROW_WIDTH, "row");
        self.set_address_window(0, WINDOW_X_END, row, row.wrapping_add(1))?;
        debug!("reading GRAM row {}", row);
        self.read_pixels(&mut buf[..ROW_WIDTH])
    }

    /// Read one GRAM column into the first `COLUMN_HEIGHT` entries of `buf`.
    ///
    /// Panics if `buf` is shorter than `COLUMN_HEIGHT`.
    pub fn read_column(&mut self, buf: &mut [u32], column: u8) -> Result<(), DI::Error> {
        check_buffer(buf, COLUMN_HEIGHT, "column");
        self.set_address_window(column, column.wrapping_add(1), 0, WINDOW_Y_END)?;
        debug!("reading GRAM column {}", column);
        self.read_pixels(&mut buf[..COLUMN_HEIGHT])
    }

    /// Paint the whole panel with one colour.
    pub fn fill_screen(&mut self, red: u8, green: u8, blue: u8) -> Result<(), DI::Error> {
        let colour = Rgb(red, green, blue);
        self.write_pixels((0..PIXEL_COUNT).map(|_| colour))?;
        info!("Data Written on GRAM {}", colour);
        Ok(())
    }

    /// Paint the panel with the `rainbow_gradient` test pattern.
    pub fn fill_rainbow(&mut self) -> Result<(), DI::Error> {
        info!("Rainbow Screen Start");
        self.write_pixels(rainbow_gradient())?;
        info!("Rainbow Screen Ends.");
        Ok(())
    }

    /// Open a chip-select frame, send `cmd` and leave D/C high for the payload.
    fn begin_burst(&mut self, cmd: Command) -> Result<(), DI::Error> {
        self.iface.select()?;
        self.iface.set_mode(Mode::Command)?;
        self.iface.transmit_byte(cmd.opcode())?;
        self.iface.set_mode(Mode::Data)
    }

    /// Memory read of `buf.len()` pixels from the current window, as a single frame.
    fn read_pixels(&mut self, buf: &mut [u32]) -> Result<(), DI::Error> {
        self.begin_burst(Command::ReadMemoryContinue)?;
        // Dummy byte while the controller turns the data line around.
        self.iface.receive_byte()?;
        for (i, slot) in buf.iter_mut().enumerate() {
            let mut channels = [0u8; BYTES_PER_PIXEL];
            for channel in channels.iter_mut() {
                *channel = self.iface.receive_byte()?;
            }
            *slot = pack_pixel(channels);
            trace!("pixel {}: 0x{:06X}", i, *slot);
        }
        self.iface.deselect()
    }

    /// Memory write over the full panel. The opcode goes out in its own frame, then all pixels
    /// follow in a second one.
    fn write_pixels<I>(&mut self, pixels: I) -> Result<(), DI::Error>
    where
        I: Iterator<Item = Rgb>,
    {
        self.set_address_window(0, WINDOW_X_END, 0, WINDOW_Y_END)?;
        Command::WriteMemoryStart.send(&mut self.iface)?;
        self.iface.select()?;
        self.iface.set_mode(Mode::Data)?;
        for (i, Rgb(red, green, blue)) in pixels.enumerate() {
            if i % ROW_WIDTH == 0 {
                debug!("writing GRAM row {}", i / ROW_WIDTH);
            }
            self.iface.transmit_byte(red)?;
            self.iface.transmit_byte(green)?;
            self.iface.transmit_byte(blue)?;
        }
        self.iface.deselect()
    }
}

/// Scan buffers are caller-owned; one that cannot hold a full scan is a bug in the caller.
fn check_buffer(buf: &[u32], needed: usize, scan: &str) {
    if buf.len() < needed {
        error!(
            "{} scan needs {} words, buffer holds {}",
            scan,
            needed,
            buf.len()
        );
        panic!("GRAM {} buffer too small", scan);
    }
}
