//! The subset of the controller's command set used for GRAM access.
//!
//! The panel is 128 pixels wide and 160 rows tall, with every pixel held in GRAM as three bytes
//! (one per colour channel). Address windows are set with 16-bit coordinates, of which this
//! driver only ever uses the low byte.

use crate::interface::DisplayInterface;

pub mod consts {
    /// Pixels per row, and the number of words one row scan produces.
    pub const ROW_WIDTH: usize = 128;
    /// Pixels per column, and the number of words one column scan produces.
    pub const COLUMN_HEIGHT: usize = 160;
    pub const PIXEL_COUNT: usize = ROW_WIDTH * COLUMN_HEIGHT;
    /// Bytes the controller returns, or expects, for each pixel.
    pub const BYTES_PER_PIXEL: usize = 3;

    /// End coordinates used for full-width and full-height windows. The controller is given one
    /// past the last pixel, as the board bring-up code always did.
    pub const WINDOW_X_END: u8 = ROW_WIDTH as u8;
    pub const WINDOW_Y_END: u8 = COLUMN_HEIGHT as u8;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Reset all registers to their defaults. The controller needs a settle delay afterwards.
    SoftwareReset,
    /// Read the three display identification bytes. Followed by a dummy clock cycle before the
    /// first ID bit.
    ReadDisplayId,
    /// Leave sleep mode.
    SleepOut,
    /// Turn the panel output on.
    DisplayOn,
    /// Set the start and end column of the address window.
    ColumnAddressSet(u8, u8),
    /// Set the start and end row of the address window.
    RowAddressSet(u8, u8),
    /// Start writing pixel data at the top-left of the address window.
    WriteMemoryStart,
    /// Read pixel data from the address window. The controller emits one dummy byte before the
    /// first pixel.
    ReadMemoryContinue,
}

impl Command {
    pub fn opcode(self) -> u8 {
        match self {
            Command::SoftwareReset => 0x01,
            Command::ReadDisplayId => 0x04,
            Command::SleepOut => 0x11,
            Command::DisplayOn => 0x29,
            Command::ColumnAddressSet(..) => 0x2A,
            Command::RowAddressSet(..) => 0x2B,
            Command::WriteMemoryStart => 0x2C,
            Command::ReadMemoryContinue => 0x2E,
        }
    }

    /// Send the opcode and its parameters. Every byte goes out in its own chip-select frame.
    pub fn send<DI>(self, iface: &mut DI) -> Result<(), DI::Error>
    where
        DI: DisplayInterface,
    {
        let arg_buf: [u8; 4];
        let args: &[u8] = match self {
            Command::ColumnAddressSet(start, end) | Command::RowAddressSet(start, end) => {
                arg_buf = [0x00, start, 0x00, end];
                &arg_buf
            }
            _ => &[],
        };
        iface.send_command(self.opcode())?;
        for &byte in args {
            iface.send_data(byte)?;
        }
        Ok(())
    }
}

/// Set the address window that following memory reads and writes apply to: columns `x0..=x1`
/// and rows `y0..=y1`.
pub fn set_address_window<DI>(iface: &mut DI, x0: u8, x1: u8, y0: u8, y1: u8) -> Result<(), DI::Error>
where
    DI: DisplayInterface,
{
    Command::ColumnAddressSet(x0, x1).send(iface)?;
    Command::RowAddressSet(y0, y1).send(iface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::test_spy::{Sent, TestSpyInterface};

    #[test]
    fn opcodes() {
        assert_eq!(Command::SoftwareReset.opcode(), 0x01);
        assert_eq!(Command::ReadDisplayId.opcode(), 0x04);
        assert_eq!(Command::SleepOut.opcode(), 0x11);
        assert_eq!(Command::DisplayOn.opcode(), 0x29);
        assert_eq!(Command::ColumnAddressSet(1, 2).opcode(), 0x2A);
        assert_eq!(Command::RowAddressSet(1, 2).opcode(), 0x2B);
        assert_eq!(Command::WriteMemoryStart.opcode(), 0x2C);
        assert_eq!(Command::ReadMemoryContinue.opcode(), 0x2E);
    }

    #[test]
    fn bare_command_is_one_frame() {
        let di = TestSpyInterface::new();
        Command::SleepOut.send(&mut di.split()).unwrap();
        di.check_multi(&[Sent::Select, Sent::Cmd(0x11), Sent::Deselect]);
    }

    #[test]
    fn column_address_set() {
        let di = TestSpyInterface::new();
        Command::ColumnAddressSet(23, 42)
            .send(&mut di.split())
            .unwrap();
        di.check_multi(&framed!(0x2A, [0x00], [23], [0x00], [42]));
    }

    #[test]
    fn row_address_set() {
        let di = TestSpyInterface::new();
        Command::RowAddressSet(0, 160).send(&mut di.split()).unwrap();
        di.check_multi(&framed!(0x2B, [0x00], [0], [0x00], [160]));
    }

    #[test]
    fn address_window() {
        let di = TestSpyInterface::new();
        set_address_window(&mut di.split(), 0, 128, 10, 11).unwrap();
        assert_eq!(
            di.bytes(),
            [
                Sent::Cmd(0x2A), Sent::Data(0x00), Sent::Data(0x00), Sent::Data(0x00), Sent::Data(0x80),
                Sent::Cmd(0x2B), Sent::Data(0x00), Sent::Data(0x0A), Sent::Data(0x00), Sent::Data(0x0B),
            ]
        );
        // One frame per byte.
        assert_eq!(di.count(Sent::Select), 10);
        assert_eq!(di.count(Sent::Deselect), 10);
    }
}
