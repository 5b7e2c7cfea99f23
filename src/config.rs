//! Board wiring and the few timing knobs of the bring-up sequence.

/// The boards the reader has been wired up on. The larger AVR boards break the serial lines out
/// on the high-numbered header; everything else uses the Uno-style pin set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoardVariant {
    /// ATmega1280 / ATmega2560 class boards.
    Mega,
    /// Uno-style boards (ATmega328P and pin-compatible).
    Standard,
}

/// Header pin numbers for each line the reader drives or samples. Board support code uses this
/// to pick the GPIOs that are handed to `BitBangInterface::new`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinAssignment {
    pub chip_select: u8,
    pub clock: u8,
    /// The bidirectional data line (the header's MOSI pin).
    pub data: u8,
    /// The header's MISO pin. Configured as a pulled-up input so it does not float, but never
    /// sampled: the controller answers on `data`.
    pub data_in: u8,
    pub data_command: u8,
    pub reset: u8,
}

impl PinAssignment {
    pub fn for_board(board: BoardVariant) -> Self {
        match board {
            BoardVariant::Mega => PinAssignment {
                chip_select: 53,
                clock: 52,
                data: 51,
                data_in: 50,
                data_command: 48,
                reset: 49,
            },
            BoardVariant::Standard => PinAssignment {
                chip_select: 9,
                clock: 13,
                data: 11,
                data_in: 12,
                data_command: 8,
                reset: 10,
            },
        }
    }
}

/// Settle time after each command of the bring-up sequence.
pub const DEFAULT_POST_COMMAND_DELAY_MS: u16 = 100;

/// A configuration for the reader. Builder methods override the defaults.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    board: BoardVariant,
    pins: PinAssignment,
    post_command_delay_ms: u16,
}

impl Config {
    /// Create a configuration for `board` with its standard pin set and default timing.
    pub fn new(board: BoardVariant) -> Self {
        Config {
            board,
            pins: PinAssignment::for_board(board),
            post_command_delay_ms: DEFAULT_POST_COMMAND_DELAY_MS,
        }
    }

    /// Extend this `Config` with a different settle delay after software reset, sleep-out and
    /// display-on.
    pub fn post_command_delay_ms(self, delay_ms: u16) -> Self {
        Self {
            post_command_delay_ms: delay_ms,
            ..self
        }
    }

    pub fn board(&self) -> BoardVariant {
        self.board
    }

    pub fn pins(&self) -> &PinAssignment {
        &self.pins
    }

    pub(crate) fn delay_ms(&self) -> u16 {
        self.post_command_delay_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mega_pins() {
        let pins = PinAssignment::for_board(BoardVariant::Mega);
        assert_eq!(pins.chip_select, 53);
        assert_eq!(pins.clock, 52);
        assert_eq!(pins.data, 51);
        assert_eq!(pins.data_in, 50);
        assert_eq!(pins.data_command, 48);
        assert_eq!(pins.reset, 49);
    }

    #[test]
    fn standard_pins() {
        let pins = PinAssignment::for_board(BoardVariant::Standard);
        assert_eq!(pins.chip_select, 9);
        assert_eq!(pins.clock, 13);
        assert_eq!(pins.data, 11);
        assert_eq!(pins.data_in, 12);
        assert_eq!(pins.data_command, 8);
        assert_eq!(pins.reset, 10);
    }

    #[test]
    fn builder_defaults_and_overrides() {
        let cfg = Config::new(BoardVariant::Standard);
        assert_eq!(cfg.board(), BoardVariant::Standard);
        assert_eq!(cfg.delay_ms(), DEFAULT_POST_COMMAND_DELAY_MS);
        assert_eq!(*cfg.pins(), PinAssignment::for_board(BoardVariant::Standard));

        let cfg = Config::new(BoardVariant::Mega).post_command_delay_ms(20);
        assert_eq!(cfg.delay_ms(), 20);
        assert_eq!(cfg.pins().chip_select, 53);
    }
}
