//! Bit-banged driver for reading back (and painting) the graphics RAM of a 128x160 TFT
//! controller, used to validate a display-to-camera pass-through on the bench.
//!
//! The controller is driven in 3-wire serial mode over plain GPIOs: chip-select, clock, one
//! bidirectional data line, data/command select and reset. `BitBangInterface` owns those pins,
//! and `GramReader` sequences the controller commands on top of it.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate embedded_hal as hal;

// This has to be here in order to be usable by mods declared afterwards.
#[cfg(test)]
#[macro_use]
mod testing {
    /// Expected bus record for a run of single-byte frames. A bare value is an opcode frame,
    /// `[value]` a data frame.
    macro_rules! framed {
        (@one [$d:expr]) => {
            vec![
                $crate::interface::test_spy::Sent::Select,
                $crate::interface::test_spy::Sent::Data($d),
                $crate::interface::test_spy::Sent::Deselect,
            ]
        };
        (@one $c:expr) => {
            vec![
                $crate::interface::test_spy::Sent::Select,
                $crate::interface::test_spy::Sent::Cmd($c),
                $crate::interface::test_spy::Sent::Deselect,
            ]
        };
        ($($e:tt),*) => {{
            let mut frames: std::vec::Vec<$crate::interface::test_spy::Sent> = std::vec::Vec::new();
            $(frames.extend(framed!(@one $e));)*
            frames
        }};
    }
}

pub mod command;
pub mod config;
pub mod gram;
pub mod interface;

// Re-exports for primary API.
pub use command::{consts, Command};
pub use config::{BoardVariant, Config, PinAssignment};
pub use gram::{pack_pixel, rainbow_gradient, DisplayId, GramReader, Rgb};
pub use interface::bitbang::BitBangInterface;
pub use interface::{DataPin, Direction, DisplayInterface, Mode};
