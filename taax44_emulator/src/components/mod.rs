//! Independent components of the emulator
//!
//! These are the peripherals attached to the MCU ports. They are independent of each other and of
//! the port wiring, which lives in [`crate::ports`].
//!
//! To ensure they remain independent and provide a clean API, the following rules are applied:
//! - Components cannot depend on one another, with the exception of the shared [`vfd::GridLine`]
//! - Components can only import code from common/
//! - Keep exported types and functionality to a minimum

pub mod asp;
pub mod front_panel;
pub mod nvram;
pub mod vfd;
