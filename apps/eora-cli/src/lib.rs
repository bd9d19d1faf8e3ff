//! Front ends for the EORA assistant: a terminal question loop and a
//! Telegram bot. Both share the startup wiring in [`startup`].

pub mod args;
pub mod bot;
pub mod repl;
pub mod startup;
