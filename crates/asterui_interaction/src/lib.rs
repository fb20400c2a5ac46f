//! Interaction logic for masked inputs, calendar pickers and time pickers.
//!
//! Nothing in here knows about a UI framework. Every operation takes the input
//! that happened and returns the events it produced, which keeps the state
//! machines drivable from plain unit tests.

pub mod calendar;

pub mod config;

pub mod dismiss;

pub mod format;

pub mod mask;

pub mod time;

mod deserializers;
