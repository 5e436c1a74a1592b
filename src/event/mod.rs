//! Event fan-out from interrupt handlers to application observers.
//!
//! An [`EventSource`] is owned by whatever raises the events (typically a
//! peripheral driver) and notifies its subscribers synchronously, in
//! subscription order. An [`InterruptRegistry`] maps peripheral instance
//! numbers to sources so that bare interrupt trampolines can find them.

mod kinds;
mod registry;
mod source;

pub use kinds::{
    AdcEventSource, AdcEventType, CanEventSource, CanEventType, DmaEventSource, DmaEventType,
    I2cEventSource, I2cEventType, SpiEventSource, SpiEventType, TimerEventSource, TimerEventType,
    UsartEventSource, UsartEventType,
};
pub use registry::InterruptRegistry;
pub use source::{Event, EventSource, Observer};
