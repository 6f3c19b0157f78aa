//! Joystick input: ADC access, normalization, and direction classification

pub mod adc;
pub mod direction;
pub mod normalize;

pub use adc::{AdcError, AnalogReader, GroveAdc};
pub use direction::{classify, Direction};
pub use normalize::{AxisReading, NormalizedAxis};
