//! Joystick Sounds
//!
//! Polls a Grove dual-axis joystick through the Base Hat ADC and plays an
//! animal sound for each of the eight stick directions. A quick
//! left-right-left waggle plays a special gesture sound.

pub mod audio;
pub mod config;
pub mod gesture;
pub mod input;
pub mod poll_loop;
pub mod shutdown;

pub use config::AppConfig;
pub use input::direction::Direction;
pub use poll_loop::PollLoop;
pub use shutdown::ShutdownFlag;
