pub mod dir;
pub mod hours;
pub mod logging;
pub mod runtime;
pub mod time;
