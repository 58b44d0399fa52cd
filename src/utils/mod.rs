pub mod colors;
pub mod date;
pub mod duration;
pub mod logging;
pub mod path;
