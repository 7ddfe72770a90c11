mod structs;

pub use structs::*;
