pub mod confirmation;
pub mod grammar;
pub mod names;
pub mod temporal;
