pub mod doctor;
pub mod medicine;
pub mod patient;
pub mod pharmacy;
pub mod prescription;

pub use doctor::*;
pub use medicine::*;
pub use patient::*;
pub use pharmacy::*;
pub use prescription::*;
