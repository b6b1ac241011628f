pub mod doctor;
pub mod solve;
pub mod tools;
