pub mod ticketdtos;
pub mod userdtos;

pub use ticketdtos::*;
pub use userdtos::*;
