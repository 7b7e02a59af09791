pub mod otp;
pub mod response;

pub use otp::*;
pub use response::*;
