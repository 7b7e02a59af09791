//! Cache module for in-process OTP storage
//!
//! Records live only as long as the process. A restart invalidates every
//! outstanding code, which is acceptable for five-minute passcodes.

pub mod memory_store;
pub mod sweeper;


pub use memory_store::InMemoryOtpStore;
pub use sweeper::spawn_expiry_sweeper;
