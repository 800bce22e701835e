pub mod contact;
mod error;
mod service;

pub use contact::{DISCLAIMER, INQUIRY_SUBJECT, Submission};
pub use error::*;
pub use service::*;
