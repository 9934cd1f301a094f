pub use crate::err::Error;

pub type Result<T> = core::result::Result<T, Error>;
