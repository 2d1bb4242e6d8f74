//! Protocol level types shared by the codec and connection modules.

mod error;

pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
