pub mod booking;
pub mod catalog;
pub mod document;
pub mod responses;
pub mod session;

pub use booking::*;
pub use catalog::*;
pub use document::*;
pub use responses::*;
pub use session::*;
