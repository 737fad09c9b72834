pub mod message;
pub mod relay;
pub mod render;
pub mod session;
pub mod view;

pub use message::{Message, Role};
pub use relay::{HttpRelay, Relay};
pub use session::{ChatSession, ERROR_TEXT};
pub use view::{ChatView, Transcript};
