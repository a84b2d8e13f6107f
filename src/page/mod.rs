//! Page context: session state and the event loop that drives it

pub mod event_loop;
pub mod session;

pub use event_loop::{PageClosed, PageEvent, PageHandle, PageLoop, page_loop};
pub use session::PageSession;
