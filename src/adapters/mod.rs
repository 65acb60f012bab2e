// Adapters layer: concrete implementations of the domain ports (session persistence, toasts).

pub mod session;
pub mod toast;

pub use session::{FileSessionStore, MemorySessionStore};
pub use toast::{ConsoleToasts, ToastLog};
