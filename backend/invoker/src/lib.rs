pub mod invoker;
pub mod providers;
pub mod session;

pub use invoker::CompletionInvoker;
pub use session::{ChatSession, CycleOutcome};
