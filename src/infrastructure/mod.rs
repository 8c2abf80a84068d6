pub mod platform;
pub mod shell_runner;

pub use platform::Platform;
pub use shell_runner::{ScriptRunner, ShellRunner};
