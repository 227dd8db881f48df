pub mod bundled;
pub mod error;
pub mod paths;
pub mod reporter;
pub mod runtime;
pub mod utils;

// Re-export the types callers touch day to day.
pub use bundled::BundledRuntime;
pub use error::RuntimeError;
pub use paths::LauncherPaths;
pub use reporter::{InstallReporter, SilentReporter};
pub use runtime::descriptor::{ReleaseInfo, RuntimeDescriptor};
pub use runtime::installer::RuntimeInstaller;
pub use runtime::matcher::{find_nearest_at_least, RankedMatch};
pub use runtime::registry::RuntimeRegistry;
pub use runtime::unpack::{CommandUnpacker, PackUnpacker};
