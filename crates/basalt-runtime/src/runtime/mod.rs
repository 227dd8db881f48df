pub mod descriptor;
pub mod extract;
pub mod installer;
pub mod matcher;
pub mod patcher;
pub mod registry;
pub mod unpack;
