//! Configuration module

mod site;

pub use site::BlogConfig;
pub use site::CONFIG_FILE;
pub use site::DuplicatePolicy;
pub use site::ServerConfig;
