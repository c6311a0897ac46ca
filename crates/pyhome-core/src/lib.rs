pub mod config;
pub mod deploy;
pub mod errors;
pub mod layout;
pub mod location;
pub mod resolver;

pub use config::{COLOCATED_DIR, CORE_MARKER, HOME_ENV, MARKER, MarkerContents, ResolverConfig};
pub use deploy::{LinkMethod, copy_shared_libraries, link_runtime, write_marker};
pub use errors::{DeployError, HomeError};
pub use layout::{INTERPRETER_DIR, MODULES_DIR, RuntimeLayout};
pub use location::ProgramLocation;
pub use resolver::{HomeReport, HomeResolver, HomeSource, ResolvedHome};
