//! Resolution of everything the CI tooling reads from its surroundings.
//!
//! Nothing here writes to the process environment. Values that need to reach
//! child processes are returned to the caller.

mod channel;
mod dotenv;
mod error;
mod lookup;
mod token;
mod tools;
mod validate;

pub use channel::{LocalChannel, local_backend_channel};
pub use dotenv::{ENV_CI_FILE, ENV_FILE, EnvFiles, load_env_files};
pub use error::{Error, Result};
pub use lookup::{EnvLookup, Layered, ProcessEnv};
pub use token::{Token, TokenSource, resolve_token, token_from_gh};
pub use tools::{BACKENDS, BackendOverride, backend_override, locate_pixi};
pub use validate::{validate_artifact_sources, validate_artifacts_dir};
