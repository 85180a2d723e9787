pub mod audit;
pub mod config;
pub mod extensions;
pub mod layout;
pub mod lock;
pub mod metadata;
pub mod paths;
pub mod progress;
pub mod readme;
pub mod sync;
pub mod util;
pub mod warn;
