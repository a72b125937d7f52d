mod atomic_io;
mod store;

pub use store::{keys, Settings, SettingsError};
