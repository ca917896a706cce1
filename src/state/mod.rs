// SPDX-License-Identifier: MPL-2.0

mod session;
pub mod settings;

pub use session::{SessionError, SessionManager};
pub use settings::{Settings, SettingsError};
