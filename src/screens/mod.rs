//! Screen controllers. Each owns its state and turns keys into actions that
//! `App` carries out against storage.

mod form;
mod grid;
mod list;
mod photos;
mod settings;

pub use form::{FormAction, FormField, FormState};
pub use grid::{GridAction, GridScreen};
pub use list::{ListAction, ListScreen};
pub use photos::{PhotosAction, PhotosScreen};
pub use settings::{SettingsAction, SettingsScreen};
