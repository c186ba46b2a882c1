//! Admin console: the create form and the timer list, as explicit view state.

pub mod form;
pub mod list;

pub use form::{CreateTimerForm, FormError, Hsb};
pub use list::{ListDisplay, TimerListView};
