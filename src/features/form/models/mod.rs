mod form_state;
mod form_view;

pub use form_state::FormState;
pub use form_view::{FormInput, FormPage};
