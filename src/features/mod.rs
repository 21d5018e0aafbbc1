pub mod form;
pub mod incidents;
pub mod places;
