//! Question selection and spaced-repetition scheduling

pub mod scheduler;
pub mod selection;
