//! Shared utilities: statistics primitives used by every pipeline
//! stage, plus small macros for struct boilerplate.

pub mod stats;

pub use stats::*;

/// Generates a borrowing getter for a struct field.
#[macro_export]
macro_rules! getter_fn {
    ($field_name: ident, $field_type: ty) => {
        pub fn $field_name(&self) -> &$field_type {
            &self.$field_name
        }
    };
}
pub use getter_fn;

/// Generates a builder-style `with_<field>` method for a struct field.
#[macro_export]
macro_rules! with_field_fn {
    ($field_name: ident, $field_type: ty) => {
        paste::paste! {
            pub fn [<with_$field_name>](mut self, value: $field_type) -> Self {
                self.$field_name = value;
                self
            }
        }
    };
}
pub use with_field_fn;
