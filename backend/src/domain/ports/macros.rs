//! `define_port_error!` declares a driven port's error enum.
//!
//! Each variant is written as `Name { field: Type, .. } => "display text"`.
//! The macro derives `thiserror::Error` from the display text and adds one
//! snake_case constructor per variant whose parameters take
//! `impl Into<FieldType>`, so adapters can write
//! `CoursePersistenceError::capacity_below_roster(enrolled, requested)` or
//! `AccountPersistenceError::connection(err.to_string())`.
//!
//! ```ignore
//! define_port_error! {
//!     /// Errors raised by roster adapters.
//!     pub enum RosterError {
//!         Full { capacity: u32 } => "all {capacity} seats are taken",
//!         Query { message: String } => "roster query failed: {message}",
//!     }
//! }
//! ```

// Recursion accumulates constructor parameters and struct initialisers.
macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Constructor and display coverage for generated port errors.
    define_port_error! {
        pub enum SeatPortError {
            Unit => "no seat",
            Named { course: String } => "no seat in {course}",
            Counted { enrolled: u32, capacity: u32 } => "{enrolled} of {capacity} seats taken",
        }
    }

    #[test]
    fn unit_variants_get_snake_case_constructors() {
        assert_eq!(SeatPortError::unit(), SeatPortError::Unit);
        assert_eq!(SeatPortError::unit().to_string(), "no seat");
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = SeatPortError::named("Rust 101");
        assert_eq!(err.to_string(), "no seat in Rust 101");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = SeatPortError::counted(3_u32, 3_u32);
        assert_eq!(err.to_string(), "3 of 3 seats taken");
    }
}
