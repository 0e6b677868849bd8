//! Defines helper macros for generating driven-port error enums.

/// Generate a `thiserror` enum with one `impl Into<_>` constructor per
/// variant (named after the variant in snake case) and a `kind()` accessor
/// returning the variant name for structured logs.
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

            /// Variant name, logged as `error_kind` and stable across message
            /// wording changes.
            pub const fn kind(&self) -> &'static str {
                match self {
                    $( Self::$variant { .. } => stringify!($variant), )*
                }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for the generated constructors.

    use crate::domain::RecordId;

    define_port_error! {
        pub enum ShelfPortError {
            Unavailable => "shelf store unavailable",
            Missing { shelf: String } => "shelf {shelf} missing",
            Full { shelf: String, id: RecordId } => "shelf {shelf} cannot take record {id}",
        }
    }

    #[test]
    fn unit_constructor_builds_variant() {
        let err = ShelfPortError::unavailable();
        assert_eq!(err, ShelfPortError::Unavailable);
        assert_eq!(err.kind(), "Unavailable");
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = ShelfPortError::missing("A3");
        assert_eq!(err.to_string(), "shelf A3 missing");
        assert_eq!(err.kind(), "Missing");
    }

    #[test]
    fn constructors_convert_into_field_types() {
        let err = ShelfPortError::full("B1", 7_u32);
        assert_eq!(err.to_string(), "shelf B1 cannot take record 7");
        assert_eq!(err.kind(), "Full");
    }
}
