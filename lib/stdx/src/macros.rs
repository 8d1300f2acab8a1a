//! Convenience macros.

/// Generates the conversions between a typed index newtype and its raw integer
/// (and `usize`), so the newtype can be used as a `TiVec` key.
///
/// # Example
///
/// ```rust
/// use stdx::impl_idx_from;
///
/// pub struct Variable(u32);
/// impl_idx_from!(Variable(u32));
/// ```
#[macro_export]
macro_rules! impl_idx_from {
    ($ty:ident($raw: ident)) => {
        impl From<$raw> for $ty {
            #[inline(always)]
            fn from(it: $raw) -> $ty {
                $ty(it)
            }
        }

        impl From<$ty> for $raw {
            #[inline(always)]
            fn from(it: $ty) -> $raw {
                it.0
            }
        }

        impl From<usize> for $ty {
            #[inline(always)]
            fn from(it: usize) -> $ty {
                ::std::debug_assert!(it < $raw::MAX as usize);
                $ty(it as $raw)
            }
        }

        impl From<$ty> for usize {
            #[inline(always)]
            fn from(it: $ty) -> usize {
                it.0 as usize
            }
        }
    };
}

/// Generates matching `Debug` and `Display` implementations
///
/// # Example
///
/// ```rust
/// use stdx::impl_debug_display;
///
/// enum Test {
///     Bar(u32),
///     Foo,
/// }
///
/// impl_debug_display! {
///     match Test{
///         Test::Bar(i) => "bar {}", i;
///         Test::Foo => "foo";
///     }
/// }
///
/// assert_eq!(Test::Bar(2).to_string(), "bar 2");
/// ```
#[macro_export]
macro_rules! impl_debug_display {
    ( $($args: tt)*) => {
        $crate::impl_fmt!(Debug $($args)*);
        $crate::impl_fmt!(Display $($args)*);
    };
}

/// Generates an implementation of the specified fmt trait
#[macro_export]
macro_rules! impl_fmt {
    ($trait:ident match $ty:ident { $($variant:pat => $fmt:literal $(, $fmt_arg:expr)*;)* }) => {
        impl std::fmt::$trait for $ty{
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self{
                    $( $variant => write!(f, $fmt $(,$fmt_arg)*)),*
                }
            }
        }
    };

    (  $trait:ident $binding: ident @ $ty: ident => $fmt:literal $(, $fmt_arg: expr)*) => {
        impl std::fmt::$trait for $ty{
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let $binding = self;
                write!(f, $fmt $(,$fmt_arg)*)
            }
        }
    };
}
