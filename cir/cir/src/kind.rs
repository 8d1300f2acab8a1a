use stdx::impl_debug_display;

/// The kind of a CIR value.
///
/// Sub-int primitives (`byte`, `short`, `char`, `boolean`) are represented as [`Kind::Int`].
/// Comparison operators produce an `Int` that is either `0` or `1`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Void,
    Int,
    Long,
    Float,
    Double,
    Word,
    Reference,
}

impl Kind {
    /// Scalar kinds are the kinds whose constants are valid folding operands.
    #[inline]
    pub fn is_scalar(self) -> bool {
        !matches!(self, Kind::Reference | Kind::Void)
    }
}

impl_debug_display! {
    match Kind{
        Kind::Void => "void";
        Kind::Int => "int";
        Kind::Long => "long";
        Kind::Float => "float";
        Kind::Double => "double";
        Kind::Word => "word";
        Kind::Reference => "ref";
    }
}
