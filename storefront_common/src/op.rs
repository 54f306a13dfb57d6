/// Implements arithmetic operators on a single-field newtype by delegating to the wrapped value.
///
/// * `op!(Cents: Add::add, Sub::sub)` combines two values.
/// * `op!(Cents: assign AddAssign::add_assign)` implements the compound assignment forms.
/// * `op!(Cents * i64: Mul::mul)` scales a value by a plain number.
#[macro_export]
macro_rules! op {
    ($for_struct:ident: assign $($impl_trait:ident::$impl_fn:ident),+) => {
        $(
            impl std::ops::$impl_trait for $for_struct {
                fn $impl_fn(&mut self, rhs: Self) {
                    std::ops::$impl_trait::$impl_fn(&mut self.0, rhs.0)
                }
            }
        )+
    };

    ($for_struct:ident * $scalar:ty: $($impl_trait:ident::$impl_fn:ident),+) => {
        $(
            impl std::ops::$impl_trait<$scalar> for $for_struct {
                type Output = Self;

                fn $impl_fn(self, rhs: $scalar) -> Self::Output {
                    Self(std::ops::$impl_trait::$impl_fn(self.0, rhs))
                }
            }
        )+
    };

    ($for_struct:ident: $($impl_trait:ident::$impl_fn:ident),+) => {
        $(
            impl std::ops::$impl_trait for $for_struct {
                type Output = Self;

                fn $impl_fn(self, rhs: Self) -> Self::Output {
                    Self(std::ops::$impl_trait::$impl_fn(self.0, rhs.0))
                }
            }
        )+
    };
}
