mod item_struct_gen;
mod test_bean_attribute;
mod testbean_path_attribute;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Implements `TestBeans` for a struct with named fields.
///
/// Every field marked with `#[test_bean]` or `#[test_bean(..)]` declares a bean override,
/// created by a factory function without parameters that returns the field type.
///
/// # Example
///
/// ```rust
/// use testbean::{modules, providers, singleton, Context, DynProvider, Module, TestBeans};
///
/// struct MyModule;
///
/// impl Module for MyModule {
///     fn providers() -> Vec<DynProvider> {
///         providers![singleton(|_| 1i32).name("one")]
///     }
/// }
///
/// #[derive(TestBeans)]
/// struct MyTest {
///     #[test_bean(name = "one", method = forty_two)]
///     number: i32,
///     untouched: Option<String>,
/// }
///
/// impl MyTest {
///     fn forty_two() -> i32 {
///         42
///     }
/// }
///
/// # fn main() {
/// let mut cx = Context::options()
///     .test_beans::<MyTest>()
///     .create(modules![MyModule]);
///
/// let test = MyTest::inject(&mut cx);
/// assert_eq!(test.number, 42);
/// assert_eq!(test.untouched, None);
/// # }
/// ```
#[proc_macro_derive(TestBeans, attributes(test_bean, testbean))]
pub fn test_beans(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    item_struct_gen::generate(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
