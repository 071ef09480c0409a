pub fn type_name_of<T>(_: T) -> &'static str {
    core::any::type_name::<T>()
}

/// Turns the type name of a helper fn declared inside a function body into
/// the path of that function.
pub fn function_path(helper: &'static str) -> &'static str {
    let mut path = helper.strip_suffix("::f").unwrap_or(helper);
    while let Some(outer) = path.strip_suffix("::{{closure}}") {
        path = outer;
    }
    path
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn strips_helper_and_closures() {
        assert_eq!(function_path("app::main::f"), "app::main");
        assert_eq!(function_path("app::main::{{closure}}::f"), "app::main");
        assert_eq!(
            function_path("app::main::{{closure}}::{{closure}}::f"),
            "app::main"
        );
        assert_eq!(function_path("weird"), "weird");
    }

    #[test]
    fn names_the_enclosing_function() {
        fn f() {}
        assert_eq!(
            function_path(type_name_of(f)),
            "serialtrace::location::test::names_the_enclosing_function"
        );

        let in_closure = || {
            fn f() {}
            function_path(type_name_of(f))
        };
        assert_eq!(
            in_closure(),
            "serialtrace::location::test::names_the_enclosing_function"
        );
    }
}
