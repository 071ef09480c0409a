//! Call-site macros.
//!
//! With the `enable` feature off every tracing macro expands to a block that
//! still type-checks its arguments behind `if false`, so nothing is emitted
//! into the binary and no trimmed file name static is created.

/// Trimmed name of the current source file, stored once per call site.
#[doc(hidden)]
#[macro_export]
macro_rules! __file {
    () => {{
        const LEN: usize = $crate::__private::trimmed_len(file!());
        $crate::__place_literal! {
            static FILE: $crate::__private::TrimmedLiteral<LEN> =
                $crate::__private::TrimmedLiteral::new(file!());
        }
        FILE.as_str()
    }};
}

#[cfg(feature = "progmem")]
#[doc(hidden)]
#[macro_export]
macro_rules! __place_literal {
    ($item:item) => {
        #[link_section = ".serialtrace_strings"]
        $item
    };
}

#[cfg(not(feature = "progmem"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __place_literal {
    ($item:item) => {
        $item
    };
}

/// Path of the enclosing function, e.g. `firmware::sensors::poll`.
#[macro_export]
macro_rules! function {
    () => {{
        fn f() {}
        $crate::__private::function_path($crate::__private::type_name_of(f))
    }};
}

/// [`Location`](crate::Location) of the call site.
#[macro_export]
macro_rules! location {
    () => {
        $crate::Location::new($crate::__file!(), line!(), $crate::function!())
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __location_with {
    ($function:expr) => {
        $crate::Location::new($crate::__file!(), line!(), $function)
    };
}

#[cfg(feature = "enable")]
mod enabled {
    /// Prints the current file, line and function.
    ///
    /// ```ignore
    /// serialtrace::trace!();
    /// // "    main.rs:12: firmware::setup"
    /// ```
    #[macro_export]
    macro_rules! trace {
        () => {
            $crate::emit(&$crate::TraceRecord::here(
                $crate::Marker::Plain,
                $crate::location!(),
            ))
        };
    }

    /// Like [`trace!`] followed by a formatted message.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)+) => {
            $crate::emit(&$crate::TraceRecord::message(
                $crate::Marker::Plain,
                $crate::location!(),
                format_args!($($arg)+),
            ))
        };
    }

    /// Prints each expression as `<expr> = <value>`, one line per expression.
    /// Values are borrowed, not moved.
    #[macro_export]
    macro_rules! dump {
        ($($value:expr),+ $(,)?) => {{
            let location = $crate::location!();
            $(
                $crate::emit(&$crate::TraceRecord::labeled(
                    $crate::Marker::Plain,
                    location,
                    concat!(stringify!($value), " = "),
                    Some(&$value as &dyn ::core::fmt::Display),
                ));
            )+
        }};
    }

    /// Like [`debug!`] with the `******* ERROR: ` marker.
    #[macro_export]
    macro_rules! throw {
        ($($arg:tt)+) => {
            $crate::emit(&$crate::TraceRecord::message(
                $crate::Marker::Error,
                $crate::location!(),
                format_args!($($arg)+),
            ))
        };
    }

    /// [`throw!`] with `message`, then [`dump!`] of the values.
    #[macro_export]
    macro_rules! throw_dump {
        ($message:expr, $($value:expr),+ $(,)?) => {{
            $crate::throw!("{}", $message);
            $crate::dump!($($value),+);
        }};
    }

    #[macro_export]
    macro_rules! serial_print {
        ($($arg:tt)+) => {
            $crate::write_text(format_args!($($arg)+))
        };
    }

    #[macro_export]
    macro_rules! serial_println {
        () => {
            $crate::write_line(format_args!(""))
        };
        ($($arg:tt)+) => {
            $crate::write_line(format_args!($($arg)+))
        };
    }

    /// Moves a port into static storage and runs
    /// [`initialize`](crate::initialize) on it. Intended for use before the
    /// usual setup code runs.
    ///
    /// ```ignore
    /// serialtrace::init!(IoPort<Uart0> = IoPort::new(uart), 9600);
    /// ```
    #[macro_export]
    macro_rules! init {
        ($ty:ty = $port:expr) => {
            $crate::init!($ty = $port, $crate::config::DEFAULT_BAUD)
        };
        ($ty:ty = $port:expr, $baud:expr) => {{
            static SLOT: $crate::PortSlot<$ty> = $crate::PortSlot::new();
            if let Some(port) = SLOT.init($port) {
                $crate::initialize(port, $baud);
            }
        }};
    }
}

#[cfg(not(feature = "enable"))]
mod disabled {
    #[macro_export]
    macro_rules! trace {
        () => {{}};
    }

    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)+) => {{
            if false {
                let _ = format_args!($($arg)+);
            }
        }};
    }

    #[macro_export]
    macro_rules! dump {
        ($($value:expr),+ $(,)?) => {{
            if false {
                $(let _ = &$value;)+
            }
        }};
    }

    #[macro_export]
    macro_rules! throw {
        ($($arg:tt)+) => {{
            if false {
                let _ = format_args!($($arg)+);
            }
        }};
    }

    #[macro_export]
    macro_rules! throw_dump {
        ($message:expr, $($value:expr),+ $(,)?) => {{
            if false {
                let _ = &$message;
                $(let _ = &$value;)+
            }
        }};
    }

    #[macro_export]
    macro_rules! serial_print {
        ($($arg:tt)+) => {{
            if false {
                let _ = format_args!($($arg)+);
            }
        }};
    }

    #[macro_export]
    macro_rules! serial_println {
        () => {{}};
        ($($arg:tt)+) => {{
            if false {
                let _ = format_args!($($arg)+);
            }
        }};
    }

    #[macro_export]
    macro_rules! init {
        ($ty:ty = $port:expr) => {{}};
        ($ty:ty = $port:expr, $baud:expr) => {{}};
    }
}
