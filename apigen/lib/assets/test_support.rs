// This code was automatically generated by apigen. Do not edit manually.

//! Assertions shared by the generated endpoint tests.
//!
//! Declare this module from the test crate root with `mod support;`.

#![allow(unused_macros, unused_imports)]

/// Asserts that a built request has the expected method and path.
macro_rules! assert_request {
    ($result:expr, $method:expr, $path:expr $(,)?) => {{
        match $result {
            Ok(parts) => {
                assert_eq!(parts.method, $method, "unexpected HTTP method");
                assert_eq!(parts.path, $path, "unexpected request path");
            }
            Err(err) => panic!("expected the request to build, got error: {err}"),
        }
    }};
}

/// Asserts that building a request failed because `argument` was missing.
macro_rules! assert_missing_argument {
    ($result:expr, $argument:expr $(,)?) => {{
        match $result {
            Ok(_) => panic!("expected missing argument `{}` to be rejected", $argument),
            Err(err) => {
                let message = err.to_string();
                assert!(
                    message.contains($argument),
                    "error `{message}` does not mention `{}`",
                    $argument
                );
            }
        }
    }};
}

pub(crate) use assert_missing_argument;
pub(crate) use assert_request;
