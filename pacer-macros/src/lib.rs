//! Procedural macros for the Pacer runtime.
//!
//! - `#[pacer::main]` turns `async fn main` into a synchronous entry point.
//! - `#[pacer::test]` does the same for `async` test functions.
//! - `join!` awaits several futures concurrently.
//!
//! Both attributes accept `event_interval = N` to configure the runtime.

mod utils;

use proc_macro::{TokenStream, TokenTree};

use utils::{RuntimeArgs, compile_error, split_args, tokens_to_string, wrap_in_runtime};

/// Awaits every future concurrently and returns their outputs as a tuple.
///
/// All futures are polled by the current task; none is spawned. A single
/// future is simply awaited.
#[proc_macro]
pub fn join(input: TokenStream) -> TokenStream {
    let args = split_args(input);
    let count = args.len();

    if count == 0 {
        return "()".parse().unwrap_or_default();
    }

    if count == 1 {
        let expr = tokens_to_string(&args[0]);
        return format!("{{ ({expr}).await }}")
            .parse()
            .unwrap_or_else(|err| compile_error(&format!("join macro error: {err}")));
    }

    let mut output = String::from("{\n");

    for (i, expr_tokens) in args.iter().enumerate() {
        let expr = tokens_to_string(expr_tokens);
        output.push_str(&format!(
            "let mut __f{i} = ::std::boxed::Box::pin({expr});\n\
             let mut __out{i} = ::core::option::Option::None;\n"
        ));
    }

    output.push_str("::std::future::poll_fn(move |cx| {\n");
    output.push_str("    use ::std::future::Future;\n");
    output.push_str("    use ::std::task::Poll;\n");

    for i in 0..count {
        output.push_str(&format!(
            "    if __out{i}.is_none() {{\n\
                     if let Poll::Ready(val) = __f{i}.as_mut().poll(cx) {{\n\
                         __out{i} = ::core::option::Option::Some(val);\n\
                     }}\n\
                 }}\n"
        ));
    }

    let all_done = (0..count)
        .map(|i| format!("__out{i}.is_some()"))
        .collect::<Vec<_>>()
        .join(" && ");

    let outputs = (0..count)
        .map(|i| format!("__out{i}.take().unwrap()"))
        .collect::<Vec<_>>()
        .join(", ");

    output.push_str(&format!(
        "    if {all_done} {{\n\
                 Poll::Ready(({outputs},))\n\
             }} else {{\n\
                 Poll::Pending\n\
             }}\n"
    ));
    output.push_str("}).await\n");
    output.push_str("}\n");

    output
        .parse()
        .unwrap_or_else(|err| compile_error(&format!("join macro error: {err}")))
}

/// Runs an `async fn main` on a fresh Pacer runtime.
///
/// ```rust,ignore
/// #[pacer::main(event_interval = 32)]
/// async fn main() {
///     // ...
/// }
/// ```
#[proc_macro_attribute]
pub fn main(attr: TokenStream, item: TokenStream) -> TokenStream {
    match RuntimeArgs::parse(attr) {
        Ok(args) => wrap_in_runtime(item, &args.builder()),
        Err(msg) => compile_error(&msg),
    }
}

/// Runs an `async` test function on a fresh Pacer runtime.
///
/// ```rust,ignore
/// #[pacer::test]
/// async fn pops_what_was_pushed() {
///     let queue = WaitQueue::new(1);
///     queue.push(1).await;
///     assert_eq!(queue.pop().await, 1);
/// }
/// ```
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match RuntimeArgs::parse(attr) {
        Ok(args) => args,
        Err(msg) => return compile_error(&msg),
    };

    let test_attr: TokenStream = "#[::core::prelude::v1::test]".parse().unwrap_or_default();

    let mut result: Vec<TokenTree> = test_attr.into_iter().collect();
    result.extend(wrap_in_runtime(item, &args.builder()));

    result.into_iter().collect()
}
