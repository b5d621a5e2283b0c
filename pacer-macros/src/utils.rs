use proc_macro::{Delimiter, Group, Spacing, TokenStream, TokenTree};

/// Splits a `TokenStream` into comma-separated arguments.
///
/// Each argument is returned as a `Vec<TokenTree>`. Groups are single
/// token trees, so commas nested inside parentheses, brackets or braces
/// never split an argument. Empty arguments (e.g. a trailing comma) are
/// skipped.
pub(crate) fn split_args(input: TokenStream) -> Vec<Vec<TokenTree>> {
    let mut args = Vec::new();
    let mut current = Vec::new();

    for token in input {
        match &token {
            TokenTree::Punct(p) if p.as_char() == ',' => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(token),
        }
    }

    if !current.is_empty() {
        args.push(current);
    }

    args
}

/// Converts a slice of tokens back into Rust source.
///
/// Tokens are separated by a space, except after a joint punctuation so
/// that `'a`, `::` or `=>` stay in one piece.
pub(crate) fn tokens_to_string(tokens: &[TokenTree]) -> String {
    let mut out = String::new();

    for t in tokens {
        out.push_str(&t.to_string());

        match t {
            TokenTree::Punct(p) if p.spacing() == Spacing::Joint => {}
            _ => out.push(' '),
        }
    }

    out.truncate(out.trim_end().len());
    out
}

/// Runtime options accepted by `#[pacer::main(...)]` and
/// `#[pacer::test(...)]`.
#[derive(Default)]
pub(crate) struct RuntimeArgs {
    pub(crate) event_interval: Option<usize>,
}

impl RuntimeArgs {
    /// Parses `key = value` pairs. Unknown keys are reported as an error
    /// message.
    pub(crate) fn parse(attr: TokenStream) -> Result<Self, String> {
        let mut args = RuntimeArgs::default();

        for arg in split_args(attr) {
            let text = tokens_to_string(&arg);
            let Some((key, value)) = text.split_once('=') else {
                return Err(format!("expected `key = value`, found `{text}`"));
            };

            match key.trim() {
                "event_interval" => {
                    let n = value
                        .trim()
                        .parse::<usize>()
                        .map_err(|_| format!("invalid event_interval `{}`", value.trim()))?;
                    args.event_interval = Some(n);
                }
                other => return Err(format!("unknown runtime option `{other}`")),
            }
        }

        Ok(args)
    }

    /// Source of an expression building the configured runtime.
    pub(crate) fn builder(&self) -> String {
        let mut builder = String::from("::pacer::RuntimeBuilder::new()");

        if let Some(n) = self.event_interval {
            builder.push_str(&format!(".event_interval({n})"));
        }

        builder.push_str(".build()");
        builder
    }
}

/// Rewrites an `async fn` so that its body runs inside `block_on` on a
/// fresh runtime.
///
/// The `async` keyword is removed from the signature and the body becomes
/// `{ <runtime>.block_on(async move { <body> }) }`.
pub(crate) fn wrap_in_runtime(item: TokenStream, runtime: &str) -> TokenStream {
    let mut tokens: Vec<TokenTree> = item.into_iter().collect();

    if let Some(async_pos) = tokens
        .iter()
        .position(|t| matches!(t, TokenTree::Ident(id) if id.to_string() == "async"))
    {
        tokens.remove(async_pos);
    }

    let Some(pos) = tokens
        .iter()
        .rposition(|t| matches!(t, TokenTree::Group(g) if g.delimiter() == Delimiter::Brace))
    else {
        return compile_error("expected a function body");
    };

    let body = match &tokens[pos] {
        TokenTree::Group(g) => g.stream().to_string(),
        _ => return compile_error("expected a function body"),
    };

    let wrapped = format!(
        "{{
            let __pacer_runtime = {runtime};
            __pacer_runtime.block_on(async move {{ {body} }})
        }}"
    );

    match wrapped.parse() {
        Ok(stream) => {
            tokens[pos] = TokenTree::Group(Group::new(Delimiter::Brace, stream));
            tokens.into_iter().collect()
        }
        Err(err) => compile_error(&format!("failed to wrap function body: {err}")),
    }
}

/// Emits `compile_error!("<msg>")`.
pub(crate) fn compile_error(msg: &str) -> TokenStream {
    format!("compile_error!({msg:?});")
        .parse()
        .unwrap_or_default()
}
