//! Usage text for plugins
//!
//! Rendered for `--opt=help` and for `tradeplug plugin options <name>`.

use textwrap::{Options, WrapAlgorithm};

use super::options::OptionSchema;

/// Column width of usage text
pub const USAGE_WIDTH: usize = 78;

/// Sentence shown when a plugin declares no options
pub const NO_OPTIONS: &str = "This plugin does not support any options.";

/// Width reserved for the option name after `--opt=`
const NAME_WIDTH: usize = 12;

fn wrap_options<'a>(initial: &'a str, subsequent: &'a str) -> Options<'a> {
    Options::new(USAGE_WIDTH)
        .initial_indent(initial)
        .subsequent_indent(subsequent)
        .break_words(true)
        .wrap_algorithm(WrapAlgorithm::FirstFit)
}

/// Collapses whitespace runs and puts two spaces after sentence endings
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
            if ends_sentence(&out) {
                out.push(' ');
            }
        }
        out.push_str(word);
    }

    out
}

/// A lowercase letter, then `.`, `!` or `?`, then an optional closing quote
fn ends_sentence(text: &str) -> bool {
    let mut chars = text.trim_end().chars().rev().peekable();

    if matches!(chars.peek(), Some('"' | '\'')) {
        chars.next();
    }

    matches!(chars.next(), Some('.' | '!' | '?'))
        && chars.next().is_some_and(|c| c.is_ascii_lowercase())
}

fn fill(text: &str, initial: &str, subsequent: &str) -> String {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return initial.trim_end().to_string();
    }

    textwrap::fill(&normalized, wrap_options(initial, subsequent))
}

/// Renders the plugin description followed by its options
pub fn usage(doc: &str, schema: &OptionSchema) -> String {
    let mut text = fill(doc, "", "");
    text.push_str("\n\n");

    if schema.is_empty() {
        text.push_str(NO_OPTIONS);
        text.push('\n');
        return text;
    }

    text.push_str("Options supported by this plugin:\n");

    let continuation = " ".repeat("--opt=".len() + NAME_WIDTH + 2);
    for (name, description) in schema.iter() {
        let prefix = format!("--opt={:<width$}  ", name, width = NAME_WIDTH);
        text.push_str(&fill(description, &prefix, &continuation));
        text.push('\n');
    }

    text
}
