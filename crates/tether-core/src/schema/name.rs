//! Naming conventions used to derive table, alias and column names.

use heck::ToSnakeCase;

/// Singularizes `name`, keeping the casing of the part shared with the input.
///
/// Only English inflection is supported; names in any other language are
/// returned unchanged.
pub fn singularize(name: &str, language: &str) -> String {
    inflect(name, language, 1)
}

/// Pluralizes `name`, keeping the casing of the part shared with the input.
pub fn pluralize(name: &str, language: &str) -> String {
    inflect(name, language, 2)
}

/// Removes every run of `-`, `_` or whitespace, upper-casing the character
/// that follows it. Everything else is left as is.
///
/// `"get_primaryUsers"` becomes `"getPrimaryUsers"`.
pub fn camelize(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut upper_next = false;

    for ch in src.trim().chars() {
        if ch == '-' || ch == '_' || ch.is_whitespace() {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }

    out
}

/// Snake-cases `src` when `underscored` is set.
pub fn underscored_if(src: &str, underscored: bool) -> String {
    if underscored {
        src.to_snake_case()
    } else {
        src.to_string()
    }
}

/// Concatenates two table names, the one that sorts first (ignoring case)
/// coming first.
pub fn combine_table_names(a: &str, b: &str) -> String {
    if a.to_lowercase() < b.to_lowercase() {
        format!("{a}{b}")
    } else {
        format!("{b}{a}")
    }
}

fn inflect(name: &str, language: &str, count: isize) -> String {
    if name.is_empty() || !is_english(language) {
        return name.to_string();
    }

    let inflected = pluralizer::pluralize(&name.to_lowercase(), count, false);
    restore_case(name, &inflected)
}

fn is_english(language: &str) -> bool {
    let language = language.to_ascii_lowercase();
    language.is_empty() || language == "en" || language.starts_with("en-") || language == "english"
}

/// Copies the casing of `original` onto the common prefix of both words.
fn restore_case(original: &str, inflected: &str) -> String {
    let mut out = String::with_capacity(inflected.len());
    let mut original = original.chars();
    let mut inflected = inflected.chars().peekable();

    while let Some(&next) = inflected.peek() {
        match original.next() {
            Some(ch) if ch.to_lowercase().eq(next.to_lowercase()) => {
                out.push(ch);
                inflected.next();
            }
            _ => break,
        }
    }

    out.extend(inflected);
    out
}
