use std::{borrow::Cow, sync::OnceLock};

use regex::{Captures, Regex};

/// Expand `{{ env.VAR }}` and `{{ env.VAR | default("x") }}` placeholders
///
/// Runs on the raw TOML text before deserialization. Comment lines are left
/// alone so a commented-out secret never has to be present in the environment.
pub fn expand_env(input: &str) -> Result<String, String> {
    let mut lines = Vec::new();

    for line in input.split('\n') {
        if line.trim_start().starts_with('#') {
            lines.push(Cow::Borrowed(line));
        } else {
            lines.push(expand_line(line)?);
        }
    }

    Ok(lines.join("\n"))
}

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([a-zA-Z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#)
            .expect("placeholder pattern must compile")
    })
}

fn expand_line(line: &str) -> Result<Cow<'_, str>, String> {
    let mut failure = None;

    let expanded = placeholder().replace_all(line, |captures: &Captures<'_>| {
        let fallback = captures.get(2).map(|m| m.as_str());

        resolve(&captures[1], fallback).unwrap_or_else(|err| {
            failure.get_or_insert(err);
            String::new()
        })
    });

    match failure {
        Some(err) => Err(err),
        None => Ok(expanded),
    }
}

fn resolve(key: &str, fallback: Option<&str>) -> Result<String, String> {
    let var_name = key
        .strip_prefix("env.")
        .filter(|name| !name.is_empty() && !name.contains('.'))
        .ok_or_else(|| format!("only variables scoped with 'env.' are supported: `{key}`"))?;

    match (std::env::var(var_name), fallback) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(fallback)) => Ok(fallback.to_string()),
        (Err(_), None) => Err(format!("environment variable not found: `{var_name}`")),
    }
}
