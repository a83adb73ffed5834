use regex::Regex;

/// Delimiters accepted around PCRE-style patterns (`/^items$/i`).
const DELIMITERS: &[char] = &['/', '#', '~', '@', '!', '%', '|'];

/// Compile a binding's path pattern.
///
/// Accepts a bare regular expression (`^items\.\d+$`) or a delimited one as
/// found in older settings files (`/^items\.\d+$/i`). Trailing flags `i`, `m`,
/// `s`, `x` and `U` become inline flags; `u` is accepted and ignored since
/// matching is always Unicode-aware.
///
/// ```
/// use nxcrud_registry::compile_pattern;
///
/// assert!(compile_pattern(r"/^items\.0$/").unwrap().is_match("items.0"));
/// assert!(compile_pattern(r"^ITEMS").unwrap().is_match("ITEMS.0"));
/// assert!(compile_pattern(r"#^items#i").unwrap().is_match("ITEMS.0"));
/// assert!(compile_pattern(r"/^items/q").is_err());
/// ```
pub fn compile_pattern(raw: &str) -> Result<Regex, String> {
    let (body, flags) = split_delimited(raw)?;
    let mut inline = String::new();
    for flag in flags.chars() {
        match flag {
            'i' | 'm' | 's' | 'x' | 'U' => {
                if !inline.contains(flag) {
                    inline.push(flag);
                }
            }
            'u' => {}
            other => return Err(format!("unsupported pattern flag '{other}'")),
        }
    }
    let source = if inline.is_empty() {
        body.to_string()
    } else {
        format!("(?{inline}){body}")
    };
    Regex::new(&source).map_err(|e| e.to_string())
}

fn split_delimited(raw: &str) -> Result<(&str, &str), String> {
    let Some(delimiter) = raw.chars().next().filter(|c| DELIMITERS.contains(c)) else {
        return Ok((raw, ""));
    };
    let inner = &raw[delimiter.len_utf8()..];
    let close = inner
        .rfind(delimiter)
        .ok_or_else(|| format!("missing closing delimiter '{delimiter}'"))?;
    let flags = &inner[close + delimiter.len_utf8()..];
    if !flags.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(format!("unexpected text after closing delimiter: '{flags}'"));
    }
    Ok((&inner[..close], flags))
}
