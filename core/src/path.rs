//! Path template resolution and base-URL joining.
//!
//! Templates contain literal text and `:name` tokens. A token may carry a
//! brace-balanced constraint (`:id{[0-9]+}`) and a trailing `?` marking it
//! optional. The constraint only matters to the server side; here it is
//! dropped along with the rest of the token on substitution.

use indexmap::IndexMap;

use crate::error::ApiError;

/// Path parameter values keyed by token name. `None` means "no value".
pub type PathParams = IndexMap<String, Option<String>>;

/// A `:name` token found in a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathToken<'a> {
    pub name: &'a str,
    pub constraint: Option<&'a str>,
    pub optional: bool,
    start: usize,
    end: usize,
}

/// Scan `template` for parameter tokens in order of appearance.
///
/// A `:` only starts a token when followed by an ASCII letter or `_`, so the
/// colons in `http://` and `host:8080` stay literal. The name then runs to the
/// next `/`, `{` or `?`, so `:user-id` and `:file.ext` are single names.
pub fn path_tokens(template: &str) -> Vec<PathToken<'_>> {
    let bytes = template.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b':' {
            i += 1;
            continue;
        }
        let name_start = i + 1;
        match bytes.get(name_start) {
            Some(b) if b.is_ascii_alphabetic() || *b == b'_' => {}
            _ => {
                i += 1;
                continue;
            }
        }
        let mut j = name_start;
        while j < bytes.len() && !matches!(bytes[j], b'/' | b'{' | b'?') {
            j += 1;
        }
        let name = &template[name_start..j];

        let mut constraint = None;
        if bytes.get(j) == Some(&b'{') {
            let open = j;
            let mut depth = 0usize;
            while j < bytes.len() {
                match bytes[j] {
                    b'{' => depth += 1,
                    b'}' => {
                        depth -= 1;
                        if depth == 0 {
                            j += 1;
                            break;
                        }
                    }
                    _ => {}
                }
                j += 1;
            }
            constraint = Some(&template[open..j]);
        }

        let optional = bytes.get(j) == Some(&b'?');
        if optional {
            j += 1;
        }

        tokens.push(PathToken {
            name,
            constraint,
            optional,
            start: i,
            end: j,
        });
        i = j;
    }
    tokens
}

/// Substitute `params` into `template`.
///
/// Tokens absent from `params` are left as they are. A token mapped to `None`
/// removes its whole path segment when optional and is an error otherwise.
pub fn resolve_path(template: &str, params: &PathParams) -> Result<String, ApiError> {
    let mut out = String::with_capacity(template.len());
    let mut elided = Vec::new();
    let mut cursor = 0;

    for token in path_tokens(template) {
        out.push_str(&template[cursor..token.start]);
        cursor = token.end;
        match params.get(token.name) {
            None => out.push_str(&template[token.start..token.end]),
            Some(Some(value)) => out.push_str(&urlencoding::encode(value)),
            Some(None) if token.optional => elided.push(out.len()),
            Some(None) => {
                return Err(ApiError::MissingParam {
                    name: token.name.to_string(),
                })
            }
        }
    }
    out.push_str(&template[cursor..]);

    if elided.is_empty() {
        return Ok(out);
    }

    // Segment bounds are computed on the unmodified string, then removed
    // back to front so earlier offsets stay valid.
    let mut segments: Vec<(usize, usize)> = elided
        .into_iter()
        .map(|pos| {
            let start = out[..pos].rfind('/').unwrap_or(0);
            let end = out[pos..].find('/').map_or(out.len(), |off| pos + off);
            (start, end)
        })
        .collect();
    segments.dedup();
    for (start, end) in segments.into_iter().rev() {
        out.replace_range(start..end, "");
    }

    if !is_absolute_url(&out) {
        out = collapse_slashes(&out);
    }
    if out.is_empty() && template.starts_with('/') {
        out.push('/');
    }
    Ok(out)
}

/// Whether `path` carries a scheme separator.
pub fn is_absolute_url(path: &str) -> bool {
    path.contains("://")
}

/// Join `path` onto `base_url` unless `path` is already absolute.
pub fn join_base_url(base_url: Option<&str>, path: &str) -> String {
    if is_absolute_url(path) {
        return path.to_string();
    }
    match base_url.filter(|base| !base.is_empty()) {
        Some(base) => {
            let base = base.strip_suffix('/').unwrap_or(base);
            format!("{base}/{}", path.trim_start_matches('/'))
        }
        None => path.to_string(),
    }
}

fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut previous_slash = false;
    for c in path.chars() {
        if c == '/' && previous_slash {
            continue;
        }
        previous_slash = c == '/';
        out.push(c);
    }
    out
}
