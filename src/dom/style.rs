/// Inline `style` attribute parsing and serialization

/// Split a `style` attribute into ordered `(property, value)` pairs.
///
/// Semicolons inside quotes or parentheses (`url(a;b)`) do not end a
/// declaration. Property names are lowercased; a repeated property keeps its
/// first position and its last value.
pub fn parse_declarations(style_attr: Option<&str>) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let Some(style_attr) = style_attr else {
        return out;
    };

    let mut start = 0usize;
    let mut depth = 0isize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, ch) in style_attr.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, ch) {
            (Some(_), '\\') => escaped = true,
            (Some(q), _) if ch == q => quote = None,
            (Some(_), _) => {}
            (None, '\'') | (None, '"') => quote = Some(ch),
            (None, '(') => depth += 1,
            (None, ')') => depth = (depth - 1).max(0),
            (None, ';') if depth == 0 => {
                push_declaration(&style_attr[start..i], &mut out);
                start = i + 1;
            }
            _ => {}
        }
    }
    push_declaration(&style_attr[start..], &mut out);

    out
}

fn push_declaration(raw: &str, out: &mut Vec<(String, String)>) {
    let Some((name, value)) = raw.split_once(':') else {
        return;
    };
    let name = name.trim().to_ascii_lowercase();
    if name.is_empty() {
        return;
    }
    let value = value.trim().to_string();
    match out.iter_mut().find(|(existing, _)| *existing == name) {
        Some(slot) => slot.1 = value,
        None => out.push((name, value)),
    }
}

/// Whether `value` can stand as the value of one declaration.
///
/// Rejects a top-level `;`, braces outside quotes, and unbalanced quotes or
/// parentheses, any of which would spill into neighbouring declarations.
pub fn is_declaration_value(value: &str) -> bool {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for ch in value.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, ch) {
            (_, '\\') => escaped = true,
            (Some(q), _) if ch == q => quote = None,
            (Some(_), _) => {}
            (None, '\'') | (None, '"') => quote = Some(ch),
            (None, '(') => depth += 1,
            (None, ')') => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
            }
            (None, ';') if depth == 0 => return false,
            (None, '{') | (None, '}') => return false,
            _ => {}
        }
    }
    quote.is_none() && depth == 0 && !escaped
}

/// Set or remove (`value == ""`) one declaration in place.
pub fn set_declaration(decls: &mut Vec<(String, String)>, name: &str, value: &str) {
    let name = name.to_ascii_lowercase();
    match decls.iter().position(|(prop, _)| *prop == name) {
        Some(pos) if value.is_empty() => {
            decls.remove(pos);
        }
        Some(pos) => decls[pos].1 = value.to_string(),
        None if !value.is_empty() => decls.push((name, value.to_string())),
        None => {}
    }
}

pub fn serialize_declarations(decls: &[(String, String)]) -> String {
    decls
        .iter()
        .map(|(name, value)| format!("{}: {};", name, value))
        .collect::<Vec<_>>()
        .join(" ")
}
