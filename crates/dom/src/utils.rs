//! Inline style helpers (`element.style`)
//!
//! Declarations are rewritten as `name: value;` pairs joined by a space.

use crate::types::DomNode;

/// Parse an inline `style` attribute into ordered `(property, value)` pairs
pub fn parse_inline_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|declaration| {
            let (name, value) = declaration.split_once(':')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_ascii_lowercase(), value.trim().to_string()))
        })
        .collect()
}

fn write_inline_style(declarations: &[(String, String)]) -> String {
    declarations
        .iter()
        .map(|(name, value)| format!("{}: {};", name, value))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Read one inline style property (`element.style.getPropertyValue`)
pub fn style_property(node: &DomNode, property: &str) -> Option<String> {
    parse_inline_style(node.attr("style")?)
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(property))
        .map(|(_, value)| value)
}

/// Set one inline style property, keeping the others in place
pub fn set_style_property(node: &mut DomNode, property: &str, value: &str) {
    let mut declarations = parse_inline_style(node.attr("style").unwrap_or(""));
    match declarations
        .iter_mut()
        .find(|(name, _)| name.eq_ignore_ascii_case(property))
    {
        Some((_, existing)) => *existing = value.to_string(),
        None => declarations.push((property.to_ascii_lowercase(), value.to_string())),
    }
    node.set_attr("style", write_inline_style(&declarations));
}

/// Remove one inline style property; drops the attribute once it is empty
pub fn remove_style_property(node: &mut DomNode, property: &str) -> Option<String> {
    let mut declarations = parse_inline_style(node.attr("style")?);
    let index = declarations
        .iter()
        .position(|(name, _)| name.eq_ignore_ascii_case(property))?;
    let (_, removed) = declarations.remove(index);

    if declarations.is_empty() {
        node.remove_attr("style");
    } else {
        node.set_attr("style", write_inline_style(&declarations));
    }
    Some(removed)
}
