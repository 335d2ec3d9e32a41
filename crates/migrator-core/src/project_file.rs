//! Textual edits of MSBuild-style project descriptors.
//!
//! These helpers work on the raw text, not on a parsed document: they look
//! for `<ProjectReference Include="...">` elements, property elements and
//! their containers, and splice new text in with the indentation and line
//! endings already used by the file. Every function returns `Ok(None)` when
//! the file already has the requested shape.

use regex::{Captures, Regex};

use crate::error::{MigrationError, Result};

/// Default SDK attribute for newly created projects.
pub const DEFAULT_SDK: &str = "Microsoft.NET.Sdk";

fn newline_of(content: &str) -> &'static str {
    if content.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// Whitespace preceding `pos` on its line, or `None` when other text does.
fn indent_before(content: &str, pos: usize) -> Option<&str> {
    let line_start = content[..pos].rfind('\n').map_or(0, |i| i + 1);
    let prefix = &content[line_start..pos];
    prefix.trim().is_empty().then_some(prefix)
}

/// Escapes the characters that cannot appear verbatim in element text or
/// attribute values.
pub fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Regex alternation matching `include` in both separator spellings.
fn include_alternatives(include: &str) -> String {
    let backslash = escape_xml(&include.replace('/', "\\"));
    let forward = escape_xml(&include.replace('\\', "/"));
    format!("{}|{}", regex::escape(&backslash), regex::escape(&forward))
}

/// Splices `text` in front of `pos`; when only whitespace precedes `pos` on
/// its line, the text goes on its own line above it.
fn insert_before(content: &str, pos: usize, text: &str) -> String {
    let newline = newline_of(content);
    match indent_before(content, pos) {
        Some(indent) => {
            let line_start = pos - indent.len();
            format!(
                "{}{}{}{}",
                &content[..line_start],
                text,
                newline,
                &content[line_start..]
            )
        }
        None => format!("{}{}{}", &content[..pos], text, &content[pos..]),
    }
}

/// Adds `<ProjectReference Include="include" />`.
///
/// The element joins the item group that already holds project references;
/// otherwise a new item group is added before `</Project>`.
///
/// # Errors
///
/// Returns [`MigrationError::Precondition`] if the file has no `</Project>`
/// closing tag.
pub fn add_reference(content: &str, include: &str) -> Result<Option<String>> {
    let present = Regex::new(&format!(
        r#"<ProjectReference\s+Include\s*=\s*"(?:{})""#,
        include_alternatives(include)
    ))?;
    if present.is_match(content) {
        return Ok(None);
    }

    let newline = newline_of(content);
    let element = format!(r#"<ProjectReference Include="{}" />"#, escape_xml(include));

    if let Some(first) = content.find("<ProjectReference") {
        if let Some(offset) = content[first..].find("</ItemGroup>") {
            let indent = indent_before(content, first).unwrap_or("    ");
            let close = first + offset;
            let text = match indent_before(content, close) {
                Some(_) => format!("{indent}{element}"),
                None => element,
            };
            return Ok(Some(insert_before(content, close, &text)));
        }
    }

    let close = content.rfind("</Project>").ok_or_else(|| {
        MigrationError::precondition("No </Project> element found in project file")
    })?;
    let group = format!("  <ItemGroup>{newline}    {element}{newline}  </ItemGroup>");
    let text = match indent_before(content, close) {
        Some(_) => group,
        None => format!("{group}{newline}"),
    };
    Ok(Some(insert_before(content, close, &text)))
}

/// Removes every `<ProjectReference>` element whose `Include` is `include`,
/// together with an item group left empty by the removal.
pub fn remove_reference(content: &str, include: &str) -> Result<Option<String>> {
    let element = format!(
        r#"<ProjectReference\s+Include\s*=\s*"(?:{})"(?:[^>]*/>|[^>]*>.*?</ProjectReference>)"#,
        include_alternatives(include)
    );
    let on_own_line = Regex::new(&format!(r"(?ms)^[ \t]*{element}[ \t]*\r?\n?"))?;
    let inline = Regex::new(&format!(r"(?s){element}"))?;

    let removed = on_own_line.replace_all(content, "");
    let removed = inline.replace_all(&removed, "").into_owned();
    if removed == content {
        return Ok(None);
    }

    let empty_group =
        Regex::new(r"(?m)^[ \t]*<ItemGroup(?:\s[^>]*)?>\s*</ItemGroup>[ \t]*\r?\n?")?;
    Ok(Some(empty_group.replace_all(&removed, "").into_owned()))
}

/// Sets property element `name` to `value`.
///
/// Existing `<name>` elements get the new value; otherwise the element is
/// inserted at the top of the first `<PropertyGroup>`.
///
/// # Errors
///
/// Returns [`MigrationError::InvalidInput`] for a name that is not a valid
/// element name and [`MigrationError::Precondition`] when the property is
/// absent and the file has no `<PropertyGroup>`.
pub fn set_property(content: &str, name: &str, value: &str) -> Result<Option<String>> {
    let valid_name = Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$")?;
    if !valid_name.is_match(name) {
        return Err(MigrationError::invalid_input("PropertyName")
            .with_reason(format!("'{name}' is not a valid element name")));
    }

    let escaped = escape_xml(value);
    let name_pattern = regex::escape(name);
    let element = Regex::new(&format!(
        r"(?s)<{name_pattern}(?P<attrs>\s[^>/]*)?>.*?</{name_pattern}>"
    ))?;
    let self_closing = Regex::new(&format!(r"<{name_pattern}(?P<attrs>\s[^>/]*)?/>"))?;

    if element.is_match(content) || self_closing.is_match(content) {
        let render = |caps: &Captures<'_>| {
            let attrs = caps.name("attrs").map_or("", |m| m.as_str().trim_end());
            format!("<{name}{attrs}>{escaped}</{name}>")
        };
        let updated = element.replace_all(content, render);
        let updated = self_closing.replace_all(&updated, render).into_owned();
        return Ok((updated != content).then_some(updated));
    }

    let group = Regex::new(r"<PropertyGroup(?:\s[^>/]*)?>")?;
    let open = group.find(content).ok_or_else(|| {
        MigrationError::precondition("No <PropertyGroup> found in project file")
    })?;
    let newline = newline_of(content);
    let indent = indent_before(content, open.start()).unwrap_or("  ");
    let insertion = format!("{newline}{indent}  <{name}>{escaped}</{name}>");
    Ok(Some(format!(
        "{}{}{}",
        &content[..open.end()],
        insertion,
        &content[open.end()..]
    )))
}

/// Minimal SDK-style project descriptor.
pub fn new_project(sdk: &str, target_framework: Option<&str>) -> String {
    let properties = target_framework
        .map(|tfm| format!("    <TargetFramework>{}</TargetFramework>\n", escape_xml(tfm)))
        .unwrap_or_default();
    format!(
        "<Project Sdk=\"{}\">\n\n  <PropertyGroup>\n{properties}  </PropertyGroup>\n\n</Project>\n",
        escape_xml(sdk)
    )
}
