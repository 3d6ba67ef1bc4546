//! Prompt template rendering
//!
//! Templates use `{name}` placeholders. `{{` and `}}` produce literal braces.

use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while rendering a template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Variable '{0}' was not provided")]
    MissingVariable(String),

    #[error("Unmatched '{brace}' at byte {position}")]
    UnmatchedBrace { brace: char, position: usize },
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Brace(char),
    Placeholder(&'a str),
}

fn segments(template: &str) -> Result<Vec<Segment<'_>>, TemplateError> {
    let bytes = template.as_bytes();
    let mut out = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' | b'}' if bytes.get(i + 1) == Some(&bytes[i]) => {
                out.push(Segment::Literal(&template[literal_start..i]));
                out.push(Segment::Brace(bytes[i] as char));
                i += 2;
                literal_start = i;
            }
            b'{' => {
                let close = template[i + 1..]
                    .find(['{', '}'])
                    .map(|offset| i + 1 + offset)
                    .filter(|&end| bytes[end] == b'}')
                    .ok_or(TemplateError::UnmatchedBrace {
                        brace: '{',
                        position: i,
                    })?;
                out.push(Segment::Literal(&template[literal_start..i]));
                out.push(Segment::Placeholder(&template[i + 1..close]));
                i = close + 1;
                literal_start = i;
            }
            b'}' => {
                return Err(TemplateError::UnmatchedBrace {
                    brace: '}',
                    position: i,
                });
            }
            _ => i += 1,
        }
    }
    out.push(Segment::Literal(&template[literal_start..]));
    Ok(out)
}

/// Substitute every `{name}` in `template` with `variables[name]`.
///
/// Extra variables are ignored. A placeholder without a value fails with
/// [`TemplateError::MissingVariable`].
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use structcall_domain::render_template;
///
/// let vars = HashMap::from([("name".to_string(), "Ana".to_string())]);
/// assert_eq!(render_template("Hi {name}", &vars).unwrap(), "Hi Ana");
/// assert!(render_template("Hi {name}", &HashMap::new()).is_err());
/// ```
pub fn render_template(
    template: &str,
    variables: &HashMap<String, String>,
) -> Result<String, TemplateError> {
    let mut rendered = String::with_capacity(template.len());
    for segment in segments(template)? {
        match segment {
            Segment::Literal(text) => rendered.push_str(text),
            Segment::Brace(brace) => rendered.push(brace),
            Segment::Placeholder(name) => {
                let value = variables
                    .get(name)
                    .ok_or_else(|| TemplateError::MissingVariable(name.to_string()))?;
                rendered.push_str(value);
            }
        }
    }
    Ok(rendered)
}
