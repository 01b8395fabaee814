//! Bracketed placeholder substitution (`[BUSINESS_NAME]` style).
//!
//! The template is scanned, not the output: values are inserted verbatim and
//! never re-scanned, so a business name containing brackets cannot leak or
//! trigger a false failure.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::TemplateError;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([A-Z][A-Z0-9_]*)\]").expect("placeholder regex"));

/// Replace every placeholder in `template` with its value from `vars`.
///
/// Fails on the first placeholder without a value.
pub fn fill(template: &str, vars: &[(&str, &str)]) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for caps in PLACEHOLDER.captures_iter(template) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let key = &caps[1];
        let value = vars
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .ok_or_else(|| TemplateError::Unresolved {
                placeholder: key.to_string(),
            })?;
        out.push_str(&template[last..whole.start()]);
        out.push_str(value);
        last = whole.end();
    }
    out.push_str(&template[last..]);
    Ok(out)
}

/// Names of all placeholders in `template`, in order of appearance.
pub fn placeholders(template: &str) -> Vec<&str> {
    PLACEHOLDER
        .captures_iter(template)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_all_occurrences() {
        let out = fill(
            "Welcome to [BUSINESS_NAME]! [BUSINESS_NAME] is open [BUSINESS_HOURS].",
            &[("BUSINESS_NAME", "Mama Put"), ("BUSINESS_HOURS", "8am - 6pm")],
        )
        .unwrap();
        assert_eq!(out, "Welcome to Mama Put! Mama Put is open 8am - 6pm.");
    }

    #[test]
    fn unresolved_placeholder_fails() {
        let err = fill("Hello [NAME], see [MISSING]", &[("NAME", "Ada")]).unwrap_err();
        assert_eq!(
            err,
            TemplateError::Unresolved {
                placeholder: "MISSING".into()
            }
        );
    }

    #[test]
    fn values_are_not_rescanned() {
        let out = fill("Nice name! [BUSINESS_NAME]", &[("BUSINESS_NAME", "[VIP] Stores")]).unwrap();
        assert_eq!(out, "Nice name! [VIP] Stores");
    }

    #[test]
    fn plain_brackets_are_left_alone() {
        let out = fill("Size [m] or (l) - Bust: __ inches", &[]).unwrap();
        assert_eq!(out, "Size [m] or (l) - Bust: __ inches");
    }

    #[test]
    fn lists_placeholders() {
        assert_eq!(
            placeholders("A. [CATEGORY_A]\nB. [CATEGORY_B]"),
            vec!["CATEGORY_A", "CATEGORY_B"]
        );
    }
}
