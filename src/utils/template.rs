// file: src/utils/template.rs
// description: placeholder substitution for prompt instruction text
// reference: Internal code standards

/// Fixed instruction text with `{name}` placeholders. Braces that do not
/// form a known placeholder are left untouched, so JSON examples can be
/// embedded verbatim.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: &'static str,
}

impl PromptTemplate {
    pub const fn new(template: &'static str) -> Self {
        Self { template }
    }

    pub fn text(&self) -> &'static str {
        self.template
    }

    pub fn render(&self, values: &[(&str, &str)]) -> String {
        let mut result = self.template.to_string();

        for (key, value) in values {
            let placeholder = format!("{{{}}}", key);
            result = result.replace(&placeholder, value);
        }

        result
    }

    /// Names of `{identifier}` placeholders in order of first appearance.
    pub fn placeholders(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        let mut rest = self.template;

        while let Some(open) = rest.find('{') {
            rest = &rest[open + 1..];
            let Some(close) = rest.find('}') else {
                break;
            };
            let candidate = &rest[..close];
            if !candidate.is_empty()
                && candidate.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                && !names.contains(&candidate)
            {
                names.push(candidate);
            }
        }

        names
    }
}
