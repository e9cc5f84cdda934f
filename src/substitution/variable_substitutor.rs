use std::collections::BTreeMap;

use crate::configuration::run_configuration::RunConfiguration;

/// Resolves `${name}` and `|name|` placeholders against the values of one test run.
///
/// The table is built once from a [`RunConfiguration`] and never changes, so a
/// substitutor can be shared freely between assertions.
#[derive(Clone, Debug, Default)]
pub struct VariableSubstitutor {
    variables: BTreeMap<String, String>,
}

impl VariableSubstitutor {
    pub fn new(variables: BTreeMap<String, String>) -> Self {
        VariableSubstitutor { variables }
    }

    pub fn from_configuration(configuration: &RunConfiguration) -> Self {
        let mut variables = configuration.variables.clone();
        variables.insert("host".to_string(), configuration.host.clone());
        variables.insert("port".to_string(), configuration.port.to_string());
        variables.insert("client.ip".to_string(), configuration.client_ip.clone());
        variables.insert("client.host".to_string(), configuration.client_host.clone());
        VariableSubstitutor { variables }
    }

    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Replace every known placeholder in a single left-to-right pass.
    /// Inserted values are not scanned again; unknown placeholders stay as written.
    pub fn substitute(&self, text: &str) -> String {
        if !text.contains("${") && !text.contains('|') {
            return text.to_string();
        }

        let mut result = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(pos) = rest.find(['$', '|']) {
            result.push_str(&rest[..pos]);
            let candidate = &rest[pos..];

            if let Some((value, consumed)) = self.match_placeholder(candidate) {
                result.push_str(value);
                rest = &candidate[consumed..];
            } else {
                // Not a placeholder we know; keep the marker character and move on
                result.push_str(&candidate[..1]);
                rest = &candidate[1..];
            }
        }

        result.push_str(rest);
        result
    }

    /// Substitute into raw content. Content that is not UTF-8 is returned untouched.
    pub fn substitute_bytes(&self, content: &[u8]) -> Vec<u8> {
        match std::str::from_utf8(content) {
            Ok(text) => self.substitute(text).into_bytes(),
            Err(_) => content.to_vec(),
        }
    }

    fn match_placeholder<'a>(&'a self, candidate: &str) -> Option<(&'a str, usize)> {
        let (name, consumed) = if let Some(inner) = candidate.strip_prefix("${") {
            let end = inner.find('}')?;
            (&inner[..end], end + 3)
        } else if let Some(inner) = candidate.strip_prefix('|') {
            let end = inner.find('|')?;
            (&inner[..end], end + 2)
        } else {
            return None;
        };

        if name.is_empty() || !name.chars().all(is_variable_name_char) {
            return None;
        }

        self.resolve(name).map(|value| (value, consumed))
    }
}

fn is_variable_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-'
}
