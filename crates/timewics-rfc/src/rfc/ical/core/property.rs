//! iCalendar content line type (RFC 5545 §3.1).

use super::Parameter;

/// A raw content line as parsed from iCalendar text.
///
/// This is the tokenizer output: the field name, its parameters, and the
/// untouched value. Typed interpretation happens later, per field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    /// Property name (normalized to uppercase).
    pub name: String,
    /// Parameters in order of appearance.
    pub params: Vec<Parameter>,
    /// Raw value string (after unfolding, before any interpretation).
    pub raw_value: String,
}

impl ContentLine {
    /// Creates a new content line.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            raw_value: value.into(),
        }
    }

    /// Creates a content line with parameters.
    #[must_use]
    pub fn with_params(
        name: impl Into<String>,
        params: Vec<Parameter>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params,
            raw_value: value.into(),
        }
    }

    /// Returns the parameter with the given name.
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&Parameter> {
        let name_upper = name.to_ascii_uppercase();
        self.params.iter().find(|p| p.name == name_upper)
    }

    /// Returns the value of a parameter.
    #[must_use]
    pub fn get_param_value(&self, name: &str) -> Option<&str> {
        let p = self.get_param(name)?;
        p.value()
    }

    /// Returns the VALUE parameter if present.
    #[must_use]
    pub fn value_type(&self) -> Option<&str> {
        self.get_param_value("VALUE")
    }

    /// Returns the TZID parameter if present.
    #[must_use]
    pub fn tzid(&self) -> Option<&str> {
        self.get_param_value("TZID")
    }

    /// Returns whether the line is tagged `VALUE=DATE` (a bare date).
    #[must_use]
    pub fn is_date_only(&self) -> bool {
        self.value_type()
            .is_some_and(|v| v.eq_ignore_ascii_case("DATE"))
    }

    /// Returns the value with its parameters in front, e.g.
    /// `TZID=Europe/Paris:20240101T090000`.
    ///
    /// Lines without parameters return the bare value.
    #[must_use]
    pub fn qualified_value(&self) -> String {
        if self.params.is_empty() {
            return self.raw_value.clone();
        }
        let params: Vec<String> = self.params.iter().map(ToString::to_string).collect();
        format!("{}:{}", params.join(";"), self.raw_value)
    }

    /// Returns the value as free text, with double quotes turned into single
    /// quotes so it can be embedded in a quoted tag.
    #[must_use]
    pub fn text_value(&self) -> String {
        self.raw_value.trim_end().replace('"', "'")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_value_without_params() {
        let line = ContentLine::new("dtstart", "20240101T090000Z");
        assert_eq!(line.name, "DTSTART");
        assert_eq!(line.qualified_value(), "20240101T090000Z");
    }

    #[test]
    fn qualified_value_with_params() {
        let line = ContentLine::with_params(
            "DTSTART",
            vec![Parameter::tzid("America/New_York")],
            "20240101T090000",
        );
        assert_eq!(
            line.qualified_value(),
            "TZID=America/New_York:20240101T090000"
        );
        assert_eq!(line.tzid(), Some("America/New_York"));
    }

    #[test]
    fn date_only_detection() {
        let line =
            ContentLine::with_params("DTSTART", vec![Parameter::value_type("date")], "20240101");
        assert!(line.is_date_only());
        assert!(!ContentLine::new("DTSTART", "20240101T090000").is_date_only());
    }

    #[test]
    fn text_value_replaces_double_quotes() {
        let line = ContentLine::new("SUMMARY", "Review \"draft\" ");
        assert_eq!(line.text_value(), "Review 'draft'");
    }
}
