//! Instruction template rendering

use chrono::NaiveDate;
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

/// Values available to the instruction template
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext {
    /// ISO date, e.g. 2026-10-16
    pub today: String,
    /// Weekday name, e.g. Friday
    pub weekday: String,
}

impl PromptContext {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            today: date.format("%Y-%m-%d").to_string(),
            weekday: date.format("%A").to_string(),
        }
    }
}

/// Render instructions as a Handlebars template
///
/// Output is plain text, so HTML escaping is disabled.
pub fn render_instructions(template: &str, ctx: &PromptContext) -> Result<String, handlebars::RenderError> {
    debug!(template_len = template.len(), today = %ctx.today, "render_instructions: called");
    let mut hbs = Handlebars::new();
    hbs.register_escape_fn(handlebars::no_escape);
    hbs.render_template(template, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn test_renders_date_and_weekday() {
        let out = render_instructions("Today is {{weekday}}, {{today}}.", &PromptContext::for_date(date())).unwrap();
        assert_eq!(out, "Today is Friday, 2026-10-16.");
    }

    #[test]
    fn test_no_html_escaping() {
        let out = render_instructions("Use `get_weather` & <think> '{{today}}'", &PromptContext::for_date(date())).unwrap();
        assert_eq!(out, "Use `get_weather` & <think> '2026-10-16'");
    }

    #[test]
    fn test_default_instructions_render() {
        let out = render_instructions(super::super::DEFAULT_INSTRUCTIONS, &PromptContext::for_date(date())).unwrap();
        assert!(out.starts_with("Ви розумний асистент з планування дня"));
        assert!(out.contains("Сьогодні 2026-10-16."));
        assert!(out.contains("`get_user_location_by_ip`"));
        assert!(!out.contains("{{"));
    }

    #[test]
    fn test_unclosed_expression_is_error() {
        assert!(render_instructions("Today is {{today", &PromptContext::for_date(date())).is_err());
    }
}
