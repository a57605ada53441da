//! HTML form rendering.
//!
//! Produces the `<fieldset>` blocks of the configuration page. The caller
//! wraps them in a `<form>`; argument names match the JSON keys so the
//! submission can be applied with `ConfigStore::apply_form`.

use std::borrow::Cow;
use std::fmt::Write;

use crate::schema::FieldSpec;
use crate::store::ConfigStore;
use crate::value::{FieldKind, Value};

impl ConfigStore {
    /// Render one labeled input per field, grouped by fieldset.
    pub fn render_form(&self) -> String {
        let mut html = String::new();
        let mut open_group: Option<&str> = None;

        for (spec, value) in self.iter() {
            if open_group != Some(spec.group) {
                if open_group.is_some() {
                    html.push_str("</fieldset>\n");
                }
                html.push_str("<fieldset>\n");
                if !spec.group.is_empty() {
                    let _ = writeln!(html, "<legend>{}</legend>", escape(spec.group));
                }
                open_group = Some(spec.group);
            }
            render_field(&mut html, spec, value);
        }

        if open_group.is_some() {
            html.push_str("</fieldset>\n");
        }
        html
    }
}

fn render_field(html: &mut String, spec: &FieldSpec, value: &Value) {
    let name = escape(spec.name);
    let label = escape(spec.label);

    match value {
        Value::Bool(checked) => {
            let _ = writeln!(
                html,
                "<label><input type='checkbox' name='{}' value='1'{}> {}</label><br>",
                name,
                if *checked { " checked" } else { "" },
                label
            );
        }
        Value::Text(text) => {
            let input_type = if spec.secret { "password" } else { "text" };
            let _ = writeln!(
                html,
                "<label>{} <input type='{}' name='{}' value='{}' style='width:15em'></label><br>",
                label,
                input_type,
                name,
                escape(text)
            );
        }
        number => {
            // Placeholder only while the field holds its sentinel.
            let (shown, placeholder) = match spec.sentinel.filter(|s| s.value.matches(number)) {
                Some(s) => (String::new(), format!(" placeholder='{}'", escape(s.placeholder))),
                None => (number.to_string(), String::new()),
            };
            let width = if spec.kind() == FieldKind::SmallInt {
                "2.1em"
            } else {
                "4em"
            };
            let _ = writeln!(
                html,
                "<label>{} <input type='text' name='{}' value='{}'{} style='width:{}'></label><br>",
                label, name, shown, placeholder, width
            );
        }
    }
}

/// Escape text for use in element content and single- or double-quoted attributes.
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '\'', '"']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input_for<'a>(html: &'a str, name: &str) -> &'a str {
        let needle = format!("name='{}'", name);
        let at = html.find(&needle).unwrap();
        let start = html[..at].rfind("<input").unwrap();
        let end = at + html[at..].find('>').unwrap();
        &html[start..=end]
    }

    #[test]
    fn test_disabled_temperature_renders_empty() {
        let store = ConfigStore::node();
        assert_eq!(store.get::<f32>("tAlarmMin1"), Some(-127.0));

        let html = store.render_form();
        let input = input_for(&html, "tAlarmMin1");

        assert!(input.contains("value=''"), "{}", input);
        assert!(input.contains("placeholder='off'"));
        assert!(!input.contains("-127"));
    }

    #[test]
    fn test_explicit_value_renders_plainly() {
        let mut store = ConfigStore::node();
        store.set("tAlarmMin1", 4.5f32).unwrap();
        store.set("alarmInit2", 0i8).unwrap();
        store.set("dataStoreDelay", 30).unwrap();

        let html = store.render_form();

        assert!(input_for(&html, "tAlarmMin1").contains("value='4.5'"));
        assert!(!input_for(&html, "tAlarmMin1").contains("placeholder"));
        assert!(!input_for(&html, "alarmInit2").contains("placeholder"));
        assert!(input_for(&html, "alarmInit2").contains("value='0'"));
        assert!(input_for(&html, "alarmInit1").contains("value=''"));
        assert!(input_for(&html, "alarmInit1").contains("placeholder='auto'"));
        assert!(input_for(&html, "dataStoreDelay").contains("value='30'"));
    }

    #[test]
    fn test_checkbox_state() {
        let mut store = ConfigStore::node();
        store.set("alarmActive", true).unwrap();

        let html = store.render_form();

        assert!(input_for(&html, "alarmActive").contains(" checked"));
        assert!(!input_for(&html, "alarmAutoMode").contains("checked"));
    }

    #[test]
    fn test_every_field_has_an_input() {
        let store = ConfigStore::node();
        let html = store.render_form();

        for spec in store.schema().fields() {
            assert!(html.contains(&format!("name='{}'", spec.name)), "{}", spec.name);
        }
        assert_eq!(html.matches("<fieldset>").count(), 5);
        assert_eq!(html.matches("</fieldset>").count(), 5);
        assert!(html.contains("<legend>Data reporting</legend>"));
    }

    #[test]
    fn test_text_values_are_escaped() {
        let mut store = ConfigStore::node();
        store.set("hostname", "a'b<c>").unwrap();

        let html = store.render_form();

        assert!(input_for(&html, "hostname").contains("value='a&#39;b&lt;c&gt;'"));
    }

    #[test]
    fn test_secret_renders_as_password() {
        let html = ConfigStore::node().render_form();
        assert!(input_for(&html, "storePassword").contains("type='password'"));
        assert!(input_for(&html, "storeURL").contains("type='text'"));
    }

    #[test]
    fn test_escape_passthrough() {
        assert!(matches!(escape("plain"), Cow::Borrowed("plain")));
    }
}
