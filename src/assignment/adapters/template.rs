//! Minijinja-rendered static follow-up body.

use crate::assignment::ports::{ComposeError, FollowUpComposer};
use crate::crm::domain::Person;
use minijinja::Environment;
use serde::Serialize;

/// Markdown template for the follow-up body. Optional attributes render
/// only when the CRM reported them.
const FOLLOW_UP_BODY_TEMPLATE: &str = "\
## 🔥 Customer follow-up required

**Name:** {{ name }}
{% if email %}**Email:** {{ email }}
{% endif %}{% if city %}**City:** {{ city }}
{% endif %}
- Call the customer
- Understand requirements
- Confirm budget
- Update the CRM after the call
";

#[derive(Serialize)]
struct BodyContext<'a> {
    name: String,
    email: Option<&'a str>,
    city: Option<&'a str>,
}

/// Composer rendering the static markdown template.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateComposer;

impl TemplateComposer {
    /// Creates the template composer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FollowUpComposer for TemplateComposer {
    fn compose(&self, person: &Person) -> Result<String, ComposeError> {
        let context = BodyContext {
            name: person.name().display(),
            email: person.email().map(crate::identity::EmailAddress::as_str),
            city: person.city(),
        };
        let environment = Environment::new();
        environment
            .render_str(FOLLOW_UP_BODY_TEMPLATE, context)
            .map_err(|err| ComposeError::Render(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::TemplateComposer;
    use crate::assignment::ports::FollowUpComposer;
    use crate::crm::domain::{Person, PersonId, PersonName};
    use crate::identity::EmailAddress;

    #[test]
    fn body_carries_name_and_action_items() {
        let person = Person::new(
            PersonId::new("person-1"),
            PersonName::new("Jane", "Doe"),
        )
        .with_email(EmailAddress::new("jane@example.com").expect("valid email"))
        .with_city("Toronto");

        let body = TemplateComposer::new()
            .compose(&person)
            .expect("rendering should succeed");

        assert!(body.contains("Jane Doe"));
        assert!(body.contains("jane@example.com"));
        assert!(body.contains("Toronto"));
        assert!(body.contains("Call the customer"));
    }

    #[test]
    fn body_is_never_empty_without_optional_fields() {
        let person = Person::new(PersonId::new("person-2"), PersonName::new("Sam", ""));
        let body = TemplateComposer::new()
            .compose(&person)
            .expect("rendering should succeed");
        assert!(!body.trim().is_empty());
        assert!(!body.contains("**Email:**"));
    }
}
