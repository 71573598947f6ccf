//! Domain-focused tests for CRM records and the upsert payload builder.

use crate::crm::domain::{PersonName, PersonUpsert, TaskStatus, follow_up_title};
use crate::identity::EmailAddress;
use rstest::rstest;

fn email(value: &str) -> EmailAddress {
    EmailAddress::new(value).expect("valid email")
}

#[rstest]
fn follow_up_title_derives_from_the_display_name() {
    let title = follow_up_title(&PersonName::new("Jane", "Doe"));
    assert_eq!(title, "📞 Sales Follow-up — Jane Doe");
}

#[rstest]
fn follow_up_title_is_deterministic() {
    let name = PersonName::new("Jane", "Doe");
    assert_eq!(follow_up_title(&name), follow_up_title(&name));
}

#[rstest]
fn single_part_names_render_without_a_stray_space() {
    assert_eq!(PersonName::new("Cher", "").display(), "Cher");
    assert_eq!(PersonName::new("", "Doe").display(), "Doe");
}

#[rstest]
#[case(TaskStatus::Todo, "TODO", true)]
#[case(TaskStatus::InProgress, "IN_PROGRESS", false)]
#[case(TaskStatus::Done, "DONE", false)]
fn task_status_round_trips_and_classifies_openness(
    #[case] status: TaskStatus,
    #[case] wire: &str,
    #[case] open: bool,
) {
    assert_eq!(status.as_str(), wire);
    assert_eq!(TaskStatus::try_from(wire), Ok(status));
    assert_eq!(status.is_open(), open);
}

#[rstest]
fn unknown_task_status_is_rejected() {
    assert!(TaskStatus::try_from("SNOOZED").is_err());
}

#[rstest]
fn numeric_credit_hint_becomes_the_budget() {
    let payload = PersonUpsert::new(email("jane@example.com")).with_budget_hint(" 25000.50 ");
    assert_eq!(payload.budget(), Some(25000.50));
}

#[rstest]
fn unparseable_credit_hint_is_dropped_silently() {
    let payload = PersonUpsert::new(email("jane@example.com")).with_budget_hint("around 25k");
    assert_eq!(payload.budget(), None);
}

#[rstest]
fn blank_job_title_is_not_included() {
    let payload = PersonUpsert::new(email("jane@example.com")).with_job_title("   ");
    assert_eq!(payload.job_title(), None);
}

#[rstest]
fn job_title_is_trimmed() {
    let payload = PersonUpsert::new(email("jane@example.com")).with_job_title(" Engineer ");
    assert_eq!(payload.job_title(), Some("Engineer"));
}

#[rstest]
fn whitespace_only_names_leave_the_payload_nameless() {
    let payload = PersonUpsert::new(email("jane@example.com")).with_name("  ", "  ");
    assert!(!payload.has_name());
}

#[rstest]
fn phone_codes_are_fixed() {
    assert_eq!(PersonUpsert::PHONE_CALLING_CODE, "+1");
    assert_eq!(PersonUpsert::PHONE_COUNTRY_CODE, "CA");
}
