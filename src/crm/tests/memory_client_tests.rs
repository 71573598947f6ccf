//! Behavioural tests for the in-memory CRM client.

use crate::crm::adapters::memory::InMemoryCrm;
use crate::crm::domain::{
    MemberId, NewFollowUpTask, PersonName, PersonUpsert, TaskStatus, WorkspaceMember,
};
use crate::crm::ports::{CrmClient, CrmClientError, UpsertOutcome};
use crate::identity::{EmailAddress, PhoneNumber};
use rstest::{fixture, rstest};

#[fixture]
fn crm() -> InMemoryCrm {
    InMemoryCrm::new()
}

fn email(value: &str) -> EmailAddress {
    EmailAddress::new(value).expect("valid email")
}

fn payload(address: &str) -> PersonUpsert {
    PersonUpsert::new(email(address)).with_name("Jane", "Doe")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn upserting_the_same_email_twice_keeps_one_person(crm: InMemoryCrm) {
    let first = crm
        .upsert_person(&payload("jane@example.com"))
        .await
        .expect("first upsert should succeed");
    let second = crm
        .upsert_person(&payload("jane@example.com"))
        .await
        .expect("second upsert should succeed");

    assert_eq!(first, second);
    assert_eq!(crm.person_count(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn upsert_resolves_people_found_by_email_and_phone(crm: InMemoryCrm) {
    let phone = PhoneNumber::new("+1 (555) 123-4567").expect("valid phone");
    let request = payload("jane@example.com")
        .with_phone(phone.match_key().expect("key present"));
    let outcome = crm
        .upsert_person(&request)
        .await
        .expect("upsert should succeed");
    let UpsertOutcome::Resolved(id) = outcome else {
        panic!("expected a resolved person, got {outcome:?}");
    };

    let by_email = crm
        .find_person_by_email(&email("jane@example.com"))
        .await
        .expect("lookup should succeed");
    let by_phone = crm
        .find_person_by_phone(&phone.match_key().expect("key present"))
        .await
        .expect("lookup should succeed");

    assert_eq!(by_email.as_ref(), Some(&id));
    assert_eq!(by_phone, Some(id));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn acknowledged_upserts_still_store_the_person(crm: InMemoryCrm) {
    crm.acknowledge_upserts();

    let outcome = crm
        .upsert_person(&payload("jane@example.com"))
        .await
        .expect("upsert should succeed");

    assert_eq!(outcome, UpsertOutcome::Acknowledged);
    assert_eq!(crm.person_count(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn armed_conflicts_fail_then_clear(crm: InMemoryCrm) {
    crm.fail_upserts_with_conflict(1);

    let first = crm.upsert_person(&payload("jane@example.com")).await;
    assert!(matches!(first, Err(CrmClientError::Conflict(_))));

    crm.upsert_person(&payload("jane@example.com"))
        .await
        .expect("second upsert should succeed");
    assert_eq!(crm.person_count(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn open_task_counts_follow_assignment(crm: InMemoryCrm) {
    let member = MemberId::new("member-1");
    crm.add_member(WorkspaceMember::new(member.clone()));
    crm.seed_task("first", TaskStatus::Todo, Some(member.clone()));
    crm.seed_task("second", TaskStatus::Done, Some(member.clone()));
    crm.seed_task("third", TaskStatus::Todo, Some(MemberId::new("member-2")));

    let count = crm
        .count_open_tasks(&member)
        .await
        .expect("count should succeed");

    assert_eq!(count, 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_open_tasks_excludes_completed_ones(crm: InMemoryCrm) {
    crm.seed_task("open", TaskStatus::Todo, None);
    crm.seed_task("closed", TaskStatus::Done, None);

    let open = crm
        .list_open_tasks()
        .await
        .expect("listing should succeed");

    assert_eq!(open.len(), 1);
    assert_eq!(open.first().expect("one task").title(), "open");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_creation_failure_knob_rejects_matching_titles(crm: InMemoryCrm) {
    crm.fail_task_creation_for("doomed");

    let result = crm
        .create_task(&NewFollowUpTask::new(
            "doomed",
            "body",
            MemberId::new("member-1"),
        ))
        .await;

    assert!(matches!(
        result,
        Err(CrmClientError::Upstream { status: 500, .. })
    ));
    assert!(crm.all_tasks().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn seeded_people_are_listed(crm: InMemoryCrm) {
    let _id = crm.seed_person(
        PersonName::new("Jane", "Doe"),
        Some(email("jane@example.com")),
        None,
    );

    let people = crm.list_people().await.expect("listing should succeed");

    assert_eq!(people.len(), 1);
    assert_eq!(
        people.first().expect("one person").name().display(),
        "Jane Doe"
    );
}
