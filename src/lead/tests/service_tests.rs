//! Service orchestration tests for idempotent lead intake.

use std::sync::Arc;

use crate::identity::IdentityError;
use crate::lead::{
    adapters::memory::InMemoryLeadRepository,
    ports::LeadQuery,
    services::{IntakeLeadRequest, IntakeOutcome, LeadIntakeError, LeadIntakeService},
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestService = LeadIntakeService<InMemoryLeadRepository, DefaultClock>;

#[fixture]
fn service() -> TestService {
    LeadIntakeService::new(
        Arc::new(InMemoryLeadRepository::new()),
        Arc::new(DefaultClock),
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn intake_creates_and_stores_a_new_lead(service: TestService) {
    let request = IntakeLeadRequest::new()
        .with_name("Jane", "Doe")
        .with_email("Jane@Example.com")
        .with_phone("+1 (555) 123-4567")
        .with_city("Toronto")
        .with_current_credit("25000");

    let outcome = service.intake(request).await.expect("intake should succeed");

    let IntakeOutcome::Created(lead_id) = outcome else {
        panic!("expected a created lead, got {outcome:?}");
    };
    let stored = service
        .find_lead(lead_id)
        .await
        .expect("lookup should succeed")
        .expect("lead should be stored");
    assert_eq!(stored.name().first(), "Jane");
    assert_eq!(
        stored.identity().email().expect("email present").as_str(),
        "jane@example.com"
    );
    assert_eq!(stored.profile().credit_hint.as_deref(), Some("25000"));
    assert!(!stored.is_synced());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resubmitting_the_same_email_returns_the_existing_lead(service: TestService) {
    let first = service
        .intake(IntakeLeadRequest::new().with_email("jane@example.com"))
        .await
        .expect("first intake should succeed");

    let second = service
        .intake(
            IntakeLeadRequest::new()
                .with_email("JANE@example.com")
                .with_phone("+1 (999) 999-9999"),
        )
        .await
        .expect("second intake should succeed");

    assert_eq!(second, IntakeOutcome::Existing(first.lead_id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resubmitting_a_reformatted_phone_returns_the_existing_lead(service: TestService) {
    let first = service
        .intake(IntakeLeadRequest::new().with_phone("5551234567"))
        .await
        .expect("first intake should succeed");

    let second = service
        .intake(IntakeLeadRequest::new().with_phone("+1 (555) 123-4567"))
        .await
        .expect("second intake should succeed");

    assert_eq!(second, IntakeOutcome::Existing(first.lead_id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn intake_without_any_contact_point_is_rejected(service: TestService) {
    let result = service
        .intake(IntakeLeadRequest::new().with_name("Jane", "Doe"))
        .await;

    assert!(matches!(
        result,
        Err(LeadIntakeError::Identity(
            IdentityError::MissingContactPoint
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn intake_rejects_an_unparseable_email(service: TestService) {
    let result = service
        .intake(IntakeLeadRequest::new().with_email("not-an-email"))
        .await;

    assert!(matches!(
        result,
        Err(LeadIntakeError::Identity(IdentityError::InvalidEmail(_)))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_matches_a_name_fragment(service: TestService) {
    service
        .intake(
            IntakeLeadRequest::new()
                .with_name("Jane", "Doe")
                .with_email("jane@example.com"),
        )
        .await
        .expect("intake should succeed");
    service
        .intake(
            IntakeLeadRequest::new()
                .with_name("Sam", "Smith")
                .with_email("sam@example.com"),
        )
        .await
        .expect("intake should succeed");

    let query = LeadQuery {
        name: Some("doe".to_owned()),
        ..LeadQuery::default()
    };
    let found = service.search(&query).await.expect("search should succeed");

    assert_eq!(found.len(), 1);
    assert_eq!(
        found.first().expect("one match").name().last(),
        "Doe"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn find_lead_returns_none_for_unknown_ids(service: TestService) {
    let missing = service
        .find_lead(crate::lead::domain::LeadId::new())
        .await
        .expect("lookup should succeed");
    assert!(missing.is_none());
}
