//! Domain-focused tests for lead aggregates.

use crate::crm::domain::PersonId;
use crate::identity::{ContactIdentity, EmailAddress, PhoneNumber};
use crate::lead::domain::{Lead, LeadDomainError, LeadName, LeadProfile};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

fn email_identity(email: &str) -> ContactIdentity {
    ContactIdentity::new(
        Some(EmailAddress::new(email).expect("valid email")),
        None,
    )
    .expect("valid identity")
}

#[rstest]
fn new_lead_is_unsynced_with_equal_timestamps(clock: DefaultClock) {
    let lead = Lead::new(
        email_identity("jane@example.com"),
        LeadName::new("Jane", "Doe"),
        LeadProfile::default(),
        &clock,
    );

    assert!(!lead.is_synced());
    assert!(lead.crm_link().is_none());
    assert_eq!(lead.created_at(), lead.updated_at());
}

#[rstest]
fn lead_name_is_trimmed(clock: DefaultClock) {
    let lead = Lead::new(
        email_identity("jane@example.com"),
        LeadName::new("  Jane ", " Doe  "),
        LeadProfile::default(),
        &clock,
    );

    assert_eq!(lead.name().first(), "Jane");
    assert_eq!(lead.name().last(), "Doe");
}

#[rstest]
fn link_crm_marks_the_lead_synced(clock: DefaultClock) {
    let mut lead = Lead::new(
        email_identity("jane@example.com"),
        LeadName::new("Jane", "Doe"),
        LeadProfile::default(),
        &clock,
    );

    lead.link_crm(PersonId::new("person-1"), &clock)
        .expect("linking should succeed");

    assert!(lead.is_synced());
    assert_eq!(lead.crm_link(), Some(&PersonId::new("person-1")));
}

#[rstest]
fn relinking_the_same_person_is_a_noop(clock: DefaultClock) {
    let mut lead = Lead::new(
        email_identity("jane@example.com"),
        LeadName::new("Jane", "Doe"),
        LeadProfile::default(),
        &clock,
    );
    lead.link_crm(PersonId::new("person-1"), &clock)
        .expect("linking should succeed");

    lead.link_crm(PersonId::new("person-1"), &clock)
        .expect("relinking the same person should succeed");

    assert_eq!(lead.crm_link(), Some(&PersonId::new("person-1")));
}

#[rstest]
fn relinking_a_different_person_is_rejected(clock: DefaultClock) {
    let mut lead = Lead::new(
        email_identity("jane@example.com"),
        LeadName::new("Jane", "Doe"),
        LeadProfile::default(),
        &clock,
    );
    lead.link_crm(PersonId::new("person-1"), &clock)
        .expect("linking should succeed");

    let result = lead.link_crm(PersonId::new("person-2"), &clock);

    assert_eq!(result, Err(LeadDomainError::CrmLinkConflict(lead.id())));
    assert_eq!(lead.crm_link(), Some(&PersonId::new("person-1")));
}

#[rstest]
fn phone_only_identity_is_valid() {
    let identity = ContactIdentity::new(
        None,
        Some(PhoneNumber::new("+1 (555) 123-4567").expect("valid phone")),
    )
    .expect("valid identity");

    assert!(identity.email().is_none());
    assert_eq!(
        identity.phone_key().expect("key present").as_str(),
        "5551234567"
    );
}
