//! Diesel schema for lead persistence.

diesel::table! {
    /// Locally captured leads pending CRM synchronisation.
    leads (id) {
        /// Internal lead identifier.
        id -> Uuid,
        /// Trimmed first name, possibly empty.
        #[max_length = 255]
        first_name -> Varchar,
        /// Trimmed last name, possibly empty.
        #[max_length = 255]
        last_name -> Varchar,
        /// Normalised email address.
        #[max_length = 320]
        email -> Nullable<Varchar>,
        /// Raw phone number as supplied at intake.
        #[max_length = 64]
        phone -> Nullable<Varchar>,
        /// Last-ten-digit phone match key derived at insert time.
        #[max_length = 10]
        phone_key -> Nullable<Varchar>,
        /// City reported by the lead.
        #[max_length = 255]
        city -> Nullable<Varchar>,
        /// Current job title.
        #[max_length = 255]
        job_title -> Nullable<Varchar>,
        /// Current employer.
        #[max_length = 255]
        company_name -> Nullable<Varchar>,
        /// Employment status.
        #[max_length = 64]
        employment_status -> Nullable<Varchar>,
        /// Vehicle type of interest.
        #[max_length = 64]
        vehicle_type -> Nullable<Varchar>,
        /// Free-form credit/budget hint.
        #[max_length = 64]
        credit_hint -> Nullable<Varchar>,
        /// Linked CRM person identifier.
        #[max_length = 64]
        crm_person_id -> Nullable<Varchar>,
        /// Whether the lead has been synchronised into the CRM.
        crm_synced -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last mutation timestamp.
        updated_at -> Timestamptz,
    }
}
