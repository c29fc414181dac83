//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly.

diesel::table! {
    /// Registered accounts. `email` is unique and stored lowercase.
    accounts (id) {
        id -> Uuid,
        email -> Varchar,
        name -> Varchar,
        /// `student` or `admin`.
        role -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    courses (id) {
        id -> Uuid,
        name -> Varchar,
        course_date -> Date,
        start_time -> Time,
        end_time -> Time,
        max_capacity -> Int4,
        registration_opens_at -> Timestamptz,
        registration_closes_at -> Timestamptz,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// The single enrollment relation. Keyed by account, so each account
    /// holds at most one row; rows cascade away with their course.
    enrollments (account_id) {
        account_id -> Uuid,
        course_id -> Uuid,
        enrolled_at -> Timestamptz,
    }
}

diesel::joinable!(enrollments -> accounts (account_id));
diesel::joinable!(enrollments -> courses (course_id));

diesel::allow_tables_to_appear_in_same_query!(accounts, courses, enrollments);
