//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel uses
//! them for compile-time query validation. `trips.user_id`,
//! `itinerary_days.trip_id`, and `itinerary_blocks.itinerary_day_id` carry
//! `ON DELETE CASCADE` so deleting a trip removes its whole itinerary.

diesel::table! {
    /// Registered user accounts.
    users (id) {
        /// Primary key (UUID v4).
        id -> Uuid,
        /// Unique email address, stored lowercase.
        email -> Varchar,
        /// Unique phone number in normalised form.
        phone -> Varchar,
        /// Salted bcrypt hash of the password.
        password_hash -> Varchar,
        /// Normalised first name.
        first_name -> Varchar,
        /// Normalised last name.
        last_name -> Varchar,
        /// Optional home city.
        city -> Nullable<Varchar>,
        /// Optional home country.
        country -> Nullable<Varchar>,
        /// Optional free-text biography.
        bio -> Nullable<Text>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Role catalogue, seeded by migrations (`USER`, `ADMIN`).
    roles (id) {
        /// Primary key (UUID v4).
        id -> Uuid,
        /// Unique role name.
        name -> Varchar,
    }
}

diesel::table! {
    /// Role assignments; ordering by `assigned_at` defines the primary role.
    user_roles (user_id, role_id) {
        /// Assigned user.
        user_id -> Uuid,
        /// Assigned role.
        role_id -> Uuid,
        /// Assignment timestamp.
        assigned_at -> Timestamptz,
    }
}

diesel::table! {
    /// User-owned trips.
    trips (id) {
        /// Primary key (UUID v4).
        id -> Uuid,
        /// Owning user.
        user_id -> Uuid,
        /// Trip title.
        title -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// First day of the trip.
        start_date -> Date,
        /// Last day of the trip.
        end_date -> Date,
        /// Optional cover photo URL.
        cover_photo_url -> Nullable<Varchar>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Calendar days within a trip.
    itinerary_days (id) {
        /// Primary key (UUID v4).
        id -> Uuid,
        /// Parent trip.
        trip_id -> Uuid,
        /// Caller-assigned position; positive, not unique per trip.
        day_number -> Int4,
        /// Calendar date.
        date -> Date,
        /// Optional city.
        city -> Nullable<Varchar>,
        /// Optional country.
        country -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Typed, time-bounded blocks within a day.
    itinerary_blocks (id) {
        /// Primary key (UUID v4).
        id -> Uuid,
        /// Parent day.
        itinerary_day_id -> Uuid,
        /// Block type name (`ACTIVITY`, `REST`, `SLEEP`, `GAP`).
        block_type -> Varchar,
        /// Title shown in the builder.
        title -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Start of the block, time of day.
        start_time -> Time,
        /// End of the block, strictly after the start.
        end_time -> Time,
        /// Optional non-negative cost estimate.
        estimated_cost -> Nullable<Float8>,
    }
}

diesel::joinable!(user_roles -> users (user_id));
diesel::joinable!(user_roles -> roles (role_id));
diesel::joinable!(trips -> users (user_id));
diesel::joinable!(itinerary_days -> trips (trip_id));
diesel::joinable!(itinerary_blocks -> itinerary_days (itinerary_day_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    roles,
    user_roles,
    trips,
    itinerary_days,
    itinerary_blocks,
);
