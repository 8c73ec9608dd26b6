//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered users and their cumulative points balance.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Normalised (trimmed, lower-case) email; unique.
        email -> Varchar,
        /// Points balance; `CHECK (points >= 0)`.
        points -> Int8,
        /// Registration timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Recorded recycling drop-offs. Rows are never updated or deleted.
    recycling_transactions (id) {
        id -> Uuid,
        /// Owning user; `ON DELETE CASCADE`.
        user_id -> Uuid,
        /// Canonical material name; constrained to the supported set.
        material_type -> Varchar,
        /// Weight in kilograms; `CHECK (weight_kg > 0)`.
        weight_kg -> Float8,
        /// Points credited for this drop-off.
        points_earned -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(recycling_transactions -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(recycling_transactions, users);
