//! Diesel table definitions; must match `backend/migrations`.

diesel::table! {
    /// Blog articles. `slug` carries the `articles_slug_key` unique constraint.
    articles (id) {
        id -> Int8,
        #[max_length = 200]
        title -> Varchar,
        content -> Text,
        #[max_length = 100]
        author -> Varchar,
        slug -> Text,
        created_at -> Timestamptz,
        preview_image -> Nullable<Text>,
    }
}
