// Mirrors the DDL in `bootstrap.rs`.

diesel::table! {
    users (id) {
        id -> Integer,
        first_name -> Text,
        last_name -> Text,
        email -> Text,
        password_hash -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    categories (id) {
        id -> Integer,
        category_name -> Text,
        category_display_name -> Text,
        category_description -> Text,
    }
}

diesel::table! {
    posts (id) {
        id -> Integer,
        author_id -> Integer,
        category_id -> Integer,
        title -> Text,
        slug -> Text,
        short_content -> Text,
        content -> Text,
        is_published -> Bool,
        published_at -> Timestamp,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    sessions (id) {
        id -> Integer,
        token -> Text,
        user_id -> Nullable<Integer>,
        created_at -> Timestamp,
        expires_at -> Timestamp,
    }
}

diesel::table! {
    session_flashes (id) {
        id -> Integer,
        session_id -> Integer,
        payload -> Text,
        created_at -> Timestamp,
    }
}

diesel::joinable!(posts -> categories (category_id));
diesel::joinable!(posts -> users (author_id));
diesel::joinable!(session_flashes -> sessions (session_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    categories,
    posts,
    sessions,
    session_flashes,
);
