use std::ops::Add;

use base64::Engine;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use rand::RngCore;

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::sessions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Session {
    pub id: i32,
    pub token: String,
    /// Set once the visitor has signed in.
    pub user_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::sessions)]
pub struct NewSession {
    pub token: String,
    pub user_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::session_flashes)]
pub struct NewSessionFlash {
    pub session_id: i32,
    pub payload: String,
    pub created_at: NaiveDateTime,
}

impl Session {
    pub fn new_with_user_id(user_id: Option<i32>, ttl: chrono::Duration) -> NewSession {
        let mut session_bytes = [0u8; 48];
        rand::thread_rng().fill_bytes(&mut session_bytes);

        let token =
            "blog_".to_owned() + &base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(session_bytes);

        let now = chrono::Utc::now().naive_utc();

        NewSession {
            token,
            user_id,
            created_at: now,
            expires_at: now.add(ttl),
        }
    }
}
