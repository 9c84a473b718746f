use diesel::prelude::*;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Category {
    pub id: i32,
    /// Lowercase, slug-like name used in URLs.
    pub category_name: String,
    pub category_display_name: String,
    pub category_description: String,
}

#[derive(Insertable, AsChangeset, Debug)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory<'a> {
    pub category_name: &'a str,
    pub category_display_name: &'a str,
    pub category_description: &'a str,
}
