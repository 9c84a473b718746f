use axum::{Router, routing::get};

use crate::App;

use super::{
    category::{
        create::{get_add_category, post_add_category},
        delete::delete_category,
        edit::{get_edit_category, post_edit_category},
        view::get_category,
    },
    home::{dashboard, index},
    post::{
        create::{get_add_post, post_add_post},
        delete::delete_post,
        edit::{get_edit_post, post_edit_post},
        view::get_post,
    },
};

pub fn route() -> Router<App> {
    // `add` is a static segment and wins over `{key}`
    Router::<App>::new()
        .route("/", get(index))
        .route("/dashboard", get(dashboard))
        .route("/post/add", get(get_add_post).post(post_add_post))
        .route("/post/{key}", get(get_post))
        .route("/post/{key}/edit", get(get_edit_post).post(post_edit_post))
        .route("/post/{key}/delete", get(delete_post))
        .route("/category/add", get(get_add_category).post(post_add_category))
        .route("/category/{key}", get(get_category))
        .route(
            "/category/{key}/edit",
            get(get_edit_category).post(post_edit_category),
        )
        .route("/category/{key}/delete", get(delete_category))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use diesel::prelude::*;
    use diesel_async::RunQueryDsl;

    use crate::{
        blog::models::post::Post,
        bootstrap::FIXTURE_PASSWORD,
        schema::{categories, posts},
        test_support::{TestApp, TestClient},
    };

    async fn signed_in(app: &TestApp, email: &str) -> TestClient {
        let mut client = app.client();
        client
            .login(email, FIXTURE_PASSWORD)
            .await
            .assert_redirect("/dashboard");
        client
    }

    async fn category_id(app: &TestApp, name: &str) -> i32 {
        categories::table
            .filter(categories::category_name.eq(name))
            .select(categories::id)
            .first(&mut app.conn().await)
            .await
            .unwrap()
    }

    async fn post_by_slug(app: &TestApp, slug: &str) -> Post {
        posts::table
            .filter(posts::slug.eq(slug))
            .select(Post::as_select())
            .first(&mut app.conn().await)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn admin_pages_require_a_signed_in_user() {
        let app = TestApp::new().await;
        let mut client = app.client();

        for uri in [
            "/dashboard",
            "/post/add",
            "/category/add",
            "/post/lorem-ipsum/edit",
            "/post/1/delete",
            "/category/1/edit",
            "/category/1/delete",
        ] {
            client.get(uri).await.assert_redirect("/login");
        }

        client
            .post("/post/add", &[("title", "Sneaky"), ("content", "x")])
            .await
            .assert_redirect("/login");
    }

    #[tokio::test]
    async fn home_lists_only_published_posts() {
        let app = TestApp::new().await;
        let page = app.client().get("/").await;

        assert_eq!(page.status, StatusCode::OK);
        assert!(page.body.contains("Lorem Consectetur"));
        assert!(page.body.contains("Python Basics"));
        assert!(!page.body.contains("Lorem Ipsum Dolor"));
    }

    #[tokio::test]
    async fn posts_resolve_by_id_or_slug() {
        let app = TestApp::new().await;
        let post = post_by_slug(&app, "lorem-doplor").await;
        let mut client = app.client();

        let by_slug = client.get("/post/lorem-doplor").await;
        let by_id = client.get(&format!("/post/{}", post.id)).await;

        assert_eq!(by_slug.status, StatusCode::OK);
        assert_eq!(by_id.status, StatusCode::OK);
        assert!(by_id.body.contains("Lorem Doplor"));
        assert!(by_id.body.contains("John Smith"));

        assert_eq!(client.get("/post/no-such-post").await.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn drafts_are_only_visible_to_their_author() {
        let app = TestApp::new().await;

        let anonymous = app.client().get("/post/lorem-ipsum-dolor").await;
        assert_eq!(anonymous.status, StatusCode::NOT_FOUND);

        let mut other = signed_in(&app, "jdoe@example.com").await;
        let page = other.get("/post/lorem-ipsum-dolor").await;
        assert_eq!(page.status, StatusCode::NOT_FOUND);

        let mut author = signed_in(&app, "jsmith@example.com").await;
        let page = author.get("/post/lorem-ipsum-dolor").await;
        assert_eq!(page.status, StatusCode::OK);
        assert!(page.body.contains("Draft"));
    }

    #[tokio::test]
    async fn new_posts_get_the_next_free_slug() {
        let app = TestApp::new().await;
        let category = category_id(&app, "python-basics").await.to_string();
        let mut client = signed_in(&app, "jsmith@example.com").await;

        // fixtures hold lorem-ipsum and lorem-ipsum-1
        let fields = |title| [
            ("category_id", category.as_str()),
            ("title", title),
            ("content", "Body"),
        ];

        client
            .post("/post/add", &fields("Lorem Ipsum"))
            .await
            .assert_redirect("/post/lorem-ipsum-2");
        client
            .post("/post/add", &fields("Fresh Title"))
            .await
            .assert_redirect("/post/fresh-title");
        client
            .post("/post/add", &fields("Fresh Title"))
            .await
            .assert_redirect("/post/fresh-title-1");

        let page = client.get("/post/fresh-title-1").await;
        assert!(page.body.contains("Post added successfully!"));

        let post = post_by_slug(&app, "fresh-title").await;
        assert!(post.is_published);
    }

    #[tokio::test]
    async fn first_duplicate_title_gets_suffix_one() {
        let app = TestApp::new().await;
        let category = category_id(&app, "python-basics").await.to_string();

        diesel::delete(posts::table.filter(posts::slug.eq("lorem-ipsum-1")))
            .execute(&mut app.conn().await)
            .await
            .unwrap();

        let mut client = signed_in(&app, "jsmith@example.com").await;
        client
            .post(
                "/post/add",
                &[
                    ("category_id", category.as_str()),
                    ("title", "Lorem Ipsum"),
                    ("content", "Body"),
                ],
            )
            .await
            .assert_redirect("/post/lorem-ipsum-1");
    }

    #[tokio::test]
    async fn numeric_slugs_win_over_ids() {
        let app = TestApp::new().await;
        let category = category_id(&app, "python-basics").await.to_string();
        let mut client = signed_in(&app, "jdoe@example.com").await;

        // fixture post 1 is "Lorem Ipsum"
        client
            .post(
                "/post/add",
                &[
                    ("category_id", category.as_str()),
                    ("title", "1"),
                    ("content", "Counting from one"),
                ],
            )
            .await
            .assert_redirect("/post/1");

        let page = client.get("/post/1").await;
        assert_eq!(page.status, StatusCode::OK);
        assert!(page.body.contains("Counting from one"));

        let page = client.get("/post/1/edit").await;
        assert_eq!(page.status, StatusCode::OK);
        assert!(page.body.contains("Counting from one"));

        client
            .post(
                "/category/add",
                &[
                    ("category_name", "1"),
                    ("category_display_name", "Numbers"),
                    ("category_description", "Only digits here."),
                ],
            )
            .await
            .assert_redirect("/category/1");

        let page = client.get("/category/1").await;
        assert_eq!(page.status, StatusCode::OK);
        assert!(page.body.contains("Only digits here."));
    }

    #[tokio::test]
    async fn saving_keeps_a_new_post_as_draft() {
        let app = TestApp::new().await;
        let category = category_id(&app, "advanced-python").await.to_string();
        let mut client = signed_in(&app, "jdoe@example.com").await;

        client
            .post(
                "/post/add",
                &[
                    ("category_id", category.as_str()),
                    ("title", "Work In Progress"),
                    ("slug", "Custom Slug!"),
                    ("content", "Not yet"),
                    ("published_at", "2030-01-01 08:00"),
                    ("save", "1"),
                ],
            )
            .await
            .assert_redirect("/post/custom-slug");

        let post = post_by_slug(&app, "custom-slug").await;
        assert!(!post.is_published);
        assert_eq!(post.published_at.to_string(), "2030-01-01 08:00:00");
    }

    #[tokio::test]
    async fn invalid_post_is_sent_back_with_messages() {
        let app = TestApp::new().await;
        let mut client = signed_in(&app, "jsmith@example.com").await;

        client
            .post(
                "/post/add",
                &[
                    ("category_id", "not-a-number"),
                    ("title", " "),
                    ("content", "Keep this text"),
                    ("published_at", "tomorrow"),
                ],
            )
            .await
            .assert_redirect("/post/add");

        let page = client.get("/post/add").await;
        assert!(page.body.contains("Please select a category from the list."));
        assert!(page.body.contains("Title is a required field."));
        assert!(page.body.contains("A valid date is required."));
        assert!(page.body.contains("Keep this text"));
    }

    #[tokio::test]
    async fn editing_is_scoped_to_the_author() {
        let app = TestApp::new().await;
        let post = post_by_slug(&app, "lorem-ipsum").await;
        let category = post.category_id.to_string();
        let mut intruder = signed_in(&app, "jdoe@example.com").await;

        let page = intruder.get("/post/lorem-ipsum/edit").await;
        assert_eq!(page.status, StatusCode::NOT_FOUND);

        let res = intruder
            .post(
                &format!("/post/{}/edit", post.id),
                &[
                    ("category_id", category.as_str()),
                    ("title", "Hijacked"),
                    ("content", "Hijacked"),
                ],
            )
            .await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);

        let res = intruder.get(&format!("/post/{}/delete", post.id)).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);

        let unchanged = post_by_slug(&app, "lorem-ipsum").await;
        assert_eq!(unchanged.title, "Lorem Ipsum");
    }

    #[tokio::test]
    async fn editing_toggles_publication_and_keeps_slug_and_date() {
        let app = TestApp::new().await;
        let draft = post_by_slug(&app, "lorem-ipsum-dolor").await;
        let category = draft.category_id.to_string();
        let mut client = signed_in(&app, "jsmith@example.com").await;

        client
            .post(
                "/post/lorem-ipsum-dolor/edit",
                &[
                    ("category_id", category.as_str()),
                    ("title", "A Brand New Title"),
                    ("content", "Rewritten"),
                    ("published_at", ""),
                    ("publish", "1"),
                ],
            )
            .await
            .assert_redirect("/post/lorem-ipsum-dolor");

        let edited = post_by_slug(&app, "lorem-ipsum-dolor").await;
        assert_eq!(edited.title, "A Brand New Title");
        assert!(edited.is_published);
        assert_eq!(edited.published_at, draft.published_at);

        let page = client.get("/post/lorem-ipsum-dolor").await;
        assert!(page.body.contains("Post updated successfully!"));

        client
            .post(
                "/post/lorem-ipsum-dolor/edit",
                &[
                    ("category_id", category.as_str()),
                    ("title", "A Brand New Title"),
                    ("content", "Rewritten"),
                    ("unpublish", "1"),
                ],
            )
            .await
            .assert_redirect("/post/lorem-ipsum-dolor");
        assert!(!post_by_slug(&app, "lorem-ipsum-dolor").await.is_published);
    }

    #[tokio::test]
    async fn authors_can_delete_their_posts() {
        let app = TestApp::new().await;
        let post = post_by_slug(&app, "lorem-doplor-1").await;
        let mut client = signed_in(&app, "aapple@example.com").await;

        client
            .get(&format!("/post/{}/delete", post.id))
            .await
            .assert_redirect("/dashboard");

        let page = client.get("/dashboard").await;
        assert!(page.body.contains("Deleted post successfully."));
        assert_eq!(client.get("/post/lorem-doplor-1").await.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn category_in_use_cannot_be_deleted() {
        let app = TestApp::new().await;
        let basics = category_id(&app, "python-basics").await;
        let advanced = category_id(&app, "advanced-python").await;
        let mut client = signed_in(&app, "jsmith@example.com").await;

        client
            .get(&format!("/category/{basics}/delete"))
            .await
            .assert_redirect("/dashboard");

        let page = client.get("/dashboard").await;
        assert!(page.body.contains(
            "Category could not be deleted, there are 5 posts in the category. \
             Update the post(s) categories first."
        ));

        diesel::update(posts::table.filter(posts::category_id.eq(basics)))
            .set(posts::category_id.eq(advanced))
            .execute(&mut app.conn().await)
            .await
            .unwrap();

        client
            .get(&format!("/category/{basics}/delete"))
            .await
            .assert_redirect("/dashboard");
        let page = client.get("/dashboard").await;
        assert!(page.body.contains("Deleted category successfully."));

        let res = client.get("/category/python-basics").await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn category_names_are_normalized_and_unique() {
        let app = TestApp::new().await;
        let mut client = signed_in(&app, "jdoe@example.com").await;

        client
            .post(
                "/category/add",
                &[
                    ("category_name", "Rust Tips"),
                    ("category_display_name", "Rust Tips"),
                    ("category_description", "Borrowing, mostly."),
                ],
            )
            .await
            .assert_redirect("/category/rust-tips");

        let page = client.get("/category/rust-tips").await;
        assert_eq!(page.status, StatusCode::OK);
        assert!(page.body.contains("Category added successfully!"));
        assert!(page.body.contains("Borrowing, mostly."));

        client
            .post(
                "/category/add",
                &[("category_name", "rust-tips"), ("category_display_name", "")],
            )
            .await
            .assert_redirect("/category/add");

        let page = client.get("/category/add").await;
        assert!(page.body.contains("Category name already exists."));
        assert!(page.body.contains("Category display name is a required field."));
    }

    #[tokio::test]
    async fn category_can_keep_its_name_when_edited() {
        let app = TestApp::new().await;
        let id = category_id(&app, "advanced-python").await;
        let mut client = signed_in(&app, "jdoe@example.com").await;

        client
            .post(
                &format!("/category/{id}/edit"),
                &[
                    ("category_name", "advanced-python"),
                    ("category_display_name", "Expert Python"),
                    ("category_description", ""),
                ],
            )
            .await
            .assert_redirect("/category/advanced-python");

        let page = client.get("/category/advanced-python").await;
        assert!(page.body.contains("Expert Python"));
        assert!(page.body.contains("Category updated successfully!"));

        client
            .post(
                &format!("/category/{id}/edit"),
                &[
                    ("category_name", "python-basics"),
                    ("category_display_name", "Expert Python"),
                ],
            )
            .await
            .assert_redirect("/category/advanced-python/edit");
    }

    #[tokio::test]
    async fn unknown_routes_render_the_not_found_page() {
        let app = TestApp::new().await;
        let res = app.client().get("/nowhere/at/all").await;

        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert!(res.body.contains("404"));
    }
}
