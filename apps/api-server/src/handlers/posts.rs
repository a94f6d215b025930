//! Post resource handlers.

use actix_web::{HttpRequest, HttpResponse, web};

use quill_core::domain::Post;
use quill_shared::dto::{DeletedResponse, PostResponse};

use super::form::read_post_input;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn to_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        description: post.description,
        image_url: post.image_url,
        created_at: post.created_at.format(DATE_FORMAT).to_string(),
        updated_at: post.updated_at.format(DATE_FORMAT).to_string(),
    }
}

/// POST /posts
pub async fn store(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Payload,
) -> AppResult<HttpResponse> {
    let input = read_post_input(&req, payload, state.max_upload_bytes).await?;
    let post = state.posts.create(input).await?;

    Ok(HttpResponse::Ok().json(to_response(post)))
}

/// GET /posts
pub async fn index(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await?;
    let body: Vec<PostResponse> = posts.into_iter().map(to_response).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// GET /posts/{id}
pub async fn show(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let post = state.posts.get(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(to_response(post)))
}

/// PATCH /posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    req: HttpRequest,
    payload: web::Payload,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let input = read_post_input(&req, payload, state.max_upload_bytes).await?;
    let post = state.posts.update(id, input).await?;

    Ok(HttpResponse::Ok().json(to_response(post)))
}

/// DELETE /posts/{id} - Protected route
pub async fn destroy(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.posts.delete(id).await?;

    tracing::info!(post_id = id, subject = %identity.subject, "Post deleted by caller");
    Ok(HttpResponse::Ok().json(DeletedResponse::deleted()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use serde_json::{Value, json};

    use quill_core::domain::NewPost;
    use quill_core::ports::{BlobStore, PostRepository, TokenService};
    use quill_infra::{InMemoryBlobStore, InMemoryPostRepository, JwtConfig, JwtTokenService};

    use super::*;
    use crate::handlers::configure_routes;

    const BOUNDARY: &str = "quill-test-boundary";

    struct Ctx {
        state: AppState,
        posts: Arc<InMemoryPostRepository>,
        blobs: Arc<InMemoryBlobStore>,
        tokens: Arc<JwtTokenService>,
    }

    fn ctx() -> Ctx {
        ctx_with_limit(1024 * 1024)
    }

    fn ctx_with_limit(max_upload_bytes: usize) -> Ctx {
        let posts = Arc::new(InMemoryPostRepository::new());
        let blobs = Arc::new(InMemoryBlobStore::new());
        let tokens = Arc::new(JwtTokenService::new(JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 1,
            issuer: "test".to_string(),
        }));
        let state = AppState::from_parts(posts.clone(), blobs.clone(), tokens.clone(), max_upload_bytes);
        Ctx {
            state,
            posts,
            blobs,
            tokens,
        }
    }

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a [u8]),
    }

    fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                            .as_bytes(),
                    );
                }
                Part::File(name, filename, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                             Content-Type: image/jpeg\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                    body.extend_from_slice(b"\r\n");
                }
            }
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn multipart(req: test::TestRequest, parts: &[Part<'_>]) -> test::TestRequest {
        req.insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_body(parts))
    }

    async fn seed(posts: &InMemoryPostRepository, title: &str, image_url: Option<&str>) -> Post {
        posts
            .create(NewPost {
                title: title.to_string(),
                description: format!("{title} description"),
                image_url: image_url.map(str::to_string),
            })
            .await
            .unwrap()
    }

    #[actix_rt::test]
    async fn test_post_can_be_stored() {
        let c = ctx();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(c.state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = multipart(
            test::TestRequest::post().uri("/api/posts"),
            &[
                Part::Text("title", "Some title"),
                Part::Text("description", "blabla"),
                Part::File("image", "my_image.jpg", b"\xff\xd8jpeg"),
            ],
        )
        .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(c.posts.count().await.unwrap(), 1);

        let stored = c.posts.all().await.unwrap().remove(0);
        assert_eq!(stored.title, "Some title");
        assert_eq!(stored.description, "blabla");

        let key = stored.image_url.clone().unwrap();
        assert!(key.starts_with("images/") && key.ends_with(".jpg"));
        assert_eq!(c.blobs.get(&key).await.unwrap(), Some(b"\xff\xd8jpeg".to_vec()));

        let today = stored.created_at.format("%Y-%m-%d").to_string();
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            json!({
                "id": stored.id,
                "title": "Some title",
                "description": "blabla",
                "image_url": key,
                "created_at": today,
                "updated_at": today,
            })
        );
    }

    #[actix_rt::test]
    async fn test_post_can_be_stored_from_json_without_image() {
        let c = ctx();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(c.state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/posts")
            .set_json(json!({"title": "Title", "description": "Desc"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["title"], "Title");
        assert_eq!(body["image_url"], Value::Null);
        assert!(c.blobs.is_empty().await);
    }

    #[actix_rt::test]
    async fn test_title_is_required_for_storing_post() {
        let c = ctx();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(c.state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = multipart(
            test::TestRequest::post().uri("/api/posts"),
            &[
                Part::Text("title", ""),
                Part::Text("description", "Desc"),
                Part::Text("image", ""),
            ],
        )
        .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"]["title"][0], "The title field is required.");
        assert!(body["errors"].get("image").is_none());
        assert_eq!(c.posts.count().await.unwrap(), 0);
    }

    #[actix_rt::test]
    async fn test_image_must_be_a_file() {
        let c = ctx();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(c.state.clone()))
                .configure(configure_routes),
        )
        .await;

        let form = multipart(
            test::TestRequest::post().uri("/posts"),
            &[
                Part::Text("title", "Title"),
                Part::Text("description", "Desc"),
                Part::Text("image", "asdasdasdasdasdasd"),
            ],
        )
        .to_request();
        let json_req = test::TestRequest::post()
            .uri("/posts")
            .set_json(json!({"title": "Title", "description": "Desc", "image": "asdasdasdasdasdasd"}))
            .to_request();

        for req in [form, json_req] {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["errors"]["image"], json!(["The image field must be a file."]));
        }
        assert_eq!(c.posts.count().await.unwrap(), 0);
    }

    #[actix_rt::test]
    async fn test_unsupported_content_type() {
        let c = ctx();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(c.state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/posts")
            .insert_header((header::CONTENT_TYPE, "text/plain"))
            .set_payload("title=x")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[actix_rt::test]
    async fn test_text_fields_must_be_strings() {
        let c = ctx();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(c.state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/posts")
            .set_json(json!({"title": 123, "description": "Desc"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"]["title"], json!(["The title field must be a string."]));
        assert!(body["errors"].get("description").is_none());
        assert_eq!(c.posts.count().await.unwrap(), 0);
    }

    #[actix_rt::test]
    async fn test_post_can_be_stored_from_urlencoded_form() {
        let c = ctx();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(c.state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/posts")
            .set_form([("title", "Title"), ("description", "Desc"), ("image", "")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["title"], "Title");
        assert_eq!(body["description"], "Desc");
        assert_eq!(body["image_url"], Value::Null);

        let req = test::TestRequest::post()
            .uri("/posts")
            .set_form([("title", "Title"), ("description", "Desc"), ("image", "asd")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"]["image"], json!(["The image field must be a file."]));
        assert_eq!(c.posts.count().await.unwrap(), 1);
    }

    #[actix_rt::test]
    async fn test_oversized_body_is_rejected() {
        let c = ctx_with_limit(16);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(c.state.clone()))
                .configure(configure_routes),
        )
        .await;

        let json_req = test::TestRequest::post()
            .uri("/posts")
            .set_json(json!({"title": "A title longer than the limit", "description": "Desc"}))
            .to_request();
        let form = multipart(
            test::TestRequest::post().uri("/posts"),
            &[
                Part::Text("title", "T"),
                Part::Text("description", "D"),
                Part::File("image", "image.jpg", &[7u8; 64]),
            ],
        )
        .to_request();

        for req in [json_req, form] {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        }
        assert_eq!(c.posts.count().await.unwrap(), 0);
        assert!(c.blobs.is_empty().await);
    }

    #[actix_rt::test]
    async fn test_post_can_be_updated() {
        let c = ctx();
        let post = seed(&c.posts, "Title", None).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(c.state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = multipart(
            test::TestRequest::patch().uri(&format!("/api/posts/{}", post.id)),
            &[
                Part::Text("title", "Title edited"),
                Part::Text("description", "Desc edited"),
                Part::File("image", "image.jpg", b"new image"),
            ],
        )
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["id"], post.id);
        assert_eq!(body["title"], "Title edited");
        assert_eq!(body["description"], "Desc edited");

        let key = body["image_url"].as_str().unwrap();
        assert!(key.starts_with("images/"));
        assert!(c.blobs.exists(key).await.unwrap());

        assert_eq!(c.posts.count().await.unwrap(), 1);
        let stored = c.posts.all().await.unwrap().remove(0);
        assert_eq!(stored.id, post.id);
        assert_eq!(stored.title, "Title edited");
    }

    #[actix_rt::test]
    async fn test_update_without_image_keeps_image_url() {
        let c = ctx();
        let post = seed(&c.posts, "Title", Some("images/old.jpg")).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(c.state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::patch()
            .uri(&format!("/posts/{}", post.id))
            .set_json(json!({"title": "New title", "description": "New desc"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["title"], "New title");
        assert_eq!(body["image_url"], "images/old.jpg");
    }

    #[actix_rt::test]
    async fn test_invalid_update_leaves_post_unchanged() {
        let c = ctx();
        let post = seed(&c.posts, "Title", None).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(c.state.clone()))
                .configure(configure_routes),
        )
        .await;

        let blank_title = multipart(
            test::TestRequest::patch().uri(&format!("/posts/{}", post.id)),
            &[
                Part::Text("title", "   "),
                Part::Text("description", "Desc edited"),
                Part::File("image", "image.jpg", b"new image"),
            ],
        )
        .to_request();
        let bad_image = test::TestRequest::patch()
            .uri(&format!("/posts/{}", post.id))
            .set_json(json!({"title": "Title edited", "image": "asdasdasdasdasdasd"}))
            .to_request();

        for req in [blank_title, bad_image] {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }

        assert_eq!(c.posts.all().await.unwrap(), vec![post]);
        assert!(c.blobs.is_empty().await);
    }

    #[actix_rt::test]
    async fn test_update_missing_post_is_not_found() {
        let c = ctx();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(c.state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::patch()
            .uri("/posts/404")
            .set_json(json!({"title": "T", "description": "D"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_rt::test]
    async fn test_index_lists_every_post() {
        let c = ctx();
        let mut seeded = Vec::new();
        for i in 0..10 {
            let image = (i % 2 == 0).then(|| format!("images/{i}.jpg"));
            seeded.push(seed(&c.posts, &format!("Post {i}"), image.as_deref()).await);
        }
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(c.state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let items = body.as_array().unwrap();
        assert_eq!(items.len(), seeded.len());
        for (item, post) in items.iter().zip(&seeded) {
            assert_eq!(item["id"], post.id);
            assert_eq!(item["title"], post.title.as_str());
            assert_eq!(item["description"], post.description.as_str());
            assert_eq!(item["image_url"], json!(post.image_url));
            assert!(item["created_at"].is_string());
        }
    }

    #[actix_rt::test]
    async fn test_show_returns_single_post() {
        let c = ctx();
        let post = seed(&c.posts, "Shown", None).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(c.state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/posts/{}", post.id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body, serde_json::to_value(to_response(post)).unwrap());

        let missing = test::TestRequest::get().uri("/posts/999").to_request();
        let resp = test::call_service(&app, missing).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_rt::test]
    async fn test_post_can_be_deleted_by_authenticated_caller() {
        let c = ctx();
        let post = seed(&c.posts, "Doomed", Some("images/kept.jpg")).await;
        let token = c.tokens.generate_token("user-1").unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(c.state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::delete()
            .uri(&format!("/api/posts/{}", post.id))
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"message": "deleted"}));
        assert_eq!(c.posts.count().await.unwrap(), 0);
    }

    #[actix_rt::test]
    async fn test_post_can_be_deleted_only_by_authenticated_caller() {
        let c = ctx();
        let post = seed(&c.posts, "Safe", None).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(c.state.clone()))
                .configure(configure_routes),
        )
        .await;

        let anonymous = test::TestRequest::delete()
            .uri(&format!("/api/posts/{}", post.id))
            .to_request();
        let resp = test::call_service(&app, anonymous).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let forged = test::TestRequest::delete()
            .uri(&format!("/api/posts/{}", post.id))
            .insert_header((header::AUTHORIZATION, "Bearer not-a-token"))
            .to_request();
        let resp = test::call_service(&app, forged).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        assert_eq!(c.posts.count().await.unwrap(), 1);
    }

    #[actix_rt::test]
    async fn test_delete_missing_post_is_not_found() {
        let c = ctx();
        let token = c.tokens.generate_token("user-1").unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(c.state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::delete()
            .uri("/posts/12")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
