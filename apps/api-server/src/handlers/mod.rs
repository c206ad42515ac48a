//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod health;
mod posts;

use actix_web::web;

/// Configure all application routes. Literal segments are registered ahead
/// of the `{id}` captures they would otherwise shadow.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/verify-email", web::get().to(auth::verify_email))
                    .route("/me", web::get().to(auth::me)),
            ),
    )
    .service(
        web::scope("/posts")
            .route("", web::get().to(posts::list_posts))
            .route("", web::post().to(posts::create_post))
            .route("/my-posts", web::get().to(posts::my_posts))
            .route("/stats", web::get().to(posts::stats))
            .route("/{post_id}", web::get().to(posts::get_post))
            .route("/{post_id}", web::patch().to(posts::update_post))
            .route("/{post_id}", web::delete().to(posts::delete_post)),
    )
    .service(
        web::scope("/comments")
            .route("", web::post().to(comments::create_comment))
            .route("/author/{author_id}", web::get().to(comments::comments_by_author))
            .route("/{comment_id}", web::get().to(comments::get_comment))
            .route("/{comment_id}", web::patch().to(comments::update_comment))
            .route("/{comment_id}", web::delete().to(comments::delete_comment))
            .route(
                "/{comment_id}/moderate",
                web::patch().to(comments::moderate_comment),
            ),
    );
}
