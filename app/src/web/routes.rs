// bazaar_admin/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{health_handlers, product_handlers, user_handlers};

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_handlers::health_check_handler))
      // Account administration, admins only.
      .service(
        web::scope("/users")
          .route("", web::get().to(user_handlers::list_users_handler))
          .route("", web::post().to(user_handlers::create_user_handler))
          .route("/page", web::get().to(user_handlers::users_page_handler))
          .route("/{user_id}", web::patch().to(user_handlers::update_user_handler))
          .route("/{user_id}", web::delete().to(user_handlers::delete_user_handler)),
      )
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products_handler))
          .route("", web::post().to(product_handlers::create_product_handler))
          .route("/page", web::get().to(product_handlers::products_page_handler))
          .route("/{product_id}", web::get().to(product_handlers::get_product_handler))
          .route("/{product_id}", web::patch().to(product_handlers::update_product_handler))
          .route("/{product_id}", web::delete().to(product_handlers::delete_product_handler)),
      ),
  );
}
