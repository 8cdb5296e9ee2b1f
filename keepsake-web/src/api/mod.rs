//! HTTP API handlers for keepsake-web

pub mod games;
pub mod health;
pub mod letters;
pub mod photos;
pub mod songs;
pub mod ui;
pub mod upload;

pub use games::game_routes;
pub use health::health_routes;
pub use letters::letter_routes;
pub use photos::photo_routes;
pub use songs::song_routes;
pub use ui::ui_routes;
pub use upload::upload_routes;
