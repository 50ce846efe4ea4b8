pub mod chat_area;
pub mod input_bar;
pub mod pairing;
pub mod sidebar;
pub mod status_banner;
