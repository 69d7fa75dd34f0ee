pub mod components;
pub mod layouts;
pub mod pages;
pub mod text;

// Re-exports for convenience
pub use layouts::email::email_layout;
pub use pages::report_page;
pub use text::report_text;
