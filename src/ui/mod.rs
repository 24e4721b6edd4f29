// UI module
// Contains layout, components, and the color palette

pub mod layout;
pub mod components;
pub mod theme;

pub use layout::render_app_layout;
