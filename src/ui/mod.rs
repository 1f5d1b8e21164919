pub mod keybindings;
pub mod style;
pub mod textures;
pub mod ticker;
pub mod viewer;
pub mod window;

pub use style::StyleRegistry;
pub use textures::TextureLoader;
pub use ticker::{GlibTicker, SharedSession};
pub use viewer::GtkLightboxView;
pub use window::GalleryWindow;
