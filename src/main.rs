use anyhow::Context;
use vault_gallery::app::GalleryApp;

fn main() -> anyhow::Result<()> {
    // Prefer C numeric locale up-front; GTK may later adjust locale again.
    std::env::set_var("LC_NUMERIC", "C");
    unsafe {
        libc::setlocale(libc::LC_NUMERIC, b"C\0".as_ptr().cast());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                "vault_gallery=info"
                    .parse()
                    .context("Invalid log directive")?,
            ),
        )
        .init();

    let app = GalleryApp::new();
    std::process::exit(app.run());
}
