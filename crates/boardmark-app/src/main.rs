//! Command-line entry point (native).

#[cfg(feature = "native")]
fn main() {
    use clap::Parser;

    env_logger::init();
    let args = boardmark_app::Args::parse();
    log::info!("Starting boardmark");

    if let Err(err) = boardmark_app::run(&args) {
        log::error!("{err}");
        eprintln!("boardmark: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
