mod app;
mod assets;
mod config;
mod debug;
mod ecs;
mod error;
mod host;
mod platform;
mod render;
mod scheduler;
mod shell;
mod slime;
mod sound;

fn main() {
    env_logger::init();
    log::info!("SlimePet starting up");

    if let Err(e) = app::run() {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
