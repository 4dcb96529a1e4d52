//! Opens a window with the smoke background.
//!
//! `RUST_LOG=smokefield=debug` shows frame timing.

use smokefield::prelude::*;

const CONTAINER_ID: &str = "fondo";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut containers = ContainerRegistry::new();
    containers.register(CONTAINER_ID, ContainerSpec::new("smokefield", 1280, 720));

    let Some(background) = init_background(&containers, CONTAINER_ID) else {
        return;
    };

    if let Err(e) = background.run() {
        log::warn!("continuing without background: {}", e);
    }
}
