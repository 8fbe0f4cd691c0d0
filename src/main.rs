use std::path::Path;

use parasurf::{Options, Viewer};

fn main() {
    env_logger::init();

    let options = match std::env::args().nth(1) {
        Some(preset) => match Options::load(Path::new(&preset)) {
            Ok(options) => options,
            Err(e) => {
                log::error!("failed to load preset `{preset}`: {e}");
                std::process::exit(1);
            }
        },
        None => Options::default(),
    };

    if let Err(e) = Viewer::builder().with_options(options).build().run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
