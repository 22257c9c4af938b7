use anyhow::Result;
use clap::{App as ClapApp, Arg};
use crm_tui::app::{App, Options};
use crm_tui::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = ClapApp::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("DIR")
                .help("Directory holding config.yml")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("data-dir")
                .short("d")
                .long("data-dir")
                .value_name("DIR")
                .help("Directory holding mirrored collections")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("route")
                .short("r")
                .long("route")
                .value_name("PATH")
                .help("Page to open first, e.g. /campaigns")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("no-demo")
                .long("no-demo")
                .help("Start without demo records"),
        )
        .get_matches();

    let mut config = Config::new();
    config.load(matches.value_of("config"))?;
    if let Some(dir) = matches.value_of("data-dir") {
        config.data_dir = dir.into();
    }
    if matches.is_present("no-demo") {
        config.seed_demo_data = false;
    }

    let options = Options {
        route: matches.value_of("route").map(str::to_string),
    };
    App::start(config, options).await
}
