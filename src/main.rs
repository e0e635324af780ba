use noty::{app::App, cli, ui};

#[tokio::main]
async fn main() {
    let matches = cli::build().get_matches();
    if let Err(e) = App::start(&matches).await {
        ui::error(format!("Error: {:#}", e));
        std::process::exit(1);
    }
}
