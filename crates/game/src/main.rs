mod app;

use engine::run_app;
use tracing::error;

fn main() {
    let wiring = match app::bootstrap::build_app() {
        Ok(wiring) => wiring,
        Err(err) => {
            // Tracing is already up by the time build_app can fail.
            error!(error = %err, "startup_failed");
            std::process::exit(1);
        }
    };

    if let Err(err) = run_app(wiring.config, Box::new(wiring.game)) {
        error!(error = %err, "game_exited_with_error");
        std::process::exit(1);
    }
}
