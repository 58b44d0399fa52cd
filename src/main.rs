//! tempus main entrypoint.

use tempus::run;
use tempus::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {e}"));
        std::process::exit(1);
    }
}
