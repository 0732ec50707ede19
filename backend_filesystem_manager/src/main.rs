// backend_filesystem_manager/src/main.rs
#[macro_use]
extern crate rocket;

use backend_filesystem_manager::{build, config};

#[launch]
fn rocket() -> _ {
    build(config::figment())
}
